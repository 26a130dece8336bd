//! Commands and their arguments.

use clap::{Args, Subcommand};
use wordloop_core::{GroupId, LibraryId, PlaybackMode, PlaybackSettingsUpdate};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Speak the selected words
    Play(PlayArgs),

    /// Move to the next word without playing
    Next,

    /// Move to the previous word without playing
    Previous,

    /// Show the playback configuration and current word
    Status,

    /// Change playback settings
    Set(SetArgs),

    /// Manage word libraries
    #[command(subcommand)]
    Library(LibraryCommand),

    /// Manage words
    #[command(subcommand)]
    Word(WordCommand),

    /// Show resolved paths
    Paths,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Select these groups (comma separated) before playing
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Vec<GroupId>,

    /// Library for --groups (defaults to the active library)
    #[arg(short, long, requires = "groups")]
    pub library: Option<LibraryId>,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Simulate speech without delays
    #[arg(long)]
    pub instant: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Speech rate (0.5 to 3.0)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Silence between parts, in seconds (0.08 to 5.0)
    #[arg(long)]
    pub interval: Option<f32>,

    /// hide-all, meaning-only, word-only or word-then-meaning
    #[arg(long)]
    pub mode: Option<PlaybackMode>,

    /// Times each word is spoken (1 to 10)
    #[arg(long)]
    pub repeat: Option<u32>,

    /// Random order (on/off)
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    pub random: Option<bool>,

    /// Wrap around at the ends (on/off)
    #[arg(long = "loop", value_name = "on|off", value_parser = parse_switch)]
    pub is_loop: Option<bool>,
}

impl SetArgs {
    pub const fn to_update(&self) -> PlaybackSettingsUpdate {
        PlaybackSettingsUpdate {
            mode: self.mode,
            speed: self.speed,
            interval_secs: self.interval,
            word_repeat_count: self.repeat,
            is_random: self.random,
            is_loop: self.is_loop,
        }
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on or off, got '{other}'")),
    }
}

#[derive(Subcommand)]
pub enum LibraryCommand {
    /// List libraries
    List,

    /// Create an empty library
    Create {
        name: String,
        /// Language tag of the words (e.g. en, ja-JP)
        #[arg(long = "lang", default_value = "en")]
        language_tag: String,
    },

    /// Make a library the one the player draws from
    Activate { id: LibraryId },

    /// Delete a library and its words
    Delete { id: LibraryId },

    /// Show the groups of a library
    Groups {
        /// Defaults to the active library
        id: Option<LibraryId>,
    },

    /// Select groups to play, starting from their first word
    Select {
        /// Group ids (comma separated)
        #[arg(value_delimiter = ',', required = true)]
        groups: Vec<GroupId>,
        /// Defaults to the active library
        #[arg(short, long)]
        library: Option<LibraryId>,
    },

    /// Mark groups as reviewed
    Review {
        /// Group ids (comma separated)
        #[arg(value_delimiter = ',', required = true)]
        groups: Vec<GroupId>,
        /// Defaults to the active library
        #[arg(short, long)]
        library: Option<LibraryId>,
    },

    /// Clear the listened-today and reviewed-today marks of a library
    ResetDay {
        /// Defaults to the active library
        id: Option<LibraryId>,
    },
}

#[derive(Subcommand)]
pub enum WordCommand {
    /// Append a word to a library
    Add {
        text: String,
        meaning: String,
        /// Defaults to the active library
        #[arg(short, long)]
        library: Option<LibraryId>,
        /// Native written form (e.g. kanji)
        #[arg(long)]
        native: Option<String>,
        /// Part of speech
        #[arg(long)]
        pos: Option<String>,
        /// Language tag, if different from the library's
        #[arg(long = "lang")]
        language_tag: Option<String>,
        /// Written in a logographic script
        #[arg(long)]
        logographic: bool,
    },

    /// List the words of a library
    List {
        /// Defaults to the active library
        #[arg(short, long)]
        library: Option<LibraryId>,
        /// Only this group
        #[arg(short, long)]
        group: Option<GroupId>,
    },

    /// Search words in every library
    Search {
        query: String,
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn set_parses_switches_and_mode() {
        let cli = Cli::parse_from([
            "wordloop", "set", "--mode", "word-only", "--loop", "on", "--random", "off",
        ]);
        let Some(Commands::Set(args)) = cli.command else {
            panic!("expected set");
        };
        let update = args.to_update();
        assert_eq!(update.mode, Some(PlaybackMode::WordOnly));
        assert_eq!(update.is_loop, Some(true));
        assert_eq!(update.is_random, Some(false));
        assert!(update.speed.is_none());
    }

    #[test]
    fn bad_switch_is_rejected() {
        assert!(Cli::try_parse_from(["wordloop", "set", "--loop", "maybe"]).is_err());
    }

    #[test]
    fn play_groups_are_comma_separated() {
        let cli = Cli::parse_from(["wordloop", "play", "--groups", "3,1", "--duration", "5"]);
        let Some(Commands::Play(args)) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.groups, vec![3, 1]);
        assert_eq!(args.duration, Some(5));
        assert!(!args.instant);
    }

    #[test]
    fn library_select_requires_groups() {
        assert!(Cli::try_parse_from(["wordloop", "library", "select"]).is_err());
    }

    #[test]
    fn library_review_and_reset_day() {
        let cli = Cli::parse_from(["wordloop", "library", "review", "2,4", "-l", "7"]);
        let Some(Commands::Library(LibraryCommand::Review { groups, library })) = cli.command else {
            panic!("expected library review");
        };
        assert_eq!(groups, vec![2, 4]);
        assert_eq!(library, Some(7));

        let cli = Cli::parse_from(["wordloop", "library", "reset-day"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Library(LibraryCommand::ResetDay { id: None }))
        ));
    }
}
