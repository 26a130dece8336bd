//! Player state and settings lines.

use wordloop_core::{PlaybackConfiguration, PlayerState, Word};

pub const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// `[3/50] 食べる (taberu)  吃`; the meaning only when shown.
pub fn format_word_line(state: &PlayerState, word: &Word) -> String {
    let mut line = format!(
        "[{}/{}] {}",
        state.current_index + 1,
        state.word_count,
        word.display_text()
    );
    if word.display_text() != word.text {
        line.push_str(&format!(" ({})", word.text));
    }
    if state.show_meaning {
        line.push_str("  ");
        line.push_str(&word.meaning);
    }
    line
}

/// One line per setting, `key = value`.
pub fn format_settings(config: &PlaybackConfiguration) -> String {
    [
        format!("mode     = {}", config.mode),
        format!("speed    = {:.2}", config.speed),
        format!("interval = {:.2}s", config.interval_secs),
        format!("repeat   = {}", config.word_repeat_count),
        format!("random   = {}", on_off(config.is_random)),
        format!("loop     = {}", on_off(config.is_loop)),
    ]
    .join("\n")
}
