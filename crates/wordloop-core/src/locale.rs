//! Locales and voice matching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Word;

/// A language with an optional region (`en`, `en-US`, `zh-CN`).
///
/// Language is stored lowercase and region uppercase so that tags from
/// different sources compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Build a locale from parts.
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.trim().to_ascii_lowercase(),
            region: region
                .map(|r| r.trim().to_ascii_uppercase())
                .filter(|r| !r.is_empty()),
        }
    }

    /// Parse a tag such as `"en"`, `"en-US"` or `"zh_CN"`.
    ///
    /// Extra subtags (script, variants) are ignored. A blank tag yields `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.trim().split(['-', '_']).filter(|p| !p.is_empty());
        let language = parts.next()?;
        if !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts.find(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_alphabetic()));
        Some(Self::new(language, region))
    }

    /// Language subtag.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Whether both locales share a language.
    pub fn same_language(&self, other: &Self) -> bool {
        self.language == other.language
    }

    /// US English, the engine's initial language.
    pub fn english_us() -> Self {
        Self::new("en", Some("US"))
    }

    /// Simplified Chinese, the locale meanings are read in.
    pub fn meaning() -> Self {
        Self::new("zh", Some("CN"))
    }

    /// Locale a word's text is spoken in.
    ///
    /// Uses the word's own tag, then the library's, then US English.
    /// Bare `en` and `ja` tags get their usual regions so that exact voice
    /// matches are possible.
    pub fn for_word(word: &Word, library_tag: Option<&str>) -> Self {
        let parsed = Self::parse(&word.language_tag)
            .or_else(|| library_tag.and_then(Self::parse))
            .unwrap_or_else(Self::english_us);

        match (parsed.language(), parsed.region()) {
            ("en", None) => Self::english_us(),
            ("ja", None) => Self::new("ja", Some("JP")),
            _ => parsed,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

/// A voice offered by a speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Engine-specific voice identifier.
    pub name: String,
    /// Locale the voice speaks.
    pub locale: Locale,
    /// False when the voice is listed but its data is not installed.
    pub installed: bool,
}

impl VoiceInfo {
    /// An installed voice.
    pub fn new(name: impl Into<String>, locale: Locale) -> Self {
        Self {
            name: name.into(),
            locale,
            installed: true,
        }
    }
}

/// Outcome of choosing a voice for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMatch<'a> {
    /// Same language and region.
    Exact(&'a VoiceInfo),
    /// Same language, different or missing region.
    Language(&'a VoiceInfo),
    /// Nothing installed for the language; use the engine default.
    Default,
}

impl<'a> VoiceMatch<'a> {
    /// The chosen voice, unless falling back to the default.
    pub const fn voice(self) -> Option<&'a VoiceInfo> {
        match self {
            Self::Exact(v) | Self::Language(v) => Some(v),
            Self::Default => None,
        }
    }
}

/// Pick the best installed voice for `locale`.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], locale: &Locale) -> VoiceMatch<'a> {
    let installed = || voices.iter().filter(|v| v.installed);

    if let Some(voice) = installed().find(|v| &v.locale == locale) {
        return VoiceMatch::Exact(voice);
    }
    if let Some(voice) = installed().find(|v| v.locale.same_language(locale)) {
        return VoiceMatch::Language(voice);
    }
    VoiceMatch::Default
}
