//! Word and library domain types.

use serde::{Deserialize, Serialize};

/// Database identifier of a word.
pub type WordId = i64;

/// Database identifier of a word library.
pub type LibraryId = i64;

/// Identifier of a group inside a library (1-based, fixed-size partitions).
pub type GroupId = i64;

/// Number of words per group when a library is partitioned.
pub const WORDS_PER_GROUP: usize = 50;

/// A single vocabulary entry.
///
/// Words are owned by the word store and are read-only to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Database ID.
    pub id: WordId,
    /// Library this word belongs to.
    pub library_id: LibraryId,
    /// Group inside the library.
    pub group_id: GroupId,
    /// The text that is drilled (spoken as "the word").
    pub text: String,
    /// Native written form, e.g. kanji for a kana reading.
    pub native_form: Option<String>,
    /// Meaning text, always spoken in the meaning locale.
    pub meaning: String,
    /// Part of speech label, if the importer detected one.
    pub part_of_speech: Option<String>,
    /// BCP-47 style language tag of `text` (e.g. `"en"`, `"ja-JP"`).
    pub language_tag: String,
    /// Whether `text` is written in a logographic script.
    pub is_logographic: bool,
}

impl Word {
    /// Create a word with the required fields; optional fields start empty.
    pub fn new(
        id: WordId,
        library_id: LibraryId,
        group_id: GroupId,
        text: impl Into<String>,
        meaning: impl Into<String>,
        language_tag: impl Into<String>,
    ) -> Self {
        Self {
            id,
            library_id,
            group_id,
            text: text.into(),
            native_form: None,
            meaning: meaning.into(),
            part_of_speech: None,
            language_tag: language_tag.into(),
            is_logographic: false,
        }
    }

    /// Set the native written form.
    #[must_use]
    pub fn with_native_form(mut self, native_form: impl Into<String>) -> Self {
        self.native_form = Some(native_form.into());
        self
    }

    /// Set the part of speech label.
    #[must_use]
    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }

    /// Mark the word as logographic.
    #[must_use]
    pub const fn logographic(mut self, is_logographic: bool) -> Self {
        self.is_logographic = is_logographic;
        self
    }

    /// Text shown on the word card: the native form when present, else the text.
    pub fn display_text(&self) -> &str {
        self.native_form
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.text)
    }
}

/// A word library (one imported word list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordLibrary {
    /// Database ID.
    pub id: LibraryId,
    /// Display name.
    pub name: String,
    /// Default language tag for words that carry none.
    pub language_tag: String,
    /// Whether this is the library the player draws from.
    pub is_active: bool,
}

/// Map a zero-based position in a library to its 1-based group.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const fn group_for_position(position: usize) -> GroupId {
    (position / WORDS_PER_GROUP) as GroupId + 1
}
