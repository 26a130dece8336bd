//! Terminal output helpers.

mod player;
mod tables;

pub use player::{format_settings, format_word_line, on_off};
pub use tables::{format_optional, print_separator, truncate_string};
