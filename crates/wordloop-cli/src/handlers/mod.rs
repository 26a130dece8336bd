#![doc = include_str!("README.md")]

pub mod library;
pub mod navigate;
pub mod paths;
pub mod play;
pub mod set;
pub mod status;
pub mod word;
