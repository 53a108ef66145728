//! Helpers shared by the commands

pub mod command;
pub mod encoding;

pub use command::{create_command, run_git};
pub use encoding::{detect_encoding, TextEncoding};
