//! Data models for Tideline

pub mod diff;
pub mod refs;
pub mod remote;
pub mod repository;

pub use diff::*;
pub use refs::*;
pub use remote::*;
pub use repository::*;
