//! Service layer for Tideline
//!
//! Owned, injectable infrastructure shared by the commands: the repository
//! handle with its diff cache, write lock and text classification policy,
//! and the async facade over them.

pub mod background;
pub mod diff_cache;
pub mod repository;
pub mod text_classifier;
pub mod write_lock;

pub use background::BackgroundRunner;
pub use diff_cache::{DiffCache, DiffKey};
pub use repository::{Repository, RepositoryOptions};
pub use text_classifier::{NameExtensionClassifier, TextClassifier};
pub use write_lock::WriteLock;
