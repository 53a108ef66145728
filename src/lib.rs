//! Tideline - diff, patch and staging core for a Git GUI client
//!
//! Computes content diffs between committed, staged and working-copy file
//! states, caches commit tree diffs, and stages or unstages individual hunks
//! by patching index blobs. Every mutation of repository state is serialized
//! through the repository's write lock.

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{ErrorResponse, Result, TidelineError};
pub use services::{BackgroundRunner, Repository, RepositoryOptions};

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set. Calling this more than once,
/// or after another subscriber was installed, has no effect.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tideline_lib=debug,git2=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Tracing initialized");
    }
}
