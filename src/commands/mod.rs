//! Repository operations exposed to the UI layer

pub mod branch;
pub mod config;
pub mod content;
pub mod diff;
pub mod patch;
pub mod remote;
pub mod staging;
pub mod stash;
pub mod status;
pub mod submodule;
pub mod tags;
