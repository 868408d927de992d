//! Configuration module for Hearth
//!
//! Path resolution and persisted household settings.

pub mod paths;
pub mod settings;

pub use paths::HearthPaths;
pub use settings::Settings;
