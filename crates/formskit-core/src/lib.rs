//! # formskit-core
//!
//! Core types for the formskit toolkit: errors, settings, logging, lazily
//! rendered messages and the translation catalog. This crate has no
//! dependency on the form engine and provides the foundation for it.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`message`] - Templated, lazily rendered messages
//! - [`i18n`] - Thread-local language activation and translation catalog
//! - [`settings`] - Toolkit settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Utility types (`MultiValueDict`)

pub mod error;
pub mod i18n;
pub mod logging;
pub mod message;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FormskitError, FormskitResult, ValidationError};
pub use message::Message;
pub use settings::{MissingValuePolicy, Settings, SETTINGS};
