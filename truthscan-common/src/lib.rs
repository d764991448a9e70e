//! truthscan-common - Shared configuration, logging, and error types.
//!
//! This crate provides:
//! - Configuration types, loading and validation
//! - The shared error type
//! - Logging setup and request span helpers
//! - Small string utilities

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;

pub use config::{ClassifierConfig, Config, DatasetsConfig, NetworkConfig, ObservabilityConfig};
pub use error::{Error, Result};

