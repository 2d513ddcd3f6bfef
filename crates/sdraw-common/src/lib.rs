//! # sdraw common
//!
//! Shared error type, logging setup and plot option enums used by every
//! crate in the sdraw workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod macros;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{DrawError, Result};
pub use logging::{
    build_subscriber, dev_config, init_default_logging, init_dev_logging, init_logging, LogFormat,
    LoggingConfig,
};
pub use types::*;
