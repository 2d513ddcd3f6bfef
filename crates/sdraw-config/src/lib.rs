//! # sdraw config
//!
//! Plot defaults and output settings for sdraw.
//!
//! Settings live in a single TOML or JSON file. Every section is optional;
//! missing sections and fields fall back to the defaults in [`defaults`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
