//! Core infrastructure shared by every stage of the pipeline
//!
//! Errors, option records, logging setup and text helpers.

mod config;
mod error;
pub mod logging;
mod text;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use text::*;
