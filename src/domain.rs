//! Domain models for architectural decision records.
//!
//! This module contains the structured record the markdown converter
//! produces and consumes, ADR numbers, and the project configuration.

/// The structured ADR record.
pub mod adr;
pub use adr::{ConsideredOption, DecisionOutcome, StructuredAdr};

mod config;
pub use config::{Config, ConfigError};

/// ADR numbers and file name slugs.
pub mod number;
pub use number::AdrNumber;

pub(crate) mod text;
