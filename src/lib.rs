//! Markdown Architectural Decision Records
//!
//! Converts MADR documents to a structured record and back. Decoding accepts
//! any text, and a document reaches its canonical form after one
//! decode/encode pass:
//!
//! ```
//! use adr_manager::{adr2md, md2adr};
//!
//! let adr = md2adr("# Use PostgreSQL\n## Context and Problem Statement\nWe need a database.\n");
//! assert_eq!(adr.title, "Use PostgreSQL");
//!
//! let canonical = adr2md(&adr);
//! assert_eq!(adr2md(&md2adr(&canonical)), canonical);
//! ```

pub mod domain;
pub use domain::{AdrNumber, Config, ConsideredOption, DecisionOutcome, StructuredAdr};

/// Filesystem storage and markdown conversion for ADRs.
pub mod storage;
pub use storage::{Directory, adr2md, md2adr};
