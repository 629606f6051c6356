pub mod directory;
/// Markdown conversion for ADRs.
pub mod markdown;
mod path_parser;

pub use directory::{AdrFile, Directory, DirectoryError};
pub use markdown::{LoadError, adr2md, md2adr};
pub use path_parser::{ParseError, construct_path, parse_number_from_path};
