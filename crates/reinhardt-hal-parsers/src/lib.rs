//! # Reinhardt HAL Parsers
//!
//! Request body parsers for HAL documents.
//!
//! ## Example
//!
//! ```rust,ignore
//! use reinhardt_hal_parsers::{HalJsonParser, Parser};
//!
//! let parser = HalJsonParser::new();
//! let document = parser.parse(Some("application/hal+json"), body).await?;
//! assert!(document["_links"].is_object());
//! ```

pub mod hal_json;
pub mod parser;

pub use hal_json::HalJsonParser;
pub use parser::{ParseError, ParseResult, Parser};
