//! # SQL Templates
//!
//! Named `$placeholder$` templates, the payloads that fill them and the
//! parameterized statements they produce.

mod parser;
mod payload;

pub use parser::{marker, parse, ParsedStatement, Template, TemplatePlan};
pub use payload::{RowBatch, RowPayload};
