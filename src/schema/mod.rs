//! Directive document model and YAML codec.

pub mod types;

pub use types::*;

use crate::error::CodecError;

/// Decode a YAML directive document. Absent optional fields are tolerated;
/// anything structurally unsound is the validator's job to flag.
pub fn decode(yaml: &str) -> Result<Directive, CodecError> {
    serde_yaml::from_str(yaml).map_err(CodecError::from)
}

/// Encode a directive back to YAML, omitting empty optional fields.
pub fn encode(directive: &Directive) -> Result<String, CodecError> {
    serde_yaml::to_string(directive).map_err(CodecError::from)
}
