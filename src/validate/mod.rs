//! Process-level validation phase (pre-layout).
//!
//! Validates the cross-references of a parsed Process before it is laid out.

pub mod structural;

use crate::error::ConvertError;
use crate::parse::types::Process;

/// Validate every cross-reference of the Process. Returns all errors found.
pub fn validate_process(process: &Process) -> Vec<ConvertError> {
    structural::validate_structural(process)
}
