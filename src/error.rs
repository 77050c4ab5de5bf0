//! Unified converter error type used across all stages.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingPrerequisite,
    EmptyDiagram,
    MalformedInput,
    InconsistentProcess,
    IoFailure,
    FatalInit,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MissingPrerequisite => write!(f, "MissingPrerequisite"),
            ErrorKind::EmptyDiagram => write!(f, "EmptyDiagram"),
            ErrorKind::MalformedInput => write!(f, "MalformedInput"),
            ErrorKind::InconsistentProcess => write!(f, "InconsistentProcess"),
            ErrorKind::IoFailure => write!(f, "IOFailure"),
            ErrorKind::FatalInit => write!(f, "FatalInit"),
        }
    }
}

impl ErrorKind {
    /// Only initialization failures abort a run; everything else skips one pathway.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::FatalInit)
    }

    /// Skips caused by missing or empty source data are reported as warnings.
    pub fn is_warning(self) -> bool {
        matches!(self, ErrorKind::MissingPrerequisite | ErrorKind::EmptyDiagram)
    }
}

#[derive(Debug, Clone, Error)]
#[error("[{kind}:{code}] {message}{}", reference_suffix(.reference))]
pub struct ConvertError {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
    /// The dangling id or record that caused the failure, if any.
    pub reference: Option<String>,
}

fn reference_suffix(reference: &Option<String>) -> String {
    match reference {
        Some(r) => format!(" (reference '{}')", r),
        None => String::new(),
    }
}

impl ConvertError {
    fn new(kind: ErrorKind, code: &str, message: impl Into<String>) -> Self {
        ConvertError {
            code: code.into(),
            kind,
            message: message.into(),
            reference: None,
        }
    }

    pub fn missing(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingPrerequisite, code, message)
    }

    pub fn empty(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyDiagram, code, message)
    }

    pub fn malformed(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedInput, code, message)
    }

    pub fn inconsistent(code: &str, message: impl Into<String>, reference: impl ToString) -> Self {
        ConvertError {
            reference: Some(reference.to_string()),
            ..Self::new(ErrorKind::InconsistentProcess, code, message)
        }
    }

    pub fn io(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoFailure, code, message)
    }

    pub fn fatal(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FatalInit, code, message)
    }
}
