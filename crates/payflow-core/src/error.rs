//! # Error Types
//!
//! Sanitization never fails, so the core crate only has two error types:
//! payload configuration mistakes caught before submission, and protocol
//! codes that could not be parsed from text.

use thiserror::Error;

use crate::field::Field;
use crate::payload::TransactionKind;

/// A payload that must not be submitted as built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// A field was set that has no meaning for the payload's kind.
    #[error("field {field} is not applicable to a {kind} transaction")]
    NotApplicable {
        /// The offending field.
        field: Field,
        /// The kind the payload was constructed with.
        kind: TransactionKind,
    },
}

/// A protocol code string that matches no known value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownCodeError {
    /// What was being parsed (e.g. "currency").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}
