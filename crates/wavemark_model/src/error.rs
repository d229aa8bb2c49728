// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the annotation model.

/// Error raised when validating or mutating points and segments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A time value was NaN or infinite
    #[error("{field} must be a finite number")]
    InvalidTime {
        /// Name of the offending option field
        field: &'static str,
    },

    /// A time value was negative
    #[error("{field} must not be negative")]
    NegativeTime {
        /// Name of the offending option field
        field: &'static str,
    },

    /// A segment's end time was before its start time
    #[error("segment end time must not be before its start time")]
    InvertedSegment,

    /// An id was already in use
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// No marker exists with the given id
    #[error("no marker with id: {0}")]
    IdNotFound(String),
}
