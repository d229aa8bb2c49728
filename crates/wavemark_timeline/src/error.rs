// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the timeline core.

use wavemark_model::ModelError;

/// Error raised by timeline operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// The underlying model rejected the operation
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The cue index did not hold the cues the model says must exist.
    ///
    /// This is an internal-consistency fault: the index fell out of sync
    /// with the point/segment stores, which the synchronization contract
    /// forbids.
    #[error("cue index out of sync for id: {0}")]
    CueIndexDesync(String),
}
