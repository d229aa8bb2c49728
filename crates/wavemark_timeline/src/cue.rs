// SPDX-License-Identifier: MIT OR Apache-2.0
//! The cue index: a time-ordered view of all marker boundaries.
//!
//! Each point contributes one cue and each segment contributes two (start
//! and end). The index is always sorted ascending by time and is kept 1:1
//! with the live markers by the owning timeline; it holds ids only, never
//! the markers themselves.

use crate::error::TimelineError;

/// What kind of boundary a cue marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// A point's time
    Point,
    /// A segment's start boundary
    SegmentStart,
    /// A segment's end boundary
    SegmentEnd,
}

impl CueKind {
    /// Returns `true` for segment boundary cues
    pub fn is_segment(self) -> bool {
        matches!(self, Self::SegmentStart | Self::SegmentEnd)
    }
}

/// A single time-indexed boundary marker
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Boundary time, in seconds
    pub time: f64,
    /// Boundary kind
    pub kind: CueKind,
    /// Id of the point or segment this cue belongs to
    pub ref_id: String,
}

/// Ascending-by-time list of cues.
///
/// Operations are O(n); marker counts are expected in the low thousands and
/// correctness of order is the contract here, not asymptotics.
#[derive(Debug, Clone, Default)]
pub struct CueIndex {
    cues: Vec<Cue>,
}

impl CueIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cue, preserving ascending time order.
    ///
    /// Cues with equal times keep their insertion order.
    pub fn insert(&mut self, cue: Cue) {
        let at = self.cues.partition_point(|c| c.time <= cue.time);
        self.cues.insert(at, cue);
    }

    /// Insert the single cue for a point
    pub fn insert_point(&mut self, ref_id: impl Into<String>, time: f64) {
        self.insert(Cue {
            time,
            kind: CueKind::Point,
            ref_id: ref_id.into(),
        });
    }

    /// Insert the start and end cues for a segment
    pub fn insert_segment(&mut self, ref_id: impl Into<String>, start_time: f64, end_time: f64) {
        let ref_id = ref_id.into();
        self.insert(Cue {
            time: start_time,
            kind: CueKind::SegmentStart,
            ref_id: ref_id.clone(),
        });
        self.insert(Cue {
            time: end_time,
            kind: CueKind::SegmentEnd,
            ref_id,
        });
    }

    /// Remove every cue referencing the given id, returning how many were
    /// removed (1 for a point, 2 for a segment).
    pub fn remove_by_ref(&mut self, ref_id: &str) -> usize {
        let before = self.cues.len();
        self.cues.retain(|c| c.ref_id != ref_id);
        before - self.cues.len()
    }

    /// Remove all point cues, leaving segment cues untouched
    pub fn remove_point_cues(&mut self) {
        self.cues.retain(|c| c.kind.is_segment());
    }

    /// Remove all segment cues, leaving point cues untouched
    pub fn remove_segment_cues(&mut self) {
        self.cues.retain(|c| !c.kind.is_segment());
    }

    /// Move a point's cue to a new time, preserving global order.
    ///
    /// Fails fast when the cue is missing: that means the index fell out of
    /// sync with the point store.
    pub fn reorder_point(&mut self, ref_id: &str, time: f64) -> Result<(), TimelineError> {
        if self.remove_by_ref(ref_id) != 1 {
            tracing::warn!(ref_id, "point cue missing during reorder");
            return Err(TimelineError::CueIndexDesync(ref_id.to_string()));
        }
        self.insert_point(ref_id, time);
        Ok(())
    }

    /// Move a segment's two cues to new times, preserving global order.
    ///
    /// Fails fast when the cues are missing.
    pub fn reorder_segment(
        &mut self,
        ref_id: &str,
        start_time: f64,
        end_time: f64,
    ) -> Result<(), TimelineError> {
        if self.remove_by_ref(ref_id) != 2 {
            tracing::warn!(ref_id, "segment cues missing during reorder");
            return Err(TimelineError::CueIndexDesync(ref_id.to_string()));
        }
        self.insert_segment(ref_id, start_time, end_time);
        Ok(())
    }

    /// Remove every cue
    pub fn clear(&mut self) {
        self.cues.clear();
    }

    /// The cues in ascending time order
    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    /// Number of cues in the index
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Returns `true` if the index is empty
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
