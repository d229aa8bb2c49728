// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segment definitions for the annotation model.

use crate::error::ModelError;
use crate::point::validate_time;
use serde::{Deserialize, Serialize};

/// A segment is a labelled interval of time, `[start_time, end_time)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Unique segment id, immutable after creation
    pub id: String,
    /// Segment start time, in seconds
    pub start_time: f64,
    /// Segment end time, in seconds; never less than `start_time`
    pub end_time: f64,
    /// Segment label text
    pub label_text: String,
    /// Segment color, host-interpreted
    pub color: Option<String>,
    /// Whether the segment boundaries can be adjusted via the user interface
    pub editable: bool,
}

impl Segment {
    /// Build a segment from validated options, assigning `fallback_id` when
    /// the options carry none.
    pub(crate) fn from_options(options: SegmentOptions, fallback_id: String) -> Self {
        Self {
            id: options.id.unwrap_or(fallback_id),
            start_time: options.start_time,
            end_time: options.end_time,
            label_text: options.label_text.unwrap_or_default(),
            color: options.color,
            editable: options.editable.unwrap_or(false),
        }
    }

    /// Apply a validated update in place
    pub(crate) fn apply(&mut self, update: SegmentUpdate) {
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.end_time = end_time;
        }
        if let Some(label_text) = update.label_text {
            self.label_text = label_text;
        }
        if let Some(color) = update.color {
            self.color = Some(color);
        }
        if let Some(editable) = update.editable {
            self.editable = editable;
        }
    }

    /// Segment width in seconds
    pub fn width(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Returns `true` if the half-open interval `[start_time, end_time)`
    /// contains the given time.
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// Returns `true` if any part of the segment lies within the given range
    pub fn overlaps(&self, start_time: f64, end_time: f64) -> bool {
        self.start_time < end_time && self.end_time > start_time
    }
}

/// Options for creating a segment.
///
/// Unknown keys are rejected at deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentOptions {
    /// Segment id; generated by the store when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Segment start time, in seconds
    pub start_time: f64,
    /// Segment end time, in seconds
    pub end_time: f64,
    /// Segment label text
    #[serde(default)]
    pub label_text: Option<String>,
    /// Segment color
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the segment is editable
    #[serde(default)]
    pub editable: Option<bool>,
}

impl SegmentOptions {
    /// Create options for a segment spanning the given interval
    pub fn spanning(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            ..Self::default()
        }
    }

    /// Set the segment id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark the segment as editable
    pub fn editable(mut self) -> Self {
        self.editable = Some(true);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_time(self.start_time, "start_time")?;
        validate_time(self.end_time, "end_time")?;
        if self.end_time < self.start_time {
            return Err(ModelError::InvertedSegment);
        }
        Ok(())
    }
}

/// Fields of a segment that may be updated after creation.
///
/// The id is deliberately absent: it cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentUpdate {
    /// New start time, in seconds
    #[serde(default)]
    pub start_time: Option<f64>,
    /// New end time, in seconds
    #[serde(default)]
    pub end_time: Option<f64>,
    /// New label text
    #[serde(default)]
    pub label_text: Option<String>,
    /// New color
    #[serde(default)]
    pub color: Option<String>,
    /// New editable flag
    #[serde(default)]
    pub editable: Option<bool>,
}

impl SegmentUpdate {
    /// Create an update that moves both boundaries
    pub fn times(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }

    /// Validate the update against the segment it will be applied to.
    ///
    /// The resulting boundary pair must not invert, so validation needs the
    /// current times for whichever boundary the update leaves alone.
    pub fn validate(&self, current: &Segment) -> Result<(), ModelError> {
        if let Some(start_time) = self.start_time {
            validate_time(start_time, "start_time")?;
        }
        if let Some(end_time) = self.end_time {
            validate_time(end_time, "end_time")?;
        }
        let start = self.start_time.unwrap_or(current.start_time);
        let end = self.end_time.unwrap_or(current.end_time);
        if end < start {
            return Err(ModelError::InvertedSegment);
        }
        Ok(())
    }
}
