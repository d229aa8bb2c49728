// SPDX-License-Identifier: MIT OR Apache-2.0
//! Point definitions for the annotation model.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A point is a single instant of time, with associated label and color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    /// Unique point id, immutable after creation
    pub id: String,
    /// Point time, in seconds
    pub time: f64,
    /// Point label text
    pub label_text: String,
    /// Point marker color, host-interpreted
    pub color: Option<String>,
    /// Whether the point time can be adjusted via the user interface
    pub editable: bool,
}

impl Point {
    /// Build a point from validated options, assigning `fallback_id` when the
    /// options carry none.
    pub(crate) fn from_options(options: PointOptions, fallback_id: String) -> Self {
        Self {
            id: options.id.unwrap_or(fallback_id),
            time: options.time,
            label_text: options.label_text.unwrap_or_default(),
            color: options.color,
            editable: options.editable.unwrap_or(false),
        }
    }

    /// Apply a validated update in place
    pub(crate) fn apply(&mut self, update: PointUpdate) {
        if let Some(time) = update.time {
            self.time = time;
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

    /// Returns `true` if the point lies within a given time range
    pub fn is_visible(&self, start_time: f64, end_time: f64) -> bool {
        self.time >= start_time && self.time < end_time
    }
}

/// Options for creating a point.
///
/// Unknown keys are rejected at deserialization time; there are no
/// pass-through fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointOptions {
    /// Point id; generated by the store when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Point time, in seconds
    pub time: f64,
    /// Point label text
    #[serde(default)]
    pub label_text: Option<String>,
    /// Point marker color
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the point is editable
    #[serde(default)]
    pub editable: Option<bool>,
}

impl PointOptions {
    /// Create options for a point at the given time
    pub fn at(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Set the point id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_time(self.time, "time")
    }
}

/// Fields of a point that may be updated after creation.
///
/// The id is deliberately absent: it cannot be changed. Unknown keys are
/// rejected at deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointUpdate {
    /// New point time, in seconds
    #[serde(default)]
    pub time: Option<f64>,
    /// New label text
    #[serde(default)]
    pub label_text: Option<String>,
    /// New marker color
    #[serde(default)]
    pub color: Option<String>,
    /// New editable flag
    #[serde(default)]
    pub editable: Option<bool>,
}

impl PointUpdate {
    /// Create an update that moves the point to a new time
    pub fn time(time: f64) -> Self {
        Self {
            time: Some(time),
            ..Self::default()
        }
    }

    /// Validate the update
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(time) = self.time {
            validate_time(time, "time")?;
        }
        Ok(())
    }
}

pub(crate) fn validate_time(time: f64, field: &'static str) -> Result<(), ModelError> {
    if !time.is_finite() {
        return Err(ModelError::InvalidTime { field });
    }
    if time < 0.0 {
        return Err(ModelError::NegativeTime { field });
    }
    Ok(())
}
