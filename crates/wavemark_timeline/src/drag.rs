// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segment drag-constraint resolution.
//!
//! Converts pointer drag deltas into time deltas and resolves them against
//! the active drag mode. A gesture produces zero, one, or two segment edits
//! per pointer move; the resolver never mutates the store itself, the
//! owning timeline applies the edits and dispatches `segments.dragged`.

use crate::view::ViewGeometry;
use serde::{Deserialize, Serialize};
use wavemark_model::SegmentStore;

/// Pixels the pointer must travel before a gesture takes effect.
/// Prevents spurious drags from plain clicks.
const DRAG_THRESHOLD_PX: f64 = 2.0;

/// Policy governing how a dragged segment interacts with its neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragMode {
    /// Segments may overlap freely; neighbors are never touched
    #[default]
    Overlap,
    /// The dragged segment stops at the neighbor's near boundary
    NoOverlap,
    /// Crossing into the neighbor compresses it down to a minimum width
    Compress,
}

/// The part of a segment being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragHandle {
    /// The whole segment; both boundaries move together
    Body,
    /// The start boundary marker
    StartMarker,
    /// The end boundary marker
    EndMarker,
}

/// A hit-test result passed in on pointer-down.
///
/// Hit-testing itself is the host's job; the resolver only needs to know
/// which segment and which handle the gesture grabbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTarget {
    /// Id of the grabbed segment
    pub segment: String,
    /// Which handle was grabbed
    pub handle: DragHandle,
}

/// New boundary times for one segment, produced by a pointer move
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEdit {
    /// Id of the segment to update
    pub segment: String,
    /// New start time, in seconds
    pub start_time: f64,
    /// New end time, in seconds
    pub end_time: f64,
    /// `true` if a single boundary marker was dragged
    pub marker: bool,
}

/// Gesture state; one gesture at a time
#[derive(Debug, Clone, Default)]
enum Gesture {
    /// No active gesture
    #[default]
    Idle,
    /// A segment handle is being dragged
    Dragging {
        segment: String,
        handle: DragHandle,
        origin_start: f64,
        origin_end: f64,
        down_x: f64,
        /// Set once the pointer has moved past the hysteresis threshold
        active: bool,
    },
}

/// Resolves pointer drags of segments under the active drag mode.
///
/// Deltas are always taken from the gesture's origin, so clamping never
/// accumulates drift across moves; neighbor interactions read the store's
/// current state, so a neighbor compressed by an earlier move stays where
/// it was pushed.
#[derive(Debug, Clone)]
pub struct SegmentDragResolver {
    mode: DragMode,
    min_width_px: f64,
    gesture: Gesture,
}

impl SegmentDragResolver {
    /// Create a resolver with the given mode and minimum segment width
    /// (pixels, used by [`DragMode::Compress`]).
    pub fn new(mode: DragMode, min_width_px: f64) -> Self {
        Self {
            mode,
            min_width_px: min_width_px.max(0.0),
            gesture: Gesture::Idle,
        }
    }

    /// The active drag mode
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Change the drag mode; takes effect on the next gesture
    pub fn set_mode(&mut self, mode: DragMode) {
        self.mode = mode;
    }

    /// Set the minimum width, in pixels, a compressed neighbor may reach
    pub fn set_min_width(&mut self, min_width_px: f64) {
        self.min_width_px = min_width_px.max(0.0);
    }

    /// Returns `true` while a gesture is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Begin a gesture.
    ///
    /// A pointer-down always ends any previous gesture. Without a hit-test
    /// target, with a target naming an unknown segment, or with a target
    /// naming a segment that is not editable, no gesture starts and later
    /// moves are no-ops.
    pub fn on_pointer_down(
        &mut self,
        segments: &SegmentStore,
        target: Option<DragTarget>,
        pointer_x: f64,
    ) {
        self.gesture = Gesture::Idle;

        let Some(target) = target else {
            return;
        };
        let Some(segment) = segments.get(&target.segment) else {
            tracing::debug!(segment = %target.segment, "drag target not in store, ignoring");
            return;
        };
        if !segment.editable {
            tracing::debug!(segment = %segment.id, "segment is not editable, ignoring");
            return;
        }

        self.gesture = Gesture::Dragging {
            segment: segment.id.clone(),
            handle: target.handle,
            origin_start: segment.start_time,
            origin_end: segment.end_time,
            down_x: pointer_x,
            active: false,
        };
    }

    /// Resolve a pointer move into segment edits.
    ///
    /// Returns nothing while idle or below the hysteresis threshold. When
    /// the neighbor is touched, the dragged segment's edit comes first.
    pub fn on_pointer_move(
        &mut self,
        segments: &SegmentStore,
        view: &ViewGeometry,
        pointer_x: f64,
    ) -> Vec<SegmentEdit> {
        let Gesture::Dragging {
            segment,
            handle,
            origin_start,
            origin_end,
            down_x,
            active,
        } = &mut self.gesture
        else {
            return Vec::new();
        };

        let dx = pointer_x - *down_x;
        if !*active {
            if dx.abs() < DRAG_THRESHOLD_PX {
                return Vec::new();
            }
            *active = true;
        }

        let dt = view.pixels_to_time(dx);
        let min_width = view.pixels_to_time(self.min_width_px);

        match handle {
            DragHandle::Body => resolve_body(
                segments,
                view,
                segment,
                *origin_start,
                *origin_end,
                dt,
                self.mode,
                min_width,
            ),
            DragHandle::StartMarker => resolve_start_marker(
                segments,
                view,
                segment,
                *origin_start,
                *origin_end,
                dt,
                self.mode,
                min_width,
            ),
            DragHandle::EndMarker => resolve_end_marker(
                segments,
                view,
                segment,
                *origin_start,
                *origin_end,
                dt,
                self.mode,
                min_width,
            ),
        }
    }

    /// End the gesture, returning to idle
    pub fn on_pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

/// Body drag: both boundaries move by the same delta, width preserved
fn resolve_body(
    segments: &SegmentStore,
    view: &ViewGeometry,
    id: &str,
    origin_start: f64,
    origin_end: f64,
    dt: f64,
    mode: DragMode,
    min_width: f64,
) -> Vec<SegmentEdit> {
    let width = origin_end - origin_start;
    let mut start = origin_start + dt;

    // The body never leaves [0, right edge of the visible view].
    if start + width > view.end_time() {
        start = view.end_time() - width;
    }
    if start < 0.0 {
        start = 0.0;
    }
    let mut end = start + width;

    let mut neighbor = None;

    match mode {
        DragMode::Overlap => {}
        DragMode::NoOverlap => {
            if dt > 0.0 {
                if let Some(next) = segments.next_segment(id) {
                    if end > next.start_time {
                        end = next.start_time;
                        start = end - width;
                    }
                }
            } else if dt < 0.0 {
                if let Some(prev) = segments.previous_segment(id) {
                    if start < prev.end_time {
                        start = prev.end_time;
                        end = start + width;
                    }
                }
            }
        }
        DragMode::Compress => {
            if dt > 0.0 {
                if let Some(next) = segments.next_segment(id) {
                    if end > next.start_time {
                        // Shrink-only: a neighbor already at or below the
                        // minimum width cannot be pushed, and is never
                        // widened back up to it.
                        let limit = (next.end_time - min_width).max(next.start_time);
                        if end > limit {
                            end = limit;
                            start = end - width;
                        }
                        if end > next.start_time {
                            neighbor = Some(SegmentEdit {
                                segment: next.id.clone(),
                                start_time: end,
                                end_time: next.end_time,
                                marker: false,
                            });
                        }
                    }
                }
            } else if dt < 0.0 {
                if let Some(prev) = segments.previous_segment(id) {
                    if start < prev.end_time {
                        let limit = (prev.start_time + min_width).min(prev.end_time);
                        if start < limit {
                            start = limit;
                            end = start + width;
                        }
                        if start < prev.end_time {
                            neighbor = Some(SegmentEdit {
                                segment: prev.id.clone(),
                                start_time: prev.start_time,
                                end_time: start,
                                marker: false,
                            });
                        }
                    }
                }
            }
        }
    }

    let mut edits = vec![SegmentEdit {
        segment: id.to_string(),
        start_time: start,
        end_time: end,
        marker: false,
    }];
    edits.extend(neighbor);
    edits
}

/// Start-marker drag: only the start boundary moves
fn resolve_start_marker(
    segments: &SegmentStore,
    view: &ViewGeometry,
    id: &str,
    origin_start: f64,
    origin_end: f64,
    dt: f64,
    mode: DragMode,
    min_width: f64,
) -> Vec<SegmentEdit> {
    let mut time = origin_start + dt;

    // Never cross the segment's own end; zero width is the limit.
    if time > origin_end {
        time = origin_end;
    }
    // Keep the marker inside the visible view.
    time = time.clamp(view.start_time(), view.end_time());

    let mut neighbor = None;

    match mode {
        DragMode::Overlap => {}
        DragMode::NoOverlap => {
            if let Some(prev) = segments.previous_segment(id) {
                if time < prev.end_time {
                    time = prev.end_time;
                }
            }
        }
        DragMode::Compress => {
            if let Some(prev) = segments.previous_segment(id) {
                if time < prev.end_time {
                    // Shrink-only: never widen a neighbor already below
                    // the minimum width.
                    let limit = (prev.start_time + min_width).min(prev.end_time);
                    if time < limit {
                        time = limit;
                    }
                    if time < prev.end_time {
                        neighbor = Some(SegmentEdit {
                            segment: prev.id.clone(),
                            start_time: prev.start_time,
                            end_time: time,
                            marker: true,
                        });
                    }
                }
            }
        }
    }

    let mut edits = vec![SegmentEdit {
        segment: id.to_string(),
        start_time: time,
        end_time: origin_end,
        marker: true,
    }];
    edits.extend(neighbor);
    edits
}

/// End-marker drag: only the end boundary moves
fn resolve_end_marker(
    segments: &SegmentStore,
    view: &ViewGeometry,
    id: &str,
    origin_start: f64,
    origin_end: f64,
    dt: f64,
    mode: DragMode,
    min_width: f64,
) -> Vec<SegmentEdit> {
    let mut time = origin_end + dt;

    if time < origin_start {
        time = origin_start;
    }
    time = time.clamp(view.start_time(), view.end_time());

    let mut neighbor = None;

    match mode {
        DragMode::Overlap => {}
        DragMode::NoOverlap => {
            if let Some(next) = segments.next_segment(id) {
                if time > next.start_time {
                    time = next.start_time;
                }
            }
        }
        DragMode::Compress => {
            if let Some(next) = segments.next_segment(id) {
                if time > next.start_time {
                    // Shrink-only, as for the start marker.
                    let limit = (next.end_time - min_width).max(next.start_time);
                    if time > limit {
                        time = limit;
                    }
                    if time > next.start_time {
                        neighbor = Some(SegmentEdit {
                            segment: next.id.clone(),
                            start_time: time,
                            end_time: next.end_time,
                            marker: true,
                        });
                    }
                }
            }
        }
    }

    let mut edits = vec![SegmentEdit {
        segment: id.to_string(),
        start_time: origin_start,
        end_time: time,
        marker: true,
    }];
    edits.extend(neighbor);
    edits
}
