// SPDX-License-Identifier: MIT OR Apache-2.0
//! The cue-crossing engine.
//!
//! Consumes playback position reports and determines which cues the cursor
//! traversed since the last report. Continuous motion is handled as a
//! directed sweep over the cue index; discrete jumps (seeks) are handled as
//! a containment diff over segment intervals, deliberately not simulating a
//! pass through the segments in between.

use crate::cue::{CueIndex, CueKind};
use crate::event::TimelineEvent;
use wavemark_model::SegmentStore;

/// Crossing detector for the playback cursor.
///
/// Holds the previously reported position and derives enter/exit events on
/// each new report. Events are returned to the caller, which dispatches
/// them synchronously so ordering stays total.
#[derive(Debug, Clone)]
pub struct CueEmitter {
    previous_time: f64,
    attached: bool,
}

impl CueEmitter {
    /// Create an emitter starting at the given playback position
    pub fn new(initial_time: f64) -> Self {
        Self {
            previous_time: initial_time,
            attached: true,
        }
    }

    /// The last reported playback position
    pub fn previous_time(&self) -> f64 {
        self.previous_time
    }

    /// Returns `true` while the emitter is attached
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Process a continuous position update.
    ///
    /// Sweeps the half-open interval between the previous and current
    /// position, exclusive of the previous position and inclusive of the
    /// boundary nearer the current one, so a cue is reported at most once
    /// as playback passes it monotonically. Every returned event carries
    /// the destination cursor time; detection is sampled, not exact.
    pub fn on_time_update(&mut self, cues: &CueIndex, current_time: f64) -> Vec<TimelineEvent> {
        if !self.attached {
            return Vec::new();
        }

        let previous_time = self.previous_time;
        self.previous_time = current_time;

        let mut events = Vec::new();

        if current_time > previous_time {
            // Forward sweep: previous < t <= current, ascending.
            for cue in cues.as_slice() {
                if cue.time > current_time {
                    break;
                }
                if cue.time > previous_time {
                    events.push(crossing_event(cue.kind, &cue.ref_id, current_time, true));
                }
            }
        } else if current_time < previous_time {
            // Backward sweep: current <= t < previous, descending.
            for cue in cues.as_slice().iter().rev() {
                if cue.time < current_time {
                    break;
                }
                if cue.time < previous_time {
                    events.push(crossing_event(cue.kind, &cue.ref_id, current_time, false));
                }
            }
        }

        events
    }

    /// Process a discrete jump of the playback cursor.
    ///
    /// Computed as a containment diff rather than a sweep: segments whose
    /// interval contained the previous position but not the target emit
    /// `segments.exit`; segments containing the target but not the previous
    /// position emit `segments.enter`; segments skipped over entirely emit
    /// nothing. Points never emit on seek. Exits precede enters.
    pub fn on_seek(&mut self, segments: &SegmentStore, to_time: f64) -> Vec<TimelineEvent> {
        if !self.attached {
            return Vec::new();
        }

        let from_time = self.previous_time;
        self.previous_time = to_time;

        let mut events = Vec::new();

        for segment in segments.iter() {
            if segment.contains(from_time) && !segment.contains(to_time) {
                events.push(TimelineEvent::SegmentExit {
                    segment: segment.id.clone(),
                    time: to_time,
                });
            }
        }
        for segment in segments.iter() {
            if segment.contains(to_time) && !segment.contains(from_time) {
                events.push(TimelineEvent::SegmentEnter {
                    segment: segment.id.clone(),
                    time: to_time,
                });
            }
        }

        events
    }

    /// Detach the emitter, clearing the cue index.
    ///
    /// No further events are produced until a new emitter is attached.
    pub fn detach(&mut self, cues: &mut CueIndex) {
        tracing::debug!(cue_count = cues.len(), "cue emitter detached");
        self.attached = false;
        cues.clear();
    }
}

fn crossing_event(kind: CueKind, ref_id: &str, time: f64, forward: bool) -> TimelineEvent {
    match kind {
        CueKind::Point => TimelineEvent::PointEnter {
            point: ref_id.to_string(),
            time,
        },
        // A segment start is an entry when travelling forward and an exit
        // when travelling backward; the end boundary is the mirror image.
        CueKind::SegmentStart if forward => TimelineEvent::SegmentEnter {
            segment: ref_id.to_string(),
            time,
        },
        CueKind::SegmentStart => TimelineEvent::SegmentExit {
            segment: ref_id.to_string(),
            time,
        },
        CueKind::SegmentEnd if forward => TimelineEvent::SegmentExit {
            segment: ref_id.to_string(),
            time,
        },
        CueKind::SegmentEnd => TimelineEvent::SegmentEnter {
            segment: ref_id.to_string(),
            time,
        },
    }
}
