// SPDX-License-Identifier: MIT OR Apache-2.0
//! The timeline facade.
//!
//! Owns the marker stores, the cue index, the crossing engine, the drag
//! resolver, and the listener bus, and keeps them consistent: every mutation
//! applies its cue index update before returning, so no playback position
//! report can ever observe a store and an index that disagree.

use crate::cue::CueIndex;
use crate::drag::{DragMode, DragTarget, SegmentDragResolver};
use crate::emitter::CueEmitter;
use crate::error::TimelineError;
use crate::event::{EventBus, TimelineEvent};
use crate::view::ViewGeometry;
use serde::{Deserialize, Serialize};
use wavemark_model::{
    ModelError, Point, PointOptions, PointStore, PointUpdate, Segment, SegmentOptions,
    SegmentStore, SegmentUpdate,
};

/// Configuration for a [`Timeline`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TimelineOptions {
    /// Emit `points.enter` / `segments.enter` / `segments.exit` on playback
    /// position reports. Off by default; hosts opt in.
    pub emit_cue_events: bool,
    /// Drag constraint policy
    pub drag_mode: DragMode,
    /// Minimum width, in pixels, a compressed neighbor may reach
    pub min_segment_drag_width: f64,
    /// Initial view geometry
    pub view: ViewGeometry,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            emit_cue_events: false,
            drag_mode: DragMode::default(),
            min_segment_drag_width: 50.0,
            view: ViewGeometry::new(100.0, 0.0, 1000.0),
        }
    }
}

/// Annotation timeline: points and segments over a media time axis, with
/// crossing detection and drag editing.
///
/// All operations are synchronous; events reach listeners before the
/// triggering call returns.
#[derive(Debug)]
pub struct Timeline {
    points: PointStore,
    segments: SegmentStore,
    cues: CueIndex,
    emitter: CueEmitter,
    drag: SegmentDragResolver,
    bus: EventBus,
    view: ViewGeometry,
    emit_cue_events: bool,
}

impl Timeline {
    /// Create an empty timeline with the playback cursor at zero
    pub fn new(options: TimelineOptions) -> Self {
        Self {
            points: PointStore::new(),
            segments: SegmentStore::new(),
            cues: CueIndex::new(),
            emitter: CueEmitter::new(0.0),
            drag: SegmentDragResolver::new(options.drag_mode, options.min_segment_drag_width),
            bus: EventBus::new(),
            view: options.view,
            emit_cue_events: options.emit_cue_events,
        }
    }

    /// Register a listener for all timeline events
    pub fn subscribe(&mut self, listener: impl FnMut(&TimelineEvent) + 'static) {
        self.bus.subscribe(listener);
    }

    // ---- points ----------------------------------------------------------

    /// Add a point, returning its id
    pub fn add_point(&mut self, options: PointOptions) -> Result<String, TimelineError> {
        let time = options.time;
        let id = self.points.add(options)?;
        self.cues.insert_point(&id, time);
        Ok(id)
    }

    /// Update a point in place, keeping its cue in order
    pub fn update_point(&mut self, id: &str, update: PointUpdate) -> Result<(), TimelineError> {
        let time = self.points.update(id, update)?.time;
        self.cues.reorder_point(id, time)
    }

    /// Remove a point, returning it
    pub fn remove_point(&mut self, id: &str) -> Result<Point, TimelineError> {
        let point = self
            .points
            .remove(id)
            .ok_or_else(|| ModelError::IdNotFound(id.to_string()))?;
        if self.cues.remove_by_ref(id) != 1 {
            return Err(TimelineError::CueIndexDesync(id.to_string()));
        }
        Ok(point)
    }

    /// Remove all points; segments and their cues are untouched
    pub fn remove_all_points(&mut self) {
        self.points.remove_all();
        self.cues.remove_point_cues();
    }

    /// The point store
    pub fn points(&self) -> &PointStore {
        &self.points
    }

    // ---- segments --------------------------------------------------------

    /// Add a segment, returning its id
    pub fn add_segment(&mut self, options: SegmentOptions) -> Result<String, TimelineError> {
        let (start_time, end_time) = (options.start_time, options.end_time);
        let id = self.segments.add(options)?;
        self.cues.insert_segment(&id, start_time, end_time);
        Ok(id)
    }

    /// Update a segment in place, keeping its cues in order
    pub fn update_segment(
        &mut self,
        id: &str,
        update: SegmentUpdate,
    ) -> Result<(), TimelineError> {
        let segment = self.segments.update(id, update)?;
        let (start_time, end_time) = (segment.start_time, segment.end_time);
        self.cues.reorder_segment(id, start_time, end_time)
    }

    /// Remove a segment, returning it
    pub fn remove_segment(&mut self, id: &str) -> Result<Segment, TimelineError> {
        let segment = self
            .segments
            .remove(id)
            .ok_or_else(|| ModelError::IdNotFound(id.to_string()))?;
        if self.cues.remove_by_ref(id) != 2 {
            return Err(TimelineError::CueIndexDesync(id.to_string()));
        }
        Ok(segment)
    }

    /// Remove all segments; points and their cues are untouched
    pub fn remove_all_segments(&mut self) {
        self.segments.remove_all();
        self.cues.remove_segment_cues();
    }

    /// The segment store
    pub fn segments(&self) -> &SegmentStore {
        &self.segments
    }

    // ---- playback --------------------------------------------------------

    /// Report a continuous playback position update.
    ///
    /// Crossing events are dispatched to listeners before this returns, in
    /// sweep order, and also returned for callers that poll.
    pub fn on_time_update(&mut self, current_time: f64) -> Vec<TimelineEvent> {
        let events = self.emitter.on_time_update(&self.cues, current_time);
        self.dispatch(&events);
        events
    }

    /// Report a discrete seek of the playback cursor.
    ///
    /// Only segment containment changes are reported; exits precede enters
    /// and points stay silent.
    pub fn seek(&mut self, to_time: f64) -> Vec<TimelineEvent> {
        let events = self.emitter.on_seek(&self.segments, to_time);
        self.dispatch(&events);
        events
    }

    /// The last reported playback position
    pub fn current_time(&self) -> f64 {
        self.emitter.previous_time()
    }

    fn dispatch(&mut self, events: &[TimelineEvent]) {
        if !self.emit_cue_events {
            return;
        }
        for event in events {
            self.bus.emit(event);
        }
    }

    // ---- drag editing ----------------------------------------------------

    /// Begin a drag gesture from a hit-test result
    pub fn start_drag(&mut self, target: Option<DragTarget>, pointer_x: f64) {
        self.drag.on_pointer_down(&self.segments, target, pointer_x);
    }

    /// Apply a pointer move to the active gesture.
    ///
    /// Resolved edits are written to the segment store, the cue index is
    /// reordered, and one `segments.dragged` event per edited segment is
    /// dispatched, the dragged segment first.
    pub fn drag_to(&mut self, pointer_x: f64) -> Result<(), TimelineError> {
        let edits = self.drag.on_pointer_move(&self.segments, &self.view, pointer_x);
        for edit in edits {
            self.segments
                .update(&edit.segment, SegmentUpdate::times(edit.start_time, edit.end_time))?;
            self.cues
                .reorder_segment(&edit.segment, edit.start_time, edit.end_time)?;
            self.bus.emit(&TimelineEvent::SegmentDragged {
                segment: edit.segment,
                marker: edit.marker,
            });
        }
        Ok(())
    }

    /// End the active drag gesture
    pub fn end_drag(&mut self) {
        self.drag.on_pointer_up();
    }

    /// Returns `true` while a drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// The active drag mode
    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    /// Change the drag mode; takes effect on the next gesture
    pub fn set_drag_mode(&mut self, mode: DragMode) {
        self.drag.set_mode(mode);
    }

    // ---- view ------------------------------------------------------------

    /// The current view geometry
    pub fn view(&self) -> &ViewGeometry {
        &self.view
    }

    /// Replace the view geometry (zoom change)
    pub fn set_view(&mut self, view: ViewGeometry) {
        self.view = view;
    }

    /// Scroll the view to a new frame offset, in pixels
    pub fn set_frame_offset(&mut self, frame_offset: f64) {
        self.view.set_frame_offset(frame_offset);
    }

    // ---- lifecycle -------------------------------------------------------

    /// Detach the timeline from playback.
    ///
    /// The cue index is cleared and no further crossing events are emitted;
    /// the marker stores keep their contents.
    pub fn detach(&mut self) {
        self.emitter.detach(&mut self.cues);
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragHandle;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn timeline() -> Timeline {
        Timeline::new(TimelineOptions {
            emit_cue_events: true,
            ..TimelineOptions::default()
        })
    }

    fn recorded(timeline: &mut Timeline) -> Rc<RefCell<Vec<TimelineEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        timeline.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        seen
    }

    #[test]
    fn test_add_point_syncs_cue_index() {
        let mut timeline = timeline();
        let seen = recorded(&mut timeline);

        timeline.add_point(PointOptions::at(1.05).with_id("p1")).unwrap();

        // The cue is live immediately: the very next position report
        // crosses it.
        let events = timeline.on_time_update(1.1);
        assert_eq!(events.len(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![TimelineEvent::PointEnter { point: "p1".to_string(), time: 1.1 }]
        );
    }

    #[test]
    fn test_update_point_moves_its_cue() {
        let mut timeline = timeline();
        timeline.add_point(PointOptions::at(5.0).with_id("p1")).unwrap();
        timeline.update_point("p1", PointUpdate::time(1.05)).unwrap();

        let events = timeline.on_time_update(1.1);
        assert_eq!(
            events,
            vec![TimelineEvent::PointEnter { point: "p1".to_string(), time: 1.1 }]
        );

        // The old cue at 5.0 is gone.
        assert!(timeline.on_time_update(6.0).is_empty());
    }

    #[test]
    fn test_remove_point_silences_its_cue() {
        let mut timeline = timeline();
        timeline.add_point(PointOptions::at(1.05).with_id("p1")).unwrap();
        let removed = timeline.remove_point("p1").unwrap();
        assert_eq!(removed.id, "p1");
        assert!(timeline.on_time_update(1.1).is_empty());

        assert!(matches!(
            timeline.remove_point("p1"),
            Err(TimelineError::Model(ModelError::IdNotFound(_)))
        ));
    }

    #[test]
    fn test_remove_all_points_leaves_segment_cues() {
        let mut timeline = timeline();
        timeline.add_point(PointOptions::at(1.05).with_id("p1")).unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(1.06, 1.08).with_id("s1"))
            .unwrap();

        timeline.remove_all_points();

        let events = timeline.on_time_update(1.1);
        assert_eq!(
            events,
            vec![
                TimelineEvent::SegmentEnter { segment: "s1".to_string(), time: 1.1 },
                TimelineEvent::SegmentExit { segment: "s1".to_string(), time: 1.1 },
            ]
        );
    }

    #[test]
    fn test_update_segment_moves_both_cues() {
        let mut timeline = timeline();
        timeline
            .add_segment(SegmentOptions::spanning(5.0, 6.0).with_id("s1"))
            .unwrap();
        timeline
            .update_segment("s1", SegmentUpdate::times(1.02, 1.08))
            .unwrap();

        let events = timeline.on_time_update(1.1);
        assert_eq!(
            events,
            vec![
                TimelineEvent::SegmentEnter { segment: "s1".to_string(), time: 1.1 },
                TimelineEvent::SegmentExit { segment: "s1".to_string(), time: 1.1 },
            ]
        );
        assert!(timeline.on_time_update(7.0).is_empty());
    }

    #[test]
    fn test_remove_segment_silences_both_cues() {
        let mut timeline = timeline();
        timeline
            .add_segment(SegmentOptions::spanning(1.02, 1.08).with_id("s1"))
            .unwrap();
        timeline.remove_segment("s1").unwrap();
        assert!(timeline.on_time_update(1.1).is_empty());
    }

    #[test]
    fn test_seek_dispatches_containment_diff() {
        let mut timeline = timeline();
        let seen = recorded(&mut timeline);
        timeline
            .add_segment(SegmentOptions::spanning(2.0, 4.0).with_id("s1"))
            .unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(6.0, 8.0).with_id("s2"))
            .unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(10.0, 12.0).with_id("s3"))
            .unwrap();

        timeline.seek(3.0);
        timeline.seek(11.0);

        assert_eq!(
            *seen.borrow(),
            vec![
                TimelineEvent::SegmentEnter { segment: "s1".to_string(), time: 3.0 },
                TimelineEvent::SegmentExit { segment: "s1".to_string(), time: 11.0 },
                TimelineEvent::SegmentEnter { segment: "s3".to_string(), time: 11.0 },
            ]
        );
        assert_eq!(timeline.current_time(), 11.0);
    }

    #[test]
    fn test_cue_events_are_gated_by_option() {
        let mut timeline = Timeline::new(TimelineOptions::default());
        let seen = recorded(&mut timeline);
        timeline.add_point(PointOptions::at(1.05).with_id("p1")).unwrap();

        // Crossings are still computed and returned, just not dispatched.
        let events = timeline.on_time_update(1.1);
        assert_eq!(events.len(), 1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_drag_updates_store_cues_and_listeners() {
        let mut timeline = timeline();
        timeline.set_drag_mode(DragMode::Compress);
        let seen = recorded(&mut timeline);
        timeline
            .add_segment(SegmentOptions::spanning(1.0, 2.0).with_id("s1").editable())
            .unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(3.0, 4.0).with_id("s2").editable())
            .unwrap();

        // 100 px/s: a 300 px body drag crosses s2 and clamps at its
        // minimum width (50 px == 0.5 s).
        timeline.start_drag(
            Some(DragTarget { segment: "s1".to_string(), handle: DragHandle::Body }),
            100.0,
        );
        timeline.drag_to(400.0).unwrap();
        timeline.end_drag();

        let s1 = timeline.segments().get("s1").unwrap();
        assert_eq!(s1.start_time, 2.5);
        assert_eq!(s1.end_time, 3.5);
        let s2 = timeline.segments().get("s2").unwrap();
        assert_eq!(s2.start_time, 3.5);
        assert_eq!(s2.end_time, 4.0);

        // Dragged segment's event first, then the compressed neighbor.
        assert_eq!(
            *seen.borrow(),
            vec![
                TimelineEvent::SegmentDragged { segment: "s1".to_string(), marker: false },
                TimelineEvent::SegmentDragged { segment: "s2".to_string(), marker: false },
            ]
        );

        // The cue index followed the store: playback over the new span
        // reports the moved boundaries.
        let events = timeline.on_time_update(2.6);
        assert_eq!(
            events,
            vec![TimelineEvent::SegmentEnter { segment: "s1".to_string(), time: 2.6 }]
        );
    }

    #[test]
    fn test_compressed_neighbor_stays_put_across_moves() {
        let mut timeline = timeline();
        timeline.set_drag_mode(DragMode::Compress);
        timeline
            .add_segment(SegmentOptions::spanning(1.0, 2.0).with_id("s1").editable())
            .unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(3.0, 4.0).with_id("s2").editable())
            .unwrap();

        timeline.start_drag(
            Some(DragTarget { segment: "s1".to_string(), handle: DragHandle::EndMarker }),
            200.0,
        );
        timeline.drag_to(350.0).unwrap();
        assert_eq!(timeline.segments().get("s2").unwrap().start_time, 3.5);

        // Retreating the marker does not pull the neighbor back.
        timeline.drag_to(330.0).unwrap();
        timeline.end_drag();
        assert_eq!(timeline.segments().get("s1").unwrap().end_time, 3.3);
        assert_eq!(timeline.segments().get("s2").unwrap().start_time, 3.5);
    }

    #[test]
    fn test_detach_keeps_markers_but_stops_events() {
        let mut timeline = timeline();
        timeline.add_point(PointOptions::at(1.05).with_id("p1")).unwrap();
        timeline
            .add_segment(SegmentOptions::spanning(2.0, 4.0).with_id("s1"))
            .unwrap();

        timeline.detach();

        assert_eq!(timeline.points().len(), 1);
        assert_eq!(timeline.segments().len(), 1);
        assert!(timeline.on_time_update(1.1).is_empty());
        assert!(timeline.seek(3.0).is_empty());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: TimelineOptions =
            serde_json::from_str(r#"{ "drag_mode": "compress" }"#).unwrap();
        assert_eq!(options.drag_mode, DragMode::Compress);
        assert!(!options.emit_cue_events);
        assert_eq!(options.min_segment_drag_width, 50.0);
    }
}
