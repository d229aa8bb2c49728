// SPDX-License-Identifier: MIT OR Apache-2.0
//! Id-keyed stores for points and segments.
//!
//! The stores are the source of truth for marker times. Mutation goes
//! through validated options/updates only; callers that mirror the stores
//! (the cue index) apply their own sync before the owning operation returns.

use crate::error::ModelError;
use crate::point::{Point, PointOptions, PointUpdate};
use crate::segment::{Segment, SegmentOptions, SegmentUpdate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of points, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointStore {
    points: IndexMap<String, Point>,
    next_id: u64,
}

impl PointStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point, generating an id when the options carry none.
    ///
    /// Returns the id of the new point.
    pub fn add(&mut self, options: PointOptions) -> Result<String, ModelError> {
        options.validate()?;

        let fallback_id = if options.id.is_none() {
            let id = format!("wavemark.point.{}", self.next_id);
            self.next_id += 1;
            id
        } else {
            String::new()
        };

        let point = Point::from_options(options, fallback_id);
        if self.points.contains_key(&point.id) {
            return Err(ModelError::DuplicateId(point.id));
        }

        let id = point.id.clone();
        self.points.insert(id.clone(), point);
        Ok(id)
    }

    /// Update a point in place
    pub fn update(&mut self, id: &str, update: PointUpdate) -> Result<&Point, ModelError> {
        update.validate()?;
        let point = self
            .points
            .get_mut(id)
            .ok_or_else(|| ModelError::IdNotFound(id.to_string()))?;
        point.apply(update);
        Ok(point)
    }

    /// Remove a point, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<Point> {
        self.points.shift_remove(id)
    }

    /// Remove all points
    pub fn remove_all(&mut self) {
        tracing::debug!(count = self.points.len(), "removing all points");
        self.points.clear();
    }

    /// Get a point by id
    pub fn get(&self, id: &str) -> Option<&Point> {
        self.points.get(id)
    }

    /// Iterate over all points in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    /// Number of points in the store
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the store holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Insertion-ordered collection of segments, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentStore {
    segments: IndexMap<String, Segment>,
    next_id: u64,
}

impl SegmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment, generating an id when the options carry none.
    ///
    /// Returns the id of the new segment.
    pub fn add(&mut self, options: SegmentOptions) -> Result<String, ModelError> {
        options.validate()?;

        let fallback_id = if options.id.is_none() {
            let id = format!("wavemark.segment.{}", self.next_id);
            self.next_id += 1;
            id
        } else {
            String::new()
        };

        let segment = Segment::from_options(options, fallback_id);
        if self.segments.contains_key(&segment.id) {
            return Err(ModelError::DuplicateId(segment.id));
        }

        let id = segment.id.clone();
        self.segments.insert(id.clone(), segment);
        Ok(id)
    }

    /// Update a segment in place
    pub fn update(&mut self, id: &str, update: SegmentUpdate) -> Result<&Segment, ModelError> {
        let segment = self
            .segments
            .get_mut(id)
            .ok_or_else(|| ModelError::IdNotFound(id.to_string()))?;
        update.validate(segment)?;
        segment.apply(update);
        Ok(segment)
    }

    /// Remove a segment, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<Segment> {
        self.segments.shift_remove(id)
    }

    /// Remove all segments
    pub fn remove_all(&mut self) {
        tracing::debug!(count = self.segments.len(), "removing all segments");
        self.segments.clear();
    }

    /// Get a segment by id
    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Iterate over all segments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Number of segments in the store
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the store holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segment that follows the given one in start-time order.
    ///
    /// Only strictly later starts qualify, so two segments starting at the
    /// same instant are not each other's neighbor.
    pub fn next_segment(&self, id: &str) -> Option<&Segment> {
        let current = self.segments.get(id)?;
        self.segments
            .values()
            .filter(|s| s.id != id && s.start_time > current.start_time)
            .min_by(|a, b| a.start_time.partial_cmp(&b.start_time).unwrap())
    }

    /// The segment that precedes the given one in start-time order
    pub fn previous_segment(&self, id: &str) -> Option<&Segment> {
        let current = self.segments.get(id)?;
        self.segments
            .values()
            .filter(|s| s.id != id && s.start_time < current.start_time)
            .max_by(|a, b| a.start_time.partial_cmp(&b.start_time).unwrap())
    }

    /// Iterate over the segments whose interval contains the given time
    pub fn containing(&self, time: f64) -> impl Iterator<Item = &Segment> {
        self.segments.values().filter(move |s| s.contains(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ids_are_generated() {
        let mut store = PointStore::new();
        let a = store.add(PointOptions::at(1.0)).unwrap();
        let b = store.add(PointOptions::at(2.0)).unwrap();
        assert_eq!(a, "wavemark.point.0");
        assert_eq!(b, "wavemark.point.1");

        // Caller-supplied ids do not advance the counter.
        store.add(PointOptions::at(3.0).with_id("mine")).unwrap();
        let c = store.add(PointOptions::at(4.0)).unwrap();
        assert_eq!(c, "wavemark.point.2");
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut store = PointStore::new();
        store.add(PointOptions::at(1.0).with_id("p")).unwrap();
        assert_eq!(
            store.add(PointOptions::at(2.0).with_id("p")),
            Err(ModelError::DuplicateId("p".to_string()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut store = PointStore::new();
        assert_eq!(
            store.update("missing", PointUpdate::time(1.0)).err(),
            Some(ModelError::IdNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_point_update_moves_time_only() {
        let mut store = PointStore::new();
        store.add(PointOptions::at(1.1).with_id("p")).unwrap();
        store.update("p", PointUpdate::time(2.2)).unwrap();
        let point = store.get("p").unwrap();
        assert_eq!(point.time, 2.2);
        assert_eq!(point.label_text, "");
    }

    #[test]
    fn test_segment_neighbors() {
        let mut store = SegmentStore::new();
        store
            .add(SegmentOptions::spanning(1.0, 2.0).with_id("seg1"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(3.0, 4.0).with_id("seg2"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(11.0, 12.0).with_id("seg3"))
            .unwrap();

        assert_eq!(store.next_segment("seg1").unwrap().id, "seg2");
        assert_eq!(store.next_segment("seg2").unwrap().id, "seg3");
        assert!(store.next_segment("seg3").is_none());

        assert_eq!(store.previous_segment("seg2").unwrap().id, "seg1");
        assert!(store.previous_segment("seg1").is_none());
    }

    #[test]
    fn test_equal_start_segments_are_not_neighbors() {
        let mut store = SegmentStore::new();
        store
            .add(SegmentOptions::spanning(1.0, 2.0).with_id("a"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(1.0, 3.0).with_id("b"))
            .unwrap();

        assert!(store.next_segment("a").is_none());
        assert!(store.previous_segment("b").is_none());
    }

    #[test]
    fn test_containing_uses_half_open_intervals() {
        let mut store = SegmentStore::new();
        store
            .add(SegmentOptions::spanning(2.0, 4.0).with_id("a"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(3.0, 5.0).with_id("b"))
            .unwrap();

        let at3: Vec<_> = store.containing(3.0).map(|s| s.id.as_str()).collect();
        assert_eq!(at3, vec!["a", "b"]);

        let at4: Vec<_> = store.containing(4.0).map(|s| s.id.as_str()).collect();
        assert_eq!(at4, vec!["b"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = SegmentStore::new();
        store
            .add(SegmentOptions::spanning(1.0, 2.0).with_id("a"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(3.0, 4.0).with_id("b"))
            .unwrap();
        store
            .add(SegmentOptions::spanning(5.0, 6.0).with_id("c"))
            .unwrap();

        assert!(store.remove("b").is_some());
        assert!(store.remove("b").is_none());

        let ids: Vec<_> = store.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
