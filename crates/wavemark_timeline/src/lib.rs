// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline core for Wavemark.
//!
//! Builds on [`wavemark_model`]'s marker stores to provide the two engines a
//! waveform annotation view needs:
//!
//! - the cue-crossing engine ([`CueEmitter`] over a [`CueIndex`]), which
//!   turns playback position reports into `points.enter`, `segments.enter`
//!   and `segments.exit` events;
//! - the drag resolver ([`SegmentDragResolver`]), which turns pointer
//!   gestures into constrained segment edits under the active [`DragMode`].
//!
//! [`Timeline`] ties both to the stores and guarantees the cue index is
//! never observed out of sync with the markers.

pub mod cue;
pub mod drag;
pub mod emitter;
pub mod error;
pub mod event;
pub mod timeline;
pub mod view;

pub use cue::{Cue, CueIndex, CueKind};
pub use drag::{DragHandle, DragMode, DragTarget, SegmentDragResolver, SegmentEdit};
pub use emitter::CueEmitter;
pub use error::TimelineError;
pub use event::{EventBus, TimelineEvent};
pub use timeline::{Timeline, TimelineOptions};
pub use view::ViewGeometry;
