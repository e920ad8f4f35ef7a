//! Layered render cache: recorded scenes fingerprinted by frame state.

mod scene_cache;
mod segment;
mod state;

pub use scene_cache::{LabelSegment, SceneCache};
pub use segment::{SegmentKey, SegmentKind};
pub use state::{FrameGeometry, RenderState};
