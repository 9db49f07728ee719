pub mod format;
mod projection;
pub mod timeline;
mod types;

pub use projection::PlanParams;
pub use types::{ChapterRect, MarkerState, Projection, TimelineState};
