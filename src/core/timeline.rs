use super::types::{ChapterRect, MarkerState, TimelineState};

pub const MARKER_COUNT: usize = 5;

/// A chapter becomes the active one once its top edge crosses this fraction of
/// the viewport height.
pub const TRIGGER_FRACTION: f64 = 0.4;

/// The whole progress indicator hides once the closing section's top edge
/// rises above this fraction of the viewport height.
pub const HIDE_FRACTION: f64 = 0.6;

// Chapter-to-marker mapping by the age each chapter narrates:
// chapters 1,2 -> 45세, 3 -> 55세, 4 -> 60세, 5,6 -> 65세, 7 -> 70세.
pub const CHAPTER_MARKERS: [(&str, usize); 7] = [
    ("1", 0),
    ("2", 0),
    ("3", 1),
    ("4", 2),
    ("5", 3),
    ("6", 3),
    ("7", 4),
];

pub fn marker_index(chapter_id: &str) -> Option<usize> {
    CHAPTER_MARKERS
        .iter()
        .find(|(id, _)| *id == chapter_id)
        .map(|&(_, index)| index)
}

/// Resolves the active chapter and marker states for one scroll frame.
///
/// A chapter qualifies while its top has crossed the trigger line but the
/// element has not fully scrolled past. When several qualify at once the last
/// one in slice order wins, so a chapter further down the page overrides an
/// earlier one; markers would jump differently during fast scrolling if this
/// tie-break changed.
pub fn resolve(viewport_height: f64, chapters: &[ChapterRect]) -> TimelineState {
    let trigger_point = viewport_height * TRIGGER_FRACTION;

    let mut active: Option<&ChapterRect> = None;
    for chapter in chapters {
        if chapter.top < trigger_point && chapter.top > -chapter.height {
            active = Some(chapter);
        }
    }

    let active_index = active.and_then(|chapter| marker_index(&chapter.id));

    let mut markers = [MarkerState::None; MARKER_COUNT];
    let progress = match active_index {
        Some(active_index) => {
            for (index, marker) in markers.iter_mut().enumerate() {
                *marker = if index < active_index {
                    MarkerState::Passed
                } else if index == active_index {
                    MarkerState::Active
                } else {
                    MarkerState::None
                };
            }
            active_index as f64 * (100.0 / (MARKER_COUNT - 1) as f64)
        }
        None => 0.0,
    };

    TimelineState {
        active_chapter: active.map(|chapter| chapter.id.clone()),
        progress,
        markers,
    }
}

/// Visibility gate for the progress indicator, independent of which chapter
/// is active.
pub fn indicator_visible(viewport_height: f64, closing_top: f64) -> bool {
    closing_top >= viewport_height * HIDE_FRACTION
}

/// Coalesces scroll notifications so the mapper runs at most once per rendered
/// frame. `request` reports whether the caller should schedule a frame; the
/// flag stays up until `complete` marks the frame as rendered. A superseded
/// pending recomputation is simply replaced by the next tick's values.
#[derive(Debug, Default)]
pub struct FrameGate {
    ticking: bool,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    pub fn complete(&mut self) {
        self.ticking = false;
    }
}
