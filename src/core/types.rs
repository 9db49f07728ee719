use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub monthly_payment: f64,
    pub monthly_total: f64,
    pub initial_growth: f64,
    pub profit: f64,
    pub initial_investment: f64,
}

/// Live geometry of one story chapter, in viewport coordinates. Rebuilt from
/// layout on every scroll frame; never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRect {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerState {
    None,
    Active,
    Passed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub active_chapter: Option<String>,
    pub progress: f64,
    pub markers: [MarkerState; super::timeline::MARKER_COUNT],
}
