use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ChapterRect, MarkerState, PlanParams, Projection, TimelineState,
    format::{format_initial_display, format_number, format_to_eok},
    timeline,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

// Slider ranges shown in the calculator modal. The engine itself never
// validates; the API is the clamping caller the core documents.
const AGE_MIN: u32 = 20;
const AGE_MAX: u32 = 64;
const INITIAL_MAN_MAX: u64 = 100_000;
const INITIAL_MAN_STEP: u64 = 500;

// Hero typed-text rotation, kept as data so the front-end stays free of copy.
const TYPED_WORDS: [&str; 4] = [
    "스마트하게 설계하세요",
    "체계적으로 관리하세요",
    "안전하게 준비하세요",
    "현명하게 계획하세요",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    start_age: Option<u32>,
    initial_man: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct ProjectionRequest {
    start_age: u32,
    initial_man: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    start_age: u32,
    initial_man: u64,
    target_age: u32,
    target_amount: f64,
    annual_rate: f64,
    projection: Projection,
    display: ProjectionDisplay,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionDisplay {
    age: String,
    initial: String,
    monthly: String,
    principal: String,
    profit: String,
    target: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TimelinePayload {
    viewport_height: Option<f64>,
    chapters: Vec<ChapterRect>,
    closing_top: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineResponse {
    active_chapter: Option<String>,
    progress: f64,
    markers: [MarkerState; timeline::MARKER_COUNT],
    indicator_visible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterMarkerEntry {
    chapter: &'static str,
    marker: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageConfig {
    target_age: u32,
    target_amount: f64,
    annual_rate: f64,
    age_min: u32,
    age_max: u32,
    initial_man_max: u64,
    initial_man_step: u64,
    marker_count: usize,
    trigger_fraction: f64,
    hide_fraction: f64,
    chapter_markers: Vec<ChapterMarkerEntry>,
    typed_words: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_projection_request(payload: ProjectionPayload) -> Result<ProjectionRequest, String> {
    let start_age = payload.start_age.unwrap_or(45);
    let initial_man = payload.initial_man.unwrap_or(5_000);

    if !(AGE_MIN..=AGE_MAX).contains(&start_age) {
        return Err(format!("startAge must be between {AGE_MIN} and {AGE_MAX}"));
    }
    if initial_man > INITIAL_MAN_MAX {
        return Err(format!("initialMan must be <= {INITIAL_MAN_MAX}"));
    }

    Ok(ProjectionRequest {
        start_age,
        initial_man,
    })
}

fn build_projection_response(request: ProjectionRequest) -> ProjectionResponse {
    let plan = PlanParams::default();
    let initial_investment = request.initial_man as f64 * 10_000.0;
    let projection = plan.project(request.start_age, initial_investment);

    let monthly = if projection.monthly_payment == 0.0 {
        "추가 필요없음".to_string()
    } else {
        format!("{}원", format_number(projection.monthly_payment))
    };

    let display = ProjectionDisplay {
        age: format!("{}세", request.start_age),
        initial: format_initial_display(request.initial_man),
        monthly,
        principal: format_to_eok(projection.monthly_total),
        profit: format!("+{}", format_to_eok(projection.profit)),
        target: format_to_eok(plan.target_amount),
    };

    ProjectionResponse {
        start_age: request.start_age,
        initial_man: request.initial_man,
        target_age: plan.target_age,
        target_amount: plan.target_amount,
        annual_rate: plan.annual_rate,
        projection,
        display,
    }
}

fn build_timeline_response(payload: TimelinePayload) -> Result<TimelineResponse, String> {
    let Some(viewport_height) = payload.viewport_height else {
        return Err("viewportHeight is required".to_string());
    };
    if !viewport_height.is_finite() || viewport_height <= 0.0 {
        return Err("viewportHeight must be a positive number".to_string());
    }
    for chapter in &payload.chapters {
        if !chapter.top.is_finite() || !chapter.height.is_finite() {
            return Err(format!("chapter {} has non-finite geometry", chapter.id));
        }
    }
    if let Some(closing_top) = payload.closing_top {
        if !closing_top.is_finite() {
            return Err("closingTop must be a finite number".to_string());
        }
    }

    let TimelineState {
        active_chapter,
        progress,
        markers,
    } = timeline::resolve(viewport_height, &payload.chapters);

    // The closing section is optional on the page; without it the indicator
    // never hides.
    let indicator_visible = payload
        .closing_top
        .is_none_or(|top| timeline::indicator_visible(viewport_height, top));

    Ok(TimelineResponse {
        active_chapter,
        progress,
        markers,
        indicator_visible,
    })
}

fn page_config() -> PageConfig {
    let plan = PlanParams::default();
    PageConfig {
        target_age: plan.target_age,
        target_amount: plan.target_amount,
        annual_rate: plan.annual_rate,
        age_min: AGE_MIN,
        age_max: AGE_MAX,
        initial_man_max: INITIAL_MAN_MAX,
        initial_man_step: INITIAL_MAN_STEP,
        marker_count: timeline::MARKER_COUNT,
        trigger_fraction: timeline::TRIGGER_FRACTION,
        hide_fraction: timeline::HIDE_FRACTION,
        chapter_markers: timeline::CHAPTER_MARKERS
            .iter()
            .map(|&(chapter, marker)| ChapterMarkerEntry { chapter, marker })
            .collect(),
        typed_words: TYPED_WORDS.to_vec(),
    }
}

/// Runs one projection and renders it the way the calculator modal does.
pub fn project_to_text(start_age: u32, initial_man: u64) -> Result<String, String> {
    let request = build_projection_request(ProjectionPayload {
        start_age: Some(start_age),
        initial_man: Some(initial_man),
    })?;
    let response = build_projection_response(request);
    let d = &response.display;
    Ok(format!(
        "시작 나이: {}\n초기 투자금: {}\n월 납입액: {}\n총 납입액: {}\n예상 수익: {}\n목표 금액: {}\n",
        d.age, d.initial, d.monthly, d.principal, d.profit, d.target
    ))
}

/// Same projection as the `/api/projection` endpoint, as a JSON string.
pub fn project_to_json(start_age: u32, initial_man: u64) -> Result<String, String> {
    let request = build_projection_request(ProjectionPayload {
        start_age: Some(start_age),
        initial_man: Some(initial_man),
    })?;
    let response = build_projection_response(request);
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/config", get(config_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/api/timeline", post(timeline_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Lycon Planning listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn config_handler() -> Response {
    json_response(StatusCode::OK, page_config())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    match build_projection_request(payload) {
        Ok(request) => json_response(StatusCode::OK, build_projection_response(request)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn timeline_post_handler(Json(payload): Json<TimelinePayload>) -> Response {
    match build_timeline_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection_request_from_json(json: &str) -> Result<ProjectionRequest, String> {
        let payload = serde_json::from_str::<ProjectionPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        build_projection_request(payload)
    }

    fn timeline_response_from_json(json: &str) -> Result<TimelineResponse, String> {
        let payload = serde_json::from_str::<TimelinePayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        build_timeline_response(payload)
    }

    #[test]
    fn projection_payload_parses_web_keys_and_fills_defaults() {
        let request = projection_request_from_json(r#"{ "startAge": 38 }"#).expect("must parse");
        assert_eq!(request.start_age, 38);
        assert_eq!(request.initial_man, 5_000);

        let request = projection_request_from_json("{}").expect("must parse");
        assert_eq!(request.start_age, 45);
        assert_eq!(request.initial_man, 5_000);
    }

    #[test]
    fn projection_request_rejects_out_of_range_age() {
        let err = projection_request_from_json(r#"{ "startAge": 19 }"#)
            .expect_err("must reject age below slider range");
        assert!(err.contains("startAge"));

        let err = projection_request_from_json(r#"{ "startAge": 65 }"#)
            .expect_err("must reject age above slider range");
        assert!(err.contains("startAge"));
    }

    #[test]
    fn projection_request_rejects_oversized_lump_sum() {
        let err = projection_request_from_json(r#"{ "initialMan": 100001 }"#)
            .expect_err("must reject lump sum above slider range");
        assert!(err.contains("initialMan"));
    }

    #[test]
    fn projection_response_carries_every_display_string() {
        let request = ProjectionRequest {
            start_age: 45,
            initial_man: 5_000,
        };
        let response = build_projection_response(request);

        assert_eq!(response.display.age, "45세");
        assert_eq!(response.display.initial, "5,000만원");
        assert_eq!(response.display.target, "10억원");
        assert!(response.display.monthly.ends_with('원'));
        assert!(response.display.profit.starts_with('+'));
        assert!(response.projection.monthly_payment > 0.0);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"startAge\""));
        assert!(json.contains("\"monthlyPayment\""));
        assert!(json.contains("\"initialGrowth\""));
        assert!(json.contains("\"display\""));
        assert!(json.contains("\"targetAmount\""));
    }

    #[test]
    fn projection_response_labels_a_sufficient_lump_sum() {
        let request = ProjectionRequest {
            start_age: 45,
            initial_man: 90_000,
        };
        let response = build_projection_response(request);
        assert_eq!(response.projection.monthly_payment, 0.0);
        assert_eq!(response.display.monthly, "추가 필요없음");
        assert_eq!(response.display.principal, "0원");
    }

    #[test]
    fn timeline_response_resolves_the_last_qualifying_chapter() {
        let response = timeline_response_from_json(
            r#"{
              "viewportHeight": 800,
              "chapters": [
                { "id": "1", "top": -50, "height": 300 },
                { "id": "2", "top": 120, "height": 300 },
                { "id": "3", "top": 500, "height": 300 }
              ],
              "closingTop": 2400
            }"#,
        )
        .expect("must resolve");

        assert_eq!(response.active_chapter.as_deref(), Some("2"));
        assert_eq!(response.progress, 0.0);
        assert!(response.indicator_visible);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"activeChapter\""));
        assert!(json.contains("\"indicatorVisible\""));
        assert!(json.contains("\"markers\":[\"active\",\"none\",\"none\",\"none\",\"none\"]"));
    }

    #[test]
    fn timeline_response_hides_indicator_near_the_closing_section() {
        let response = timeline_response_from_json(
            r#"{
              "viewportHeight": 800,
              "chapters": [{ "id": "7", "top": 10, "height": 400 }],
              "closingTop": 300
            }"#,
        )
        .expect("must resolve");

        assert!(!response.indicator_visible);
        assert_eq!(response.progress, 100.0);
    }

    #[test]
    fn timeline_request_requires_a_viewport_height() {
        let err = timeline_response_from_json(r#"{ "chapters": [] }"#)
            .expect_err("must require viewportHeight");
        assert!(err.contains("viewportHeight"));
    }

    #[test]
    fn timeline_request_rejects_non_finite_geometry() {
        let payload = TimelinePayload {
            viewport_height: Some(800.0),
            chapters: vec![ChapterRect {
                id: "3".to_string(),
                top: f64::NAN,
                height: 300.0,
            }],
            closing_top: None,
        };
        let err = build_timeline_response(payload).expect_err("must reject NaN geometry");
        assert!(err.contains("chapter 3"));
    }

    #[test]
    fn page_config_exposes_the_chapter_marker_table() {
        let config = page_config();
        assert_eq!(config.marker_count, 5);
        assert_eq!(config.chapter_markers.len(), 7);
        assert_eq!(config.typed_words.len(), 4);

        let json = serde_json::to_string(&config).expect("config should serialize");
        assert!(json.contains("\"chapterMarkers\""));
        assert!(json.contains("\"triggerFraction\":0.4"));
        assert!(json.contains("\"typedWords\""));
    }

    #[test]
    fn embedded_page_carries_the_scroll_glue() {
        assert!(APP_JS.contains("IntersectionObserver"));
        assert!(APP_JS.contains("initSmoothScroll"));
        assert!(APP_JS.contains("initHeaderScroll"));
        assert!(STYLES_CSS.contains(".fade-in"));
        assert!(STYLES_CSS.contains(".header.scrolled"));
        assert!(INDEX_HTML.contains("status-bar"));
    }

    #[test]
    fn project_to_text_renders_formatted_lines() {
        let text = project_to_text(45, 5_000).expect("valid request");
        assert!(text.contains("시작 나이: 45세"));
        assert!(text.contains("초기 투자금: 5,000만원"));
        assert!(text.contains("목표 금액: 10억원"));
    }

    #[test]
    fn project_to_json_matches_the_api_shape() {
        let json = project_to_json(30, 0).expect("valid request");
        assert!(json.contains("\"startAge\": 30"));
        assert!(json.contains("\"monthlyPayment\""));
    }
}
