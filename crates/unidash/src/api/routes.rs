use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use unidash_core::{
    by_term_enrollment, enrollment_by_department, mean_by_year, totals, Dashboard, Department,
    DepartmentEnrollment, Metric, SelectionError, SnapshotInfo, TermEnrollment, Totals, YearMean,
};

use crate::api::state::AppState;

/// Comma-separated selection lists. An absent key selects everything; a key
/// with an empty value selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub years: Option<String>,
    pub terms: Option<String>,
    pub departments: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                tracing::warn!(error = %message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub snapshot: SnapshotInfo,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub years: Vec<i32>,
    pub terms: Vec<String>,
    pub departments: Vec<Department>,
    pub metrics: Vec<&'static str>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        snapshot: state.snapshot().info(),
    })
}

pub async fn options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let snapshot = state.snapshot();
    Json(OptionsResponse {
        years: snapshot.years().to_vec(),
        terms: snapshot.terms().to_vec(),
        departments: Department::ALL.to_vec(),
        metrics: Metric::all().iter().map(Metric::key).collect(),
    })
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let selection = state.selection(&query)?;
    Ok(Json(Dashboard::build(state.snapshot(), &selection)))
}

pub async fn totals_view(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Totals>, ApiError> {
    let selection = state.selection(&query)?;
    let filtered = selection.apply(state.snapshot().records());
    Ok(Json(totals(&filtered)))
}

pub async fn mean_by_year_view(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<YearMean>>, ApiError> {
    let metric = match query.metric.as_deref() {
        Some(name) => Metric::try_from(name).map_err(SelectionError::InvalidMetric)?,
        None => Metric::RetentionRate,
    };
    let selection = state.selection(&query)?;
    let filtered = selection.apply(state.snapshot().records());
    Ok(Json(mean_by_year(&filtered, metric)))
}

pub async fn departments_view(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<DepartmentEnrollment>>, ApiError> {
    let selection = state.selection(&query)?;
    let filtered = selection.apply(state.snapshot().records());
    Ok(Json(enrollment_by_department(
        &filtered,
        selection.departments(),
    )))
}

pub async fn terms_view(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<TermEnrollment>>, ApiError> {
    let selection = state.selection(&query)?;
    let filtered = selection.apply(state.snapshot().records());
    Ok(Json(by_term_enrollment(&filtered)))
}
