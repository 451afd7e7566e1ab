use crate::error::AppError;
use crate::workflows::seating::report::{BranchReportView, CommonReportView, StudentRowView};
use crate::workflows::seating::{
    AllocationSummary, SeatingRun, SeatingSources, SubjectCatalog, TableOutcome, TableSource,
};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: PrometheusHandle,
}

/// Inline CSV tables, each with its header row.
#[derive(Debug, Deserialize)]
pub struct SeatingReportRequest {
    pub students_csv: String,
    pub buildings_csv: String,
    #[serde(default)]
    pub subjects_csv: String,
    #[serde(default)]
    pub invigilators_csv: String,
    /// Replaces the built-in subject catalog for this request.
    #[serde(default)]
    pub catalog: Option<SubjectCatalog>,
}

#[derive(Debug, Serialize)]
pub struct SeatingReportResponse {
    pub tables: Vec<TableOutcome>,
    pub summary: AllocationSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unallocated: Vec<StudentRowView>,
    pub common: CommonReportView,
    pub branch: BranchReportView,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/seating/report", post(seating_report_endpoint))
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub async fn seating_report_endpoint(
    Json(payload): Json<SeatingReportRequest>,
) -> Result<Json<SeatingReportResponse>, AppError> {
    let SeatingReportRequest {
        students_csv,
        buildings_csv,
        subjects_csv,
        invigilators_csv,
        catalog,
    } = payload;

    for (field, text) in [("students_csv", &students_csv), ("buildings_csv", &buildings_csv)] {
        if text.trim().is_empty() {
            return Err(AppError::InvalidRequest(format!("{field} is empty")));
        }
    }

    let sources = SeatingSources {
        students: TableSource::Inline(students_csv),
        buildings: TableSource::Inline(buildings_csv),
        subjects: TableSource::Inline(subjects_csv),
        invigilators: TableSource::Inline(invigilators_csv),
    };
    let catalog = catalog.unwrap_or_default();

    let result = SeatingRun::execute(&sources, &catalog);
    let summary = result.summary();
    info!(
        halls = summary.rooms_visited,
        seated = summary.students_seated,
        "seating report served"
    );

    Ok(Json(SeatingReportResponse {
        tables: result.tables,
        summary,
        unallocated: result
            .allocation
            .unallocated()
            .iter()
            .map(|student| StudentRowView {
                name: student.name.clone(),
                prn: student.prn.clone(),
                branch: student.branch.clone(),
            })
            .collect(),
        common: result.common_report,
        branch: result.branch_report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
        }
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = router(state(false))
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = router(state(true))
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn report_endpoint_returns_both_views() {
        let request = SeatingReportRequest {
            students_csv: "PRN,Name,Branch,Year\n1,S1,Computer Science,FE\n2,S2,Civil,FE\n3,S3,Civil,FE\n"
                .to_string(),
            buildings_csv: "Building,Room,Benches\n1,101,2\n".to_string(),
            subjects_csv: String::new(),
            invigilators_csv: "Name,Department\nI1,Maths\n".to_string(),
            catalog: None,
        };

        let Json(body) = seating_report_endpoint(Json(request))
            .await
            .expect("report served");

        assert_eq!(body.tables.len(), 4);
        assert_eq!(body.summary.students_seated, 2);
        assert_eq!(body.unallocated.len(), 1);
        assert_eq!(body.unallocated[0].name, "S3");
        assert_eq!(body.common.rooms.len(), 1);
        assert_eq!(body.common.rooms[0].invigilator.as_deref(), Some("I1"));
        assert_eq!(body.branch.branches.len(), 5);
    }

    #[tokio::test]
    async fn blank_students_table_is_rejected() {
        let body = json!({
            "students_csv": "  ",
            "buildings_csv": "Building,Room,Benches\n1,101,2\n",
        });
        let request = Request::post("/api/v1/seating/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");

        let response = router(state(true)).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
