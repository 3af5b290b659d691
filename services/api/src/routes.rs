use crate::infra::{AppState, BookletService};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use mindmirror::error::AppError;
use mindmirror::workflows::assessment::inventory::LIKERT_ANCHORS;
use mindmirror::workflows::assessment::{
    AssessmentOutcome, CompletionStatus, DimensionSet, Inventory, RespondentRecord,
};
use mindmirror::workflows::booklet::Booklet;
use mindmirror::workflows::export::CsvExporter;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct ScoresResponse {
    #[serde(flatten)]
    pub(crate) outcome: AssessmentOutcome,
    pub(crate) completion: CompletionStatus,
}

pub(crate) fn with_booklet_routes(service: BookletService) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/inventory/:set", get(inventory_endpoint))
        .route("/api/v1/scores", post(scores_endpoint))
        .route("/api/v1/booklet", post(booklet_endpoint))
        .route("/api/v1/booklet/preview", post(booklet_preview_endpoint))
        .route("/api/v1/thank-you", post(thank_you_endpoint))
        .route("/api/v1/export/csv", post(csv_export_endpoint))
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn inventory_endpoint(Path(set): Path<DimensionSet>) -> Json<Value> {
    let inventory = Inventory::for_set(set);
    Json(json!({
        "inventory": inventory,
        "anchors": LIKERT_ANCHORS,
        "items": inventory.items(),
    }))
}

pub(crate) async fn scores_endpoint(Json(record): Json<RespondentRecord>) -> Json<ScoresResponse> {
    Json(ScoresResponse {
        outcome: AssessmentOutcome::from_record(&record),
        completion: CompletionStatus::from_record(&record),
    })
}

pub(crate) async fn booklet_endpoint(
    Extension(service): Extension<BookletService>,
    Json(record): Json<RespondentRecord>,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, bytes) = tokio::task::spawn_blocking(move || service.render(&record))
        .await
        .map_err(join_error)??;

    info!(%file_name, bytes = bytes.len(), "booklet rendered");
    Ok(pdf_attachment(file_name, bytes))
}

pub(crate) async fn thank_you_endpoint(
    Extension(service): Extension<BookletService>,
    Json(record): Json<RespondentRecord>,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, bytes) = tokio::task::spawn_blocking(move || service.render_thank_you(&record))
        .await
        .map_err(join_error)??;

    info!(%file_name, bytes = bytes.len(), "thank-you letter rendered");
    Ok(pdf_attachment(file_name, bytes))
}

fn pdf_attachment(file_name: String, bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
}

pub(crate) async fn booklet_preview_endpoint(
    Extension(service): Extension<BookletService>,
    Json(record): Json<RespondentRecord>,
) -> Result<Json<Booklet>, AppError> {
    let booklet = tokio::task::spawn_blocking(move || service.build(&record))
        .await
        .map_err(join_error)?;
    Ok(Json(booklet))
}

pub(crate) async fn csv_export_endpoint(Json(rows): Json<Vec<Value>>) -> Result<impl IntoResponse, AppError> {
    let body = CsvExporter::export(&rows)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}

fn join_error(err: tokio::task::JoinError) -> AppError {
    AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use mindmirror::workflows::corpus::InMemoryAssets;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router(ready: bool) -> Router {
        let service = BookletService::new(Arc::new(
            InMemoryAssets::new().with_text("/texts/traits.txt", "Openness: You love new ideas."),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_booklet_routes(service).layer(Extension(state))
    }

    fn complete_record() -> Value {
        json!({
            "user_id": "u-1",
            "email": "grace.hopper@example.com",
            "full_name": "Grace Hopper",
            "bigfive_answers": vec![3; 50],
            "basicneeds_answers": vec![5; 35],
            "created_at": Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap(),
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
            .expect("request")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = build_router(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn inventory_lists_numbered_items() {
        let response = build_router(true)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/inventory/needs")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["inventory"]["set"], json!("needs"));
        assert_eq!(payload["items"].as_array().map(Vec::len), Some(35));
        assert_eq!(payload["items"][0]["number"], json!(1));
        assert_eq!(payload["anchors"][4], json!("Very Accurate"));
    }

    #[tokio::test]
    async fn unknown_inventory_is_rejected() {
        let response = build_router(true)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/inventory/colours")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scores_endpoint_returns_rankings() {
        let response = build_router(true)
            .oneshot(post_json("/api/v1/scores", &complete_record()))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["big_five"]["ranked"][0]["percentile"], json!(60));
        assert_eq!(
            payload["basic_needs"]["dominant_pair"],
            json!({ "first": "survival", "second": "love" })
        );
        assert_eq!(payload["completion"]["big_five"], json!(true));
    }

    #[tokio::test]
    async fn incomplete_scores_are_null() {
        let response = build_router(true)
            .oneshot(post_json(
                "/api/v1/scores",
                &json!({ "bigfive_answers": [1, 2, 3] }),
            ))
            .await
            .expect("router dispatch");
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload["big_five"].is_null());
        assert!(payload["basic_needs"].is_null());
        assert_eq!(payload["completion"]["big_five"], json!(false));
    }

    #[tokio::test]
    async fn booklet_endpoint_returns_named_pdf() {
        let response = build_router(true)
            .oneshot(post_json("/api/v1/booklet", &complete_record()))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"grace_hopper_booklet.pdf\""
        );

        let body = to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("body");
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn thank_you_endpoint_returns_letter_pdf() {
        let response = build_router(true)
            .oneshot(post_json("/api/v1/thank-you", &complete_record()))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"mindmirror3d-thank-you.pdf\""
        );

        let body = to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("body");
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn preview_exposes_draw_program() {
        let response = build_router(true)
            .oneshot(post_json("/api/v1/booklet/preview", &complete_record()))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["file_name"], json!("grace_hopper_booklet.pdf"));
        assert_eq!(payload["pages"].as_array().map(Vec::len), Some(9));
        assert_eq!(payload["pages"][0]["spec"]["kind"], json!("title_cover"));
        assert!(payload["pages"][0]["ops"]
            .to_string()
            .contains("Prepared for: Grace Hopper"));
        assert_eq!(payload["pages"][1]["spec"]["kind"], json!("score_table"));
        assert_eq!(payload["pages"][8]["spec"]["kind"], json!("back_note"));

        let narrative = payload["pages"][2]["ops"].to_string();
        assert!(narrative.contains("You love new ideas."));
    }

    #[tokio::test]
    async fn csv_export_uses_first_record_header() {
        let rows = json!([
            { "email": "a@example.com", "paid": null },
            { "paid": true, "email": "b@example.com", "extra": 1 },
        ]);
        let response = build_router(true)
            .oneshot(post_json("/api/v1/export/csv", &rows))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        assert_eq!(
            std::str::from_utf8(&body).expect("utf8"),
            "\"email\",\"paid\"\n\"a@example.com\",\"\"\n\"b@example.com\",\"true\"\n"
        );
    }

    #[tokio::test]
    async fn csv_export_rejects_non_object_rows() {
        let response = build_router(true)
            .oneshot(post_json("/api/v1/export/csv", &json!([{ "a": 1 }, 5])))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
