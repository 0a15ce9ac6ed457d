//! Screen and scan endpoints
//!
//! Both take the raw image bytes as the request body. Decoding and the pixel
//! pass run on the blocking pool.

use axum::{body::Bytes, extract::State, Json};
use plant_core::{PlantVerdict, ScanReport};
use plant_screen::{decode_image, DecodeLimits};
use tracing::info;

use super::ApiError;
use crate::state::SharedState;

/// POST /screen - Plant-likeness verdict only
pub async fn screen_image(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PlantVerdict>, ApiError> {
    info!("Screening upload of {} bytes", body.len());

    let verdict = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&body, &DecodeLimits::from(&state.config.server))?;
        state.scanner.screen().screen_decoded(&decoded)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Screen task failed: {e}")))??;

    Ok(Json(verdict))
}

/// POST /scan - Screen, then diagnose accepted images
pub async fn scan_image(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ScanReport>, ApiError> {
    info!("Scanning upload of {} bytes", body.len());

    let report = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&body, &DecodeLimits::from(&state.config.server))?;
        state.scanner.scan_decoded(&decoded)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Scan task failed: {e}")))??;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use plant_core::{AppConfig, DiagnosisConfig, PlantClass, ServerConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::health::HealthResponse;
    use crate::state::AppState;

    fn app_with(server: ServerConfig) -> Router {
        let config = AppConfig {
            diagnosis: DiagnosisConfig {
                seed: Some(5),
                ..DiagnosisConfig::default()
            },
            server,
            ..AppConfig::default()
        };
        let state = AppState::from_config(config).expect("state");
        crate::build_router(Arc::new(state))
    }

    fn app() -> Router {
        app_with(ServerConfig::default())
    }

    fn encoded(pixel: Rgb<u8>, format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(12, 12, pixel);
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode image");
        bytes
    }

    fn png(pixel: Rgb<u8>) -> Vec<u8> {
        encoded(pixel, ImageFormat::Png)
    }

    fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "image/png")
            .body(Body::from(body))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_scan_of_leaf_returns_diagnosis() {
        let response = app()
            .oneshot(post("/scan", png(Rgb([20, 180, 40]))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["verdict"]["is_plant"], true);
        assert_eq!(body["verdict"]["basis"], "color_bands");
        assert_eq!(body["diagnosis"]["placeholder"], true);
        assert_eq!(body["diagnosis"]["ranked"].as_array().map(Vec::len), Some(3));
        assert!(body["advice"]["summary"].is_string());
    }

    #[tokio::test]
    async fn test_scan_of_non_plant_has_no_diagnosis() {
        let response = app()
            .oneshot(post("/scan", png(Rgb([0, 0, 255]))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["verdict"]["is_plant"], false);
        assert!(body["diagnosis"].is_null());
        assert!(body["message"].as_str().unwrap_or_default().contains("Non-plant"));
    }

    #[tokio::test]
    async fn test_screen_reports_ratios() {
        let response = app()
            .oneshot(post("/screen", png(Rgb([0, 255, 0]))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["is_plant"], true);
        assert_eq!(body["green_ratio"], 1.0);
        assert_eq!(body["width"], 12);
    }

    #[tokio::test]
    async fn test_undecodable_upload_is_bad_request() {
        let response = app()
            .oneshot(post("/screen", b"definitely not a png".to_vec()))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap_or_default().contains("decode"));
    }

    #[tokio::test]
    async fn test_empty_upload_is_bad_request() {
        let response = app()
            .oneshot(post("/scan", Vec::new()))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let app = app_with(ServerConfig {
            max_upload_bytes: 64,
            ..ServerConfig::default()
        });
        let response = app
            .oneshot(post("/scan", vec![0u8; 1024]))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_palette_gif_passes_screen() {
        let response = app()
            .oneshot(post("/screen", encoded(Rgb([0, 0, 255]), ImageFormat::Gif)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["is_plant"], true);
        assert_eq!(body["basis"], "grayscale");
    }

    #[tokio::test]
    async fn test_oversized_image_is_bad_request() {
        let app = app_with(ServerConfig {
            max_image_side: 8,
            ..ServerConfig::default()
        });
        let response = app
            .oneshot(post("/scan", png(Rgb([0, 200, 0]))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap_or_default().contains("decode limits"));
    }

    #[tokio::test]
    async fn test_health_reports_diagnoser() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse =
            serde_json::from_value(json_body(response).await).expect("health body");
        assert_eq!(health.status, "ok");
        assert_eq!(health.diagnoser, "random-dirichlet");
    }

    #[tokio::test]
    async fn test_labels_lists_catalog() {
        let response = app()
            .oneshot(Request::get("/labels").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let labels: Vec<PlantClass> =
            serde_json::from_value(json_body(response).await).expect("labels body");
        assert_eq!(labels.len(), 6);
        assert!(labels.iter().any(|l| l.healthy));
    }
}
