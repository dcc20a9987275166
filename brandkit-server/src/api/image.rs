//! Image generation API
//!
//! POST /api/images/generate: prompt → generation backend → S3 → public URL
//!
//! The backend calls run in their own task tied to a cancellation token. If
//! the client goes away the handler future is dropped, the drop guard fires
//! and any in-flight backend request is abandoned.

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};
use shared::models::{GenerateRequest, GenerateResponse, GeneratedAsset, GenerationHealth};

use crate::state::AppState;

use super::ApiResult;

/// POST /api/images/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<GenerateResponse> {
    let prompt = req
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "Please provide a prompt"))?;

    tracing::info!(
        asset_type = req.asset_type.as_deref().unwrap_or("asset"),
        prompt = %prompt,
        "Generating image"
    );

    let (_guard, task) = state.generator.spawn_generate(prompt.clone());
    let image = task
        .await
        .map_err(|e| {
            tracing::error!("Generation task failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })??;

    let stored = state
        .storage
        .upload_generated(image, &prompt)
        .await
        .map_err(|e| AppError::upstream(ErrorCode::StorageFailed, e))?;

    tracing::info!(key = %stored.key, "Generated image stored");

    Ok(Json(GenerateResponse {
        success: true,
        message: "Image generated successfully!".into(),
        data: GeneratedAsset {
            image_url: stored.url,
            prompt,
            asset_type: req.asset_type,
            generated_at: chrono::Utc::now().to_rfc3339(),
        },
    }))
}

/// GET /api/images/health
pub async fn generation_health(State(state): State<AppState>) -> Json<GenerationHealth> {
    Json(GenerationHealth {
        status: "ok".into(),
        message: "Backend is healthy!".into(),
        comfyui: state.generator.base_url().to_string(),
        s3_bucket: state.storage.bucket().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::test_support::*;
    use crate::api::create_router;
    use http::StatusCode;
    use serde_json::json;
    use shared::error::ErrorCode;
    use tokio::io::AsyncReadExt;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_generate_requires_prompt() {
        let app = create_router(state());
        let response = app
            .oneshot(post_json("/api/images/generate", json!({ "prompt": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], ErrorCode::RequiredField.code());
    }

    #[tokio::test]
    async fn test_generate_backend_unreachable_is_bad_gateway() {
        let app = create_router(state());
        let response = app
            .oneshot(post_json("/api/images/generate", json!({ "prompt": "a red bicycle" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["code"], ErrorCode::GenerationFailed.code());
        assert!(body["details"]["details"].is_string());
    }

    #[tokio::test]
    async fn test_generation_health() {
        let app = create_router(state());
        let body = json_body(app.oneshot(get("/api/images/health")).await.unwrap()).await;
        assert_eq!(body["comfyui"], "http://127.0.0.1:1");
        assert_eq!(body["s3Bucket"], "brandkit-test");
    }

    #[tokio::test]
    async fn test_dropped_request_abandons_backend_call() {
        // Backend reads requests, never answers, and reports closed connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let closed_tx = closed_tx.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
                    let _ = closed_tx.send(());
                });
            }
        });

        let mut config = config();
        config.comfyui_url = format!("http://{addr}");
        config.generation_request_timeout = Duration::from_secs(60);
        let app = create_router(state_with(&config));

        let request = tokio::spawn(
            app.oneshot(post_json("/api/images/generate", json!({ "prompt": "a red bicycle" }))),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!request.is_finished());
        request.abort();

        tokio::time::timeout(Duration::from_secs(5), closed_rx.recv())
            .await
            .expect("backend request kept running after the handler was dropped")
            .unwrap();
    }
}
