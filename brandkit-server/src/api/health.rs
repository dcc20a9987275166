//! Service banner and health check

use axum::Json;
use axum::extract::State;
use http::StatusCode;

use crate::db;
use crate::state::AppState;

/// GET /: service banner with the endpoint list
pub async fn banner() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Brandkit design API",
        "status": "running",
        "service": "brandkit-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": {
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login",
                "me": "GET /api/auth/me (protected)"
            },
            "brands": {
                "get": "GET /api/brands (protected)",
                "save": "POST /api/brands (protected)",
                "delete": "DELETE /api/brands/:id (protected)",
                "uploadLogo": "POST /api/brands/upload-logo (protected)"
            },
            "templates": {
                "list": "GET /api/templates",
                "categories": "GET /api/templates/categories",
                "byCategory": "GET /api/templates/category/:category",
                "get": "GET /api/templates/:id"
            },
            "designs": {
                "create": "POST /api/designs (protected)",
                "list": "GET /api/designs (protected)",
                "get": "GET /api/designs/:id (protected)",
                "delete": "DELETE /api/designs/:id (protected)",
                "scene": "GET /api/designs/:id/scene (protected)",
                "preview": "POST /api/designs/preview (protected)"
            },
            "images": {
                "generate": "POST /api/images/generate",
                "health": "GET /api/images/health"
            }
        }
    }))
}

/// GET /api/health: 503 when the database is unreachable
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, database) = match db::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, "Connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Disconnected")
        }
    };

    (
        status,
        Json(serde_json::json!({
            "status": if status == StatusCode::OK { "OK" } else { "DEGRADED" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
