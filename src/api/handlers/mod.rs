use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, EngineError};
use crate::models::{PlantSnapshot, PlantState};

/// Acknowledgement for a successful watering.
pub const WATER_REPLY: &str = "💧";
/// Acknowledgement for a successful reset.
pub const RESET_REPLY: &str = "✅";

// ============================================================
// Error Handling
// ============================================================

/// Log an engine error and return a sanitized response to the client.
fn internal_error(e: EngineError) -> (StatusCode, String) {
    match e {
        EngineError::Store(ref store) if store.is_read() => {
            tracing::error!("Plant record unavailable: {:?}", store);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Plant record unavailable".to_string(),
            )
        }
        other => {
            tracing::error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Responses
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterResponse {
    pub reply: String,
    pub amount: i64,
    pub state: PlantState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub reply: String,
    pub state: PlantState,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Plant
// ============================================================

pub async fn get_plant(
    State(engine): State<Engine>,
) -> Result<Json<PlantSnapshot>, (StatusCode, String)> {
    engine.status().await.map(Json).map_err(internal_error)
}

pub async fn water(
    State(engine): State<Engine>,
) -> Result<Json<WaterResponse>, (StatusCode, String)> {
    let report = engine.water().await.map_err(internal_error)?;
    Ok(Json(WaterResponse {
        reply: WATER_REPLY.to_string(),
        amount: report.amount,
        state: report.state,
    }))
}

pub async fn reset(
    State(engine): State<Engine>,
) -> Result<Json<ResetResponse>, (StatusCode, String)> {
    let state = engine.reset().await.map_err(internal_error)?;
    Ok(Json(ResetResponse {
        reply: RESET_REPLY.to_string(),
        state,
    }))
}
