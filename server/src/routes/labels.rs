//! Label catalog endpoint

use axum::{extract::State, Json};
use plant_core::PlantClass;

use crate::state::SharedState;

/// GET /labels - Classes the active diagnoser can report
pub async fn list_labels(State(state): State<SharedState>) -> Json<Vec<PlantClass>> {
    Json(state.scanner.diagnoser().catalog().classes().to_vec())
}
