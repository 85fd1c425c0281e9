use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, HealthResponse};

/// Liveness plus a summary of what the node currently holds.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (height, pending, difficulty) = {
        let ledger = state.ledger.read().expect("ledger lock poisoned");
        (ledger.len(), ledger.pending().len(), ledger.pow().difficulty())
    };
    let peers = state.registry.read().expect("registry lock poisoned").len();

    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        node_id: &state.node_id,
        height,
        pending,
        peers,
        difficulty,
    })
}
