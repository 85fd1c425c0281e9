use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{AppState, NodesResponse, RegisterNodesRequest, ResolveResponse};
use crate::error::ApiError;

/// Register peers. Either every address is accepted or none is.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, ApiError> {
    let nodes = body.into_inner().nodes.ok_or(ApiError::MissingNodeList)?;

    let total_nodes = {
        let mut registry = state.registry.write().expect("registry lock poisoned");
        registry
            .add_peers(&nodes)
            .inspect_err(|e| warn!("POST /nodes/register - rejected: {e}"))?;
        registry.list_peers()
    };

    Ok(HttpResponse::Created().json(NodesResponse {
        message: Some("New nodes have been added".to_string()),
        total_nodes,
    }))
}

#[get("/nodes")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let registry = state.registry.read().expect("registry lock poisoned");
    HttpResponse::Ok().json(NodesResponse {
        message: None,
        total_nodes: registry.list_peers(),
    })
}

/// Run consensus against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve_chain(state: web::Data<AppState>) -> impl Responder {
    let peers = state
        .registry
        .read()
        .expect("registry lock poisoned")
        .list_peers();
    let resolution = state.resolver.resolve(&peers, &state.ledger).await;

    let message = if resolution.replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced: resolution.replaced,
        chain: resolution.chain,
    })
}
