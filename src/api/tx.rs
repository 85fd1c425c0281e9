use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::ApiError;
use crate::transaction::Transaction;

/// Queue a transaction for the next block.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, ApiError> {
    let Transaction {
        sender,
        recipient,
        amount,
    } = body
        .into_inner()
        .into_transaction()
        .inspect_err(|e| warn!("POST /transactions/new - rejected: {e}"))?;

    let index = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        ledger.add_transaction(sender, recipient, amount)
    };
    debug!("POST /transactions/new - queued for block #{index}");

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {index}"),
        index,
    }))
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
