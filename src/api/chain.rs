use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, info, warn};
use std::time::Instant;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::blockchain::MINING_REWARD;
use crate::error::ApiError;
use crate::transaction::Transaction;

/// Get the full chain. This is also the shape peers fetch during consensus.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the local chain.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: ledger.validator().is_valid(ledger.chain()),
        length: ledger.len(),
    })
}

/// Mine a new block:
/// - search a proof for the current tip on the blocking pool
/// - pay the mining reward into the pending pool
/// - seal the pool into a block linked to the tip
///
/// A chain replacement during the search aborts it with 409.
#[get("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // Token first: a replacement after this point cancels the search.
    let cancel = state.interrupt.token();
    let (last, pow) = {
        let ledger = state.ledger.read().expect("ledger lock poisoned");
        (ledger.last_block().clone(), ledger.pow())
    };
    let mined_on = last.hash();
    debug!(
        "MINER - searching proof on block #{} (difficulty={})",
        last.index,
        pow.difficulty()
    );

    let t0 = Instant::now();
    let proof = web::block(move || pow.find_proof(&last, &cancel))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .inspect_err(|e| warn!("MINER - {e} after {} ms", t0.elapsed().as_millis()))?;

    let block = {
        let mut ledger = state.ledger.write().expect("ledger lock poisoned");
        let reward = Transaction::reward(state.node_id.as_str(), MINING_REWARD);
        ledger
            .seal_mined(&mined_on, proof, reward)
            .inspect_err(|e| warn!("MINER - {e}"))?
            .clone()
    };

    info!(
        "MINER - forged block #{} (proof={}, {} ms)",
        block.index,
        block.proof,
        t0.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New block forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}
