use actix_web::{HttpResponse, get, web};
use log::{error, info, warn};
use std::time::Instant;

use super::models::{ApiError, AppState, ChainResponse, MineResponse, ValidateResponse};

/// Mine a new block: solve the proof for the current tail and append.
/// The search runs on the blocking pool.
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let t0 = Instant::now();
    let worker_state = state.clone();
    let block = web::block(move || worker_state.blockchain.mine_block())
        .await?
        .map_err(|e| {
            error!("GET /mine_block - failed: {e}");
            e
        })?;

    info!(
        "MINER - sealed block #{} (proof={}) in {} ms",
        block.index,
        block.proof,
        t0.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(MineResponse::from(block)))
}

/// Get the full blockchain.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let chain = state.blockchain.snapshot()?;
    Ok(HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    }))
}

/// Validate the whole chain.
#[get("/is_valid")]
pub async fn is_valid(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let verdict = state.blockchain.verify()?;
    if let Err(fault) = verdict {
        warn!("GET /is_valid - chain rejected: {fault}");
    }
    Ok(HttpResponse::Ok().json(ValidateResponse {
        is_valid: verdict.is_ok(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use crate::api::{AppState, init_routes};
    use crate::blockchain::{CancelToken, SearchBounds};

    #[actix_web::test]
    async fn mine_then_fetch_and_validate() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/mine_block").to_request();
        let mined: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mined["index"], 2);
        assert!(mined["message"].is_string());
        assert!(mined["timestamp"].is_string());
        assert!(mined["proof"].is_u64());
        assert_eq!(mined["previous_hash"].as_str().unwrap().len(), 64);

        let req = test::TestRequest::get().uri("/get_chain").to_request();
        let chain: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chain["length"], 2);
        let blocks = chain["chain"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["index"], 1);
        assert_eq!(blocks[0]["proof"], 1);
        assert_eq!(blocks[0]["previous_hash"], "0");
        assert_eq!(blocks[1], {
            let mut m = mined.clone();
            m.as_object_mut().unwrap().remove("message");
            m
        });

        let req = test::TestRequest::get().uri("/is_valid").to_request();
        let valid: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(valid["is_valid"], true);
    }

    #[actix_web::test]
    async fn fresh_chain_has_genesis_only() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::default()))
                .configure(init_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/get_chain").to_request();
        let chain: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chain["length"], 1);
    }

    #[actix_web::test]
    async fn cancelled_search_maps_to_503() {
        let token = CancelToken::new();
        token.cancel();
        let state = web::Data::new(AppState::new(SearchBounds::unbounded().with_cancel(token)));
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(init_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/mine_block").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 503);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("cancelled"));
        assert_eq!(state.blockchain.len().unwrap(), 1);
    }

    #[actix_web::test]
    async fn health_responds() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::default()))
                .configure(init_routes),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
