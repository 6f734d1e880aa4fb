//! # MVP5: Compliance-Stamped Model Marketplace
//!
//! Listings carry a SARO compliance stamp anchored by a synthetic ledger
//! transaction. Purchases transfer the stamp along with the model.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::Rng;
use saro_core::{hex_hash, round_to, uniform, IdPrefix, RecordId};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::{all, matches_filter};
use crate::state::{AppState, ListingRecord, TransactionRecord};

/// (name, vendor, category, price, compliance score, jurisdictions, stamped)
type SampleListing = (&'static str, &'static str, &'static str, f64, f64, &'static [&'static str], bool);

const SAMPLE_LISTINGS: [SampleListing; 5] = [
    ("CreditScorer-v3", "FinServ AI", "finance", 12_000.0, 0.94, &["EU", "US"], true),
    ("HRScreener-Pro", "TalentAI Ltd", "hr", 8_500.0, 0.88, &["US", "UK"], true),
    ("DiagnosticAI-CE", "MedTech Corp", "healthcare", 45_000.0, 0.97, &["EU", "US", "UK"], true),
    ("FraudDetect-v4", "SecureAI", "finance", 15_000.0, 0.91, &["GLOBAL"], true),
    ("SentimentEngine-v2", "NLP Labs", "nlp", 3_200.0, 0.82, &["EU"], false),
];

/// Hex digits in a listing stamp hash.
const LISTING_HASH_LEN: usize = 40;
/// Hex digits in a purchase transaction hash.
const PURCHASE_HASH_LEN: usize = 64;

fn block_number<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(19_000_000..=20_000_000)
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default = "all")]
    pub category: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NewListingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub jurisdictions: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the marketplace router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp5/marketplace/listings", get(list_marketplace))
        .route("/api/v1/mvp5/marketplace/purchase", post(purchase_model))
        .route("/api/v1/mvp5/marketplace/list", post(list_model))
        .route("/api/v1/mvp5/marketplace/stats", get(marketplace_stats))
        .route("/api/v1/mvp5/marketplace/verify/{tx_hash}", get(verify_on_chain))
}

fn seed_listings(state: &AppState) {
    state.listings.ensure_seeded(|| {
        let now = saro_core::now();
        state.with_rng(|rng| {
            SAMPLE_LISTINGS
                .iter()
                .map(|&(name, vendor, category, price, score, jurisdictions, stamp)| {
                    let listing_id = RecordId::generate(IdPrefix::Listing).into_string();
                    let record = ListingRecord {
                        listing_id: listing_id.clone(),
                        name: name.to_string(),
                        vendor: vendor.to_string(),
                        category: category.to_string(),
                        price_usd: price,
                        compliance_score: score,
                        jurisdictions: jurisdictions.iter().map(|j| j.to_string()).collect(),
                        saro_stamp: stamp,
                        tx_hash: hex_hash(rng, LISTING_HASH_LEN),
                        block_number: block_number(rng),
                        listed_at: now - chrono::Duration::days(rng.gen_range(1..=30)),
                        downloads: rng.gen_range(10..=340),
                        rating: round_to(uniform(rng, 3.8, 5.0), 1),
                    };
                    (listing_id, record)
                })
                .collect()
        })
    });
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/mvp5/marketplace/listings - Listings, optionally by category.
async fn list_marketplace(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<Value> {
    seed_listings(&state);
    let listings: Vec<ListingRecord> = state
        .listings
        .list()
        .into_iter()
        .filter(|l| matches_filter(&query.category, &l.category))
        .collect();
    let verified = listings.iter().filter(|l| l.saro_stamp).count();
    Json(json!({
        "total": listings.len(),
        "saro_verified": verified,
        "listings": listings,
    }))
}

/// POST /api/v1/mvp5/marketplace/purchase - Buy a listed model.
///
/// An unknown or missing `listing_id` buys the first listing.
#[utoipa::path(
    post,
    path = "/api/v1/mvp5/marketplace/purchase",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase confirmed on chain", body = TransactionRecord),
    ),
    tag = "mvp5"
)]
pub(crate) async fn purchase_model(
    State(state): State<AppState>,
    body: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<TransactionRecord>, AppError> {
    let req = extract_json(body)?;
    seed_listings(&state);

    let listing = match req.listing_id.as_deref().and_then(|id| state.listings.get(id)) {
        Some(listing) => listing,
        None => {
            tracing::warn!(listing_id = ?req.listing_id, "unknown listing, defaulting to first");
            state
                .listings
                .list()
                .into_iter()
                .next()
                .ok_or_else(|| AppError::not_found("Listing"))?
        }
    };

    let transaction_id = RecordId::generate(IdPrefix::Transaction).into_string();
    let (tx_hash, block, purchase_ms) = state.with_rng(|rng| {
        (
            hex_hash(rng, PURCHASE_HASH_LEN),
            block_number(rng),
            round_to(uniform(rng, 800.0, 2400.0), 0) as u64,
        )
    });
    let tx = TransactionRecord {
        transaction_id: transaction_id.clone(),
        listing_id: listing.listing_id,
        model_name: listing.name,
        buyer_id: req.tenant_id.unwrap_or_else(|| "TENANT-001".to_string()),
        amount_usd: listing.price_usd,
        tx_hash,
        block_number: block,
        confirmed: true,
        saro_stamp_transferred: listing.saro_stamp,
        purchase_time_ms: purchase_ms,
        completed_at: saro_core::now(),
    };
    state.transactions.insert(transaction_id.clone(), tx.clone());
    tracing::info!(transaction_id = %transaction_id, model = %tx.model_name, "marketplace purchase");
    Ok(Json(tx))
}

/// POST /api/v1/mvp5/marketplace/list - List a new model with a fresh stamp.
async fn list_model(
    State(state): State<AppState>,
    body: Result<Json<NewListingRequest>, JsonRejection>,
) -> Result<Json<ListingRecord>, AppError> {
    let req = extract_json(body)?;
    seed_listings(&state);

    let listing_id = RecordId::generate(IdPrefix::Listing).into_string();
    let (score, tx_hash, block) = state.with_rng(|rng| {
        (
            round_to(uniform(rng, 0.75, 0.97), 2),
            hex_hash(rng, LISTING_HASH_LEN),
            block_number(rng),
        )
    });
    let listing = ListingRecord {
        listing_id: listing_id.clone(),
        name: req.name.unwrap_or_else(|| "New Model".to_string()),
        vendor: req.vendor.unwrap_or_else(|| "Unknown".to_string()),
        category: req.category.unwrap_or_else(|| "general".to_string()),
        price_usd: req.price_usd.unwrap_or(5000.0),
        compliance_score: score,
        jurisdictions: req.jurisdictions.unwrap_or_else(|| vec!["EU".to_string()]),
        saro_stamp: true,
        tx_hash,
        block_number: block,
        listed_at: saro_core::now(),
        downloads: 0,
        rating: 0.0,
    };
    state.listings.insert(listing_id.clone(), listing.clone());
    tracing::info!(listing_id = %listing_id, name = %listing.name, "model listed");
    Ok(Json(listing))
}

/// GET /api/v1/mvp5/marketplace/stats - Marketplace totals.
async fn marketplace_stats(State(state): State<AppState>) -> Json<Value> {
    seed_listings(&state);
    let listings = state.listings.list();
    let verified = listings.iter().filter(|l| l.saro_stamp).count();
    let avg_score = if listings.is_empty() {
        0.0
    } else {
        listings.iter().map(|l| l.compliance_score).sum::<f64>() / listings.len() as f64
    };
    Json(json!({
        "total_listings": listings.len(),
        "saro_verified": verified,
        "total_volume_usd": 2_840_000,
        "transactions_today": 34 + state.transactions.len(),
        "avg_compliance_score": round_to(avg_score, 2),
        "top_categories": ["finance", "healthcare", "hr"],
        "partner_vendors": 12,
    }))
}

/// GET /api/v1/mvp5/marketplace/verify/{tx_hash} - Verify a ledger transaction.
async fn verify_on_chain(State(state): State<AppState>, Path(tx_hash): Path<String>) -> Json<Value> {
    let (block, confirmations) =
        state.with_rng(|rng| (block_number(rng), rng.gen_range(12..=200u32)));
    Json(json!({
        "tx_hash": tx_hash,
        "verified": true,
        "blockchain": "Polygon",
        "block_number": block,
        "confirmations": confirmations,
        "integrity": "intact",
        "saro_stamp_valid": true,
        "verified_at": saro_core::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{get_json, post_json};

    fn app(state: &AppState) -> Router {
        router().with_state(state.clone())
    }

    #[tokio::test]
    async fn listings_seeded_and_filtered() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp5/marketplace/listings").await;
        assert_eq!(body["total"], 5);
        assert_eq!(body["saro_verified"], 4);
        let hash = body["listings"][0]["tx_hash"].as_str().unwrap();
        assert_eq!(hash.len(), 2 + LISTING_HASH_LEN);

        let (_, finance) = get_json(app(&state), "/api/v1/mvp5/marketplace/listings?category=finance").await;
        assert_eq!(finance["total"], 2);
    }

    #[tokio::test]
    async fn purchase_known_listing() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp5/marketplace/listings").await;
        let target = &body["listings"][2];
        let (_, tx) = post_json(
            app(&state),
            "/api/v1/mvp5/marketplace/purchase",
            json!({ "listing_id": target["listing_id"], "tenant_id": "TEN-X" }),
        )
        .await;
        assert_eq!(tx["model_name"], "DiagnosticAI-CE");
        assert_eq!(tx["amount_usd"], 45000.0);
        assert_eq!(tx["buyer_id"], "TEN-X");
        assert!(tx["transaction_id"].as_str().unwrap().starts_with("TXN-"));
        assert_eq!(state.transactions.len(), 1);
    }

    #[tokio::test]
    async fn purchase_unknown_listing_falls_back_to_first() {
        let state = AppState::new();
        let (_, tx) = post_json(app(&state), "/api/v1/mvp5/marketplace/purchase", json!({})).await;
        assert_eq!(tx["model_name"], "CreditScorer-v3");
        assert_eq!(tx["buyer_id"], "TENANT-001");
        assert_eq!(tx["saro_stamp_transferred"], true);
    }

    #[tokio::test]
    async fn new_listing_follows_seeded() {
        let state = AppState::new();
        let (_, listing) = post_json(app(&state), "/api/v1/mvp5/marketplace/list", json!({ "name": "Mine" })).await;
        assert_eq!(listing["category"], "general");
        assert_eq!(listing["downloads"], 0);
        let (_, stats) = get_json(app(&state), "/api/v1/mvp5/marketplace/stats").await;
        assert_eq!(stats["total_listings"], 6);
        assert_eq!(stats["saro_verified"], 5);
    }

    #[tokio::test]
    async fn verify_echoes_hash() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp5/marketplace/verify/0xabc").await;
        assert_eq!(body["tx_hash"], "0xabc");
        assert_eq!(body["blockchain"], "Polygon");
    }
}
