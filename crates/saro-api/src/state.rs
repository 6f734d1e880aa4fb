//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Every collection lives in process memory and resets on restart:
//!
//! - **Documents**: regulatory documents ingested through MVP1
//! - **Audits**: model audits from MVP2
//! - **Tenants**: enterprise tenants created through MVP3
//! - **Runs / Reports / Uploads**: agent pipeline output
//! - **Policies / Feeds**: the policy library and regulatory feed log
//! - **Listings / Transactions**: marketplace state
//! - **Bot jobs**: remediation bot actions
//!
//! Seeded demo collections are filled lazily on first access through
//! [`Store::ensure_seeded`], so seeded records always precede records
//! created by requests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::{Mutex, Once, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use saro_core::{ComplianceStatus, RiskLevel};
use saro_rules::audit::Finding;
use saro_rules::benchmark::{BenchmarkSummary, ChecklistItem};
use saro_rules::ingestion::RiskTag;
use saro_rules::policy_library::ReviewStatus;
use saro_rules::{AgentRun, AuditReport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::middleware::metrics::ApiMetrics;

// -- Insertion-Ordered In-Memory Store ----------------------------------------

struct Inner<T> {
    order: Vec<String>,
    map: HashMap<String, T>,
}

/// Thread-safe, cloneable in-memory key-value store that remembers
/// insertion order.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// Records are never evicted.
pub struct Store<T: Clone + Send + Sync> {
    inner: Arc<RwLock<Inner<T>>>,
    seeded: Arc<Once>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            seeded: Arc::clone(&self.seeded),
        }
    }
}

impl<T: Clone + Send + Sync> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("len", &self.len()).finish()
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                order: Vec::new(),
                map: HashMap::new(),
            })),
            seeded: Arc::new(Once::new()),
        }
    }

    /// Insert a record. Re-inserting an existing key replaces the value and
    /// keeps its original position.
    pub fn insert(&self, id: impl Into<String>, value: T) -> Option<T> {
        let id = id.into();
        let mut guard = self.inner.write();
        let previous = guard.map.insert(id.clone(), value);
        if previous.is_none() {
            guard.order.push(id);
        }
        previous
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &str) -> Option<T> {
        self.inner.read().map.get(id).cloned()
    }

    /// List all records in insertion order.
    pub fn list(&self) -> Vec<T> {
        let guard = self.inner.read();
        guard
            .order
            .iter()
            .filter_map(|id| guard.map.get(id).cloned())
            .collect()
    }

    /// The `n` most recently inserted records, oldest first. `n == 0` yields all records.
    pub fn last(&self, n: usize) -> Vec<T> {
        let guard = self.inner.read();
        let start = match n {
            0 => 0,
            n => guard.order.len().saturating_sub(n),
        };
        guard.order[start..]
            .iter()
            .filter_map(|id| guard.map.get(id).cloned())
            .collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.inner.write();
        let entry = guard.map.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `seed` exactly once for the lifetime of the store and insert the
    /// records it returns.
    ///
    /// Concurrent callers block until seeding completes, so records inserted
    /// after this call always follow the seed records.
    pub fn ensure_seeded(&self, seed: impl FnOnce() -> Vec<(String, T)>) {
        self.seeded.call_once(|| {
            for (id, value) in seed() {
                self.insert(id, value);
            }
        });
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Activity Log --------------------------------------------------------------

/// One entry in the append-only activity log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntry {
    pub id: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of ingestion, audit and pipeline-run events.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl ActivityLog {
    /// Append an event.
    pub fn record(&self, id: impl Into<String>, action: &str, details: impl Into<String>) {
        self.entries.write().push(ActivityEntry {
            id: id.into(),
            action: action.to_string(),
            details: details.into(),
            timestamp: saro_core::now(),
        });
    }

    /// The `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ActivityEntry> {
        let guard = self.entries.read();
        let start = guard.len().saturating_sub(n);
        guard[start..].to_vec()
    }

    /// Total number of entries ever recorded.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Record Types -------------------------------------------------------------

/// A regulatory document ingested through MVP1.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub content_summary: String,
    pub entities: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub risk_tags: Vec<RiskTag>,
    pub jurisdiction: String,
    pub ingested_at: DateTime<Utc>,
    pub risk_score: f64,
}

/// A completed model audit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditRecord {
    pub audit_id: String,
    pub model_name: String,
    #[schema(value_type = String)]
    pub overall_risk: RiskLevel,
    pub compliance_score: f64,
    #[schema(value_type = Vec<Object>)]
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub applicable_regulations: Vec<String>,
    #[schema(value_type = String)]
    pub status: ComplianceStatus,
    pub generated_at: DateTime<Utc>,
    pub next_review_date: String,
}

/// Monthly usage counters, also used for plan limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsageCounters {
    pub api_calls: u64,
    pub audits: u64,
    pub reports: u64,
}

/// An enterprise tenant. Usage is reported, never enforced.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantRecord {
    pub tenant_id: String,
    pub name: String,
    pub plan: String,
    pub api_key: String,
    pub status: String,
    pub industry: String,
    pub jurisdictions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub monthly_usage: UsageCounters,
    pub limits: UsageCounters,
}

/// A model output evaluated against a policy benchmark.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadRecord {
    pub upload_id: String,
    pub model_name: String,
    pub policy: String,
    pub domain: String,
    pub input_type: String,
    #[schema(value_type = Vec<Object>)]
    pub checklist: Vec<ChecklistItem>,
    #[schema(value_type = Object)]
    pub summary: BenchmarkSummary,
    pub policy_applied: String,
    pub benchmark_source: String,
    pub uploaded_at: DateTime<Utc>,
    pub agent_processed: bool,
}

/// A document in the policy library.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PolicyRecord {
    pub policy_id: String,
    pub title: String,
    pub source: String,
    pub jurisdiction: String,
    pub regulation: String,
    pub doc_type: String,
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub risk_tags: Vec<RiskTag>,
    pub entities: Vec<String>,
    #[schema(value_type = String)]
    pub status: ReviewStatus,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
    pub ingested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_notes: Option<String>,
}

/// An item in the regulatory feed log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedRecord {
    pub feed_id: String,
    pub feed: String,
    pub jurisdiction: String,
    pub regulation: String,
    pub headline: String,
    #[schema(value_type = String)]
    pub status: ReviewStatus,
    pub is_new: bool,
    #[schema(value_type = String)]
    pub impact: RiskLevel,
    pub fetched_at: DateTime<Utc>,
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

/// A model listed on the compliance marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingRecord {
    pub listing_id: String,
    pub name: String,
    pub vendor: String,
    pub category: String,
    pub price_usd: f64,
    pub compliance_score: f64,
    pub jurisdictions: Vec<String>,
    pub saro_stamp: bool,
    pub tx_hash: String,
    pub block_number: u64,
    pub listed_at: DateTime<Utc>,
    pub downloads: u32,
    pub rating: f64,
}

/// A marketplace purchase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub listing_id: String,
    pub model_name: String,
    pub buyer_id: String,
    pub amount_usd: f64,
    pub tx_hash: String,
    pub block_number: u64,
    pub confirmed: bool,
    pub saro_stamp_transferred: bool,
    pub purchase_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// A remediation bot action, seeded or executed on request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BotJobRecord {
    pub job_id: String,
    pub bot_type: String,
    pub bot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding_id: Option<String>,
    pub status: String,
    pub action_taken: String,
    pub execution_time_ms: u64,
    pub reversible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_token: Option<String>,
    pub logged_to_chain: bool,
    pub completed_at: DateTime<Utc>,
}

// -- Application State --------------------------------------------------------

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub documents: Store<DocumentRecord>,
    pub audits: Store<AuditRecord>,
    pub tenants: Store<TenantRecord>,
    pub runs: Store<AgentRun>,
    pub reports: Store<AuditReport>,
    pub uploads: Store<UploadRecord>,
    pub policies: Store<PolicyRecord>,
    pub feeds: Store<FeedRecord>,
    pub listings: Store<ListingRecord>,
    pub transactions: Store<TransactionRecord>,
    pub bot_jobs: Store<BotJobRecord>,
    pub activity: ActivityLog,
    /// In-process request counters, shared with the metrics middleware.
    pub metrics: ApiMetrics,
    /// Prometheus exposition handle, present when the exporter is installed.
    pub prometheus: Option<PrometheusHandle>,
    rng: Arc<Mutex<StdRng>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("documents", &self.documents)
            .field("audits", &self.audits)
            .field("runs", &self.runs)
            .field("activity", &self.activity.len())
            .field("prometheus", &self.prometheus.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create application state with the given configuration.
    ///
    /// The random generator is seeded from `config.rng_seed` when set,
    /// otherwise from OS entropy.
    pub fn with_config(config: AppConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            documents: Store::new(),
            audits: Store::new(),
            tenants: Store::new(),
            runs: Store::new(),
            reports: Store::new(),
            uploads: Store::new(),
            policies: Store::new(),
            feeds: Store::new(),
            listings: Store::new(),
            transactions: Store::new(),
            bot_jobs: Store::new(),
            activity: ActivityLog::default(),
            metrics: ApiMetrics::new(),
            prometheus: None,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Run `f` with exclusive access to the shared random generator.
    ///
    /// The closure is synchronous, so the lock can never be held across an
    /// `.await`.
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keeps_insertion_order() {
        let store: Store<u32> = Store::new();
        for (i, id) in ["c", "a", "b"].iter().enumerate() {
            store.insert(*id, i as u32);
        }
        assert_eq!(store.list(), vec![0, 1, 2]);
        assert_eq!(store.last(2), vec![1, 2]);
        assert_eq!(store.last(10).len(), 3);
        assert_eq!(store.last(0), vec![0, 1, 2]);
        assert_eq!(store.get("a"), Some(1));
        assert!(store.get("z").is_none());
    }

    #[test]
    fn reinsert_keeps_position() {
        let store: Store<&str> = Store::new();
        store.insert("x", "first");
        store.insert("y", "second");
        assert_eq!(store.insert("x", "replaced"), Some("first"));
        assert_eq!(store.list(), vec!["replaced", "second"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_patches_in_place() {
        let store: Store<u32> = Store::new();
        store.insert("k", 1);
        assert_eq!(store.update("k", |v| *v += 41), Some(42));
        assert_eq!(store.update("missing", |v| *v += 1), None);
    }

    #[test]
    fn seeding_runs_once_and_precedes_inserts() {
        let store: Store<u32> = Store::new();
        store.ensure_seeded(|| vec![("s1".into(), 1), ("s2".into(), 2)]);
        store.insert("u1", 3);
        store.ensure_seeded(|| vec![("s3".into(), 99)]);
        assert_eq!(store.list(), vec![1, 2, 3]);
    }

    #[test]
    fn clones_share_data() {
        let a: Store<u32> = Store::new();
        let b = a.clone();
        a.insert("k", 7);
        assert_eq!(b.get("k"), Some(7));
        assert!(!b.is_empty());
    }

    #[test]
    fn activity_log_returns_recent_tail() {
        let log = ActivityLog::default();
        for i in 0..25 {
            log.record(format!("id-{i}"), "document_ingested", "doc");
        }
        let recent = log.recent(20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].id, "id-5");
        assert_eq!(log.len(), 25);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = AppConfig {
            rng_seed: Some(7),
            ..AppConfig::default()
        };
        let a = AppState::with_config(config.clone());
        let b = AppState::with_config(config);
        let x: u64 = a.with_rng(|rng| rng.gen());
        let y: u64 = b.with_rng(|rng| rng.gen());
        assert_eq!(x, y);
    }
}
