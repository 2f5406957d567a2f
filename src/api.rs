// 🌐 JSON API - read-only dashboard endpoints
//
// Every request recomputes its view from the shared store; nothing is cached
// and nothing is written.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::company::Company;
use crate::filter::{self, CategoryFilter, DateRange, Selection};
use crate::report::{DashboardReport, ReportOptions};
use crate::rules::{Classification, RuleEngine};
use crate::source::TransactionStore;
use crate::taxonomy::{CategoryAssignment, ParentCategory};
use crate::transaction::{parse_date, Transaction, TransactionType};

// ============================================================================
// STATE
// ============================================================================

/// Shared, immutable application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

#[derive(Clone)]
struct Shared {
    store: TransactionStore,
    engine: RuleEngine,
    options: ReportOptions,
    default_company: Company,
    /// Fixed "today" for the daily window; the local date when None
    today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(store: TransactionStore, engine: RuleEngine, options: ReportOptions) -> Self {
        AppState {
            inner: Arc::new(Shared {
                store,
                engine,
                options,
                default_company: Company::default(),
                today: None,
            }),
        }
    }

    /// Builder pattern: set the company used when a request names none
    pub fn with_default_company(self, company: Company) -> Self {
        self.map_shared(|shared| shared.default_company = company)
    }

    /// Builder pattern: pin the daily window end date
    pub fn with_today(self, today: Option<NaiveDate>) -> Self {
        self.map_shared(|shared| shared.today = today)
    }

    fn map_shared(self, f: impl FnOnce(&mut Shared)) -> Self {
        let mut shared = Arc::try_unwrap(self.inner).unwrap_or_else(|arc| (*arc).clone());
        f(&mut shared);
        AppState {
            inner: Arc::new(shared),
        }
    }

    fn today(&self) -> NaiveDate {
        self.inner
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Rejected query parameters
#[derive(Debug)]
pub struct BadRequest(String);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected request: {}", self.0);
        (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::err(self.0))).into_response()
    }
}

impl From<crate::error::LedgerError> for BadRequest {
    fn from(e: crate::error::LedgerError) -> Self {
        BadRequest(e.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub transactions: usize,
}

#[derive(Debug, Serialize)]
pub struct CompanyInfo {
    pub name: &'static str,
    pub code: &'static str,
    pub logo: &'static str,
    pub color: &'static str,
    pub transaction_count: usize,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyEntry {
    pub parent: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub subcategories: &'static [&'static str],
}

// ============================================================================
// QUERIES
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub company: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub company: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub parent: Option<String>,
    pub subcategory: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassifyQuery {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Accepts `DD/MM/YYYY` or ISO `YYYY-MM-DD`
fn parse_query_date(text: &str) -> Result<NaiveDate, BadRequest> {
    parse_date(text)
        .or_else(|_| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d"))
        .map_err(|_| BadRequest(format!("Invalid date: {}", text)))
}

fn selection_from(
    state: &AppState,
    company: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Selection, BadRequest> {
    let company = company
        .map(Company::resolve)
        .unwrap_or(state.inner.default_company);

    let start = from.map(parse_query_date).transpose()?;
    let end = to.map(parse_query_date).transpose()?;

    Ok(Selection {
        company,
        date_range: DateRange::from_bounds(start, end)?,
    })
}

fn category_filter_from(
    parent: Option<&str>,
    subcategory: Option<&str>,
) -> Result<Option<CategoryFilter>, BadRequest> {
    match (parent, subcategory) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(BadRequest("subcategory requires a parent".to_string())),
        (Some(parent), sub) => {
            let parent: ParentCategory = parent.parse()?;
            if let Some(sub) = sub {
                CategoryAssignment::new(parent, sub)?;
            }
            Ok(Some(CategoryFilter {
                parent,
                subcategory: sub.map(|s| s.trim().to_string()),
            }))
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/health
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(Health {
        status: "OK",
        version: crate::VERSION,
        transactions: state.inner.store.len(),
    }))
}

/// GET /api/companies
async fn get_companies(State(state): State<AppState>) -> impl IntoResponse {
    let companies: Vec<CompanyInfo> = Company::ALL
        .into_iter()
        .map(|company| CompanyInfo {
            name: company.name(),
            code: company.code(),
            logo: company.logo(),
            color: company.primary_color(),
            transaction_count: state
                .inner
                .store
                .transactions()
                .iter()
                .filter(|tx| tx.company() == company)
                .count(),
        })
        .collect();

    Json(ApiResponse::ok(companies))
}

/// GET /api/taxonomy
async fn get_taxonomy() -> impl IntoResponse {
    let entries: Vec<TaxonomyEntry> = ParentCategory::ALL
        .into_iter()
        .map(|parent| TaxonomyEntry {
            parent: parent.label(),
            icon: parent.icon(),
            color: parent.color(),
            subcategories: parent.subcategories(),
        })
        .collect();

    Json(ApiResponse::ok(entries))
}

/// GET /api/transactions?company&from&to&parent&subcategory
async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, BadRequest> {
    let selection = selection_from(
        &state,
        query.company.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    )?;
    let category = category_filter_from(query.parent.as_deref(), query.subcategory.as_deref())?;

    let mut transactions: Vec<Transaction> = filter::apply(state.inner.store.transactions(), &selection)
        .into_iter()
        .map(|tx| tx.ensure_categorized(&state.inner.engine))
        .collect();

    if let Some(category) = category {
        transactions = filter::by_category(&transactions, &category);
    }

    Ok(Json(ApiResponse::ok(transactions)))
}

/// GET /api/report?company&from&to
async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<DashboardReport>>, BadRequest> {
    let selection = selection_from(
        &state,
        query.company.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    )?;

    let report = DashboardReport::build(
        state.inner.store.transactions(),
        &selection,
        &state.inner.options,
        &state.inner.engine,
        state.today(),
    );

    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/classify?description&type
async fn classify(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<ApiResponse<Classification>>, BadRequest> {
    let transaction_type: TransactionType = query
        .transaction_type
        .as_deref()
        .ok_or_else(|| BadRequest("missing type".to_string()))?
        .parse()?;

    Ok(Json(ApiResponse::ok(
        state.inner.engine.classify(&query.description, transaction_type),
    )))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/companies", get(get_companies))
        .route("/taxonomy", get(get_taxonomy))
        .route("/transactions", get(get_transactions))
        .route("/report", get(get_report))
        .route("/classify", get(classify))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
