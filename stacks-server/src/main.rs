use axum::{
    extract::{Query, RawQuery, State},
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use stacks_core::catalog::{Catalog, CatalogEntry};
use stacks_core::contributors::{filter_contributors, list_contributors};
use stacks_core::loader::{self, DirCatalogSource};
use stacks_core::pagination::paginate;
use stacks_core::query::{evaluate, QueryState};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

/// stacks-server — serves a static book catalog directory plus a small
/// query API over it (search, sort, contributor filter, pagination).
#[derive(Parser)]
#[command(name = "stacks-server")]
struct Args {
    /// Path to the catalog directory (contains db.json and books/).
    #[arg(long, env = "STACKS_CATALOG_PATH")]
    catalog_path: PathBuf,

    /// Port to listen on.
    #[arg(long, default_value = "8080", env = "STACKS_PORT")]
    port: u16,

    /// Address to bind the server to.
    #[arg(long, default_value = "0.0.0.0", env = "STACKS_BIND")]
    bind: String,
}

fn configure_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    contributors: Arc<Vec<String>>,
}

#[derive(Serialize)]
struct BookItem {
    id: String,
    #[serde(flatten)]
    entry: CatalogEntry,
}

#[derive(Serialize)]
struct BooksResponse {
    items: Vec<BookItem>,
    #[serde(rename = "totalPages")]
    total_pages: usize,
    #[serde(rename = "currentGroup")]
    current_group: Option<String>,
    #[serde(rename = "groupLabels")]
    group_labels: Vec<String>,
    page: usize,
}

#[tokio::main]
async fn main() {
    configure_logging();
    let args = Args::parse();

    info!("stacks-server starting");

    if !args.catalog_path.is_dir() {
        error!(
            "Catalog directory not found at {}",
            args.catalog_path.display()
        );
        error!("Provide a directory containing db.json and books/");
        std::process::exit(1);
    }

    // Load the catalog once at startup; it is immutable for the process
    // lifetime, matching the once-per-session load of the index view.
    let source = DirCatalogSource::new(&args.catalog_path);
    let catalog = loader::load(&source).await.unwrap_or_else(|e| {
        error!("Failed to load catalog: {e}");
        std::process::exit(1);
    });
    let contributors = list_contributors(&catalog);
    info!(
        "Serving {} books from {} contributor(s)",
        catalog.len(),
        contributors.len()
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        contributors: Arc::new(contributors),
    };

    let app = Router::new()
        .route("/api/books", get(list_books))
        .route("/api/contributors", get(list_contributor_names))
        .with_state(state)
        .fallback_service(ServeDir::new(&args.catalog_path))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", args.bind, args.port);
    info!("Binding to {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        });

    info!("stacks-server listening on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// `/api/books?search=&sort=&contributors=a,b&page=N` — the evaluated,
/// paginated index list. The query string is the same encoding the view
/// state store uses, so a restored URL replays exactly.
async fn list_books(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<BooksResponse> {
    let query_state = QueryState::from_query_string(query.as_deref().unwrap_or(""));
    debug!(
        "Listing books: search={:?} sort={} page={}",
        query_state.search_text, query_state.sort_mode, query_state.page
    );

    let rows = evaluate(&state.catalog, &query_state);
    let page = paginate(&rows, &query_state);

    Json(BooksResponse {
        page: query_state.page.clamp(1, page.total_pages),
        items: page
            .items
            .into_iter()
            .map(|(id, entry)| BookItem { id, entry })
            .collect(),
        total_pages: page.total_pages,
        current_group: page.current_group,
        group_labels: page.group_labels,
    })
}

#[derive(Deserialize)]
struct ContributorParams {
    #[serde(default)]
    q: String,
}

/// `/api/contributors?q=` — the distinct contributor names, optionally
/// narrowed by a case-insensitive substring.
async fn list_contributor_names(
    State(state): State<AppState>,
    Query(params): Query<ContributorParams>,
) -> Json<Vec<String>> {
    Json(filter_contributors(&state.contributors, &params.q))
}
