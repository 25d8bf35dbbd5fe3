use smart_library::{
    adapters::jsonfile::{JsonFileCatalogStore, JsonFileLoanLedger, JsonFileUserStore},
    adapters::postgres::{PgCatalogStore, PgLoanLedger, PgUserStore},
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    domain::loan::LendingPolicy,
    ports::{CatalogStore, LoanLedger, UserStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 環境変数から貸出ポリシーを読み込む
///
/// LOAN_PERIOD_DAYS（デフォルト14）とFINE_PER_DAY（デフォルト1）。
/// 解釈できない値はデフォルトにフォールバックする。
fn policy_from_env() -> LendingPolicy {
    let default = LendingPolicy::default();
    let loan_period_days = std::env::var("LOAN_PERIOD_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default.loan_period_days);
    let fine_per_day = std::env::var("FINE_PER_DAY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default.fine_per_day);
    LendingPolicy {
        loan_period_days,
        fine_per_day,
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smart_library=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let policy = policy_from_env();

    // DATABASE_URLがあればPostgreSQL、なければDATA_DIR配下のJSONファイルに永続化
    let (catalog, users, ledger): (
        Arc<dyn CatalogStore>,
        Arc<dyn UserStore>,
        Arc<dyn LoanLedger>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            tracing::info!("Using PostgreSQL storage");

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            (
                Arc::new(PgCatalogStore::new(pool.clone())),
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgLoanLedger::new(pool)),
            )
        }
        Err(_) => {
            let data_dir =
                PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
            tracing::info!("Using JSON file storage in {}", data_dir.display());

            (
                Arc::new(JsonFileCatalogStore::new(&data_dir)),
                Arc::new(JsonFileUserStore::new(&data_dir)),
                Arc::new(JsonFileLoanLedger::new(&data_dir)),
            )
        }
    };

    // Create service dependencies
    let service_deps = ServiceDependencies::new(catalog, users, ledger, policy);

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
