//! Application startup and lifecycle management.
//!
//! Builds the shared state (MongoDB connection, core services), binds the
//! listener, and assembles the REST router.

use crate::config::AccountingConfig;
use crate::handlers::{
    commission_rules, commissions, customers, executives, health, journal_vouchers,
    ledger_accounts, ledgers, payments, plots, projects,
};
use crate::services::{CommissionEngine, JournalService, LedgerService, MongoDb};
use axum::{
    routing::{delete, get, post},
    Router,
};
use backoffice_core::error::AppError;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AccountingConfig,
    pub db: MongoDb,
    pub ledger: LedgerService,
    pub commissions: CommissionEngine,
    pub journal: JournalService,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AccountingConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let ledger = LedgerService::new(db.clone());
        let commissions = CommissionEngine::new(db.clone());
        let journal = JournalService::new(db.clone(), ledger.clone());

        let state = AppState {
            config: config.clone(),
            db,
            ledger,
            commissions,
            journal,
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Accounting service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    /// Get the application state.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

/// Assemble the full route table.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(projects::get_project).patch(projects::update_project),
        )
        .route("/plots", post(plots::create_plot).get(plots::list_plots))
        .route(
            "/plots/:id",
            get(plots::get_plot).patch(plots::update_plot),
        )
        .route(
            "/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer).patch(customers::update_customer),
        )
        .route(
            "/executives",
            post(executives::create_executive).get(executives::list_executives),
        )
        .route("/executives/:id", get(executives::get_executive))
        .route(
            "/payments",
            post(payments::record_payment).get(payments::list_payments),
        )
        .route("/payments/:id", get(payments::get_payment))
        .route("/payments/:id/reverse", post(payments::reverse_payment))
        .route(
            "/ledger-accounts",
            post(ledger_accounts::create_ledger_account).get(ledger_accounts::list_ledger_accounts),
        )
        .route("/ledgers", post(ledgers::create_ledger_entry))
        .route("/ledgers/:id", delete(ledgers::delete_ledger_entry))
        .route(
            "/ledgers/:party_type/:party_id",
            get(ledgers::get_party_ledger),
        )
        .route(
            "/commission-rules",
            post(commission_rules::create_commission_rule)
                .get(commission_rules::list_commission_rules),
        )
        .route(
            "/commission-rules/:id",
            get(commission_rules::get_commission_rule)
                .patch(commission_rules::update_commission_rule),
        )
        .route(
            "/commissions/:executive_id",
            get(commissions::get_executive_commissions),
        )
        .route(
            "/commissions/:executive_id/payouts",
            post(commissions::pay_commission),
        )
        .route(
            "/journal-vouchers",
            post(journal_vouchers::create_journal_voucher)
                .get(journal_vouchers::list_journal_vouchers),
        )
        .route(
            "/journal-vouchers/:id",
            get(journal_vouchers::get_journal_voucher)
                .delete(journal_vouchers::delete_journal_voucher),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
