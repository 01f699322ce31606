use crate::models::{
    CommissionLedgerEntry, CommissionRule, Counter, Customer, Executive, JournalVoucher,
    LedgerAccount, LedgerEntry, PartyType, PaymentTransaction, Plot, Project,
};
use backoffice_core::error::AppError;
use mongodb::{
    bson::doc, error::ErrorKind, error::WriteFailure, options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};

/// True when the error is a unique-index violation (duplicate key).
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        _ => false,
    }
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for accounting-service");

        // Unique project code
        let project_code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .name("project_code_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.projects().create_index(project_code_index, None).await?;

        // Unique plot number within a project
        let plot_number_index = IndexModel::builder()
            .keys(doc! { "project_id": 1, "plot_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("plot_number_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.plots().create_index(plot_number_index, None).await?;

        // Per-party ledger scans: (party_type, party_id) ordered by date
        let party_ledger_index = IndexModel::builder()
            .keys(doc! { "party_type": 1, "party_id": 1, "transaction_date": -1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("party_ledger_lookup".to_string())
                    .build(),
            )
            .build();
        self.ledgers().create_index(party_ledger_index, None).await?;

        // Unique book account name
        let account_name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("ledger_account_name_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.ledger_accounts()
            .create_index(account_name_index, None)
            .await?;

        // Unique commission rule name
        let rule_name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("commission_rule_name_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.commission_rules()
            .create_index(rule_name_index, None)
            .await?;

        // Payout scans: earned entries per executive, oldest first
        let commission_payout_index = IndexModel::builder()
            .keys(doc! { "executive_id": 1, "status": 1, "generated_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("commission_payout_scan".to_string())
                    .build(),
            )
            .build();
        self.commission_ledgers()
            .create_index(commission_payout_index, None)
            .await?;

        // Unique voucher number
        let jv_number_index = IndexModel::builder()
            .keys(doc! { "jv_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("jv_number_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.journal_vouchers()
            .create_index(jv_number_index, None)
            .await?;

        // Customer payment history
        let transaction_customer_index = IndexModel::builder()
            .keys(doc! { "customer_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("transaction_customer_lookup".to_string())
                    .build(),
            )
            .build();
        self.transactions()
            .create_index(transaction_customer_index, None)
            .await?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn projects(&self) -> Collection<Project> {
        self.db.collection("projects")
    }

    pub fn plots(&self) -> Collection<Plot> {
        self.db.collection("plots")
    }

    pub fn customers(&self) -> Collection<Customer> {
        self.db.collection("customers")
    }

    pub fn executives(&self) -> Collection<Executive> {
        self.db.collection("executives")
    }

    pub fn transactions(&self) -> Collection<PaymentTransaction> {
        self.db.collection("transactions")
    }

    pub fn ledgers(&self) -> Collection<LedgerEntry> {
        self.db.collection("ledgers")
    }

    pub fn ledger_accounts(&self) -> Collection<LedgerAccount> {
        self.db.collection("ledger_accounts")
    }

    pub fn commission_rules(&self) -> Collection<CommissionRule> {
        self.db.collection("commission_rules")
    }

    pub fn commission_ledgers(&self) -> Collection<CommissionLedgerEntry> {
        self.db.collection("commission_ledgers")
    }

    pub fn journal_vouchers(&self) -> Collection<JournalVoucher> {
        self.db.collection("journal_vouchers")
    }

    pub fn counters(&self) -> Collection<Counter> {
        self.db.collection("counters")
    }

    /// Whether the ledger party behind (party_type, party_id) exists.
    pub async fn party_exists(
        &self,
        party_type: PartyType,
        party_id: &str,
    ) -> Result<bool, AppError> {
        let filter = doc! { "_id": party_id };
        let found = match party_type {
            PartyType::Customer => self.customers().find_one(filter, None).await?.is_some(),
            PartyType::Executive => self.executives().find_one(filter, None).await?.is_some(),
            PartyType::LedgerAccount => {
                self.ledger_accounts().find_one(filter, None).await?.is_some()
            }
        };
        Ok(found)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
