pub mod commission;
pub mod database;
pub mod journal;
pub mod ledger;
pub mod metrics;

pub use commission::{CommissionEngine, CommissionSummary, CommissionTrigger};
pub use database::MongoDb;
pub use journal::{CreateJournalVoucher, JournalService};
pub use ledger::{LedgerService, PostLedgerEntry};
pub use metrics::{get_metrics, init_metrics};
