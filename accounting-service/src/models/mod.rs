pub mod commission;
pub mod customer;
pub mod executive;
pub mod journal_voucher;
pub mod ledger_account;
pub mod ledger_entry;
pub mod money;
pub mod plot;
pub mod project;
pub mod transaction;

pub use commission::{
    CommissionBasis, CommissionLedgerEntry, CommissionRule, CommissionStatus, RuleKind, RuleScope,
    TriggerEvent,
};
pub use customer::Customer;
pub use executive::{Executive, ExecutiveRole};
pub use journal_voucher::{Counter, JournalVoucher, VoucherSide};
pub use ledger_account::{AccountType, LedgerAccount};
pub use ledger_entry::{LedgerEntry, PartyType, ReferenceType};
pub use plot::{Plot, PlotStatus};
pub use project::Project;
pub use transaction::{PaymentMethod, PaymentTransaction};
