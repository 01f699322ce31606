pub mod commission_rules;
pub mod commissions;
pub mod customers;
pub mod executives;
pub mod health;
pub mod journal_vouchers;
pub mod ledger_accounts;
pub mod ledgers;
pub mod payments;
pub mod plots;
pub mod projects;
