pub mod commissions;
pub mod journal_vouchers;
pub mod ledgers;
pub mod payments;
pub mod sales;

pub use commissions::*;
pub use journal_vouchers::*;
pub use ledgers::*;
pub use payments::*;
pub use sales::*;
