//! Accounting Service - Real-estate sales & accounting back office.
//!
//! Tracks land-development projects, plots, customer bookings, payments,
//! executive commissions, and running-balance ledgers. The ledger posting,
//! commission, and journal-voucher services carry the cross-entity
//! invariants; everything else is a thin REST layer over MongoDB.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
