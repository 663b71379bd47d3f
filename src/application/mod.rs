//! Application layer orchestrating the ledger's use cases.
//!
//! [`ledger::Ledger`] is the surface callers talk to. It composes the
//! account lifecycle service, the transfer engine, and the pure history
//! query pipeline over the store and directory ports.

pub mod accounts;
pub mod history;
pub mod ledger;
pub mod transfers;
