//! Core banking types and the ports the application layer drives.

pub mod account;
pub mod ports;
pub mod transaction;
