//! Customer and merchant accounts

pub mod service;

pub use service::AccountService;
