//! SMS verification codes.
//!
//! `POST /api/verification/sms` texts a six digit code to a member and returns
//! a token; `VerificationService::verify` trades the token and code back for
//! the member's id exactly once.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::VerificationService;
pub use stores::{PgVerificationStore, VerificationStore};
