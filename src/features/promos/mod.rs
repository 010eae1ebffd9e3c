//! Promo codes and their moderation workflow.
//!
//! Promos move through `draft`, `moderation`, `accepted` and `rejected`.
//! Mobile clients (anonymous or member callers) only see accepted, active
//! promos inside their validity window.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::PromoService;
pub use stores::{PgPromoStore, PromoStore};
