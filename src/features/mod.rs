pub mod auth;
pub mod categories;
pub mod promos;
pub mod transactions;
pub mod verification;
