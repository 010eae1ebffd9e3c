//! Point transactions and member balances.
//!
//! Accruals and deductions move a member's balance in the same database
//! transaction that records them. Deductions are confirmed with an SMS code
//! issued by the verification feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/transactions` | Admin | Cursor or page listing |
//! | POST | `/api/transactions` | Admin | Raw transaction row |
//! | GET/PUT/DELETE | `/api/transactions/{id}` | Admin | Single transaction |
//! | POST | `/api/transactions/charge` | Yes | Manual accrual |
//! | POST | `/api/transactions/discard` | Yes | Manual deduction with SMS code |
//! | POST | `/api/transactions/mailing` | Admin | Accrue to every member of an app |
//! | GET | `/api/users/{user_id}/transactions` | Yes | Member history |
//! | GET | `/api/users/{user_id}/balance` | Yes | Member balance |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::TransactionService;
pub use stores::{BalanceStore, PgBalanceStore, PgTransactionStore, TransactionStore};
