//! Category trees stored as nested sets.
//!
//! Listings return forests rebuilt from parent links, roots and siblings
//! ordered by `lft` descending.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories` | No | Paged category tree |
//! | GET | `/api/clients/{client_id}/categories` | No | Paged tree of one client |
//! | GET | `/api/categories/{id}` | No | Single category |
//! | POST | `/api/categories` | Admin | Create category |
//! | PUT | `/api/categories/{id}` | Admin | Update or move category |
//! | DELETE | `/api/categories/{id}` | Admin | Soft delete with subtree |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::CategoryService;
pub use stores::{CategoryStore, PgCategoryStore};
