use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category.
///
/// `lft`/`rgt` are nested-set bounds: a node's subtree is every row whose
/// bounds lie within its own. `depth` is 0 for roots.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub client_id: Option<String>,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub lft: i32,
    pub rgt: i32,
    pub depth: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    /// True when `other` lies inside this node's subtree (or is this node).
    pub fn contains(&self, other: &Category) -> bool {
        self.lft <= other.lft && other.rgt <= self.rgt
    }
}

/// Fields accepted when creating a category; bounds are assigned by the store
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub client_id: Option<String>,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Replacement values for the mutable fields of a category
#[derive(Debug, Clone)]
pub struct CategoryPatch {
    pub client_id: Option<String>,
    pub name: String,
    pub parent_id: Option<Uuid>,
}
