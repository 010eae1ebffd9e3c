use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryPatch, NewCategory};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub client_id: Option<String>,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub lft: i32,
    pub rgt: i32,
    pub depth: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            client_id: c.client_id,
            name: c.name,
            parent_id: c.parent_id,
            lft: c.lft,
            rgt: c.rgt,
            depth: c.depth,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 128))]
    pub client_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Parent category; omitted or null creates a root
    pub parent_id: Option<Uuid>,
}

impl From<CreateCategoryDto> for NewCategory {
    fn from(dto: CreateCategoryDto) -> Self {
        Self {
            client_id: dto.client_id,
            name: dto.name,
            parent_id: dto.parent_id,
        }
    }
}

/// Full replacement of a category's mutable fields.
///
/// `id` must repeat the id in the URL.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    pub id: Uuid,

    #[validate(length(min = 1, max = 128))]
    pub client_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub parent_id: Option<Uuid>,
}

impl From<UpdateCategoryDto> for CategoryPatch {
    fn from(dto: UpdateCategoryDto) -> Self {
        Self {
            client_id: dto.client_id,
            name: dto.name,
            parent_id: dto.parent_id,
        }
    }
}
