use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::stores::CategoryStore;
use crate::shared::types::PaginationQuery;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// One page of active categories as a tree, with the total row count
    pub async fn list_tree(&self, pagination: &PaginationQuery) -> Result<(Vec<CategoryTreeDto>, i64)> {
        let (categories, total) = self
            .store
            .get_page(pagination.offset(), pagination.limit())
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                e
            })?;

        Ok((CategoryTreeDto::build_tree(categories), total))
    }

    pub async fn list_tree_by_client(
        &self,
        client_id: &str,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<CategoryTreeDto>, i64)> {
        let (categories, total) = self
            .store
            .get_by_client_page(client_id, pagination.offset(), pagination.limit())
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories for client {}: {:?}", client_id, e);
                e
            })?;

        Ok((CategoryTreeDto::build_tree(categories), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.store
            .get(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let category = self.store.save(dto.into()).await?;

        tracing::info!(
            "Category created: id={}, parent_id={:?}, lft={}",
            category.id,
            category.parent_id,
            category.lft
        );

        Ok(category.into())
    }

    /// Replaces the mutable fields; the caller has already matched `dto.id`
    /// against the path.
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let category = self
            .store
            .update(id, dto.into())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))?;

        tracing::info!("Category updated: id={}", category.id);
        Ok(category.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Category '{}' not found", id)));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }
}
