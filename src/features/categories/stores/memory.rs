use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CategoryStore;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::nested_set;
use crate::features::categories::models::{Category, CategoryPatch, NewCategory};

/// In-process store with the same bound bookkeeping as `PgCategoryStore`
#[derive(Default)]
pub struct MemoryCategoryStore {
    rows: RwLock<Vec<Category>>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active rows including bounds, for assertions
    pub async fn snapshot(&self) -> Vec<Category> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|c| c.deleted_at.is_none())
            .cloned()
            .collect()
    }
}

fn active(rows: &[Category], id: Uuid) -> Option<&Category> {
    rows.iter().find(|c| c.id == id && c.deleted_at.is_none())
}

fn page(mut rows: Vec<Category>, offset: i64, limit: i64) -> (Vec<Category>, i64) {
    rows.sort_by_key(|c| c.lft);
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    (items, total)
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn save(&self, category: NewCategory) -> Result<Category> {
        let mut rows = self.rows.write().await;

        let bounds = match category.parent_id {
            Some(parent_id) => {
                let parent = active(&rows, parent_id)
                    .cloned()
                    .ok_or_else(|| AppError::invalid_param("parent_id"))?;
                for row in rows.iter_mut().filter(|c| c.deleted_at.is_none()) {
                    if row.rgt >= parent.rgt {
                        row.rgt += 2;
                    }
                    if row.lft > parent.rgt {
                        row.lft += 2;
                    }
                }
                nested_set::append_bounds(Some(&parent), 0)
            }
            None => {
                let max_rgt = rows
                    .iter()
                    .filter(|c| c.deleted_at.is_none())
                    .map(|c| c.rgt)
                    .max()
                    .unwrap_or(0);
                nested_set::append_bounds(None, max_rgt)
            }
        };

        let now = Utc::now();
        let saved = Category {
            id: Uuid::new_v4(),
            client_id: category.client_id,
            name: category.name,
            parent_id: category.parent_id,
            lft: bounds.lft,
            rgt: bounds.rgt,
            depth: bounds.depth,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(saved.clone());
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(active(&self.rows.read().await, id).cloned())
    }

    async fn get_page(&self, offset: i64, limit: i64) -> Result<(Vec<Category>, i64)> {
        Ok(page(self.snapshot().await, offset, limit))
    }

    async fn get_by_client_page(
        &self,
        client_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64)> {
        let rows = self
            .snapshot()
            .await
            .into_iter()
            .filter(|c| c.client_id.as_deref() == Some(client_id))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Option<Category>> {
        let mut rows = self.rows.write().await;

        let Some(current) = active(&rows, id).cloned() else {
            return Ok(None);
        };

        let reparented = current.parent_id != patch.parent_id;
        if reparented {
            if let Some(parent_id) = patch.parent_id {
                let parent = active(&rows, parent_id)
                    .ok_or_else(|| AppError::invalid_param("parent_id"))?;
                nested_set::check_move(&current, parent)?;
            }
        }

        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.client_id = patch.client_id;
            row.name = patch.name;
            row.parent_id = patch.parent_id;
            row.updated_at = Utc::now();
        }

        if reparented {
            let live: Vec<Category> = rows
                .iter()
                .filter(|c| c.deleted_at.is_none())
                .cloned()
                .collect();
            let renumbered = nested_set::renumber(&live, Some(id));
            for row in rows.iter_mut() {
                if let Some(bounds) = renumbered.get(&row.id) {
                    row.lft = bounds.lft;
                    row.rgt = bounds.rgt;
                    row.depth = bounds.depth;
                }
            }
        }

        Ok(active(&rows, id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;

        let Some(category) = active(&rows, id).cloned() else {
            return Ok(false);
        };

        let now = Utc::now();
        for row in rows
            .iter_mut()
            .filter(|c| c.deleted_at.is_none() && category.contains(c))
        {
            row.deleted_at = Some(now);
            row.updated_at = now;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new(name: &str, parent_id: Option<Uuid>) -> NewCategory {
        NewCategory {
            client_id: None,
            name: name.to_string(),
            parent_id,
        }
    }

    fn bounds_of(rows: &[Category], id: Uuid) -> (i32, i32, i32) {
        let row = rows.iter().find(|c| c.id == id).unwrap();
        (row.lft, row.rgt, row.depth)
    }

    #[tokio::test]
    async fn test_save_appends_children_and_roots() {
        let store = MemoryCategoryStore::new();

        let a = store.save(new("a", None)).await.unwrap();
        let b = store.save(new("b", None)).await.unwrap();
        let a1 = store.save(new("a1", Some(a.id))).await.unwrap();
        let a2 = store.save(new("a2", Some(a.id))).await.unwrap();

        let rows = store.snapshot().await;
        assert_eq!(bounds_of(&rows, a.id), (1, 6, 0));
        assert_eq!(bounds_of(&rows, a1.id), (2, 3, 1));
        assert_eq!(bounds_of(&rows, a2.id), (4, 5, 1));
        assert_eq!(bounds_of(&rows, b.id), (7, 8, 0));
    }

    #[tokio::test]
    async fn test_save_with_unknown_parent_fails() {
        let store = MemoryCategoryStore::new();

        let err = store
            .save(new("x", Some(Uuid::new_v4())))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid parameter: parent_id"));
    }

    #[tokio::test]
    async fn test_update_reparent_renumbers() {
        let store = MemoryCategoryStore::new();
        let a = store.save(new("a", None)).await.unwrap();
        let b = store.save(new("b", None)).await.unwrap();

        store
            .update(
                b.id,
                CategoryPatch {
                    client_id: None,
                    name: "b".to_string(),
                    parent_id: Some(a.id),
                },
            )
            .await
            .unwrap();

        let rows = store.snapshot().await;
        assert_eq!(bounds_of(&rows, a.id), (1, 4, 0));
        assert_eq!(bounds_of(&rows, b.id), (2, 3, 1));
    }

    #[tokio::test]
    async fn test_delete_removes_subtree() {
        let store = MemoryCategoryStore::new();
        let a = store.save(new("a", None)).await.unwrap();
        store.save(new("a1", Some(a.id))).await.unwrap();
        let b = store.save(new("b", None)).await.unwrap();

        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());

        let rows = store.snapshot().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, b.id);
    }
}
