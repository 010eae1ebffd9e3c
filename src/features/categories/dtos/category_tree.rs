use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::Category;

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub client_id: Option<String>,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub lft: i32,
    pub rgt: i32,
    pub depth: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of direct children below
    pub count_children: usize,
    /// Always present; empty for leaves
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build the forest from a flat list of categories.
    ///
    /// Roots and every sibling list are ordered by `lft` descending; equal
    /// `lft` values keep their input order. A category whose parent is not in
    /// `categories` is dropped together with its subtree.
    pub fn build_tree(mut categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        categories.sort_by(|a, b| b.lft.cmp(&a.lft));

        let known: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();

        let mut roots = Vec::new();
        let mut children_of: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for category in categories {
            match category.parent_id {
                None => roots.push(category),
                Some(parent_id) if known.contains(&parent_id) => {
                    children_of.entry(parent_id).or_default().push(category);
                }
                Some(parent_id) => {
                    tracing::warn!(
                        category_id = %category.id,
                        parent_id = %parent_id,
                        "Dropping category with unknown parent from tree"
                    );
                }
            }
        }

        // Already in order from the global sort; sorted again so the output
        // never depends on how roots were collected.
        roots.sort_by(|a, b| b.lft.cmp(&a.lft));

        roots
            .into_iter()
            .map(|root| Self::build_node(root, &mut children_of))
            .collect()
    }

    fn build_node(
        category: Category,
        children_of: &mut HashMap<Uuid, Vec<Category>>,
    ) -> CategoryTreeDto {
        // Taking the list out means each node is attached at most once, so
        // parent cycles below the roots cannot recurse.
        let children: Vec<CategoryTreeDto> = children_of
            .remove(&category.id)
            .unwrap_or_default()
            .into_iter()
            .map(|child| Self::build_node(child, children_of))
            .collect();

        CategoryTreeDto {
            id: category.id,
            client_id: category.client_id,
            name: category.name,
            parent_id: category.parent_id,
            lft: category.lft,
            rgt: category.rgt,
            depth: category.depth,
            created_at: category.created_at,
            updated_at: category.updated_at,
            count_children: children.len(),
            children,
        }
    }

    /// Pre-order walk back to a flat list (parents before their children).
    pub fn flatten(tree: Vec<CategoryTreeDto>) -> Vec<Category> {
        let mut out = Vec::new();
        let mut stack: Vec<CategoryTreeDto> = tree.into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            let CategoryTreeDto {
                id,
                client_id,
                name,
                parent_id,
                lft,
                rgt,
                depth,
                created_at,
                updated_at,
                children,
                ..
            } = node;

            out.push(Category {
                id,
                client_id,
                name,
                parent_id,
                lft,
                rgt,
                depth,
                created_at,
                updated_at,
                deleted_at: None,
            });
            stack.extend(children.into_iter().rev());
        }

        out
    }
}
