use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::category::Category;
use crate::core::error::{AppError, Result};

/// Nested-set position of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lft: i32,
    pub rgt: i32,
    pub depth: i32,
}

/// Bounds for a node appended as the last child of `parent`, or as the last
/// root when `parent` is `None`.
///
/// Appending under a parent requires every existing bound `>= parent.rgt` to
/// be shifted by 2 first.
pub fn append_bounds(parent: Option<&Category>, max_rgt: i32) -> Bounds {
    match parent {
        Some(parent) => Bounds {
            lft: parent.rgt,
            rgt: parent.rgt + 1,
            depth: parent.depth + 1,
        },
        None => Bounds {
            lft: max_rgt + 1,
            rgt: max_rgt + 2,
            depth: 0,
        },
    }
}

/// Rejects moving `category` under `new_parent` when the parent lies inside
/// the category's own subtree.
pub fn check_move(category: &Category, new_parent: &Category) -> Result<()> {
    if category.contains(new_parent) {
        return Err(AppError::BadRequest(
            "Category cannot be moved under itself or its descendants".to_string(),
        ));
    }
    Ok(())
}

/// Recomputes bounds for the whole forest from parent links.
///
/// Siblings keep their current `lft` order, except `moved`, which is placed
/// after its new siblings. Rows whose parent is unknown are numbered as
/// roots. Rows on a parent cycle are unreachable and get no entry.
pub fn renumber(categories: &[Category], moved: Option<Uuid>) -> HashMap<Uuid, Bounds> {
    let known: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();

    let mut children: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(category);
    }

    let sort_key = |c: &Category| {
        if Some(c.id) == moved {
            i32::MAX
        } else {
            c.lft
        }
    };
    for siblings in children.values_mut() {
        siblings.sort_by_key(|c| sort_key(*c));
    }

    let mut bounds = HashMap::with_capacity(categories.len());
    let mut counter = 1;
    if let Some(roots) = children.get(&None) {
        for root in roots {
            assign(root, 0, &mut counter, &children, &mut bounds);
        }
    }
    bounds
}

fn assign(
    node: &Category,
    depth: i32,
    counter: &mut i32,
    children: &HashMap<Option<Uuid>, Vec<&Category>>,
    bounds: &mut HashMap<Uuid, Bounds>,
) {
    if bounds.contains_key(&node.id) {
        return;
    }

    let lft = *counter;
    *counter += 1;
    // Reserve the entry so duplicate ids cannot recurse back in
    bounds.insert(node.id, Bounds { lft, rgt: lft, depth });

    if let Some(kids) = children.get(&Some(node.id)) {
        for child in kids {
            assign(child, depth + 1, counter, children, bounds);
        }
    }

    let rgt = *counter;
    *counter += 1;
    bounds.insert(node.id, Bounds { lft, rgt, depth });
}
