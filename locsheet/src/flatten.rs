//! Conversion between nested translation trees and flat dotted-key maps.
//!
//! [`flatten`] walks a tree depth-first in declaration order and emits one entry per
//! leaf. [`unflatten`] rebuilds a tree from flat keys, materializing at most
//! [`DEFAULT_MAX_DEPTH`](crate::options::DEFAULT_MAX_DEPTH) group levels: any segments
//! past that depth are joined back with dots and become the leaf's name.
//!
//! ```rust
//! use locsheet::flatten::{flatten, unflatten};
//! use locsheet::types::FlatMap;
//!
//! let mut flat = FlatMap::new();
//! flat.insert("labels.marketplace.products.title".to_string(), "X".to_string());
//! let tree = unflatten(&flat)?;
//! assert_eq!(tree.get_leaf(&["labels", "marketplace", "products.title"]), Some("X"));
//! assert_eq!(flatten(&tree), flat);
//! # Ok::<(), locsheet::Error>(())
//! ```

use indexmap::IndexMap;

use crate::{
    error::Error,
    options::{ConflictPolicy, UnflattenOptions},
    types::{FlatMap, TranslationNode, TranslationTree},
};

/// Separator between key segments in a flat key.
pub const KEY_SEPARATOR: char = '.';

/// Flattens a tree into `dotted.path → value` entries, in declaration order.
///
/// Empty groups produce no entries. Segments are joined verbatim, so a segment that
/// itself contains a dot yields a key that does not round-trip.
pub fn flatten(tree: &TranslationTree) -> FlatMap {
    let mut flat = FlatMap::new();
    let mut prefix = String::new();
    flatten_children(&tree.root, &mut prefix, &mut flat);
    flat
}

fn flatten_children(
    children: &IndexMap<String, TranslationNode>,
    prefix: &mut String,
    flat: &mut FlatMap,
) {
    for (segment, node) in children {
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push(KEY_SEPARATOR);
        }
        prefix.push_str(segment);

        match node {
            TranslationNode::Leaf(value) => {
                flat.insert(prefix.clone(), value.clone());
            }
            TranslationNode::Node(grandchildren) => flatten_children(grandchildren, prefix, flat),
        }

        prefix.truncate(restore);
    }
}

/// Rebuilds a tree from flat keys with the default depth cap and last-write-wins collisions.
pub fn unflatten(flat: &FlatMap) -> Result<TranslationTree, Error> {
    unflatten_with(flat, &UnflattenOptions::default())
}

/// Rebuilds a tree from flat keys.
///
/// Keys are inserted in map order. When a key needs a group where a value already
/// sits (or the reverse), `options.on_conflict` decides between replacing the slot in
/// place and failing with [`Error::StructuralConflict`].
pub fn unflatten_with(
    flat: &FlatMap,
    options: &UnflattenOptions,
) -> Result<TranslationTree, Error> {
    let mut tree = TranslationTree::new();
    for (key, value) in flat {
        let path = split_key(key, options.max_depth)?;
        insert_path(&mut tree.root, &path, value, key, options.on_conflict)?;
    }
    Ok(tree)
}

/// Splits a flat key into at most `max_depth + 1` segments.
///
/// ```rust
/// use locsheet::flatten::split_key;
/// assert_eq!(split_key("a", 2).unwrap(), vec!["a"]);
/// assert_eq!(split_key("a.b.c.d", 2).unwrap(), vec!["a", "b", "c.d"]);
/// assert_eq!(split_key("a.b.c", 0).unwrap(), vec!["a.b.c"]);
/// assert!(split_key("a..b", 2).is_err());
/// ```
pub fn split_key(key: &str, max_depth: usize) -> Result<Vec<String>, Error> {
    let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::InvalidKey(key.to_string()));
    }

    if segments.len() <= max_depth + 1 {
        return Ok(segments.into_iter().map(str::to_string).collect());
    }

    let (groups, leaf) = segments.split_at(max_depth);
    let mut path: Vec<String> = groups.iter().map(|s| s.to_string()).collect();
    path.push(leaf.join(&KEY_SEPARATOR.to_string()));
    Ok(path)
}

fn insert_path(
    root: &mut IndexMap<String, TranslationNode>,
    path: &[String],
    value: &str,
    key: &str,
    policy: ConflictPolicy,
) -> Result<(), Error> {
    let Some((leaf, groups)) = path.split_last() else {
        return Err(Error::InvalidKey(key.to_string()));
    };

    let mut level = root;
    for (depth, segment) in groups.iter().enumerate() {
        let slot = level
            .entry(segment.clone())
            .or_insert_with(|| TranslationNode::Node(IndexMap::new()));
        if slot.is_leaf() {
            resolve_conflict(policy, key, &path[..=depth])?;
        }
        level = ensure_group(slot);
    }

    if let Some(TranslationNode::Node(_)) = level.get(leaf) {
        resolve_conflict(policy, key, path)?;
    }
    level.insert(leaf.clone(), TranslationNode::Leaf(value.to_string()));
    Ok(())
}

fn resolve_conflict(policy: ConflictPolicy, key: &str, path: &[String]) -> Result<(), Error> {
    let path = path.join(&KEY_SEPARATOR.to_string());
    match policy {
        ConflictPolicy::Error => Err(Error::StructuralConflict {
            key: key.to_string(),
            path,
        }),
        ConflictPolicy::LastWriteWins => {
            tracing::warn!(key, path = %path, "replacing conflicting translation slot");
            Ok(())
        }
    }
}

// Replaces a leaf with an empty group in place, keeping its position among siblings.
fn ensure_group(slot: &mut TranslationNode) -> &mut IndexMap<String, TranslationNode> {
    if slot.is_leaf() {
        *slot = TranslationNode::Node(IndexMap::new());
    }
    match slot {
        TranslationNode::Node(children) => children,
        TranslationNode::Leaf(_) => unreachable!("leaf slots are replaced above"),
    }
}
