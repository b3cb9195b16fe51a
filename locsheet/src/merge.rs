//! Row generation and old/new sheet reconciliation.
//!
//! Rules:
//! - Rows follow first-seen key order across the locale maps, never sorted.
//! - A key missing from a locale reads as `""`.
//! - Reconciliation starts from the new set. Keys only the old set has are carried
//!   over unchanged; keys both sets have are taken entirely from the new set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::types::{FlatMap, Row, RowMap, Sheet};

/// Builds one row per key of `first ∪ second`, in first-seen order.
///
/// ```rust
/// use locsheet::merge::build_rows;
/// use locsheet::types::FlatMap;
///
/// let tr = FlatMap::from_iter([("hello".to_string(), "Merhaba".to_string())]);
/// let en = FlatMap::from_iter([("bye".to_string(), "Goodbye".to_string())]);
/// let rows = build_rows(&tr, &en);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].values, vec!["", "Goodbye"]);
/// ```
pub fn build_rows(first: &FlatMap, second: &FlatMap) -> Vec<Row> {
    build_rows_for(&[first, second])
}

/// Builds rows for any number of locale maps; `values[i]` comes from `locales[i]`.
pub fn build_rows_for(locales: &[&FlatMap]) -> Vec<Row> {
    let mut keys: IndexSet<&str> = IndexSet::new();
    for map in locales {
        keys.extend(map.keys().map(String::as_str));
    }

    keys.into_iter()
        .map(|key| Row {
            key: key.to_string(),
            values: locales
                .iter()
                .map(|map| map.get(key).cloned().unwrap_or_default())
                .collect(),
        })
        .collect()
}

/// Counters describing where each reconciled key came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub total: usize,
    /// Keys only the new set has.
    pub added: usize,
    /// Keys both sets have; the new entry replaced the old one.
    pub replaced: usize,
    /// Keys only the old set has; carried over unchanged.
    pub carried_over: usize,
}

/// Merges an old and a new keyed row set.
///
/// ```rust
/// use locsheet::merge::reconcile;
/// use locsheet::types::RowMap;
///
/// let old = RowMap::from_iter([
///     ("a".to_string(), vec!["1".to_string()]),
///     ("b".to_string(), vec!["2".to_string()]),
/// ]);
/// let new = RowMap::from_iter([("b".to_string(), vec!["3".to_string()])]);
/// let merged = reconcile(&old, &new);
/// assert_eq!(merged["a"], vec!["1"]);
/// assert_eq!(merged["b"], vec!["3"]);
/// ```
pub fn reconcile(old: &RowMap, new: &RowMap) -> RowMap {
    reconcile_with_report(old, new).0
}

/// Same as [`reconcile`], also reporting how many keys came from each side.
pub fn reconcile_with_report(old: &RowMap, new: &RowMap) -> (RowMap, ReconcileReport) {
    let mut merged = new.clone();
    let mut report = ReconcileReport::default();

    for (key, values) in old {
        if merged.contains_key(key) {
            report.replaced += 1;
        } else {
            merged.insert(key.clone(), values.clone());
            report.carried_over += 1;
        }
    }

    report.total = merged.len();
    report.added = report.total - report.replaced - report.carried_over;
    (merged, report)
}

/// Reconciles two whole sheets whose locale columns may differ.
///
/// The result has the new sheet's locales followed by locales only the old sheet has.
/// Values are matched by column name, so column order in either input does not matter.
pub fn reconcile_sheets(old: &Sheet, new: &Sheet) -> (Sheet, ReconcileReport) {
    let mut locales = new.locales.clone();
    for locale in &old.locales {
        if !locales.contains(locale) {
            locales.push(locale.clone());
        }
    }

    let old_rows = align_rows(old, &locales);
    let new_rows = align_rows(new, &locales);
    let (merged, report) = reconcile_with_report(&old_rows, &new_rows);

    tracing::debug!(
        total = report.total,
        added = report.added,
        replaced = report.replaced,
        carried_over = report.carried_over,
        "reconciled sheets"
    );

    (Sheet::from_row_map(locales, merged), report)
}

// Re-keys a sheet's rows so that `values[i]` belongs to `locales[i]`.
fn align_rows(sheet: &Sheet, locales: &[String]) -> RowMap {
    let positions: Vec<Option<usize>> = locales
        .iter()
        .map(|locale| sheet.locale_index(locale))
        .collect();

    sheet
        .to_row_map()
        .into_iter()
        .map(|(key, values)| {
            let aligned = positions
                .iter()
                .map(|position| {
                    position
                        .and_then(|i| values.get(i).cloned())
                        .unwrap_or_default()
                })
                .collect();
            (key, aligned)
        })
        .collect()
}
