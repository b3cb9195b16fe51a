//! Core, format-agnostic types for locsheet.
//! Tree parsers decode into [`TranslationTree`]; sheet parsers decode into [`Sheet`].

use std::{fmt::Display, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use unic_langid::LanguageIdentifier;

use crate::{error::Error, merge::build_rows_for};

/// Insertion-ordered mapping of dotted flat key to translated string.
pub type FlatMap = IndexMap<String, String>;

/// Insertion-ordered mapping of flat key to per-locale values, aligned with a locale list.
pub type RowMap = IndexMap<String, Vec<String>>;

/// The name of the column holding flat keys in every sheet.
pub const KEY_COLUMN: &str = "key";

/// A nested translation file: an ordered mapping from key segment to node.
///
/// The root is always a group, so a translation file can never be a bare string.
/// Nodes are owned values, which makes cyclic trees unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TranslationTree {
    pub root: IndexMap<String, TranslationNode>,
}

/// A single node of a [`TranslationTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationNode {
    /// A translated string.
    Leaf(String),

    /// A group of named children, in declaration order.
    Node(IndexMap<String, TranslationNode>),
}

impl TranslationTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from an already-parsed JSON document.
    ///
    /// Objects become groups (document order is kept), arrays become groups keyed by
    /// index, strings are kept verbatim, numbers and booleans are coerced to their
    /// textual form and `null` values are dropped.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self {
                root: children_from_json(map.iter()),
            }),
            other => Err(Error::DataMismatch(format!(
                "translation root must be an object, found {}",
                json_kind(other)
            ))),
        }
    }

    /// Converts the tree back into a JSON object with the same key order.
    pub fn to_json(&self) -> Value {
        Value::Object(children_to_json(&self.root))
    }

    /// Looks up a node by its path segments.
    pub fn get(&self, path: &[&str]) -> Option<&TranslationNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.get(*first)?;
        for segment in rest {
            match node {
                TranslationNode::Node(children) => node = children.get(*segment)?,
                TranslationNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Looks up a leaf value by its path segments.
    pub fn get_leaf(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(TranslationNode::as_leaf)
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.root.values().map(TranslationNode::leaf_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl TranslationNode {
    pub fn leaf(value: impl Into<String>) -> Self {
        TranslationNode::Leaf(value.into())
    }

    /// Builds a group node from `(segment, node)` pairs, keeping their order.
    pub fn group<K: Into<String>>(
        children: impl IntoIterator<Item = (K, TranslationNode)>,
    ) -> Self {
        TranslationNode::Node(
            children
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        )
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TranslationNode::Leaf(value) => Some(value),
            TranslationNode::Node(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TranslationNode::Leaf(_))
    }

    fn leaf_count(&self) -> usize {
        match self {
            TranslationNode::Leaf(_) => 1,
            TranslationNode::Node(children) => {
                children.values().map(TranslationNode::leaf_count).sum()
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, TranslationNode)> for TranslationTree {
    fn from_iter<T: IntoIterator<Item = (K, TranslationNode)>>(iter: T) -> Self {
        Self {
            root: iter.into_iter().map(|(key, node)| (key.into(), node)).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TranslationTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TranslationTree::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn node_from_json(value: &Value) -> Option<TranslationNode> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(TranslationNode::Leaf(s.clone())),
        Value::Bool(b) => Some(TranslationNode::Leaf(b.to_string())),
        Value::Number(n) => Some(TranslationNode::Leaf(n.to_string())),
        Value::Array(items) => Some(TranslationNode::Node(
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    node_from_json(item).map(|node| (index.to_string(), node))
                })
                .collect(),
        )),
        Value::Object(map) => Some(TranslationNode::Node(children_from_json(map.iter()))),
    }
}

fn children_from_json<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> IndexMap<String, TranslationNode> {
    entries
        .filter_map(|(key, value)| node_from_json(value).map(|node| (key.clone(), node)))
        .collect()
}

fn children_to_json(children: &IndexMap<String, TranslationNode>) -> Map<String, Value> {
    children
        .iter()
        .map(|(key, node)| {
            let value = match node {
                TranslationNode::Leaf(s) => Value::String(s.clone()),
                TranslationNode::Node(grandchildren) => {
                    Value::Object(children_to_json(grandchildren))
                }
            };
            (key.clone(), value)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One line of the tabular projection: a flat key and one value per locale column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    pub values: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Value for the locale column at `index`, or `""` when the row is shorter.
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {{ key: {}, values: {:?} }}", self.key, self.values)
    }
}

/// A tabular dataset: locale column names plus ordered rows.
///
/// Serialized with the header `key, <locale1>, <locale2>, ...`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub locales: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(locales: Vec<String>) -> Self {
        Self {
            locales,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(locales: Vec<String>, rows: Vec<Row>) -> Self {
        Self { locales, rows }
    }

    /// Builds a sheet from named locale maps; rows follow first-seen key order.
    pub fn from_locales(locales: &[(&str, &FlatMap)]) -> Self {
        let maps: Vec<&FlatMap> = locales.iter().map(|(_, map)| *map).collect();
        Self {
            locales: locales.iter().map(|(name, _)| name.to_string()).collect(),
            rows: build_rows_for(&maps),
        }
    }

    /// Rebuilds a sheet from a keyed row map whose values follow `locales`.
    pub fn from_row_map(locales: Vec<String>, rows: RowMap) -> Self {
        Self {
            locales,
            rows: rows
                .into_iter()
                .map(|(key, values)| Row { key, values })
                .collect(),
        }
    }

    /// The header row: `key` followed by the locale columns.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(KEY_COLUMN)
            .chain(self.locales.iter().map(String::as_str))
            .collect()
    }

    pub fn locale_index(&self, locale: &str) -> Option<usize> {
        self.locales.iter().position(|l| l == locale)
    }

    pub fn find_row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keyed view of the rows, each padded to the locale count.
    ///
    /// A repeated key keeps the position of its first row and the values of its last.
    pub fn to_row_map(&self) -> RowMap {
        let width = self.locales.len();
        let mut map = RowMap::with_capacity(self.rows.len());
        for row in &self.rows {
            let values = (0..width).map(|i| row.value(i).to_string()).collect();
            map.insert(row.key.clone(), values);
        }
        map
    }

    /// Flat key → value mapping for one locale column.
    pub fn locale_map(&self, locale: &str) -> Result<FlatMap, Error> {
        let index = self
            .locale_index(locale)
            .ok_or_else(|| Error::UnknownLocale(locale.to_string()))?;
        let mut map = FlatMap::with_capacity(self.rows.len());
        for row in &self.rows {
            map.insert(row.key.clone(), row.value(index).to_string());
        }
        Ok(map)
    }

    /// Extracts two locale columns as a [`LocalePair`].
    pub fn locale_pair(&self, first: &str, second: &str) -> Result<LocalePair, Error> {
        Ok(LocalePair::new(
            first,
            self.locale_map(first)?,
            second,
            self.locale_map(second)?,
        ))
    }

    /// Checks that locale column names are unique language identifiers distinct from `key`.
    ///
    /// Locale names become file names on import, so anything that does not parse as a
    /// BCP-47 identifier (`_` is accepted as a separator) is rejected.
    pub fn validate_locales(&self) -> Result<(), Error> {
        let mut seen = IndexSet::new();
        for locale in &self.locales {
            let trimmed = locale.trim();
            if trimmed.is_empty() {
                return Err(Error::validation_error("locale column name is empty"));
            }
            if trimmed.eq_ignore_ascii_case(KEY_COLUMN) {
                return Err(Error::validation_error(format!(
                    "locale column cannot be named `{}`",
                    KEY_COLUMN
                )));
            }
            if !is_locale_name(locale) {
                return Err(Error::validation_error(format!(
                    "locale column `{}` is not a language identifier",
                    locale
                )));
            }
            if !seen.insert(trimmed) {
                return Err(Error::validation_error(format!(
                    "duplicate locale column `{}`",
                    trimmed
                )));
            }
        }
        Ok(())
    }
}

// Only ASCII alphanumerics and separators, and the whole name must parse as BCP-47.
fn is_locale_name(locale: &str) -> bool {
    locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && LanguageIdentifier::from_str(&locale.replace('_', "-")).is_ok()
}

/// Two locale translation maps sharing one flat key namespace.
///
/// A key present in one locale but not the other reads as `""` for the missing side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePair {
    pub locales: [String; 2],
    pub first: FlatMap,
    pub second: FlatMap,
}

impl LocalePair {
    pub fn new(
        first_locale: impl Into<String>,
        first: FlatMap,
        second_locale: impl Into<String>,
        second: FlatMap,
    ) -> Self {
        Self {
            locales: [first_locale.into(), second_locale.into()],
            first,
            second,
        }
    }

    /// Both values for `key`, defaulting to `""` on the side that lacks it.
    pub fn values(&self, key: &str) -> [&str; 2] {
        [
            self.first.get(key).map(String::as_str).unwrap_or(""),
            self.second.get(key).map(String::as_str).unwrap_or(""),
        ]
    }

    pub fn to_sheet(&self) -> Sheet {
        Sheet::from_locales(&[
            (self.locales[0].as_str(), &self.first),
            (self.locales[1].as_str(), &self.second),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_tree_from_json_keeps_declaration_order() {
        let value = json!({ "zeta": "z", "alpha": { "beta": "b", "aardvark": "a" } });
        let tree = TranslationTree::from_json(&value).unwrap();
        let keys: Vec<&str> = tree.root.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        let Some(TranslationNode::Node(children)) = tree.root.get("alpha") else {
            panic!("expected a group under alpha");
        };
        let keys: Vec<&str> = children.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["beta", "aardvark"]);
    }

    #[test]
    fn test_tree_from_json_coerces_scalars_and_drops_null() {
        let value = json!({ "count": 3, "enabled": true, "missing": null, "empty": "" });
        let tree = TranslationTree::from_json(&value).unwrap();
        assert_eq!(tree.get_leaf(&["count"]), Some("3"));
        assert_eq!(tree.get_leaf(&["enabled"]), Some("true"));
        assert_eq!(tree.get(&["missing"]), None);
        assert_eq!(tree.get_leaf(&["empty"]), Some(""));
    }

    #[test]
    fn test_tree_from_json_arrays_become_indexed_groups() {
        let value = json!({ "steps": ["one", "two"] });
        let tree = TranslationTree::from_json(&value).unwrap();
        assert_eq!(tree.get_leaf(&["steps", "0"]), Some("one"));
        assert_eq!(tree.get_leaf(&["steps", "1"]), Some("two"));
    }

    #[test]
    fn test_tree_from_json_rejects_non_object_root() {
        let err = TranslationTree::from_json(&json!(["a"])).unwrap_err();
        assert!(matches!(err, Error::DataMismatch(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_tree_to_json_round_trip() {
        let value = json!({ "title": "Başlık", "labels": { "save": "Kaydet" } });
        let tree = TranslationTree::from_json(&value).unwrap();
        assert_eq!(tree.to_json(), value);
    }

    #[test]
    fn test_tree_deserialize_and_serialize() {
        let tree: TranslationTree =
            serde_json::from_str(r#"{"b":"2","a":{"c":"3"}}"#).unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(serde_json::to_string(&tree).unwrap(), r#"{"b":"2","a":{"c":"3"}}"#);
    }

    #[test]
    fn test_tree_get_through_leaf_is_none() {
        let tree: TranslationTree = [("title", TranslationNode::leaf("Title"))]
            .into_iter()
            .collect();
        assert_eq!(tree.get(&["title", "sub"]), None);
        assert_eq!(tree.get(&[]), None);
    }

    #[test]
    fn test_row_value_defaults_to_empty() {
        let row = Row::new("hello", vec!["Merhaba".to_string()]);
        assert_eq!(row.value(0), "Merhaba");
        assert_eq!(row.value(1), "");
    }

    #[test]
    fn test_sheet_header() {
        let sheet = Sheet::new(vec!["tr".to_string(), "en".to_string()]);
        assert_eq!(sheet.header(), vec!["key", "tr", "en"]);
    }

    #[test]
    fn test_sheet_row_map_pads_and_keeps_first_position() {
        let sheet = Sheet::with_rows(
            vec!["tr".to_string(), "en".to_string()],
            vec![
                Row::new("a", vec!["a1".to_string()]),
                Row::new("b", vec!["b1".to_string(), "b2".to_string()]),
                Row::new("a", vec!["a3".to_string(), "a4".to_string()]),
            ],
        );
        let map = sheet.to_row_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map["a"], vec!["a3", "a4"]);

        let short = Sheet::with_rows(
            vec!["tr".to_string(), "en".to_string()],
            vec![Row::new("x", vec!["only tr".to_string()])],
        );
        assert_eq!(short.to_row_map()["x"], vec!["only tr", ""]);
    }

    #[test]
    fn test_sheet_locale_map_unknown_locale() {
        let sheet = Sheet::new(vec!["tr".to_string()]);
        let err = sheet.locale_map("de").unwrap_err();
        assert!(matches!(err, Error::UnknownLocale(ref l) if l == "de"));
    }

    #[test]
    fn test_sheet_validate_locales() {
        assert!(Sheet::new(vec!["tr".into(), "en".into()]).validate_locales().is_ok());
        assert!(Sheet::new(vec!["tr".into(), "tr".into()]).validate_locales().is_err());
        assert!(Sheet::new(vec!["Key".into()]).validate_locales().is_err());
        assert!(Sheet::new(vec![" ".into()]).validate_locales().is_err());
        assert!(Sheet::new(vec!["pt_BR".into(), "zh-Hans".into()]).validate_locales().is_ok());
    }

    #[test]
    fn test_sheet_validate_locales_rejects_path_like_names() {
        for name in ["../escaped", "sub/en", "..", "en\\tr", "C:en", "tr.js", "en "] {
            let err = Sheet::new(vec!["tr".into(), name.into()])
                .validate_locales()
                .unwrap_err();
            assert!(
                matches!(err, Error::Validation(ref msg) if msg.contains("language identifier")),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_locale_pair_values_default_to_empty() {
        let pair = LocalePair::new(
            "tr",
            flat(&[("hello", "Merhaba")]),
            "en",
            flat(&[("bye", "Goodbye")]),
        );
        assert_eq!(pair.values("hello"), ["Merhaba", ""]);
        assert_eq!(pair.values("bye"), ["", "Goodbye"]);

        let sheet = pair.to_sheet();
        assert_eq!(sheet.locales, vec!["tr", "en"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], Row::new("hello", vec!["Merhaba".into(), "".into()]));
        assert_eq!(sheet.rows[1], Row::new("bye", vec!["".into(), "Goodbye".into()]));
    }

    #[test]
    fn test_sheet_locale_pair_round_trip() {
        let pair = LocalePair::new(
            "tr",
            flat(&[("a", "1"), ("b", "2")]),
            "en",
            flat(&[("a", "one"), ("b", "two")]),
        );
        let back = pair.to_sheet().locale_pair("tr", "en").unwrap();
        assert_eq!(back, pair);
    }
}
