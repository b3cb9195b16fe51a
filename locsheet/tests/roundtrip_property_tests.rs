use indexmap::{IndexMap, IndexSet};
use locsheet::converter::{export_files, import_files, ImportPaths};
use locsheet::options::{ImportOptions, WriteOptions};
use locsheet::types::{FlatMap, Row, RowMap, TranslationNode, TranslationTree};
use locsheet::{build_rows, flatten, read_tree, reconcile, unflatten};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("valid segment regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?çğıöşü\"]{0,20}")
        .expect("valid value regex")
}

/// Trees at most two levels deep, the shape the depth cap preserves exactly.
fn tree_strategy() -> impl Strategy<Value = TranslationTree> {
    let group = prop::collection::vec((segment_strategy(), value_strategy()), 1..4).prop_map(
        |children| {
            TranslationNode::group(
                children
                    .into_iter()
                    .map(|(key, value)| (key, TranslationNode::leaf(value))),
            )
        },
    );
    let child = prop_oneof![value_strategy().prop_map(TranslationNode::leaf), group];
    prop::collection::vec((segment_strategy(), child), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Two trees with the same shape where the second may lack some leaves.
fn tree_pair_strategy() -> impl Strategy<Value = (TranslationTree, TranslationTree)> {
    let cell = (value_strategy(), prop::option::of(value_strategy())).boxed();
    let group = prop::collection::vec((segment_strategy(), cell.clone()), 1..4);
    let child = prop_oneof![
        cell.prop_map(|(first, second)| (
            TranslationNode::leaf(first),
            second.map(TranslationNode::leaf)
        )),
        group.prop_map(|children| {
            let first = TranslationNode::group(
                children
                    .iter()
                    .map(|(key, (value, _))| (key.clone(), TranslationNode::leaf(value.clone()))),
            );
            let second = TranslationNode::group(children.into_iter().filter_map(
                |(key, (_, value))| value.map(|value| (key, TranslationNode::leaf(value))),
            ));
            (first, Some(second))
        }),
    ];
    prop::collection::vec((segment_strategy(), child), 0..6).prop_map(|entries| {
        let entries: IndexMap<String, _> = entries.into_iter().collect();
        let first: TranslationTree = entries
            .iter()
            .map(|(key, (node, _))| (key.clone(), node.clone()))
            .collect();
        let second: TranslationTree = entries
            .into_iter()
            .filter_map(|(key, (_, node))| node.map(|node| (key, node)))
            .collect();
        (first, second)
    })
}

fn flat_strategy() -> impl Strategy<Value = FlatMap> {
    prop::collection::vec((segment_strategy(), value_strategy()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn row_map_strategy() -> impl Strategy<Value = RowMap> {
    prop::collection::vec(
        (segment_strategy(), (value_strategy(), value_strategy())),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, (first, second))| (key, vec![first, second]))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unflatten_inverts_flatten_for_shallow_trees(tree in tree_strategy()) {
        let flat = flatten(&tree);
        let rebuilt = unflatten(&flat).map_err(|e| TestCaseError::fail(e.to_string()))?;
        // IndexMap equality ignores order, the serialized form does not.
        let rebuilt_json = serde_json::to_string(&rebuilt).unwrap();
        let tree_json = serde_json::to_string(&tree).unwrap();
        prop_assert_eq!(&rebuilt, &tree);
        prop_assert_eq!(rebuilt_json, tree_json);
    }

    #[test]
    fn build_rows_contains_every_key_once(first in flat_strategy(), second in flat_strategy()) {
        let rows = build_rows(&first, &second);
        let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
        let unique: IndexSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(keys.len(), unique.len());

        let expected: IndexSet<&str> = first
            .keys()
            .chain(second.keys())
            .map(String::as_str)
            .collect();
        prop_assert_eq!(unique, expected);

        for row in &rows {
            prop_assert_eq!(row.value(0), first.get(&row.key).map(String::as_str).unwrap_or(""));
            prop_assert_eq!(row.value(1), second.get(&row.key).map(String::as_str).unwrap_or(""));
        }
    }

    #[test]
    fn build_rows_is_deterministic(first in flat_strategy(), second in flat_strategy()) {
        let once: Vec<Row> = build_rows(&first, &second);
        let twice: Vec<Row> = build_rows(&first, &second);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_keeps_old_only_keys_and_replaces_shared(
        old in row_map_strategy(),
        new in row_map_strategy(),
    ) {
        let merged = reconcile(&old, &new);

        for (key, values) in &new {
            prop_assert_eq!(merged.get(key), Some(values));
        }
        for (key, values) in &old {
            if !new.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(values));
            }
        }

        let expected_len = old.keys().chain(new.keys()).collect::<IndexSet<_>>().len();
        prop_assert_eq!(merged.len(), expected_len);
    }

    #[test]
    fn reconcile_with_identical_sets_is_identity(rows in row_map_strategy()) {
        prop_assert_eq!(reconcile(&rows, &rows), rows);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn export_then_import_restores_both_trees((first, second) in tree_pair_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let tr_path = tmp.path().join("tr.json");
        let en_path = tmp.path().join("en.json");
        let sheet_path = tmp.path().join("translations.csv");
        let out_dir = tmp.path().join("out");

        locsheet::write_tree(&first, &tr_path, locsheet::FormatType::Json)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        locsheet::write_tree(&second, &en_path, locsheet::FormatType::Json)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        export_files(
            &[("tr".to_string(), &tr_path), ("en".to_string(), &en_path)],
            &sheet_path,
            &WriteOptions::default(),
        )
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

        import_files(
            &ImportPaths {
                old: sheet_path.clone(),
                new: sheet_path.clone(),
                merged_output: None,
                out_dir: out_dir.clone(),
            },
            &ImportOptions::default(),
        )
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let all_keys: IndexMap<String, ()> = flatten(&first)
            .into_keys()
            .chain(flatten(&second).into_keys())
            .map(|key| (key, ()))
            .collect();

        for (locale, tree) in [("tr", &first), ("en", &second)] {
            let rebuilt = read_tree(out_dir.join(format!("{locale}.js")))
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let rebuilt_flat = flatten(&rebuilt);
            let original_flat = flatten(tree);

            // Keys missing from one locale come back as empty strings.
            for key in all_keys.keys() {
                let expected = original_flat.get(key).map(String::as_str).unwrap_or("");
                prop_assert_eq!(rebuilt_flat.get(key).map(String::as_str), Some(expected));
            }
        }
    }
}
