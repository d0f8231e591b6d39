//! Property-based tests for the augmentation primitives
//!
//! # Coverage
//!
//! - `insert_first` - head placement, order preservation
//! - `apply_imports` - presence, idempotence, existing order
//! - `strip_type_arguments` / `link_for_method` - generic suffix removal

use proptest::prelude::*;
use stubwright_lang_java::list::insert_first;
use stubwright_lang_java::{
    apply_imports, link_for_method, strip_type_arguments, FrameworkKind, SourceTree,
};

const IMPORT_POOL: [&str; 6] = [
    "org.junit.Test",
    "org.junit.Assert",
    "org.testng.Assert",
    "org.testng.annotations.Test",
    "junit.framework.TestCase",
    "java.util.List",
];

fn framework() -> impl Strategy<Value = FrameworkKind> {
    prop::sample::select(FrameworkKind::ALL.to_vec())
}

fn existing_imports() -> impl Strategy<Value = Vec<(&'static str, bool)>> {
    prop::sample::subsequence(IMPORT_POOL.to_vec(), 0..=IMPORT_POOL.len())
        .prop_flat_map(|names| {
            let len = names.len();
            (Just(names), prop::collection::vec(any::<bool>(), len))
        })
        .prop_map(|(names, flags)| names.into_iter().zip(flags).collect())
}

fn source_with(imports: &[(&str, bool)]) -> String {
    let mut source = String::from("package p;\n\n");
    for (name, is_static) in imports {
        let keyword = if *is_static { "static " } else { "" };
        source.push_str(&format!("import {}{};\n", keyword, name));
    }
    source.push_str("\nclass T {}\n");
    source
}

// ============================================================================
// Property Tests: insert_first
// ============================================================================

proptest! {
    /// Property: the new element lands at index 0 and the rest shift right in order
    #[test]
    fn prop_insert_first_places_head(list in prop::collection::vec(any::<i32>(), 0..32), x in any::<i32>()) {
        let mut rotated = list.clone();
        insert_first(&mut rotated, x);

        prop_assert_eq!(rotated.len(), list.len() + 1);
        prop_assert_eq!(rotated[0], x);
        prop_assert_eq!(&rotated[1..], &list[..]);
    }
}

// ============================================================================
// Property Tests: apply_imports
// ============================================================================

proptest! {
    /// Property: after applying, every required import is present exactly as often as needed
    #[test]
    fn prop_apply_imports_satisfies_policy(existing in existing_imports(), kind in framework()) {
        let mut tree = SourceTree::parse(&source_with(&existing)).unwrap();
        let policy = kind.policy();
        apply_imports(&mut tree, &policy);

        for required in policy.imports {
            let count = tree.imports().iter().filter(|i| i.name == required.name).count();
            prop_assert!(count >= 1, "{} missing", required.name);
            if !existing.iter().any(|(name, _)| *name == required.name) {
                prop_assert_eq!(count, 1);
            }
        }
    }

    /// Property: a second application adds nothing
    #[test]
    fn prop_apply_imports_idempotent(existing in existing_imports(), kind in framework()) {
        let mut tree = SourceTree::parse(&source_with(&existing)).unwrap();
        let policy = kind.policy();
        apply_imports(&mut tree, &policy);
        let after_first = tree.imports().to_vec();

        prop_assert_eq!(apply_imports(&mut tree, &policy), 0);
        prop_assert_eq!(tree.imports(), &after_first[..]);
    }

    /// Property: existing imports keep their order at the front of the list
    #[test]
    fn prop_apply_imports_preserves_existing(existing in existing_imports(), kind in framework()) {
        let mut tree = SourceTree::parse(&source_with(&existing)).unwrap();
        apply_imports(&mut tree, &kind.policy());

        let names: Vec<_> = tree.imports().iter().map(|i| (i.name.as_str(), i.is_static)).collect();
        prop_assert_eq!(&names[..existing.len()], &existing[..]);
    }
}

// ============================================================================
// Property Tests: parameter stripping
// ============================================================================

proptest! {
    /// Property: any generic suffix is removed from a type name
    #[test]
    fn prop_strip_removes_generic_suffix(base in "[A-Za-z][A-Za-z0-9_.]{0,20}", args in "[A-Za-z<>, ?]{0,20}") {
        let generic = format!("{}<{}>", base, args);
        prop_assert_eq!(strip_type_arguments(&generic), base.as_str());
        prop_assert_eq!(strip_type_arguments(&base), base.as_str());
    }

    /// Property: method links never contain generic brackets
    #[test]
    fn prop_method_link_has_no_type_arguments(params in prop::collection::vec("[A-Za-z]{1,8}(<[A-Za-z, ]{1,8}>)?", 0..5)) {
        let link = link_for_method("Circle", "scale", &params);
        prop_assert!(!link.contains('<'));
        let expected = params.iter().map(|p| strip_type_arguments(p)).collect::<Vec<_>>().join(", ");
        let expected_target = format!("Circle#scale({})", expected);
        prop_assert!(link.contains(&expected_target));
    }
}
