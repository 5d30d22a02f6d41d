use proptest::prelude::*;
use tsrefs_fs::NormalizedPath;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

proptest! {
    #[test]
    fn test_normalization_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_clean_is_idempotent(parts in prop::collection::vec(
        prop_oneof![segment(), Just(".".to_string()), Just("..".to_string())],
        0..8,
    )) {
        let path = NormalizedPath::new(format!("/{}", parts.join("/")));
        let once = path.clean();
        prop_assert_eq!(once.clean(), once);
    }

    #[test]
    fn test_resolve_inverts_relative_to(
        base in prop::collection::vec(segment(), 1..5),
        target in prop::collection::vec(segment(), 1..5),
    ) {
        let base = NormalizedPath::new(format!("/{}", base.join("/")));
        let target = NormalizedPath::new(format!("/{}", target.join("/")));

        let relative = target.relative_to(&base).unwrap();
        prop_assert!(!relative.is_absolute());
        prop_assert_eq!(base.resolve(relative.as_str()), target);
    }

    #[test]
    fn test_joined_segment_is_child(
        base in prop::collection::vec(segment(), 0..5),
        child in segment(),
    ) {
        let base = NormalizedPath::new(format!("/{}", base.join("/")));
        let joined = base.join(&child);
        prop_assert!(joined.is_child_of(&base));
        prop_assert!(!base.is_child_of(&joined));
        prop_assert!(!joined.is_child_of(&joined));
    }
}
