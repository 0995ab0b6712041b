use crate::tests::utils::assert_prints_as;
use crate::tests::utils::defragmenter;
use crate::tests::utils::field_keys;
use crate::tests::utils::find_field;
use crate::tests::utils::inline_fragments;
use crate::tests::utils::operation_selections;
use crate::tests::utils::provenance_of;
use crate::DefragError;
use crate::Defragmenter;
use crate::DefragmenterOptions;
use crate::DEFAULT_MAX_DEPTH;

const SOME_QUERY_DOC: &str = r#"
    query SomeQuery {
        field
        name
        ...SomeFragment
    }

    fragment SomeFragment on SomeType {
        fragmentField
        field
    }
"#;

#[test]
fn merges_fragment_fields_into_operation_scope() {
    let defragmenter = defragmenter(&[SOME_QUERY_DOC]);
    let flattened = defragmenter.flatten("SomeQuery", true).unwrap();

    assert_prints_as(&flattened, r#"
        query SomeQuery {
          field @gql_defrag_source(name: "SomeQuery") @gql_defrag_source(name: "SomeQuery -> SomeFragment")
          fragmentField @gql_defrag_source(name: "SomeQuery -> SomeFragment")
          name @gql_defrag_source(name: "SomeQuery")
        }
    "#);

    let selections = operation_selections(&flattened);
    assert_eq!(field_keys(selections), vec!["field", "fragmentField", "name"]);
    assert_eq!(
        provenance_of(&find_field(selections, "field").directives),
        vec!["SomeQuery", "SomeQuery -> SomeFragment"],
    );
}

#[test]
fn merges_without_provenance() {
    let defragmenter = defragmenter(&[SOME_QUERY_DOC]);
    let flattened = defragmenter.flatten("SomeQuery", false).unwrap();

    assert_prints_as(&flattened, "query SomeQuery { field fragmentField name }");
}

#[test]
fn nested_selections_of_merged_fields_are_unioned() {
    let defragmenter = defragmenter(&[r#"
        query Q {
            user { id }
            ...F
        }

        fragment F on Query {
            user {
                name
                friends { id }
            }
        }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q { user { friends { id } id name } }");

    let flattened = defragmenter.flatten("Q", true).unwrap();
    let user = find_field(operation_selections(&flattened), "user");
    assert_eq!(provenance_of(&user.directives), vec!["Q", "Q -> F"]);

    let user_selections = &user.selection_set.items;
    assert_eq!(field_keys(user_selections), vec!["friends", "id", "name"]);
    assert_eq!(
        provenance_of(&find_field(user_selections, "id").directives),
        vec!["Q -> field user"],
    );
    assert_eq!(
        provenance_of(&find_field(user_selections, "name").directives),
        vec!["Q -> F -> field user"],
    );

    let friends = find_field(user_selections, "friends");
    assert_eq!(
        provenance_of(&find_field(&friends.selection_set.items, "id").directives),
        vec!["Q -> F -> field user -> field friends"],
    );
}

#[test]
fn deeply_nested_duplicates_merge_recursively() {
    let defragmenter = defragmenter(&[r#"
        query Q { a { b { c } } ...F }
        fragment F on T { a { b { d } } }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q { a { b { c d } } }");

    let flattened = defragmenter.flatten("Q", true).unwrap();
    let a = find_field(operation_selections(&flattened), "a");
    let b = find_field(&a.selection_set.items, "b");
    assert_eq!(
        provenance_of(&b.directives),
        vec!["Q -> field a", "Q -> F -> field a"],
    );
    assert_eq!(
        provenance_of(&find_field(&b.selection_set.items, "d").directives),
        vec!["Q -> F -> field a -> field b"],
    );
}

#[test]
fn aliases_are_the_merge_identity() {
    let defragmenter = defragmenter(&[r#"
        query Q {
            small: picture(size: 10)
            picture
            big: picture(size: 100)
            small: picture(size: 10)
        }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, r#"
        query Q {
            big: picture(size: 100)
            picture
            small: picture(size: 10)
        }
    "#);
}

#[test]
fn same_response_key_merges_regardless_of_field_name() {
    let defragmenter = defragmenter(&[r#"
        query Q { x: foo(arg: 1) ...F }
        fragment F on T { x: bar }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q { x: foo(arg: 1) }");
}

#[test]
fn leaf_merged_into_object_field_is_lenient() {
    let defragmenter = defragmenter(&[r#"
        query LeafFirst { user ...WithId }
        query LeafLast { user { name } ...Leaf }
        fragment WithId on Query { user { id } }
        fragment Leaf on Query { user }
    "#]);

    let flattened = defragmenter.flatten("LeafFirst", false).unwrap();
    assert_prints_as(&flattened, "query LeafFirst { user { id } }");

    let flattened = defragmenter.flatten("LeafLast", false).unwrap();
    assert_prints_as(&flattened, "query LeafLast { user { name } }");
}

#[test]
fn inline_fragments_follow_fields_in_traversal_order() {
    let defragmenter = defragmenter(&[r#"
        query Q {
            ... on A { a }
            z
            ...F
            ... on B { b }
        }

        fragment F on T {
            ... on C { c }
            y
        }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, r#"
        query Q {
            y
            z
            ... on A { a }
            ... on C { c }
            ... on B { b }
        }
    "#);
}

#[test]
fn inline_fragments_are_never_deduplicated() {
    let defragmenter = defragmenter(&[r#"
        query Q {
            ... on A { a }
            ... on A { a }
            ...F
        }

        fragment F on T { ... on A { a } }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_eq!(inline_fragments(operation_selections(&flattened)).len(), 3);
}

#[test]
fn inline_fragment_contents_are_flattened() {
    let defragmenter = defragmenter(&[r#"
        query Q { ... on A @include(if: true) { b a ...F } }
        fragment F on A { a c }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(
        &flattened,
        "query Q { ... on A @include(if: true) { a b c } }",
    );
}

#[test]
fn inline_fragment_provenance() {
    let defragmenter = defragmenter(&[r#"
        query Q { ...F }
        fragment F on T { ... on A { x } }
    "#]);

    let flattened = defragmenter.flatten("Q", true).unwrap();
    let inlines = inline_fragments(operation_selections(&flattened));
    assert_eq!(inlines.len(), 1);
    assert_eq!(provenance_of(&inlines[0].directives), vec!["Q -> F"]);
    assert_eq!(
        provenance_of(&find_field(&inlines[0].selection_set.items, "x").directives),
        vec!["Q -> F -> (inline fragment)"],
    );
}

#[test]
fn spread_directives_are_dropped() {
    let defragmenter = defragmenter(&[r#"
        query Q($skip: Boolean!) { ...F @skip(if: $skip) }
        fragment F on T { a }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q($skip: Boolean!) { a }");
}

#[test]
fn other_field_directives_pass_through() {
    let defragmenter = defragmenter(&["query Q { a @include(if: true) }"]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q { a @include(if: true) }");

    let flattened = defragmenter.flatten("Q", true).unwrap();
    assert_prints_as(
        &flattened,
        r#"query Q { a @include(if: true) @gql_defrag_source(name: "Q") }"#,
    );
}

#[test]
fn merged_field_keeps_first_members_directives() {
    let defragmenter = defragmenter(&[r#"
        query Q { a @foo ...F }
        fragment F on T { a @bar }
    "#]);

    let flattened = defragmenter.flatten("Q", false).unwrap();
    assert_prints_as(&flattened, "query Q { a @foo }");

    let flattened = defragmenter.flatten("Q", true).unwrap();
    assert_prints_as(&flattened, r#"
        query Q {
            a @foo @gql_defrag_source(name: "Q") @gql_defrag_source(name: "Q -> F")
        }
    "#);
}

#[test]
fn repeated_spreads_contribute_once_per_occurrence() {
    let defragmenter = defragmenter(&[r#"
        query Q { ...F ...F }
        fragment F on T { a }
    "#]);

    let flattened = defragmenter.flatten("Q", true).unwrap();
    let selections = operation_selections(&flattened);
    assert_eq!(field_keys(selections), vec!["a"]);
    assert_eq!(
        provenance_of(&find_field(selections, "a").directives),
        vec!["Q -> F", "Q -> F"],
    );
}

#[test]
fn unknown_fragment_fails() {
    let defragmenter = defragmenter(&["query Q { a ...Missing }"]);

    let err = defragmenter.flatten("Q", true).unwrap_err();
    assert_eq!(err, DefragError::UnknownFragment {
        fragment_name: "Missing".to_string(),
    });
}

#[test]
fn unknown_fragment_fails_transitively() {
    let defragmenter = defragmenter(&[r#"
        query Q { ...A }
        fragment A on T { b { ... on B { ...Missing } } }
    "#]);

    let err = defragmenter.flatten("Q", false).unwrap_err();
    assert_eq!(err, DefragError::UnknownFragment {
        fragment_name: "Missing".to_string(),
    });
}

#[test]
fn fragment_cycle_hits_recursion_limit() {
    let defragmenter = defragmenter(&[r#"
        query Q { ...A }
        fragment A on T { x ...B }
        fragment B on T { y ...A }
    "#]);

    match defragmenter.flatten("Q", true) {
        Err(DefragError::RecursionLimitExceeded { limit, provenance }) => {
            assert_eq!(limit, DEFAULT_MAX_DEPTH);
            let provenance = provenance.unwrap();
            assert!(provenance.starts_with("Q -> A -> B -> A"), "{provenance}");
        },
        other => panic!("Expected a recursion limit error, found: {other:#?}"),
    }

    assert!(matches!(
        defragmenter.flatten("Q", false),
        Err(DefragError::RecursionLimitExceeded { provenance: None, .. }),
    ));
}

#[test]
fn self_referencing_fragment_hits_recursion_limit() {
    let defragmenter = defragmenter(&[r#"
        query Q { ...A }
        fragment A on T { x { ...A } }
    "#]);

    assert!(matches!(
        defragmenter.flatten("Q", false),
        Err(DefragError::RecursionLimitExceeded { .. }),
    ));
}

#[test]
fn max_depth_is_configurable() {
    let options = DefragmenterOptions::default().with_max_depth(2);

    let mut defragmenter = Defragmenter::with_options(options.clone());
    defragmenter.ingest("query Q { a { b { c } } }").unwrap();
    assert!(defragmenter.flatten("Q", false).is_ok());

    let mut defragmenter = Defragmenter::with_options(options);
    defragmenter.ingest("query Q { a { b { c { d } } } }").unwrap();
    assert_eq!(
        defragmenter.flatten("Q", false).unwrap_err(),
        DefragError::RecursionLimitExceeded {
            limit: 2,
            provenance: None,
        },
    );
}
