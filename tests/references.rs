//! Tests for the reference amplification counter, on whole documents.

use safesvg::tests_only::ReferenceGraph;
use safesvg::{Session, ValidationError, Validator};

fn validator(max: u64) -> Validator {
    Validator::new()
        .with_session(Session::new_for_test_suite())
        .with_max_references(max)
}

fn uses(target: &str, n: usize) -> String {
    format!(r##"<use href="#{}"/>"##, target).repeat(n)
}

fn too_many(res: Result<(), ValidationError>) -> bool {
    matches!(res, Err(ValidationError::TooManyReferences { .. }))
}

#[test]
fn nested_layers_are_accepted() {
    let doc = format!(
        r#"<svg><defs><circle id="dot" r="1"/></defs><g id="layer1">{}<g id="sub">{}</g></g></svg>"#,
        uses("dot", 30),
        uses("dot", 30)
    );

    validator(500).validate_str(&doc).unwrap();

    // the outer layer draws the dot 60 times in all
    validator(60).validate_str(&doc).unwrap();
    assert!(too_many(validator(59).validate_str(&doc)));
}

#[test]
fn nested_groups_add_up() {
    let doc = format!(
        r#"<svg><g id="a">{}<g id="b">{}<g id="c">{}</g></g></g></svg>"#,
        uses("x", 10),
        uses("y", 10),
        uses("z", 10)
    );

    validator(30).validate_str(&doc).unwrap();
    assert!(too_many(validator(29).validate_str(&doc)));
}

#[test]
fn wrapped_bomb_is_rejected() {
    let mut doc = String::from(r#"<svg><g id="l0"/>"#);
    for level in 1..8 {
        doc.push_str(&format!(
            r#"<g id="l{}"><g id="w{}">{}</g></g>"#,
            level,
            level,
            uses(&format!("l{}", level - 1), 10)
        ));
    }
    doc.push_str(&uses("l7", 10));
    doc.push_str("</svg>");

    assert!(matches!(
        validator(500).validate_str(&doc),
        Err(ValidationError::TooManyReferences { max: 500, found: 600 })
    ));
}

#[test]
fn forward_references_count() {
    let doc = format!(
        r#"<svg><g id="b">{}</g><g id="a">{}</g></svg>"#,
        uses("a", 10),
        uses("leaf", 10)
    );

    // b draws a ten times, and a draws ten leaves
    validator(100).validate_str(&doc).unwrap();
    assert!(too_many(validator(99).validate_str(&doc)));
}

#[test]
fn reversed_bomb_is_rejected() {
    let mut doc = String::from("<svg>");
    for level in (1..8).rev() {
        doc.push_str(&format!(
            r#"<g id="l{}">{}</g>"#,
            level,
            uses(&format!("l{}", level - 1), 10)
        ));
    }
    doc.push_str(r#"<g id="l0"/></svg>"#);

    assert!(too_many(validator(500).validate_str(&doc)));
}

#[test]
fn duplicate_ids_weigh_as_their_largest_definition() {
    let doc = format!(
        r#"<svg><g id="a">{}</g><g id="a">{}</g><g id="b">{}</g></svg>"#,
        uses("x", 5),
        uses("x", 20),
        uses("a", 3)
    );

    validator(60).validate_str(&doc).unwrap();
    assert!(too_many(validator(59).validate_str(&doc)));
}

#[test]
fn links_to_an_enclosing_element_do_not_amplify() {
    let doc = format!(
        r#"<svg><g id="top">{}<g id="inner">{}</g></g></svg>"#,
        uses("top", 20),
        uses("top", 20)
    );

    validator(40).validate_str(&doc).unwrap();
}

#[test]
fn reference_cycles_are_rejected() {
    let doc = format!(
        r#"<svg><g id="a">{}</g><g id="b">{}</g></svg>"#,
        uses("b", 1),
        uses("a", 1)
    );

    assert!(matches!(
        validator(500).validate_str(&doc),
        Err(ValidationError::TooManyReferences { found: u64::MAX, .. })
    ));
}

#[test]
fn chain_of_uses_with_ids() {
    let mut doc = String::from(r#"<svg><g id="u0"><rect/></g>"#);
    for level in 1..8 {
        doc.push_str(&format!(r#"<g id="g{}">{}</g>"#, level, uses(&format!("u{}", level - 1), 3)));
        doc.push_str(&format!(r##"<use id="u{}" href="#g{}"/>"##, level, level));
    }
    doc.push_str("</svg>");

    assert!(too_many(validator(500).validate_str(&doc)));
}

#[test]
fn references_in_other_attributes_do_not_count() {
    let doc = format!(
        r##"<svg><g id="a">{}</g>{}</svg>"##,
        r##"<rect fill="url(#p)"/>"##.repeat(100),
        r##"<rect clip-path="url(#a)"/>"##.repeat(100)
    );

    validator(10).validate_str(&doc).unwrap();
}

#[test]
fn external_and_empty_fragments_do_not_count() {
    let doc = format!(
        r##"<svg><g id="a">{}{}{}</g></svg>"##,
        r##"<use href="other.svg#a"/>"##.repeat(20),
        r##"<use href="#"/>"##.repeat(20),
        r##"<use href=""/>"##.repeat(20)
    );

    validator(10).validate_str(&doc).unwrap();
}

#[test]
fn graph_reports_peak() {
    let mut graph = ReferenceGraph::new(100, 16);
    let root = graph.root();

    let a = graph.declare(root, "a").unwrap();
    for _ in 0..4 {
        graph.reference(a, "leaf").unwrap();
    }

    let b = graph.declare(root, "b").unwrap();
    for _ in 0..3 {
        graph.reference(b, "a").unwrap();
    }

    assert_eq!(graph.count("a"), Some(3));
    assert_eq!(graph.cost(b), 12);
    assert_eq!(graph.finish().unwrap(), 12);
    assert_eq!(graph.peak(), 12);
}
