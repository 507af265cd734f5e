//! Tests for the `svg-validate` program.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const GOOD: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <!-- a square -->
  <rect id="r" width="10" height="10" fill="green"/>
</svg>
"##;

const BAD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;

fn svg_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".svg").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn svg_validate() -> Command {
    let mut cmd = Command::cargo_bin("svg-validate").unwrap();
    cmd.env_remove("SAFESVG_LOG");
    cmd
}

/// Sibling groups of five references each, amplifying to 125.
fn bomb() -> String {
    let mut doc = String::from(r#"<svg><g id="l0"/>"#);
    for level in 1..4 {
        doc.push_str(&format!(r#"<g id="l{}">"#, level));
        for _ in 0..5 {
            doc.push_str(&format!(r##"<use href="#l{}"/>"##, level - 1));
        }
        doc.push_str("</g>");
    }
    doc.push_str("</svg>");
    doc
}

#[test]
fn version() {
    svg_validate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("svg-validate version "));
}

#[test]
fn no_arguments_is_usage_error() {
    svg_validate().assert().failure().code(2);
}

#[test]
fn accepts_good_file() {
    let file = svg_file(GOOD);

    svg_validate()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK "));
}

#[test]
fn rejects_bad_file() {
    let file = svg_file(BAD);

    svg_validate()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("invalid element: script"));
}

#[test]
fn reports_every_file() {
    let good = svg_file(GOOD);
    let bad = svg_file(BAD);

    svg_validate()
        .arg(good.path())
        .arg(bad.path())
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains(format!("OK {}", good.path().display()))
                .and(predicate::str::contains(format!("{}: ", bad.path().display()))),
        );
}

#[test]
fn missing_file() {
    svg_validate()
        .arg("this/file/does/not/exist.svg")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("exist.svg: "));
}

#[test]
fn max_references() {
    let file = svg_file(&bomb());

    svg_validate().arg(file.path()).assert().success();

    svg_validate()
        .arg("--max-references=100")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("too many references"));
}

#[test]
fn max_references_must_be_a_number() {
    let file = svg_file(GOOD);

    svg_validate()
        .arg("--max-references=lots")
        .arg(file.path())
        .assert()
        .failure()
        .code(2);
}

#[test]
fn permissive_data_urls() {
    let file = svg_file(r#"<svg><image href="data:garbage"/></svg>"#);

    svg_validate().arg(file.path()).assert().code(1);

    svg_validate()
        .arg("--permissive-data-urls")
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn minify_prints_document() {
    let file = svg_file(GOOD);

    svg_validate()
        .arg("--minify")
        .arg(file.path())
        .assert()
        .success()
        .stdout(r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect id="r" width="10" height="10" fill="green"/></svg>"#)
        .stderr(predicate::str::starts_with("OK "));
}

#[test]
fn minify_prints_nothing_for_rejected_document() {
    let file = svg_file(BAD);

    svg_validate()
        .arg("--minify")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid element: script"));
}

#[test]
fn minify_needs_exactly_one_file() {
    let a = svg_file(GOOD);
    let b = svg_file(GOOD);

    svg_validate()
        .arg("--minify")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly one input"));
}
