//! End-to-end tests for `svgweld graph`.

use predicates::prelude::*;

mod common;
use common::{TestBuild, defs_and_logo};

#[test]
fn prints_cross_file_dependency_tree() {
    let project = TestBuild::new().unwrap();
    defs_and_logo(&project).unwrap();

    project
        .command()
        .arg("graph")
        .arg("--src")
        .arg("src")
        .arg("logo.svg")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("logo.svg\n"))
        .stdout(predicate::str::contains("defs.svg#icon"))
        .stdout(predicate::str::contains("└──"));
}

#[test]
fn chained_definitions_show_nested() {
    let project = TestBuild::new().unwrap();
    project
        .write_source(
            "defs.svg",
            r##"<svg><symbol id="a"><use href="#c"/></symbol><circle id="c"/></svg>"##,
        )
        .unwrap();
    project
        .write_source("logo.svg", r#"<svg><use href="defs.svg#a"/></svg>"#)
        .unwrap();

    project
        .command()
        .arg("graph")
        .arg("--src")
        .arg("src")
        .arg("logo.svg")
        .assert()
        .success()
        .stdout(predicate::str::contains("defs.svg#a"))
        .stdout(predicate::str::contains("defs.svg#c"));
}

#[test]
fn file_without_references_prints_placeholder() {
    let project = TestBuild::new().unwrap();
    project
        .write_source("plain.svg", r#"<svg><rect width="4"/></svg>"#)
        .unwrap();

    project
        .command()
        .arg("graph")
        .arg("--src")
        .arg("src")
        .arg("plain.svg")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no references)"));
}

#[test]
fn unknown_file_fails() {
    let project = TestBuild::new().unwrap();
    project.write_source("a.svg", "<svg/>").unwrap();

    project
        .command()
        .arg("graph")
        .arg("--src")
        .arg("src")
        .arg("missing.svg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.svg"));
}
