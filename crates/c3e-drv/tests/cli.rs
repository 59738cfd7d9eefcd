//! End-to-end CLI coverage for the E1-E7 scenarios and the round-trip
//! property, run against the built `c3ec` binary rather than the library
//! directly.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp source file");
    write!(file, "{contents}").expect("write temp source file");
    file
}

#[test]
fn e1_empty_main_prints_ok_by_default() {
    let file = source_file("void main(){}");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("OK."));
}

#[test]
fn e1_empty_main_verbose_contains_the_synthesized_tail() {
    let file = source_file("void main(){}");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("goto main"))
        .stdout(predicate::str::contains("main:"))
        .stdout(predicate::str::contains("return"));
}

#[test]
fn e2_implicit_conversion_warns_but_succeeds() {
    let file = source_file("int main(){ float x = 1; return 0; }");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "implicit conversion from \"int\" to \"float\"",
        ));
}

#[test]
fn e3_while_loop_with_break_lowers_to_shared_labels() {
    let file = source_file("void main(){ int i=0; while(i<10){ i = i+1; if(i==5) break; } }");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#LB"))
        .stdout(predicate::str::contains("goto #LB"));
}

#[test]
fn e4_remainder_of_non_int_operands_is_fatal() {
    let file = source_file("void main(){ float a=1; int b=2; int c=a%b; }");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Invalid operands for remainder operation: \"float\" and \"int\"",
        ));
}

#[test]
fn e5_undeclared_identifier_is_fatal() {
    let file = source_file("void main(){ y = 1; }");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\"y\" undeclared."));
}

#[test]
fn e6_call_arity_mismatch_is_fatal() {
    let file = source_file("int f(int a){ return a; } void main(){ f(1, 2); }");
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "The function f only expected 1 parameters",
        ));
}

#[test]
fn e7_nested_for_loops_each_get_their_own_labels() {
    let file = source_file(
        "void main(){ int i; int j; for(i=0;i<3;i=i+1){ for(j=0;j<3;j=j+1){ break; } } }",
    );
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn parsing_the_same_program_twice_yields_identical_verbose_output() {
    let file = source_file("void main(){ int i=0; while(i<10){ i = i+1; } }");
    let first = Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .output()
        .unwrap();
    let second = Command::cargo_bin("c3ec")
        .unwrap()
        .arg("-v")
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_input_file_is_a_usage_error() {
    Command::cargo_bin("c3ec").unwrap().assert().failure().code(3);
}

#[test]
fn unreadable_source_path_is_reported_and_exits_nonzero() {
    Command::cargo_bin("c3ec")
        .unwrap()
        .arg("/no/such/file.c3e")
        .assert()
        .failure()
        .code(3);
}
