//! CLI integration tests for oas-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("oas-schema"))
}

// Helper to create a temp schema file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod check_command {
    use super::*;

    #[test]
    fn valid_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "pet.json",
            r#"{
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "name": { "type": "string" }
                },
                "required": ["id"]
            }"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid object schema"));
    }

    #[test]
    fn typo_is_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "typo.json",
            r#"{ "oneOff": [{ "type": "string" }] }"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("/oneOff"));
    }

    #[test]
    fn read_write_conflict_is_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "flag.json",
            r#"{ "type": "boolean", "readOnly": true, "writeOnly": true }"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("constraint violation"));
    }

    #[test]
    fn json_output_valid() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "empty.json", "{}");

        cmd()
            .args(["check", schema.to_str().unwrap(), "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"valid":true,"kind":"undefined"}"#,
            ));
    }

    #[test]
    fn json_output_invalid_reports_path() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "bad.json",
            r#"{ "type": "array", "items": { "type": "strin" } }"#,
        );

        cmd()
            .args(["check", schema.to_str().unwrap(), "--json"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""path":"/items/type""#));
    }

    #[test]
    fn missing_file() {
        cmd()
            .args(["check", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "broken.json", "{ not json");

        cmd()
            .args(["check", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod canonicalize_command {
    use super::*;

    #[test]
    fn sorts_members() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{ "type": "string", "maxLength": 10, "format": "date" }"#,
        );

        cmd()
            .args(["canonicalize", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"format":"date","maxLength":10,"type":"string"}"#,
            ));
    }

    #[test]
    fn keeps_property_order() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{
                "type": "object",
                "required": ["b"],
                "properties": {
                    "b": { "type": "boolean" },
                    "a": { "type": "boolean" }
                }
            }"#,
        );

        cmd()
            .args(["canonicalize", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"properties":{"b":{"type":"boolean"},"a":{"type":"boolean"}},"required":["b"],"type":"object"}"#,
            ));
    }

    #[test]
    fn pretty() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"boolean"}"#);

        cmd()
            .args(["canonicalize", schema.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n  \"type\": \"boolean\"\n}"));
    }

    #[test]
    fn output_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"description":"hello world"}"#,
        );
        let output = dir.path().join("output.json");

        cmd()
            .args([
                "canonicalize",
                schema.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, r#"{"description":"hello world"}"#);
    }

    #[test]
    fn invalid_schema_fails() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r##"{"$ref":"#/components/schemas/Pet","nullable":true}"##,
        );

        cmd()
            .args(["canonicalize", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());
    }
}
