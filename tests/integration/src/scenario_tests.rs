//! Scenario tests over the library API
//!
//! Each scenario builds a monorepo on disk, runs the engine the way the
//! binary would and checks the resulting files and report.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tsrefs_core::{Error, PluginRegistry, SyncEngine, SyncOptions, SyncReport};
use tsrefs_test_utils::TestMonorepo;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn run(repo: &TestMonorepo, check_only: bool) -> tsrefs_core::Result<SyncReport> {
    let options = SyncOptions::builder(repo.root())
        .check_only(check_only)
        .build()?;
    SyncEngine::new(options, &PluginRegistry::builtin()).run()
}

/// A three-layer monorepo: `ui` and `api` depend on `shared`, `web` depends
/// on `ui` and `api`, plus an external dependency everywhere.
fn layered(repo: TestMonorepo) -> TestMonorepo {
    repo.add_package("packages/shared", "@acme/shared", &["lodash"], &[]);
    repo.add_package("packages/ui", "@acme/ui", &["@acme/shared", "react"], &[]);
    repo.add_package("packages/api", "@acme/api", &["@acme/shared"], &["vitest"]);
    repo.add_package("apps/web", "@acme/web", &["@acme/ui"], &["@acme/api"]);
    for dir in ["packages/shared", "packages/ui", "packages/api", "apps/web"] {
        repo.write(&format!("{dir}/tsconfig.json"), "{\n  \"compilerOptions\": {}\n}\n");
    }
    repo
}

fn expected_references() -> [(&'static str, serde_json::Value); 4] {
    [
        ("packages/shared/tsconfig.json", json!(null)),
        ("packages/ui/tsconfig.json", json!([{"path": "../shared"}])),
        ("packages/api/tsconfig.json", json!([{"path": "../shared"}])),
        (
            "apps/web/tsconfig.json",
            json!([{"path": "../../packages/ui"}, {"path": "../../packages/api"}]),
        ),
    ]
}

// =============================================================================
// Check <=> Apply equivalence across package managers
// =============================================================================

#[rstest]
#[case::workspaces(TestMonorepo::workspaces(&["packages/*", "apps/*"]))]
#[case::pnpm(TestMonorepo::pnpm(&["packages/*", "apps/*"]))]
#[case::lerna(TestMonorepo::lerna(&["packages/*", "apps/*"]))]
fn check_fails_exactly_where_apply_writes(#[case] repo: TestMonorepo) {
    let repo = layered(repo);

    let check = run(&repo, true).unwrap();
    assert!(!check.success);
    let drifted: Vec<&str> = check
        .errors
        .iter()
        .map(|e| e.split(' ').next().unwrap_or_default())
        .collect();
    assert_eq!(drifted, vec!["[@acme/web]", "[@acme/api]", "[@acme/ui]"]);

    let apply = run(&repo, false).unwrap();
    assert!(apply.success);
    assert_eq!(apply.actions.len(), 3);

    for (file, references) in expected_references() {
        assert_eq!(repo.read_json(file)["references"], references, "{file}");
    }

    let recheck = run(&repo, true).unwrap();
    assert!(recheck.success, "drift after apply: {:?}", recheck.errors);
}

#[test]
fn apply_is_idempotent_byte_for_byte() {
    let repo = layered(TestMonorepo::workspaces(&["packages/*", "apps/*"]));

    run(&repo, false).unwrap();
    let first = repo.snapshot();
    let second = run(&repo, false).unwrap();

    assert!(second.actions.is_empty());
    assert_eq!(repo.snapshot(), first);
}

#[test]
fn removed_dependency_drops_its_reference() {
    let repo = layered(TestMonorepo::workspaces(&["packages/*", "apps/*"]));
    run(&repo, false).unwrap();

    repo.add_package("apps/web", "@acme/web", &["@acme/ui"], &[]);
    let check = run(&repo, true).unwrap();
    assert_eq!(check.errors.len(), 1);
    assert!(check.errors[0].contains("- references[1]"), "{}", check.errors[0]);

    run(&repo, false).unwrap();
    assert_eq!(
        repo.read_json("apps/web/tsconfig.json")["references"],
        json!([{"path": "../../packages/ui"}])
    );
}

// =============================================================================
// Fatal scenarios
// =============================================================================

#[rstest]
fn self_dependency_aborts_before_any_write(#[values(true, false)] check_only: bool) {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/a", "a", &[], &[]);
    repo.add_package("packages/self", "self", &["a", "self"], &[]);
    repo.write("packages/a/tsconfig.json", "{}");
    repo.write("packages/self/tsconfig.json", "{}");
    let before = repo.snapshot();

    let err = run(&repo, check_only).unwrap_err();

    assert!(err.to_string().contains("'self'"));
    assert!(matches!(err, Error::SelfDependency { .. }));
    assert_eq!(repo.snapshot(), before);
}

#[test]
fn scoped_package_names_resolve() {
    let repo = TestMonorepo::workspaces(&["packages/*", "apps/*"]);
    repo.add_package("packages/shared", "@acme/shared", &[], &[]);
    repo.add_package("apps/web", "@acme/web", &["@acme/shared"], &[]);
    repo.write("apps/web/tsconfig.json", "{}");

    run(&repo, false).unwrap();

    assert_eq!(
        repo.read_json("apps/web/tsconfig.json"),
        json!({"references": [{"path": "../../packages/shared"}]})
    );
}
