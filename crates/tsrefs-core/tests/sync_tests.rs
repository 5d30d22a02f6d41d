//! Synchronization runs over on-disk monorepos

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tsrefs_core::{Error, PluginRegistry, SyncEngine, SyncOptions, SyncOptionsBuilder, SyncReport};
use tsrefs_test_utils::TestMonorepo;

fn run_with(
    repo: &TestMonorepo,
    configure: impl FnOnce(SyncOptionsBuilder) -> SyncOptionsBuilder,
) -> tsrefs_core::Result<SyncReport> {
    let options = configure(SyncOptions::builder(repo.root())).build()?;
    SyncEngine::new(options, &PluginRegistry::builtin()).run()
}

fn apply(repo: &TestMonorepo) -> SyncReport {
    run_with(repo, |b| b).unwrap()
}

fn check(repo: &TestMonorepo) -> SyncReport {
    run_with(repo, |b| b.check_only(true)).unwrap()
}

#[test]
fn apply_adds_reference_and_leaves_dependency_free_package_alone() {
    let repo = TestMonorepo::core_and_app();

    let report = apply(&repo);

    assert!(report.success);
    assert_eq!(report.actions, vec!["Updated packages/app/tsconfig.json"]);
    assert_eq!(repo.read("packages/core/tsconfig.json"), "{}");
    assert_eq!(
        repo.read("packages/app/tsconfig.json"),
        "{\n  \"references\": [\n    {\n      \"path\": \"../core\"\n    }\n  ]\n}"
    );
}

#[test]
fn check_before_apply_reports_only_the_drifted_package() {
    let repo = TestMonorepo::core_and_app();
    let before = repo.snapshot();

    let report = check(&repo);

    assert!(!report.success);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("[app] packages/app/tsconfig.json"));
    assert!(report.errors[0].contains("../core"));
    assert_eq!(repo.snapshot(), before, "check mode must not write");
}

#[test]
fn check_after_apply_succeeds() {
    let repo = TestMonorepo::core_and_app();
    apply(&repo);

    let report = check(&repo);
    assert!(report.success, "unexpected errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[test]
fn second_apply_is_byte_identical() {
    let repo = TestMonorepo::core_and_app();
    repo.add_package("packages/util", "util", &["core"], &["app"]);
    repo.write(
        "packages/util/tsconfig.json",
        "{\n  // shared helpers\n  \"compilerOptions\": { \"strict\": true },\n}\n",
    );

    apply(&repo);
    let first = repo.snapshot();
    let report = apply(&repo);

    assert!(report.actions.is_empty(), "second run wrote: {:?}", report.actions);
    assert_eq!(repo.snapshot(), first);
}

#[rstest]
#[case::check(true)]
#[case::apply(false)]
fn self_dependency_is_fatal(#[case] check_only: bool) {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/self", "self", &["self"], &[]);
    repo.write("packages/self/tsconfig.json", "{}");

    let err = run_with(&repo, |b| b.check_only(check_only)).unwrap_err();

    assert!(matches!(&err, Error::SelfDependency { package, .. } if package == "self"));
    assert!(err.to_string().contains("packages/self"));
    assert_eq!(repo.read("packages/self/tsconfig.json"), "{}");
}

#[test]
fn external_dependencies_never_become_references() {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/core", "core", &[], &[]);
    repo.add_package("packages/app", "app", &["react", "core"], &["typescript"]);
    repo.write("packages/app/tsconfig.json", "{}");

    apply(&repo);

    assert_eq!(
        repo.read_json("packages/app/tsconfig.json"),
        json!({"references": [{"path": "../core"}]})
    );
}

#[test]
fn dependency_in_both_sections_yields_one_reference() {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/core", "core", &[], &[]);
    repo.add_package("packages/app", "app", &["core"], &["core"]);
    repo.write("packages/app/tsconfig.json", "{}");

    apply(&repo);

    assert_eq!(
        repo.read_json("packages/app/tsconfig.json"),
        json!({"references": [{"path": "../core"}]})
    );
}

#[test]
fn stale_references_are_replaced() {
    let repo = TestMonorepo::core_and_app();
    repo.write(
        "packages/core/tsconfig.json",
        r#"{"references": [{"path": "../removed"}]}"#,
    );

    apply(&repo);

    assert_eq!(repo.read_json("packages/core/tsconfig.json"), json!({"references": []}));
}

#[test]
fn allowlist_expands_exactly_one_level() {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/c", "c", &[], &[]);
    repo.add_package("packages/b", "b", &["c"], &[]);
    repo.add_package("packages/a", "a", &["b"], &[]);
    for dir in ["a", "b", "c"] {
        repo.write(&format!("packages/{dir}/tsconfig.json"), "{}");
    }
    // c would only change if it were processed
    repo.write("packages/c/tsconfig.json", r#"{"references": [{"path": "../x"}]}"#);

    let report = run_with(&repo, |b| b.only_packages(["a"])).unwrap();

    assert_eq!(
        report.actions,
        vec![
            "Updated packages/a/tsconfig.json",
            "Updated packages/b/tsconfig.json"
        ]
    );
    assert_eq!(
        repo.read_json("packages/c/tsconfig.json"),
        json!({"references": [{"path": "../x"}]})
    );
}

#[test]
fn unknown_allowlisted_package_is_fatal() {
    let repo = TestMonorepo::core_and_app();
    let err = run_with(&repo, |b| b.only_packages(["missing"])).unwrap_err();
    assert!(matches!(err, Error::UnknownPackage { name } if name == "missing"));
}

#[test]
fn path_filter_processes_strict_descendants_only() {
    let repo = TestMonorepo::workspaces(&["packages/*", "apps/*"]);
    repo.add_package("packages/core", "core", &[], &[]);
    repo.add_package("apps/web", "web", &["core"], &[]);
    repo.add_package("packages/app", "app", &["core"], &[]);
    repo.write("apps/web/tsconfig.json", "{}");
    repo.write("packages/app/tsconfig.json", "{}");

    let report = run_with(&repo, |b| b.only_on_path(repo.path("apps"))).unwrap();

    assert_eq!(report.actions, vec!["Updated apps/web/tsconfig.json"]);
    assert_eq!(repo.read("packages/app/tsconfig.json"), "{}");
}

#[test]
fn path_filter_does_not_match_the_package_itself() {
    let repo = TestMonorepo::core_and_app();
    let report = run_with(&repo, |b| b.only_on_path(repo.path("packages/app"))).unwrap();
    assert!(report.actions.is_empty());
}

#[test]
fn packages_without_tsconfig_are_skipped() {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/core", "core", &[], &[]);
    repo.add_package("packages/app", "app", &["core"], &[]);

    let report = apply(&repo);

    assert!(report.success);
    assert!(report.actions.is_empty());
    repo.assert_file_not_exists("packages/app/tsconfig.json");
}

#[test]
fn no_supported_plugin_is_fatal() {
    let repo = TestMonorepo::new();
    let err = run_with(&repo, |b| b).unwrap_err();
    assert!(matches!(&err, Error::NoSupportedPlugin { tried, .. } if tried == "workspaces, pnpm, lerna"));
}

#[test]
fn optional_mutations_are_applied() {
    let repo = TestMonorepo::core_and_app();
    repo.write("tsconfig.base.json", "{}");
    repo.write("packages/app/tsconfig.json", r#"{"include": ["src"]}"#);

    run_with(&repo, |b| {
        b.add_composite(true)
            .add_root_dir("src")
            .add_extends(repo.path("tsconfig.base.json"))
            .add_include(["src", "test"])
    })
    .unwrap();

    assert_eq!(
        repo.read_json("packages/app/tsconfig.json"),
        json!({
            "include": ["src", "test"],
            "compilerOptions": {"composite": true, "rootDir": "src"},
            "extends": "../../tsconfig.base.json",
            "references": [{"path": "../core"}]
        })
    );
}

#[test]
fn comments_survive_apply() {
    let repo = TestMonorepo::core_and_app();
    repo.write(
        "packages/app/tsconfig.json",
        "{\n  // compiler settings\n  \"compilerOptions\": {\n    \"strict\": true /* always */\n  }\n}\n",
    );

    apply(&repo);

    let content = repo.read("packages/app/tsconfig.json");
    assert!(content.contains("// compiler settings"));
    assert!(content.contains("/* always */"));
    assert!(content.contains("\"path\": \"../core\""));
}

#[test]
fn check_after_apply_with_comments_and_mutations() {
    let repo = TestMonorepo::core_and_app();
    repo.write(
        "packages/app/tsconfig.json",
        "{\n  // compiler settings\n  \"compilerOptions\": {\n    \"strict\": true /* always */\n  },\n  \"include\": [\"lib\"], // sources\n}\n",
    );
    let configure = |b: SyncOptionsBuilder| b.add_composite(true).add_include(["src"]);

    let applied = run_with(&repo, configure).unwrap();
    assert!(applied.success, "unexpected errors: {:?}", applied.errors);
    let content = repo.read("packages/app/tsconfig.json");
    assert!(content.contains("// compiler settings"));
    assert!(content.contains("\"strict\": true, /* always */"));
    assert!(content.contains("// sources"));

    let checked = run_with(&repo, |b| configure(b).check_only(true)).unwrap();
    assert!(checked.success, "unexpected errors: {:?}", checked.errors);

    let after_check = repo.snapshot();
    let again = run_with(&repo, configure).unwrap();
    assert!(again.actions.is_empty(), "second run wrote: {:?}", again.actions);
    assert_eq!(repo.snapshot(), after_check);
}

#[test]
fn remove_comments_rewrites_as_plain_json() {
    let repo = TestMonorepo::core_and_app();
    repo.write(
        "packages/core/tsconfig.json",
        "{\n  // no deps here\n  \"compilerOptions\": {}\n}\n",
    );

    let report = run_with(&repo, |b| b.remove_comments(true).indentation(4)).unwrap();

    assert!(report.actions.contains(&"Updated packages/core/tsconfig.json".to_string()));
    assert_eq!(
        repo.read("packages/core/tsconfig.json"),
        "{\n    \"compilerOptions\": {}\n}\n"
    );
}

#[rstest]
#[case(2, "{\n  \"references\": [\n    {\n      \"path\": \"../core\"\n    }\n  ]\n}")]
#[case(4, "{\n    \"references\": [\n        {\n            \"path\": \"../core\"\n        }\n    ]\n}")]
fn indentation_controls_inserted_text(#[case] indentation: usize, #[case] expected: &str) {
    let repo = TestMonorepo::core_and_app();
    run_with(&repo, |b| b.indentation(indentation)).unwrap();
    assert_eq!(repo.read("packages/app/tsconfig.json"), expected);
}

#[test]
fn custom_tsconfig_path() {
    let repo = TestMonorepo::workspaces(&["packages/*"]);
    repo.add_package("packages/core", "core", &[], &[]);
    repo.add_package("packages/app", "app", &["core"], &[]);
    repo.write("packages/app/tsconfig.build.json", "{}");

    let report = run_with(&repo, |b| b.tsconfig_path("tsconfig.build.json")).unwrap();

    assert_eq!(report.actions, vec!["Updated packages/app/tsconfig.build.json"]);
    repo.assert_file_not_exists("packages/app/tsconfig.json");
}

#[test]
fn esm_tsconfig_is_generated_once_in_apply_mode() {
    let repo = TestMonorepo::core_and_app();
    let esm = Some(tsrefs_core::EsmOptions::default());

    let report = run_with(&repo, |b| b.check_only(true).esm(esm.clone())).unwrap();
    assert!(!report.success);
    repo.assert_file_not_exists("packages/app/tsconfig.module.json");

    let report = run_with(&repo, |b| b.esm(esm.clone())).unwrap();
    assert!(report.actions.contains(&"Generated packages/app/tsconfig.module.json".to_string()));
    assert!(report.actions.contains(&"Generated packages/core/tsconfig.module.json".to_string()));
    assert_eq!(
        repo.read_json("packages/app/tsconfig.module.json"),
        json!({
            "extends": "./tsconfig.json",
            "compilerOptions": {"module": "ESNext", "moduleResolution": "node", "outDir": "./module/"}
        })
    );

    repo.write("packages/app/tsconfig.module.json", "{ /* mine */ }");
    let report = run_with(&repo, |b| b.esm(esm.clone())).unwrap();
    assert!(report.actions.is_empty());
    assert_eq!(repo.read("packages/app/tsconfig.module.json"), "{ /* mine */ }");
}

#[test]
fn malformed_tsconfig_is_fatal() {
    let repo = TestMonorepo::core_and_app();
    repo.write("packages/app/tsconfig.json", "{ \"compilerOptions\": ");

    let err = run_with(&repo, |b| b).unwrap_err();
    assert!(matches!(err, Error::InvalidTsconfig { .. }));
}
