//! End-to-end pipeline tests through the library API with a scripted backend

mod common;

use std::path::PathBuf;

use common::{ScriptedBackend, TestProject, VALID_MANIFEST, no_ci};
use kodegen_bundler_action::bundler::{BuildOptions, Builder, BundleOutput, MODULE_MARKER};
use kodegen_bundler_action::config::{
    ConfigLoader, Configuration, LoadOptions, PartialConfiguration, PartialEntries,
    StaticModuleLoader, resolve,
};
use kodegen_bundler_action::entries::EntryRole;
use kodegen_bundler_action::facade::{ActionBundler, ConfigSource, FacadeBuildOptions};
use kodegen_bundler_action::validation::{ValidateOptions, Validator};

fn facade(
    project: &TestProject,
    source: ConfigSource,
    backend: ScriptedBackend,
) -> ActionBundler<ScriptedBackend, StaticModuleLoader, std::collections::HashMap<String, String>> {
    ActionBundler::with_parts(&project.path, source, backend, StaticModuleLoader, no_ci())
}

#[tokio::test]
async fn missing_manifest_is_only_a_warning() {
    let project = TestProject::new();
    project.write_file("src/main.ts", "export {};");

    let result = Validator::with_env(no_ci())
        .validate(
            &Configuration::default(),
            &ValidateOptions::new(&project.path).strict(false),
        )
        .await
        .expect("validation result");

    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, "ACTION_YML_MISSING");
}

#[tokio::test]
async fn node20_runtime_is_exactly_one_error() {
    let project = TestProject::new();
    project
        .write_file("src/main.ts", "export {};")
        .write_file("action.yml", &VALID_MANIFEST.replace("node24", "node20"));

    let result = Validator::with_env(no_ci())
        .validate(&Configuration::default(), &ValidateOptions::new(&project.path))
        .await
        .expect("validation result");

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, "ACTION_YML_SCHEMA_ERROR");
    assert!(result.errors[0].message.contains("runs.using"));
}

#[tokio::test]
async fn one_failing_entry_of_three() {
    let project = TestProject::new();
    project
        .write_file("src/main.ts", "export {};")
        .write_file("src/pre.ts", "export {};")
        .write_file("src/post.ts", "export {};");

    let builder = Builder::new(ScriptedBackend::new().failing("pre", "Could not resolve \"nope\""));
    let result = builder
        .build(&Configuration::default(), &BuildOptions::new(&project.path))
        .await
        .expect("build result");

    assert!(!result.success);
    assert_eq!(result.entries.len(), 3);
    assert_eq!(builder.backend().calls(), vec!["main", "pre", "post"]);
    assert_eq!(result.failed_roles(), vec![EntryRole::Pre]);
    assert!(project.file_exists("dist/main.js"));
    assert!(!project.file_exists("dist/pre.js"));
    assert!(project.file_exists("dist/post.js"));
    assert_eq!(project.read_file("dist/package.json"), MODULE_MARKER);
}

#[tokio::test]
async fn configured_project_builds_through_facade() {
    let project = TestProject::new();
    project
        .write_file("action.yml", VALID_MANIFEST)
        .write_file("lib/index.ts", "export {};")
        .write_file("src/post.ts", "export {};")
        .write_file(
            "action.config.json",
            r#"{
              "entries": { "main": "lib/index.ts" },
              "build": { "minify": false, "sourceMap": true, "target": "es2024" },
              "validation": { "strict": true }
            }"#,
        );

    let backend = ScriptedBackend::new().producing(
        "index",
        BundleOutput {
            code: b"console.log('main')".to_vec(),
            source_map: Some(b"{\"version\":3}".to_vec()),
            assets: Vec::new(),
        },
    );
    let bundler = facade(&project, ConfigSource::Auto, backend);

    let report = bundler.build(FacadeBuildOptions::default()).await;
    assert!(report.success, "{:?}", report.error);

    let validation = report.validation.expect("validation ran");
    assert!(validation.valid);
    assert!(validation.strict);

    let build = report.build.expect("build ran");
    let roles: Vec<EntryRole> = build.entries.iter().map(|e| e.role).collect();
    assert_eq!(roles, vec![EntryRole::Main, EntryRole::Post]);
    assert_eq!(project.read_file("dist/main.js"), "console.log('main')");
    assert_eq!(project.read_file("dist/main.js.map"), "{\"version\":3}");
    assert_eq!(
        bundler.config_file(),
        Some(project.path.join("action.config.json").as_path())
    );
}

#[tokio::test]
async fn validation_failure_stops_the_build() {
    let project = TestProject::new();
    project
        .write_file("src/main.ts", "export {};")
        .write_file("action.yml", "name: [unterminated\n");

    let bundler = facade(&project, ConfigSource::Auto, ScriptedBackend::new());
    let report = bundler.build(FacadeBuildOptions::default()).await;

    assert!(!report.success);
    assert!(report.build.is_none());
    let validation = report.validation.expect("validation result attached");
    assert_eq!(validation.errors[0].code, "ACTION_YML_SYNTAX_ERROR");
    assert!(!project.file_exists("dist"));
}

#[tokio::test]
async fn missing_main_fails_build_even_without_validation() {
    let project = TestProject::new();
    let bundler = facade(&project, ConfigSource::Auto, ScriptedBackend::new());

    let report = bundler
        .build(FacadeBuildOptions {
            skip_validation: true,
            ..Default::default()
        })
        .await;

    assert!(!report.success);
    assert!(
        report
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Main entry point not found"))
    );
}

#[tokio::test]
async fn inline_configuration_overrides_entries() {
    let project = TestProject::new();
    project.write_file("app/run.ts", "export {};");

    let bundler = facade(
        &project,
        ConfigSource::Inline(PartialConfiguration {
            entries: Some(PartialEntries {
                main: Some("app/run.ts".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ScriptedBackend::new(),
    );
    let report = bundler
        .build(FacadeBuildOptions {
            strict: Some(false),
            ..Default::default()
        })
        .await;

    assert!(report.success, "{:?}", report.error);
    assert_eq!(project.read_file("dist/main.js"), "// run\n");
}

#[tokio::test]
async fn invalid_config_file_is_reported() {
    let project = TestProject::new();
    project
        .write_file("src/main.ts", "export {};")
        .write_file("action.config.yaml", "build:\n  target: es5\n  minify: maybe\n");

    let err = ConfigLoader::new(StaticModuleLoader)
        .load(&LoadOptions::new(&project.path))
        .await
        .expect_err("invalid config");
    let message = err.to_string();
    assert!(message.contains("build.target"), "{message}");
    assert!(message.contains("build.minify"), "{message}");

    let bundler = facade(&project, ConfigSource::Auto, ScriptedBackend::new());
    let report = bundler.validate(None).await;
    assert!(!report.success);
    assert!(report.value.is_none());
}

#[test]
fn resolve_is_idempotent() {
    let partial = PartialConfiguration {
        entries: Some(PartialEntries {
            post: Some("src/cleanup.ts".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let first = resolve(partial.clone());
    let second = resolve(partial);
    assert_eq!(first, second);
    assert_eq!(first.entries.main, "src/main.ts");
    assert_eq!(first.entries.post.as_deref(), Some("src/cleanup.ts"));
    assert_eq!(PathBuf::from(&first.entries.main), PathBuf::from("src/main.ts"));
}
