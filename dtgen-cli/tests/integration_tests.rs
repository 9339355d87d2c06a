//! Integration tests for dtgen-cli.
//!
//! These tests run the scan, load, generate, write and validate steps the
//! commands are built from against descriptor fixtures and temporary
//! directories.

use std::fs;
use std::path::PathBuf;

use dtgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    generator::ProjectGenerator,
    loader::DescriptorLoader,
    scanner::DescriptorScanner,
    writer::{FileStatus, FileWriter},
};
use dtgen_codegen::ir::{LanguageOptions, EXCEPTIONS_ENABLED};
use dtgen_codegen::DescriptorRegistry;
use tempfile::TempDir;

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixtures() -> DescriptorRegistry {
    let files = DescriptorScanner::new(fixtures_path()).scan().unwrap();
    let (registry, error) = DescriptorLoader::new().load(&files).into_parts();
    assert!(error.is_none(), "{:?}", error);
    registry
}

fn config_for(language: &str, output: &TempDir) -> Config {
    let args = CliArgs {
        output: Some(output.path().to_path_buf()),
        language: Some(language.to_string()),
        ..Default::default()
    };
    ConfigManager::merge_cli_args(Config::default(), &args)
}

/// Create a temporary directory with descriptor files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_fixtures_load_in_path_order() {
    let registry = load_fixtures();
    let names: Vec<&str> = registry
        .descriptors()
        .iter()
        .map(|d| d.full_name.as_str())
        .collect();
    assert_eq!(names, vec!["geo.Path", "geo.Point", "pkg.Msg"]);
    assert_eq!(
        registry.descriptors()[2].source_path.as_deref(),
        Some("pkg/Msg.1.0.json")
    );
    assert!(registry.unresolved_dependencies().is_empty());
}

#[test]
fn test_broken_file_does_not_stop_the_batch() {
    let project = create_temp_project(&[
        ("a/Broken.1.0.json", "{ \"full_name\": "),
        (
            "a/Ok.1.0.json",
            r#"{ "full_name": "a.Ok", "version": { "major": 1, "minor": 0 } }"#,
        ),
    ]);
    let files = DescriptorScanner::new(project.path()).scan().unwrap();
    let (registry, error) = DescriptorLoader::new().load(&files).into_parts();

    assert_eq!(registry.len(), 1);
    assert!(error.unwrap().to_string().contains("Broken.1.0.json"));
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_generate_cpp_headers() {
    let output = TempDir::new().unwrap();
    let config = config_for("cpp", &output);
    let generator = ProjectGenerator::new(&config).unwrap();

    let report = generator.generate(&load_fixtures());
    assert!(report.is_success());
    assert!(report.index.is_empty());
    FileWriter::new(&config.output.dir, false)
        .write_all(report.files())
        .unwrap();

    let header = fs::read_to_string(output.path().join("pkg/Msg_1_0.hpp")).unwrap();
    assert!(header.contains("#ifndef pkg_Msg_1_0_HPP_INCLUDED"));
    assert!(header.contains("options::exceptions_enabled == true,"));
    assert!(header.contains("pkg/Msg.1.0.json is trying to use a support library"));

    let path = fs::read_to_string(output.path().join("geo/Path_1_0.hpp")).unwrap();
    assert!(path.contains("#include \"geo/Point_1_0.hpp\""));
}

#[test]
fn test_generate_rust_module_tree() {
    let output = TempDir::new().unwrap();
    let config = config_for("rust", &output);
    let report = ProjectGenerator::new(&config)
        .unwrap()
        .generate(&load_fixtures());
    assert!(report.is_success());

    FileWriter::new(&config.output.dir, false)
        .write_all(report.files())
        .unwrap();
    for file in ["mod.rs", "geo/mod.rs", "geo/point_1_0.rs", "pkg/msg_1_0.rs"] {
        assert!(output.path().join(file).exists(), "missing {file}");
    }
    let root = fs::read_to_string(output.path().join("mod.rs")).unwrap();
    assert!(root.contains("pub mod geo;\npub mod pkg;\n"));
}

#[test]
fn test_duplicate_descriptors_fail_individually() {
    let msg = r#"{ "full_name": "pkg.Dup", "version": { "major": 1, "minor": 0 } }"#;
    let other = r#"{ "full_name": "pkg.Other", "version": { "major": 1, "minor": 0 } }"#;
    let project = create_temp_project(&[
        ("one/Dup.json", msg),
        ("two/Dup.json", msg),
        ("Other.json", other),
    ]);
    let files = DescriptorScanner::new(project.path()).scan().unwrap();
    let (registry, _) = DescriptorLoader::new().load(&files).into_parts();

    let output = TempDir::new().unwrap();
    let report = ProjectGenerator::new(&config_for("cpp", &output))
        .unwrap()
        .generate(&registry);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.outputs[0].path, "pkg/Other_1_0.hpp");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_detects_stale_and_missing_files() {
    let output = TempDir::new().unwrap();
    let config = config_for("cpp", &output);
    let generator = ProjectGenerator::new(&config).unwrap();
    let registry = load_fixtures();
    let writer = FileWriter::new(&config.output.dir, false);

    // Written with a timestamp, compared without one.
    writer.write_all(generator.generate(&registry).files()).unwrap();
    let expected = generator.generate_normalized(&registry);
    for file in expected.files() {
        assert!(writer.status(file).unwrap().is_up_to_date(), "{}", file.path);
    }

    fs::write(output.path().join("geo/Point_1_0.hpp"), "// edited\n").unwrap();
    fs::remove_file(output.path().join("pkg/Msg_1_0.hpp")).unwrap();
    let statuses: Vec<FileStatus> = expected
        .files()
        .map(|file| writer.status(file).unwrap())
        .collect();
    assert_eq!(
        statuses.iter().filter(|s| matches!(s, FileStatus::Stale(_))).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| matches!(s, FileStatus::Missing(_))).count(),
        1
    );
}

// =============================================================================
// Support library and option check
// =============================================================================

#[test]
fn test_support_files_and_option_check() {
    let output = TempDir::new().unwrap();
    let mut config = config_for("cpp", &output);
    let generator = ProjectGenerator::new(&config).unwrap();

    let files = generator.support().unwrap();
    FileWriter::new(&config.output.dir, false)
        .write_all(&files)
        .unwrap();
    let options = fs::read_to_string(output.path().join("dtgen/support/options.hpp")).unwrap();
    assert!(options.contains("constexpr bool exceptions_enabled = false;"));

    // pkg.Msg asks for exceptions, the default support library has them off.
    let mismatches = generator.check(&load_fixtures());
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].source_file, "pkg/Msg.1.0.json");
    let err = CliError::Mismatch(mismatches);
    assert_eq!(err.exit_code(), 2);

    // Turning exceptions on for the support library moves the mismatch to
    // the descriptors that keep the default.
    config.support = LanguageOptions::new().with(EXCEPTIONS_ENABLED, true);
    let generator = ProjectGenerator::new(&config).unwrap();
    let sources: Vec<String> = generator
        .check(&load_fixtures())
        .into_iter()
        .map(|m| m.source_file)
        .collect();
    assert_eq!(sources, vec!["geo/Path.1.0.json", "geo/Point.1.0.json"]);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_round_trip() {
    let project = create_temp_project(&[("dtgen.toml", ConfigManager::default_config_content())]);
    let path = project.path().join("dtgen.toml");
    let config = ConfigManager::load(Some(path.as_path())).unwrap();
    assert_eq!(config.output.language, "cpp");
    assert_eq!(config.support.get_bool(EXCEPTIONS_ENABLED), Some(false));
    assert!(ProjectGenerator::new(&config).is_ok());
}
