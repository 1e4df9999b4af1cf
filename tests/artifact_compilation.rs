//! Integration tests for compiling artifact definition files.
//!
//! These tests write definition files the way they are shipped, then run
//! the full read, compile and publish pass against them.

use std::fs;
use std::path::Path;

use anyhow::Result;
use proptest::prelude::*;
use tempfile::{NamedTempFile, TempDir};

use artifact_filters::compiler::{expand_recursive_glob, Diagnostic, FindSpecCompiler, SkipReason};
use artifact_filters::config::{ArtifactDefinitionsReader, EnvironmentAttribute};
use artifact_filters::constants::{ARTIFACTS_FILTER_FILE_KEY, MAX_RECURSIVE_GLOB_DEPTH};
use artifact_filters::error::FilterError;
use artifact_filters::store::{KnowledgeBase, KnowledgeStore};
use artifact_filters::{FindSpec, TypeIndicator};

const FILE_DEFINITIONS: &str = r#"name: TestFiles
doc: Test Doc
sources:
- type: FILE
  attributes:
    paths: ['%%environ_systemdrive%%\AUTHORS']
    separator: '\'
labels: [System]
supported_os: [Windows]

---
name: TestFiles2
doc: Test Doc2
sources:
- type: FILE
  attributes:
    paths:
      - '%%environ_systemdrive%%\test_data\*.evtx'
      - '\test_data\testdir\filter_*.txt'
      - '\does_not_exist\some_file_*.txt'
      - 'failing\'
    separator: '\'
labels: [System]
supported_os: [Windows]
"#;

const REGISTRY_DEFINITIONS: &str = r#"name: TestRegistryKey
doc: Test Registry Doc Key
sources:
- type: REGISTRY_KEY
  attributes:
    keys:
      - 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\services\*\*'
      - 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\services\*\Parameters\*'
      - 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\Enum\USBSTOR'
      - 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\Enum\USBSTOR\*'
      - 'HKEY_CURRENT_USER\Software\*'
supported_os: [Windows]
---
name: TestRegistryValue
doc: Test Registry Doc Value
sources:
- type: REGISTRY_VALUE
  attributes:
    key_value_pairs: [{key: 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\Control\Session Manager', value: 'BootExecute'}]
supported_os: [Windows]
"#;

fn write_definitions(content: &str) -> Result<NamedTempFile> {
    let file = NamedTempFile::new()?;
    fs::write(file.path(), content)?;
    Ok(file)
}

fn windows_environment() -> Vec<EnvironmentAttribute> {
    vec![
        EnvironmentAttribute::new("SystemDrive", "C:"),
        EnvironmentAttribute::new("SystemRoot", "C:Windows"),
    ]
}

/// File sources compile to segmented, case-insensitive glob specs
#[test]
fn test_build_find_specs_from_file_definitions() -> Result<()> {
    let definitions = write_definitions(FILE_DEFINITIONS)?;
    let mut store = KnowledgeBase::new();
    let environment = windows_environment();

    let compilation = FindSpecCompiler::default().build_find_specs(
        definitions.path(),
        Some(environment.as_slice()),
        &mut store,
    )?;

    let published = store
        .get_find_specs(ARTIFACTS_FILTER_FILE_KEY)
        .expect("collection should be published");
    assert_eq!(published, compilation.find_specs);

    let files = published.get(TypeIndicator::File).unwrap();
    assert_eq!(files.len(), 4);
    assert_eq!(files[0], FindSpec::file_glob(vec!["AUTHORS".to_string()]));
    assert_eq!(
        files[1],
        FindSpec::file_glob(vec!["test_data".to_string(), "*.evtx".to_string()])
    );
    assert!(!published.contains(TypeIndicator::RegistryKey));

    // Only the relative pattern was skipped
    assert_eq!(compilation.diagnostics.len(), 1);
    match &compilation.diagnostics[0] {
        Diagnostic::PatternSkipped { artifact, pattern, reason } => {
            assert_eq!(artifact, "TestFiles2");
            assert_eq!(pattern, "failing\\");
            assert_eq!(reason, &SkipReason::NotAbsolute);
        }
        other => panic!("unexpected diagnostic: {:?}", other),
    }

    Ok(())
}

/// Registry keys are filtered by hive; values degrade to their keys
#[test]
fn test_build_find_specs_from_registry_definitions() -> Result<()> {
    let definitions = write_definitions(REGISTRY_DEFINITIONS)?;
    let mut store = KnowledgeBase::new();

    let compilation =
        FindSpecCompiler::default().build_find_specs(definitions.path(), None, &mut store)?;

    assert!(!compilation.find_specs.contains(TypeIndicator::File));
    let keys = compilation.find_specs.get(TypeIndicator::RegistryKey).unwrap();
    assert_eq!(keys.len(), 5);
    assert_eq!(
        keys[4],
        FindSpec::registry_key(
            "HKEY_LOCAL_MACHINE\\System\\CurrentControlSet\\Control\\Session Manager"
        )
    );
    assert!(keys
        .iter()
        .all(|spec| matches!(spec, FindSpec::RegistryKey { key_glob } if key_glob.starts_with("HKEY_LOCAL_MACHINE"))));

    assert!(compilation
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::HiveDropped { hive, .. } if hive == "HKEY_CURRENT_USER")));
    assert!(compilation
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::ValueDegraded { value_name, .. } if value_name == "BootExecute")));

    Ok(())
}

/// A missing definitions file is fatal and nothing is published
#[test]
fn test_missing_definitions_file() {
    let mut store = KnowledgeBase::new();
    let result = FindSpecCompiler::default().build_find_specs(
        Path::new("thisfiledoesnotexist"),
        None,
        &mut store,
    );

    assert!(matches!(result, Err(FilterError::Io { .. })));
    assert!(store.get_find_specs(ARTIFACTS_FILTER_FILE_KEY).is_none());
}

/// Structural errors and undefined group members abort the pass
#[test]
fn test_fatal_definition_errors() -> Result<()> {
    let mut store = KnowledgeBase::new();

    let malformed = write_definitions("name: Broken\nsources:\n- type: FILE\n  attributes: {}\n")?;
    let result = FindSpecCompiler::default().build_find_specs(malformed.path(), None, &mut store);
    assert!(matches!(result, Err(FilterError::Configuration { .. })));

    let undefined = write_definitions(
        "name: Group\nsources:\n- type: ARTIFACT_GROUP\n  attributes:\n    names: [NotDefined]\n",
    )?;
    let result = FindSpecCompiler::default().build_find_specs(undefined.path(), None, &mut store);
    assert!(matches!(result, Err(FilterError::Dependency { .. })));

    assert!(store.get_find_specs(ARTIFACTS_FILTER_FILE_KEY).is_none());
    Ok(())
}

/// Unsupported source types are skipped without aborting
#[test]
fn test_unsupported_source_type() -> Result<()> {
    let definitions = write_definitions(
        r#"name: Services
sources:
- type: WMI
  attributes:
    query: SELECT * FROM Win32_Service
- type: FILE
  attributes:
    paths: ['/etc/passwd']
"#,
    )?;
    let mut store = KnowledgeBase::new();

    let compilation =
        FindSpecCompiler::default().build_find_specs(definitions.path(), None, &mut store)?;

    assert_eq!(compilation.find_specs.len(), 1);
    assert_eq!(
        compilation.diagnostics,
        vec![Diagnostic::UnsupportedSource {
            artifact: "Services".to_string(),
            type_indicator: "WMI".to_string(),
        }]
    );
    Ok(())
}

/// A directory of definition files compiles like one concatenated file
#[test]
fn test_definitions_directory() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("files.yaml"), FILE_DEFINITIONS)?;
    fs::write(dir.path().join("registry.yaml"), REGISTRY_DEFINITIONS)?;
    let environment = windows_environment();
    let mut store = KnowledgeBase::new();

    let compilation = FindSpecCompiler::default().build_find_specs(
        dir.path(),
        Some(environment.as_slice()),
        &mut store,
    )?;

    assert_eq!(compilation.definitions_compiled, 4);
    assert_eq!(compilation.find_specs.get(TypeIndicator::File).unwrap().len(), 4);
    assert_eq!(compilation.find_specs.get(TypeIndicator::RegistryKey).unwrap().len(), 5);
    Ok(())
}

/// Compiling the same input twice gives identical collections
#[test]
fn test_compilation_is_idempotent() -> Result<()> {
    let mut content = String::from(FILE_DEFINITIONS);
    content.push_str("---\n");
    content.push_str(REGISTRY_DEFINITIONS);
    let definitions = ArtifactDefinitionsReader::read_str(&content)?;
    let environment = windows_environment();
    let compiler = FindSpecCompiler::default();

    let first = compiler.compile(&definitions, Some(environment.as_slice()));
    let second = compiler.compile(&definitions, Some(environment.as_slice()));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.find_specs)?,
        serde_json::to_string(&second.find_specs)?
    );
    Ok(())
}

/// A second pass replaces the published collection
#[test]
fn test_second_pass_replaces_published_value() -> Result<()> {
    let files = write_definitions(FILE_DEFINITIONS)?;
    let registry = write_definitions(REGISTRY_DEFINITIONS)?;
    let environment = windows_environment();
    let mut store = KnowledgeBase::new();
    let compiler = FindSpecCompiler::default();

    compiler.build_find_specs(files.path(), Some(environment.as_slice()), &mut store)?;
    compiler.build_find_specs(registry.path(), None, &mut store)?;

    let published = store.get_find_specs(ARTIFACTS_FILTER_FILE_KEY).unwrap();
    assert!(!published.contains(TypeIndicator::File));
    assert!(published.contains(TypeIndicator::RegistryKey));
    Ok(())
}

/// Recursive wildcards in file sources respect explicit and default depths
#[test]
fn test_recursive_file_patterns() -> Result<()> {
    let definitions = ArtifactDefinitionsReader::read_str(
        r#"name: Recursive
sources:
- type: FILE
  attributes:
    paths: ['/test_data/**2', '/Users/*/Library/**']
"#,
    )?;

    let compilation = FindSpecCompiler::default().compile(&definitions, None);
    let files = compilation.find_specs.get(TypeIndicator::File).unwrap();

    assert_eq!(files.len(), 12);
    assert_eq!(files[0], FindSpec::file_glob(vec!["test_data".to_string()]));
    assert_eq!(
        files[1],
        FindSpec::file_glob(vec!["test_data".to_string(), "*".to_string()])
    );
    Ok(())
}

/// An oversized depth is clamped and the rest of the pass still compiles
#[test]
fn test_oversized_recursive_depth_is_clamped() -> Result<()> {
    let definitions = ArtifactDefinitionsReader::read_str(
        r#"name: Deep
sources:
- type: FILE
  attributes:
    paths: ['/a/**3000', '/etc/passwd']
"#,
    )?;

    let compilation = FindSpecCompiler::default().compile(&definitions, None);
    let files = compilation.find_specs.get(TypeIndicator::File).unwrap();

    assert_eq!(files.len(), MAX_RECURSIVE_GLOB_DEPTH + 1);
    assert_eq!(
        files[MAX_RECURSIVE_GLOB_DEPTH],
        FindSpec::file_glob(vec!["etc".to_string(), "passwd".to_string()])
    );
    Ok(())
}

proptest! {
    #[test]
    fn prop_default_recursive_glob_has_ten_variants(prefix in "(/[A-Za-z0-9_]{1,8}){1,4}") {
        let variants: Vec<String> = expand_recursive_glob(&format!("{}/**", prefix), '/', 10).collect();
        prop_assert_eq!(variants.len(), 10);
        for (i, variant) in variants.iter().enumerate() {
            prop_assert_eq!(variant, &format!("{}{}", prefix, "/*".repeat(i)));
        }
    }

    #[test]
    fn prop_explicit_recursive_glob_depth(prefix in "(/[A-Za-z0-9_]{1,8}){1,4}", depth in 0usize..20) {
        let count = expand_recursive_glob(&format!("{}/**{}", prefix, depth), '/', 10).count();
        prop_assert_eq!(count, depth);
    }

    #[test]
    fn prop_unsupported_hives_yield_nothing(
        hive in "HKEY_(CURRENT_USER|USERS|CLASSES_ROOT|CURRENT_CONFIG)",
        path in "(\\\\[A-Za-z0-9_*]{1,8}){0,4}",
    ) {
        let definitions = ArtifactDefinitionsReader::read_str(&format!(
            "name: Keys\nsources:\n- type: REGISTRY_KEY\n  attributes:\n    keys: ['{}{}']\n",
            hive, path
        )).unwrap();

        let compilation = FindSpecCompiler::default().compile(&definitions, None);
        prop_assert!(compilation.find_specs.is_empty());
    }
}
