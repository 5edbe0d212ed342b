use std::fs;
use tempfile::tempdir;
use wfc_rules::loader::load_from_file;
use wfc_rules::{compile_rules, Direction, LoadError, ModuleId, ModuleState, Rotation};

const SQUARE_RON: &str = r#"
(
    modules: [
        (
            name: "void",
            boundaries: {
                "void": [(0.5, 0.5, 0.0), (-0.5, 0.5, 0.0), (-0.5, -0.5, 0.0), (0.5, -0.5, 0.0)],
            },
        ),
        ( name: "pillar" ),
    ],
)
"#;

// Helper function to write a catalog into a temporary directory
fn write_catalog(dir: &tempfile::TempDir, filename: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(filename);
    fs::write(&path, content).expect("Failed to write catalog file");
    path
}

#[test]
fn test_load_valid_ron() {
    let dir = tempdir().unwrap();
    let path = write_catalog(&dir, "square.ron", SQUARE_RON);

    let catalog = load_from_file(&path).expect("catalog should load");
    assert_eq!(catalog.catalog().len(), 2);
    assert_eq!(catalog.catalog().void_module(), Some(ModuleId(0)));
    assert_eq!(catalog.catalog().find("pillar"), Some(ModuleId(1)));

    let rules = compile_rules(catalog.catalog(), &catalog).unwrap();
    // Void meets itself along a shared edge in every rotation.
    for rotation in Rotation::ALL {
        assert!(rules.check(
            ModuleId(0),
            Direction::Up,
            ModuleState::new(ModuleId(0), rotation)
        ));
    }
    // The pillar has no boundary data at all.
    assert!(!rules.has_rules_for(ModuleId(1)));
}

#[test]
fn test_load_valid_json() {
    let dir = tempdir().unwrap();
    let path = write_catalog(
        &dir,
        "square.JSON",
        r#"{ "modules": [ { "name": "void", "boundaries": { "void": [[0.5, 0.5, 0.0]] } } ] }"#,
    );
    let catalog = load_from_file(&path).expect("catalog should load");
    assert_eq!(catalog.catalog().len(), 1);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let result = load_from_file(&dir.path().join("absent.ron"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_load_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = write_catalog(&dir, "square.yaml", "modules: []");
    assert!(matches!(
        load_from_file(&path),
        Err(LoadError::UnsupportedFormat(ext)) if ext == "yaml"
    ));
}

#[test]
fn test_load_duplicate_module() {
    let dir = tempdir().unwrap();
    let path = write_catalog(
        &dir,
        "dup.ron",
        r#"(modules: [(name: "a"), (name: "a")])"#,
    );
    assert!(matches!(
        load_from_file(&path),
        Err(LoadError::InvalidData(_))
    ));
}
