use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::process::Command; // Run programs
use tempfile::tempdir; // Create temporary directories for testing

// A single void module whose square outline matches itself on every side.
const CATALOG_RON: &str = r#"
(
    modules: [
        (
            name: "void",
            boundaries: {
                "void": [(0.5, 0.5, 0.0), (-0.5, 0.5, 0.0), (-0.5, -0.5, 0.0), (0.5, -0.5, 0.0)],
            },
        ),
    ],
)
"#;

fn write_catalog(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let file_path = dir.path().join("catalog.ron");
    fs::write(&file_path, CATALOG_RON).expect("Failed to write catalog file");
    file_path
}

fn module_forge() -> Command {
    let mut cmd = Command::cargo_bin("module-forge").expect("binary is built");
    cmd.env("RUST_LOG", "info");
    cmd
}

#[test]
fn test_fill_writes_text_grid() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let catalog = write_catalog(&tmp_dir);
    let output_file = tmp_dir.path().join("grid.txt");

    module_forge()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--width", "4", "--height", "3", "--seed", "7"])
        .arg("--output-path")
        .arg(&output_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Module Forge finished"));

    let content = fs::read_to_string(&output_file)?;
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(rows.len(), 3);
    for row in rows {
        let cells: Vec<&str> = row.split(' ').collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|cell| cell.starts_with("void@")), "{row}");
    }
    Ok(())
}

#[test]
fn test_same_seed_same_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let catalog = write_catalog(&tmp_dir);

    let run = |seed: &str| -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let output = module_forge()
            .arg("--catalog")
            .arg(&catalog)
            .args(["--width", "5", "--height", "5", "--seed", seed])
            .args(["--selection", "random-lowest", "--output-format", "csv"])
            .output()?;
        assert!(output.status.success());
        Ok(output.stdout)
    };

    let first = run("11")?;
    assert!(String::from_utf8_lossy(&first).starts_with("x,y,module,rotation"));
    assert_eq!(first, run("11")?);
    Ok(())
}

#[test]
fn test_missing_catalog_fails() {
    module_forge()
        .args(["--width", "2"])
        .env_remove("MODULE_FORGE_CATALOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No module catalog"));
}

#[test]
fn test_unknown_boundary_module_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let catalog = write_catalog(&tmp_dir);

    module_forge()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--void-module", "edge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'edge' is not in the catalog"));
    Ok(())
}

#[test]
fn test_catalog_from_environment_and_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let catalog = write_catalog(&tmp_dir);
    let config_file = tmp_dir.path().join("forge.toml");
    fs::write(&config_file, "width = 2\nheight = 2\nseed = 3\n")?;

    module_forge()
        .env("MODULE_FORGE_CATALOG", &catalog)
        .arg("--config")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("void@").count(4));
    Ok(())
}
