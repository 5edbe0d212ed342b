use crate::formats::json_format::JsonFormatParser;
use crate::formats::ron_format::RonFormatParser;
use crate::formats::FormatParser;
use crate::{LoadError, PointCloudCatalog};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Picks a parser from the file extension. Files without one are read as RON.
fn parser_for(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        None | Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        Some(other) => Err(LoadError::UnsupportedFormat(other.to_owned())),
    }
}

/// Loads a module catalog and its boundary geometry from a file.
///
/// # Arguments
///
/// * `path` - The path to the catalog file (`.ron` or `.json`).
///
/// # Returns
///
/// A `Result` containing the loaded `PointCloudCatalog` on success,
/// or a `LoadError` on failure.
pub fn load_from_file(path: &Path) -> Result<PointCloudCatalog, LoadError> {
    let parser = parser_for(path)?;
    debug!("Reading {:?} as {}", path, parser.format_name());
    let content = fs::read_to_string(path)?;
    let catalog = parser.parse(&content)?;
    info!(
        "Loaded {} modules from {:?}",
        catalog.catalog().len(),
        path
    );
    Ok(catalog)
}
