use crate::{LoadError, PointCloudCatalog};

/// Trait defining the interface for format-specific catalog parsers.
///
/// Implementors of this trait can parse module catalogs from different file
/// formats (e.g., RON, JSON).
pub trait FormatParser {
    /// Parses catalog content into modules and their boundary geometry.
    ///
    /// # Arguments
    ///
    /// * `content` - A string slice containing the catalog content
    ///
    /// # Returns
    ///
    /// * `Ok(PointCloudCatalog)` - Successfully parsed catalog
    /// * `Err(LoadError)` - Error encountered during parsing
    fn parse(&self, content: &str) -> Result<PointCloudCatalog, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// This can be used for debugging, logging, or user-facing error messages.
    fn format_name(&self) -> &'static str;
}
