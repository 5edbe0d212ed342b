use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::schema::CatalogFile;
use crate::{LoadError, PointCloudCatalog};

/// A parser implementation for RON (Rusty Object Notation) catalogs.
///
/// ```ron
/// (
///     modules: [
///         (name: "void", boundaries: { "void": [(0.5, 0.5, 0.0), (-0.5, 0.5, 0.0)] }),
///     ],
/// )
/// ```
pub struct RonFormatParser;

impl Default for RonFormatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, ron_content: &str) -> Result<PointCloudCatalog, LoadError> {
        let file: CatalogFile = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        file.into_catalog()
    }

    /// Stub implementation when the `serde` feature is not enabled.
    #[cfg(not(feature = "serde"))]
    fn parse(&self, _ron_content: &str) -> Result<PointCloudCatalog, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_string(),
        ))
    }
}

/// Parses a module catalog written in RON.
pub fn parse_ron_catalog(ron_content: &str) -> Result<PointCloudCatalog, LoadError> {
    RonFormatParser::new().parse(ron_content)
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::{BoundaryCategory, BoundarySource, ModuleId};

    #[test]
    fn parses_modules_in_order() {
        let content = r#"
            (
                modules: [
                    (name: "void", boundaries: { "void": [(0.5, 0.5, 0.0), (-0.5, 0.5, 0.0)] }),
                    (name: "room", boundaries: {
                        "floor": [(0.5, 0.5, 0.0)],
                        "wall": [(0.5, 0.5, 1.0), (0.5, 0.0, 1.0)],
                    }),
                ],
            )
        "#;
        let catalog = parse_ron_catalog(content).unwrap();
        assert_eq!(catalog.catalog().len(), 2);
        assert_eq!(catalog.catalog().void_module(), Some(ModuleId(0)));
        assert_eq!(
            catalog.categories(ModuleId(1)),
            vec![BoundaryCategory::Wall, BoundaryCategory::Floor]
        );
        assert_eq!(
            catalog
                .local_points(ModuleId(1), BoundaryCategory::Wall)
                .map(<[_]>::len),
            Some(2)
        );
    }

    #[test]
    fn unknown_category_is_invalid() {
        let content = r#"(modules: [(name: "x", boundaries: { "roof": [] })])"#;
        assert!(matches!(
            parse_ron_catalog(content),
            Err(LoadError::InvalidData(_))
        ));
    }

    #[test]
    fn malformed_content_is_parse_error() {
        assert!(matches!(
            parse_ron_catalog("(modules: [(name: 3)])"),
            Err(LoadError::ParseError(_))
        ));
    }
}
