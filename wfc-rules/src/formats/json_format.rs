use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::schema::CatalogFile;
use crate::{LoadError, PointCloudCatalog};

/// A parser implementation for JSON catalogs. Points are 3-element arrays.
#[derive(Debug, Default)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, json_content: &str) -> Result<PointCloudCatalog, LoadError> {
        let file: CatalogFile = serde_json::from_str(json_content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        file.into_catalog()
    }

    #[cfg(not(feature = "serde"))]
    fn parse(&self, _json_content: &str) -> Result<PointCloudCatalog, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for JSON parsing)".to_string(),
        ))
    }
}
