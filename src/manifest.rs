//! Asset manifest: the ordered list of shell paths seeded at install time.
//!
//! The manifest is fixed at construction time and never derived at runtime.
//! Deploys that author their asset list as data can load one from JSON.

use serde::Serialize;
use thiserror::Error;

/// Shell paths cached by default, covering the minimal installable app
/// shell: the root document, the entry page, the web manifest, and the
/// installability icons.
const APP_SHELL_PATHS: [&str; 5] = [
    "/",
    "index.html",
    "manifest.json",
    "icon-192x192.png",
    "icon-512x512.png",
];

/// Errors that can occur when loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest JSON could not be parsed
    #[error("Failed to parse manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered, de-duplicated list of asset paths to pre-populate at install
/// time.
///
/// Order is preserved as authored; a path listed twice is seeded once, with
/// the first occurrence deciding its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetManifest {
    paths: Vec<String>,
}

impl AssetManifest {
    /// Creates a manifest from the given paths, de-duplicating while
    /// preserving first-occurrence order.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for path in paths {
            let path = path.into();
            if !deduped.contains(&path) {
                deduped.push(path);
            }
        }
        Self { paths: deduped }
    }

    /// Returns the default app-shell manifest: root document, entry page,
    /// web manifest, and icons.
    pub fn app_shell() -> Self {
        Self::new(APP_SHELL_PATHS)
    }

    /// Loads a manifest from a JSON array of path strings.
    ///
    /// # Arguments
    /// * `json` - JSON text such as `["/", "index.html"]`
    ///
    /// # Returns
    /// * `Ok(AssetManifest)` if the JSON is a valid string array
    /// * `Err(ManifestError::Parse)` otherwise
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let paths: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(paths))
    }

    /// Iterates the manifest paths in seeding order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of distinct paths in the manifest.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the manifest lists no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_shell_manifest_contents() {
        let manifest = AssetManifest::app_shell();
        let paths: Vec<&str> = manifest.paths().collect();
        assert_eq!(
            paths,
            vec![
                "/",
                "index.html",
                "manifest.json",
                "icon-192x192.png",
                "icon-512x512.png"
            ]
        );
    }

    #[test]
    fn test_new_preserves_order_and_dedupes() {
        let manifest = AssetManifest::new(["index.html", "/", "index.html", "app.js"]);
        let paths: Vec<&str> = manifest.paths().collect();
        assert_eq!(paths, vec!["index.html", "/", "app.js"]);
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = AssetManifest::new(Vec::<String>::new());
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn test_from_json_valid() {
        let manifest = AssetManifest::from_json(r#"["/", "index.html", "/"]"#)
            .expect("Failed to parse manifest");
        let paths: Vec<&str> = manifest.paths().collect();
        assert_eq!(paths, vec!["/", "index.html"]);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = AssetManifest::from_json("{ not json ]");
        assert!(result.is_err());

        // Valid JSON, wrong shape
        let result = AssetManifest::from_json(r#"{"paths": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_manifest_serializes_as_plain_array() {
        let manifest = AssetManifest::new(["/", "index.html"]);
        let json = serde_json::to_string(&manifest).expect("Failed to serialize manifest");
        assert_eq!(json, r#"["/","index.html"]"#);
    }
}
