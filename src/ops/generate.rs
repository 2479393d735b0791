//! Implementation of `pbxforge generate`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::ident::IdRegistry;
use crate::core::project::Project;
use crate::core::render;
use crate::core::settings::ProductSettings;
use crate::util::fs;

/// Options for generating a manifest.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub settings: ProductSettings,

    /// Ordered relative source paths to compile.
    pub sources: Vec<String>,
}

/// Generate the complete manifest text.
///
/// Pure: the model is assembled, serialized, and discarded without touching
/// the filesystem, so generation stays independently testable.
pub fn generate(opts: &GenerateOptions) -> Result<String> {
    let mut ids = IdRegistry::new();
    let project = Project::assemble(&opts.settings, &opts.sources, &mut ids)?;
    Ok(render::render(&project))
}

/// Path of the manifest inside the product's `.xcodeproj` bundle.
pub fn manifest_path(root: &Path, product_name: &str) -> PathBuf {
    root.join(format!("{product_name}.xcodeproj"))
        .join("project.pbxproj")
}

/// Generate the manifest and write it under `root`.
pub fn write_manifest(root: &Path, opts: &GenerateOptions) -> Result<PathBuf> {
    let text = generate(opts)?;
    let path = manifest_path(root, &opts.settings.product_name);
    fs::write_string(&path, &text)?;
    tracing::info!(
        path = %path.display(),
        files = opts.sources.len(),
        "manifest generated"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(paths: &[&str]) -> GenerateOptions {
        GenerateOptions {
            settings: ProductSettings {
                product_name: "App".to_string(),
                bundle_identifier: "com.example.app".to_string(),
                deployment_target: "16.0".to_string(),
            },
            sources: paths.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_generate_twice_is_byte_identical() {
        let opts = options(&["Core/A.swift", "Features/B.swift"]);
        assert_eq!(generate(&opts).unwrap(), generate(&opts).unwrap());
    }

    #[test]
    fn test_generate_rejects_empty_input() {
        let err = generate(&options(&[])).unwrap_err();
        assert!(err.to_string().contains("no source files"));
    }

    #[test]
    fn test_write_manifest_creates_the_bundle() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&["App/Main.swift"]);

        let path = write_manifest(tmp.path(), &opts).unwrap();

        assert_eq!(path, tmp.path().join("App.xcodeproj/project.pbxproj"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("// !$*UTF8*$!"));
        assert!(text.contains("Main.swift"));
    }
}
