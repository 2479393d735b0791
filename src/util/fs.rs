//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use glob::glob;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Copy a file, with nice error messages.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// Write through a temporary file in the target directory, then rename into
/// place. A crash mid-write leaves either the old file or the new one on
/// disk, never a torn write.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temporary file in {}", dir.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Recursively discover Swift sources under `dir`, returned as paths
/// relative to `root`, sorted for deterministic manifests.
pub fn walk_swift_sources(root: &Path, dir: &Path) -> Result<Vec<String>> {
    let mut results = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("swift") {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        results.push(rel.to_string_lossy().replace('\\', "/"));
    }

    results.sort();
    Ok(results)
}

/// Find files matching glob patterns relative to a base directory.
pub fn glob_sources(base: &Path, patterns: &[String]) -> Result<Vec<String>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in
            glob(&pattern_str).with_context(|| format!("invalid glob pattern: {pattern}"))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        let rel = path.strip_prefix(base).unwrap_or(&path);
                        results.push(rel.to_string_lossy().replace('\\', "/"));
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");

        write_string(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.pbxproj");

        write_string(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        // No temporary file is left behind.
        let leftovers = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_walk_swift_sources_is_sorted_and_relative() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("App");
        fs::create_dir_all(app.join("Views")).unwrap();
        fs::create_dir_all(app.join("Core")).unwrap();
        fs::write(app.join("Views/Detail.swift"), "").unwrap();
        fs::write(app.join("Core/Main.swift"), "").unwrap();
        fs::write(app.join("Core/notes.txt"), "").unwrap();

        let sources = walk_swift_sources(tmp.path(), &app).unwrap();
        assert_eq!(
            sources,
            vec![
                "App/Core/Main.swift".to_string(),
                "App/Views/Detail.swift".to_string()
            ]
        );
    }

    #[test]
    fn test_glob_sources() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("App");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("Main.swift"), "").unwrap();
        fs::write(src.join("Helper.swift"), "").unwrap();
        fs::write(src.join("readme.md"), "").unwrap();

        let files = glob_sources(tmp.path(), &["App/*.swift".to_string()]).unwrap();
        assert_eq!(
            files,
            vec!["App/Helper.swift".to_string(), "App/Main.swift".to_string()]
        );
    }
}
