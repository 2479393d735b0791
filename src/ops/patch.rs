//! Implementation of `pbxforge patch`: backup, splice, atomic rewrite.
//!
//! Durability contract: the patched text is computed fully in memory, the
//! original is copied to a backup, and the new text lands via a temporary
//! file plus rename. A crash at any point leaves either the original
//! manifest or a fully formed new one on disk, never a half-written file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::patch::{self, PatchOutcome};
use crate::util::fs;

/// Suffix appended to the manifest path for the rollback copy.
pub const BACKUP_SUFFIX: &str = "backup";

/// Options for patching an existing manifest.
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// New source files, relative to the project root.
    pub files: Vec<String>,

    /// Report what would change without writing.
    pub dry_run: bool,

    /// Skip the on-disk existence check for the new files.
    pub force: bool,
}

/// Location of the rollback copy for a manifest.
pub fn backup_path(manifest_path: &Path) -> PathBuf {
    let mut os = manifest_path.as_os_str().to_owned();
    os.push(".");
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}

/// Patch the manifest at `manifest_path`, adding `files` to its compile
/// phase.
///
/// The patched text is computed before anything is written; a malformed
/// manifest is rejected with the original file untouched and no backup
/// created. Once the rewrite begins, a failure restores the backup and
/// surfaces the originating error.
pub fn patch_manifest(manifest_path: &Path, opts: &PatchOptions) -> Result<PatchOutcome> {
    if opts.files.is_empty() {
        bail!("no source files were provided");
    }

    let root = project_root(manifest_path);
    if !opts.force {
        for file in &opts.files {
            let on_disk = root.join(file);
            if !on_disk.exists() {
                bail!("source file `{file}` not found at {}", on_disk.display());
            }
        }
    }

    let original = fs::read_to_string(manifest_path)?;
    let outcome = patch::patch(&original, &opts.files)
        .with_context(|| format!("failed to patch {}", manifest_path.display()))?;

    if opts.dry_run || outcome.added.is_empty() {
        return Ok(outcome);
    }

    let backup = backup_path(manifest_path);
    fs::copy_file(manifest_path, &backup)?;
    tracing::debug!(backup = %backup.display(), "backup written");

    if let Err(err) = fs::write_atomic(manifest_path, &outcome.text) {
        if let Err(restore_err) = fs::copy_file(&backup, manifest_path) {
            tracing::error!(error = %restore_err, "failed to restore manifest backup");
        }
        return Err(err.context(format!("failed to rewrite {}", manifest_path.display())));
    }

    tracing::info!(
        added = outcome.added.len(),
        skipped = outcome.skipped.len(),
        "manifest patched"
    );
    Ok(outcome)
}

/// Directory relative source paths resolve against: the parent of the
/// `.xcodeproj` bundle.
fn project_root(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .and_then(|bundle| bundle.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::core::settings::ProductSettings;
    use crate::ops::generate::{write_manifest, GenerateOptions};

    fn generate_project(root: &Path, sources: &[&str]) -> PathBuf {
        for source in sources {
            let path = root.join(source);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "// swift\n").unwrap();
        }
        let opts = GenerateOptions {
            settings: ProductSettings {
                product_name: "App".to_string(),
                bundle_identifier: "com.example.app".to_string(),
                deployment_target: "16.0".to_string(),
            },
            sources: sources.iter().map(|s| s.to_string()).collect(),
        };
        write_manifest(root, &opts).unwrap()
    }

    fn patch_opts(files: &[&str]) -> PatchOptions {
        PatchOptions {
            files: files.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
            force: false,
        }
    }

    #[test]
    fn test_patch_rewrites_manifest_and_keeps_backup() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);
        let before = std::fs::read_to_string(&manifest).unwrap();

        let new_file = tmp.path().join("App/Tracker.swift");
        std::fs::write(&new_file, "// swift\n").unwrap();

        let outcome = patch_manifest(&manifest, &patch_opts(&["App/Tracker.swift"])).unwrap();
        assert_eq!(outcome.added.len(), 1);

        let after = std::fs::read_to_string(&manifest).unwrap();
        assert!(after.contains("Tracker.swift"));

        let backup = backup_path(&manifest);
        assert!(backup.exists());
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), before);
    }

    #[test]
    fn test_malformed_manifest_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);

        let truncated = std::fs::read_to_string(&manifest)
            .unwrap()
            .replace("/* End PBXFileReference section */", "");
        std::fs::write(&manifest, &truncated).unwrap();

        let new_file = tmp.path().join("App/Tracker.swift");
        std::fs::write(&new_file, "// swift\n").unwrap();

        let err = patch_manifest(&manifest, &patch_opts(&["App/Tracker.swift"])).unwrap_err();
        assert!(format!("{err:#}").contains("PBXFileReference section"));

        // Rejected before any write: file unchanged, no backup needed.
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), truncated);
        assert!(!backup_path(&manifest).exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);
        let before = std::fs::read_to_string(&manifest).unwrap();

        let new_file = tmp.path().join("App/Tracker.swift");
        std::fs::write(&new_file, "// swift\n").unwrap();

        let mut opts = patch_opts(&["App/Tracker.swift"]);
        opts.dry_run = true;
        let outcome = patch_manifest(&manifest, &opts).unwrap();

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), before);
        assert!(!backup_path(&manifest).exists());
    }

    #[test]
    fn test_missing_source_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);

        let err = patch_manifest(&manifest, &patch_opts(&["App/Ghost.swift"])).unwrap_err();
        assert!(err.to_string().contains("Ghost.swift"));
    }

    #[test]
    fn test_force_skips_the_existence_check() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);

        let mut opts = patch_opts(&["App/Ghost.swift"]);
        opts.force = true;
        let outcome = patch_manifest(&manifest, &opts).unwrap();
        assert_eq!(outcome.added.len(), 1);
    }

    #[test]
    fn test_already_present_files_do_not_trigger_a_rewrite() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);
        let before = std::fs::read_to_string(&manifest).unwrap();

        let outcome = patch_manifest(&manifest, &patch_opts(&["App/Main.swift"])).unwrap();
        assert!(outcome.added.is_empty());
        assert_eq!(outcome.skipped, vec!["App/Main.swift".to_string()]);

        // Nothing to add: no backup, no rewrite.
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), before);
        assert!(!backup_path(&manifest).exists());
    }

    #[test]
    fn test_empty_file_list_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let manifest = generate_project(tmp.path(), &["App/Main.swift"]);

        let err = patch_manifest(&manifest, &patch_opts(&[])).unwrap_err();
        assert!(err.to_string().contains("no source files"));
    }
}
