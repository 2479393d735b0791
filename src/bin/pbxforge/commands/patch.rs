//! `pbxforge patch` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::PatchArgs;
use pbxforge::ops::patch::{patch_manifest, PatchOptions};
use pbxforge::util::shell::{Shell, Status};

pub fn execute(args: PatchArgs, shell: &Shell) -> Result<()> {
    if args.files.is_empty() {
        shell.error("no source files given");
        bail!("no source files given");
    }

    let manifest_path = resolve_manifest_path(args.project.clone());

    let opts = PatchOptions {
        files: args.files.clone(),
        dry_run: args.dry_run,
        force: args.force,
    };
    let outcome = patch_manifest(&manifest_path, &opts)?;

    for added in &outcome.added {
        if args.dry_run {
            shell.status(Status::Info, format!("would add {}", added.path));
        } else {
            shell.status(Status::Added, &added.path);
        }
    }
    for skipped in &outcome.skipped {
        shell.status(Status::Skipped, format!("{skipped} (already in project)"));
    }
    if !args.dry_run && !outcome.added.is_empty() {
        shell.status(
            Status::Patched,
            format!(
                "{} ({} added, {} skipped)",
                manifest_path.display(),
                outcome.added.len(),
                outcome.skipped.len()
            ),
        );
    }

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "patch",
            "manifest": manifest_path.to_string_lossy(),
            "added": outcome.added.iter().map(|a| a.path.clone()).collect::<Vec<_>>(),
            "skipped": outcome.skipped,
            "dry_run": args.dry_run,
        }));
    }

    Ok(())
}

/// Accept either the `.xcodeproj` bundle or the `project.pbxproj` inside it.
fn resolve_manifest_path(project: PathBuf) -> PathBuf {
    if project.extension().and_then(|e| e.to_str()) == Some("xcodeproj") {
        project.join("project.pbxproj")
    } else {
        project
    }
}
