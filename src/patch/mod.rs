//! Surgical insertion of new source files into an existing manifest.
//!
//! The patcher works on serialized text, not on a materialized model: it
//! locates the file-reference table, the build-file table, the compile-phase
//! file list, and the application group's child list by their markers, then
//! splices new rows in. Everything else in the file, including hand-edited
//! configuration blocks, passes through byte for byte.

mod region;

use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;

use crate::core::ident::{IdRegistry, ObjectId};
use crate::core::project::{basename, BuildFile, FileKind, FileReference, SourceTree};
use crate::core::render;
use crate::core::ModelError;

pub use region::Region;

/// Errors raised while patching a serialized manifest.
#[derive(Debug, Error)]
pub enum PatchError {
    /// One of the required region markers could not be located; the patch
    /// cannot be applied safely and nothing was modified.
    #[error("cannot locate {region} in the manifest")]
    MalformedManifest { region: String },

    /// Identifier synthesis failed (collision retry budget exceeded).
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One file added by a patch, with the identifiers synthesized for it.
#[derive(Debug, Clone)]
pub struct AddedFile {
    pub path: String,
    pub name: String,
    pub file_ref_id: ObjectId,
    pub build_file_id: ObjectId,
}

/// Result of patching a manifest in memory.
#[derive(Debug)]
pub struct PatchOutcome {
    /// The updated manifest text; a structural superset of the input.
    pub text: String,
    /// Files for which new entries were spliced in, in input order.
    pub added: Vec<AddedFile>,
    /// Inputs skipped because the manifest already references their name.
    pub skipped: Vec<String>,
}

/// Patch `text`, adding a file reference, build file, compile-phase entry,
/// and group child for every file in `new_files` that the manifest does not
/// already reference.
///
/// Files whose basename already appears in the file-reference table are
/// skipped and reported, which makes repeated invocations with the same set
/// safe.
pub fn patch(text: &str, new_files: &[String]) -> Result<PatchOutcome, PatchError> {
    // Locate all four regions up front so a malformed manifest is rejected
    // before any entry is synthesized.
    let build_files_at = region::section_insertion(text, "PBXBuildFile", Region::BuildFiles)?;
    let file_refs_at = region::section_insertion(text, "PBXFileReference", Region::FileReferences)?;
    let sources_at = region::sources_list_insertion(text)?;
    let group_at = region::group_children_insertion(text)?;

    let present = existing_file_names(text)?;

    // Seed the registry with every identifier-shaped token already in the
    // text; freshly minted ids must not collide with any of them.
    let mut ids = IdRegistry::new();
    let id_token = Regex::new(r"\b[0-9A-F]{24}\b").expect("identifier pattern is valid");
    for token in id_token.find_iter(text) {
        ids.reserve(token.as_str());
    }
    tracing::debug!(existing = ids.len(), "scanned identifiers");

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    let mut batch: HashSet<String> = HashSet::new();
    let mut file_ref_rows = String::new();
    let mut build_file_rows = String::new();
    let mut phase_rows = String::new();
    let mut child_rows = String::new();

    for path in new_files {
        let name = basename(path).to_string();
        if present.contains(&name) || !batch.insert(name.clone()) {
            tracing::debug!(file = %name, "already referenced, skipping");
            skipped.push(path.clone());
            continue;
        }

        let file_ref = FileReference {
            id: ids.mint("PBXFileReference", path)?,
            name: name.clone(),
            kind: FileKind::Source,
            source_tree: SourceTree::Group,
        };
        let build_file = BuildFile {
            id: ids.mint("PBXBuildFile", path)?,
            file_ref: file_ref.id.clone(),
            file_name: name.clone(),
        };

        file_ref_rows.push_str(&render::file_ref_row(&file_ref));
        build_file_rows.push_str(&render::build_file_row(&build_file));
        phase_rows.push_str(&render::phase_entry_row(&build_file.id, &name, "Sources"));
        child_rows.push_str(&render::group_child_row(&file_ref.id, &name));

        added.push(AddedFile {
            path: path.clone(),
            name,
            file_ref_id: file_ref.id,
            build_file_id: build_file.id,
        });
    }

    if added.is_empty() {
        return Ok(PatchOutcome {
            text: text.to_string(),
            added,
            skipped,
        });
    }

    let text = region::splice(
        text,
        vec![
            (build_files_at, build_file_rows),
            (file_refs_at, file_ref_rows),
            (sources_at, phase_rows),
            (group_at, child_rows),
        ],
    );

    Ok(PatchOutcome {
        text,
        added,
        skipped,
    })
}

/// Basenames of files already referenced in the PBXFileReference section.
fn existing_file_names(text: &str) -> Result<HashSet<String>, PatchError> {
    let (start, stop) = region::section_bounds(text, "PBXFileReference", Region::FileReferences)?;
    let body = &text[start..stop];

    let path_attr = Regex::new(r#"path = (?:"((?:[^"\\]|\\.)*)"|([^";\n]+));"#)
        .expect("path pattern is valid");
    let mut names = HashSet::new();
    for caps in path_attr.captures_iter(body) {
        if let Some(value) = caps.get(1).or_else(|| caps.get(2)) {
            names.insert(basename(value.as_str()).to_string());
        }
    }
    Ok(names)
}
