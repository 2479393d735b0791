//! Anchored region location for the patcher.
//!
//! The patcher never deserializes the manifest; each editable region is
//! modelled as an insertion point found from its begin/end markers, so all
//! four splice sites share one mechanism and one failure mode.

use crate::core::render;
use crate::patch::PatchError;

/// The four regions the patcher may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    BuildFiles,
    FileReferences,
    SourcesPhase,
    GroupChildren,
}

impl Region {
    /// Human-readable name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Region::BuildFiles => "PBXBuildFile section",
            Region::FileReferences => "PBXFileReference section",
            Region::SourcesPhase => "PBXSourcesBuildPhase files list",
            Region::GroupChildren => "main group children list",
        }
    }
}

/// A located splice site: new rows are inserted at `offset` in the original
/// text.
#[derive(Debug, Clone, Copy)]
pub struct InsertionPoint {
    pub region: Region,
    pub offset: usize,
}

fn missing(region: Region) -> PatchError {
    PatchError::MalformedManifest {
        region: region.describe().to_string(),
    }
}

/// Byte range of the text between a section's begin and end markers.
pub(crate) fn section_bounds(
    text: &str,
    isa: &str,
    region: Region,
) -> Result<(usize, usize), PatchError> {
    let begin = render::begin_marker(isa);
    let end = render::end_marker(isa);

    let start = text.find(&begin).ok_or_else(|| missing(region))? + begin.len();
    let stop = text[start..]
        .find(&end)
        .map(|i| start + i)
        .ok_or_else(|| missing(region))?;
    Ok((start, stop))
}

/// Insertion point for table-style sections: rows go immediately before the
/// end marker.
pub(crate) fn section_insertion(
    text: &str,
    isa: &str,
    region: Region,
) -> Result<InsertionPoint, PatchError> {
    let (_, stop) = section_bounds(text, isa, region)?;
    Ok(InsertionPoint { region, offset: stop })
}

/// Start of the line containing the byte at `at`.
fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Insertion point for the compile phase's `files = ( … );` list: entries go
/// immediately before the list's closing delimiter.
pub(crate) fn sources_list_insertion(text: &str) -> Result<InsertionPoint, PatchError> {
    let region = Region::SourcesPhase;
    let (start, stop) = section_bounds(text, "PBXSourcesBuildPhase", region)?;
    let body = &text[start..stop];

    let files = body.find("files = (").ok_or_else(|| missing(region))?;
    let close = body[files..]
        .find(");")
        .map(|i| files + i)
        .ok_or_else(|| missing(region))?;

    Ok(InsertionPoint {
        region,
        offset: line_start(text, start + close),
    })
}

/// Insertion point for the application group's `children = ( … );` list.
///
/// The application group is the one group that mirrors an on-disk directory
/// (it carries a `path` attribute); the main and Products groups do not.
pub(crate) fn group_children_insertion(text: &str) -> Result<InsertionPoint, PatchError> {
    let region = Region::GroupChildren;
    let (start, stop) = section_bounds(text, "PBXGroup", region)?;
    let body = &text[start..stop];

    let mut cursor = 0;
    while let Some(found) = body[cursor..].find("isa = PBXGroup;") {
        let block_start = cursor + found;
        let block_end = body[block_start..]
            .find("\n\t\t};")
            .map(|i| block_start + i)
            .unwrap_or(body.len());
        let block = &body[block_start..block_end];

        if block.contains("\n\t\t\tpath = ") {
            let children = block.find("children = (").ok_or_else(|| missing(region))?;
            let close = block[children..]
                .find(");")
                .map(|i| children + i)
                .ok_or_else(|| missing(region))?;
            return Ok(InsertionPoint {
                region,
                offset: line_start(text, start + block_start + close),
            });
        }

        cursor = block_end;
    }

    Err(missing(region))
}

/// Reassemble the text with rows inserted at the given points. Everything
/// outside the insertion points is copied through byte for byte.
pub(crate) fn splice(text: &str, mut inserts: Vec<(InsertionPoint, String)>) -> String {
    inserts.sort_by_key(|(point, _)| point.offset);

    let added: usize = inserts.iter().map(|(_, rows)| rows.len()).sum();
    let mut out = String::with_capacity(text.len() + added);
    let mut copied = 0;
    for (point, rows) in &inserts {
        out.push_str(&text[copied..point.offset]);
        out.push_str(rows);
        copied = point.offset;
    }
    out.push_str(&text[copied..]);
    out
}
