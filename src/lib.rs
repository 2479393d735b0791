//! pbxforge - generator and surgical patcher for Xcode project manifests
//!
//! This crate provides the core library functionality for pbxforge: the
//! in-memory manifest model, full generation of a `project.pbxproj` from a
//! source-file list, and anchored splicing of new entries into an existing
//! manifest without disturbing unrelated text.

pub mod core;
pub mod ops;
pub mod patch;
pub mod util;

pub use crate::core::ident::{IdRegistry, ObjectId};
pub use crate::core::project::Project;
pub use crate::core::settings::ProductSettings;
pub use crate::core::ModelError;
pub use crate::patch::{PatchError, PatchOutcome};
