//! Manifest data model: projects, targets, groups, file references, build
//! phases, and configuration lists.

use thiserror::Error;

pub mod ident;
pub mod project;
pub mod render;
pub mod settings;

pub use ident::{IdRegistry, ObjectId};
pub use project::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileKind, FileReference, Group,
    NativeTarget, PhaseKind, Project, SourceTree,
};
pub use settings::ProductSettings;

/// Errors raised while assembling or validating the manifest model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A manifest with zero sources is invalid for this tool's purpose.
    #[error("no source files were provided")]
    EmptyInput,

    /// Two input paths share a basename, making the name-to-identifier
    /// mapping ambiguous.
    #[error("duplicate source file name `{name}`")]
    DuplicateName { name: String },

    /// Identifier derivation kept colliding past the retry budget.
    #[error("identifier collision for `{id}` exceeded the retry budget")]
    Collision { id: String },

    /// A build file points at an identifier with no file reference behind it.
    #[error("build file `{build_file}` references unknown file `{file_ref}`")]
    DanglingReference { build_file: String, file_ref: String },

    /// A file reference is not reachable from the main group.
    #[error("file reference `{name}` is not reachable from the main group")]
    OrphanedReference { name: String },

    /// The compile phase may only list source files.
    #[error("compile phase entry `{name}` is not a source file")]
    NonSourceInCompilePhase { name: String },
}
