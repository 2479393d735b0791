//! In-memory manifest model and its assembly from a source-file list.
//!
//! The model is created once per generation run, serialized, and discarded;
//! nothing here persists the in-memory form. The patcher deliberately never
//! materializes a `Project` and works on serialized text instead.

use std::collections::{HashMap, HashSet};

use crate::core::ident::{IdRegistry, ObjectId};
use crate::core::settings::{self, ProductSettings, SettingsTable};
use crate::core::ModelError;

/// How a file reference's path is resolved on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTree {
    /// Relative to the enclosing group.
    Group,
    /// Absolute path.
    Absolute,
    /// Relative to the build products directory.
    BuiltProducts,
}

impl SourceTree {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTree::Group => "<group>",
            SourceTree::Absolute => "<absolute>",
            SourceTree::BuiltProducts => "BUILT_PRODUCTS_DIR",
        }
    }
}

/// Declared type of a referenced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Swift source code, eligible for the compile phase.
    Source,
    /// Bundle resource such as an asset catalog.
    Resource,
    /// The built application product.
    Product,
}

impl FileKind {
    /// The manifest attribute and value declaring this file type.
    pub fn file_type(&self) -> (&'static str, &'static str) {
        match self {
            FileKind::Source => ("lastKnownFileType", "sourcecode.swift"),
            FileKind::Resource => ("lastKnownFileType", "folder.assetcatalog"),
            FileKind::Product => ("explicitFileType", "wrapper.application"),
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, FileKind::Source)
    }
}

/// One file on disk, referenced by the manifest. Owned by a group.
#[derive(Debug, Clone)]
pub struct FileReference {
    pub id: ObjectId,
    /// Basename, used for both the `path` attribute and display comments.
    pub name: String,
    pub kind: FileKind,
    pub source_tree: SourceTree,
}

/// Linkage entity binding one file reference into one build phase.
///
/// Exists only so a file can participate in a phase; a file reference with a
/// surviving build file must never be deleted on its own.
#[derive(Debug, Clone)]
pub struct BuildFile {
    pub id: ObjectId,
    pub file_ref: ObjectId,
    /// Basename of the referenced file, for display comments.
    pub file_name: String,
}

/// Named, ordered container of file references and nested groups.
///
/// Ordering matters for reproducible diffs, not for build correctness.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: ObjectId,
    /// Display name, when it differs from the on-disk path.
    pub name: Option<String>,
    /// On-disk directory this group mirrors.
    pub path: Option<String>,
    pub children: Vec<GroupChild>,
}

/// One child entry of a group: the referenced identifier plus the comment
/// text rendered next to it.
#[derive(Debug, Clone)]
pub struct GroupChild {
    pub id: ObjectId,
    pub comment: String,
}

/// Build phase kinds carried by the application target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Sources,
    Frameworks,
    Resources,
}

impl PhaseKind {
    pub fn isa(&self) -> &'static str {
        match self {
            PhaseKind::Sources => "PBXSourcesBuildPhase",
            PhaseKind::Frameworks => "PBXFrameworksBuildPhase",
            PhaseKind::Resources => "PBXResourcesBuildPhase",
        }
    }

    pub fn comment(&self) -> &'static str {
        match self {
            PhaseKind::Sources => "Sources",
            PhaseKind::Frameworks => "Frameworks",
            PhaseKind::Resources => "Resources",
        }
    }
}

/// Ordered list of build files processed by one phase.
#[derive(Debug, Clone)]
pub struct BuildPhase {
    pub id: ObjectId,
    pub kind: PhaseKind,
    pub files: Vec<ObjectId>,
}

/// Named set of build settings (Debug or Release).
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    pub id: ObjectId,
    pub name: String,
    pub settings: SettingsTable,
}

/// Ordered configuration list attached to the project or the target.
#[derive(Debug, Clone)]
pub struct ConfigurationList {
    pub id: ObjectId,
    /// Rendered into the `Build configuration list for …` comment.
    pub owner: String,
    pub configurations: Vec<ObjectId>,
    pub default_configuration: String,
}

/// The single buildable application target.
#[derive(Debug, Clone)]
pub struct NativeTarget {
    pub id: ObjectId,
    pub name: String,
    pub config_list: ObjectId,
    pub phases: Vec<ObjectId>,
    pub product_ref: ObjectId,
}

/// Root of the manifest model: owns every entity in the file.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ObjectId,
    pub settings: ProductSettings,
    /// Source file references, in input order.
    pub file_refs: Vec<FileReference>,
    pub product_ref: FileReference,
    /// One build file per source reference, in input order.
    pub build_files: Vec<BuildFile>,
    pub main_group: Group,
    pub app_group: Group,
    pub products_group: Group,
    pub sources_phase: BuildPhase,
    pub frameworks_phase: BuildPhase,
    pub resources_phase: BuildPhase,
    pub target: NativeTarget,
    pub project_configurations: Vec<BuildConfiguration>,
    pub target_configurations: Vec<BuildConfiguration>,
    pub project_config_list: ConfigurationList,
    pub target_config_list: ConfigurationList,
}

impl Project {
    /// Assemble a fully linked project from an ordered list of relative
    /// source paths.
    ///
    /// Fails with [`ModelError::EmptyInput`] when `source_paths` is empty and
    /// with [`ModelError::DuplicateName`] when two paths share a basename;
    /// deduplicating basenames is the caller's responsibility.
    pub fn assemble(
        settings: &ProductSettings,
        source_paths: &[String],
        ids: &mut IdRegistry,
    ) -> Result<Project, ModelError> {
        if source_paths.is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let mut seen = HashSet::new();
        for path in source_paths {
            let name = basename(path);
            if !seen.insert(name.to_string()) {
                return Err(ModelError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let mut file_refs = Vec::with_capacity(source_paths.len());
        let mut build_files = Vec::with_capacity(source_paths.len());
        for path in source_paths {
            let name = basename(path).to_string();
            let file_ref = FileReference {
                id: ids.mint("PBXFileReference", path)?,
                name: name.clone(),
                kind: FileKind::Source,
                source_tree: SourceTree::Group,
            };
            build_files.push(BuildFile {
                id: ids.mint("PBXBuildFile", path)?,
                file_ref: file_ref.id.clone(),
                file_name: name,
            });
            file_refs.push(file_ref);
        }

        let product_name = settings.product_name.clone();
        let product_file = format!("{product_name}.app");
        let product_ref = FileReference {
            id: ids.mint("PBXFileReference", &product_file)?,
            name: product_file.clone(),
            kind: FileKind::Product,
            source_tree: SourceTree::BuiltProducts,
        };

        let app_group = Group {
            id: ids.mint("PBXGroup", &product_name)?,
            name: None,
            path: Some(product_name.clone()),
            children: file_refs
                .iter()
                .map(|r| GroupChild {
                    id: r.id.clone(),
                    comment: r.name.clone(),
                })
                .collect(),
        };
        let products_group = Group {
            id: ids.mint("PBXGroup", "Products")?,
            name: Some("Products".to_string()),
            path: None,
            children: vec![GroupChild {
                id: product_ref.id.clone(),
                comment: product_file.clone(),
            }],
        };
        let main_group = Group {
            id: ids.mint("PBXGroup", "")?,
            name: None,
            path: None,
            children: vec![
                GroupChild {
                    id: app_group.id.clone(),
                    comment: product_name.clone(),
                },
                GroupChild {
                    id: products_group.id.clone(),
                    comment: "Products".to_string(),
                },
            ],
        };

        let sources_phase = BuildPhase {
            id: ids.mint("PBXSourcesBuildPhase", "Sources")?,
            kind: PhaseKind::Sources,
            files: build_files.iter().map(|b| b.id.clone()).collect(),
        };
        let frameworks_phase = BuildPhase {
            id: ids.mint("PBXFrameworksBuildPhase", "Frameworks")?,
            kind: PhaseKind::Frameworks,
            files: Vec::new(),
        };
        let resources_phase = BuildPhase {
            id: ids.mint("PBXResourcesBuildPhase", "Resources")?,
            kind: PhaseKind::Resources,
            files: Vec::new(),
        };

        let project_configurations = vec![
            BuildConfiguration {
                id: ids.mint("XCBuildConfiguration", "Project/Debug")?,
                name: "Debug".to_string(),
                settings: settings::project_debug_settings(&settings.deployment_target),
            },
            BuildConfiguration {
                id: ids.mint("XCBuildConfiguration", "Project/Release")?,
                name: "Release".to_string(),
                settings: settings::project_release_settings(&settings.deployment_target),
            },
        ];
        let target_configurations = vec![
            BuildConfiguration {
                id: ids.mint("XCBuildConfiguration", "Target/Debug")?,
                name: "Debug".to_string(),
                settings: settings::target_settings(&settings.bundle_identifier),
            },
            BuildConfiguration {
                id: ids.mint("XCBuildConfiguration", "Target/Release")?,
                name: "Release".to_string(),
                settings: settings::target_settings(&settings.bundle_identifier),
            },
        ];

        let project_config_list = ConfigurationList {
            id: ids.mint("XCConfigurationList", "PBXProject")?,
            owner: format!("PBXProject \"{product_name}\""),
            configurations: project_configurations.iter().map(|c| c.id.clone()).collect(),
            default_configuration: "Release".to_string(),
        };
        let target_config_list = ConfigurationList {
            id: ids.mint("XCConfigurationList", "PBXNativeTarget")?,
            owner: format!("PBXNativeTarget \"{product_name}\""),
            configurations: target_configurations.iter().map(|c| c.id.clone()).collect(),
            default_configuration: "Release".to_string(),
        };

        let target = NativeTarget {
            id: ids.mint("PBXNativeTarget", &product_name)?,
            name: product_name.clone(),
            config_list: target_config_list.id.clone(),
            phases: vec![
                sources_phase.id.clone(),
                frameworks_phase.id.clone(),
                resources_phase.id.clone(),
            ],
            product_ref: product_ref.id.clone(),
        };

        let project = Project {
            id: ids.mint("PBXProject", &product_name)?,
            settings: settings.clone(),
            file_refs,
            product_ref,
            build_files,
            main_group,
            app_group,
            products_group,
            sources_phase,
            frameworks_phase,
            resources_phase,
            target,
            project_configurations,
            target_configurations,
            project_config_list,
            target_config_list,
        };

        debug_assert!(project.verify().is_ok());
        Ok(project)
    }

    /// Basename of the build file with the given identifier.
    pub fn build_file_name(&self, id: &ObjectId) -> Option<&str> {
        self.build_files
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.file_name.as_str())
    }

    /// Check the model's cross-reference invariants: build files resolve,
    /// file references are reachable from the main group, and the compile
    /// phase only lists source files.
    pub fn verify(&self) -> Result<(), ModelError> {
        let mut refs: HashMap<&str, &FileReference> = HashMap::new();
        for file_ref in self.file_refs.iter().chain([&self.product_ref]) {
            refs.insert(file_ref.id.as_str(), file_ref);
        }

        for build_file in &self.build_files {
            if !refs.contains_key(build_file.file_ref.as_str()) {
                return Err(ModelError::DanglingReference {
                    build_file: build_file.id.as_str().to_string(),
                    file_ref: build_file.file_ref.as_str().to_string(),
                });
            }
        }

        let mut reachable: HashSet<&str> = HashSet::new();
        let groups = [&self.main_group, &self.app_group, &self.products_group];
        let mut pending = vec![&self.main_group];
        while let Some(group) = pending.pop() {
            for child in &group.children {
                reachable.insert(child.id.as_str());
                if let Some(nested) = groups.iter().find(|g| g.id == child.id) {
                    pending.push(*nested);
                }
            }
        }
        for file_ref in &self.file_refs {
            if !reachable.contains(file_ref.id.as_str()) {
                return Err(ModelError::OrphanedReference {
                    name: file_ref.name.clone(),
                });
            }
        }

        for id in &self.sources_phase.files {
            let build_file = self
                .build_files
                .iter()
                .find(|b| &b.id == id)
                .ok_or_else(|| ModelError::DanglingReference {
                    build_file: id.as_str().to_string(),
                    file_ref: String::new(),
                })?;
            let file_ref = refs.get(build_file.file_ref.as_str()).ok_or_else(|| {
                ModelError::DanglingReference {
                    build_file: build_file.id.as_str().to_string(),
                    file_ref: build_file.file_ref.as_str().to_string(),
                }
            })?;
            if !file_ref.kind.is_source() {
                return Err(ModelError::NonSourceInCompilePhase {
                    name: file_ref.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Last path segment, accepting both separators.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
