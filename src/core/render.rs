//! Serialization of the manifest model to pbxproj text.
//!
//! Rendering is a pure function of the model. The row renderers at the top
//! are shared with the patcher so spliced entries are indistinguishable from
//! generated ones.

use std::fmt::Write;

use crate::core::ident::ObjectId;
use crate::core::project::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileKind, FileReference, Group,
    Project,
};
use crate::core::settings::SettingValue;

/// Marker line opening a manifest section for the given isa.
pub fn begin_marker(isa: &str) -> String {
    format!("/* Begin {isa} section */")
}

/// Marker line closing a manifest section for the given isa.
pub fn end_marker(isa: &str) -> String {
    format!("/* End {isa} section */")
}

/// Quote a token unless it is a plain identifier.
///
/// The format leaves alphanumeric/underscore/dot tokens bare and wraps
/// everything else in double quotes with backslash escaping.
pub(crate) fn quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
    if plain {
        token.to_string()
    } else {
        format!("\"{}\"", token.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// One PBXBuildFile table row.
pub fn build_file_row(build_file: &BuildFile) -> String {
    format!(
        "\t\t{} /* {} in Sources */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};\n",
        build_file.id, build_file.file_name, build_file.file_ref, build_file.file_name
    )
}

/// One PBXFileReference table row.
pub fn file_ref_row(file_ref: &FileReference) -> String {
    let (attr, file_type) = file_ref.kind.file_type();
    let index = match file_ref.kind {
        FileKind::Product => "includeInIndex = 0; ",
        _ => "",
    };
    format!(
        "\t\t{} /* {} */ = {{isa = PBXFileReference; {attr} = {file_type}; {index}path = {}; sourceTree = {}; }};\n",
        file_ref.id,
        file_ref.name,
        quote(&file_ref.name),
        quote(file_ref.source_tree.as_str())
    )
}

/// One entry row inside a phase `files` list.
pub fn phase_entry_row(id: &ObjectId, name: &str, phase: &str) -> String {
    format!("\t\t\t\t{id} /* {name} in {phase} */,\n")
}

/// One entry row inside a group `children` list.
pub fn group_child_row(id: &ObjectId, comment: &str) -> String {
    format!("\t\t\t\t{id} /* {comment} */,\n")
}

/// Serialize the complete project. Sections appear in canonical isa order,
/// each bounded by its begin/end markers.
pub fn render(project: &Project) -> String {
    let mut out = String::new();
    out.push_str("// !$*UTF8*$!\n{\n");
    out.push_str("\tarchiveVersion = 1;\n");
    out.push_str("\tclasses = {\n\t};\n");
    out.push_str("\tobjectVersion = 56;\n");
    out.push_str("\tobjects = {\n\n");

    render_build_files(&mut out, project);
    render_file_references(&mut out, project);
    render_phase_section(&mut out, project, &project.frameworks_phase);
    render_groups(&mut out, project);
    render_native_target(&mut out, project);
    render_project_object(&mut out, project);
    render_phase_section(&mut out, project, &project.resources_phase);
    render_phase_section(&mut out, project, &project.sources_phase);
    render_build_configurations(&mut out, project);
    render_configuration_lists(&mut out, project);

    // Sections are blank-line separated; the last one sits flush against the
    // closing brace.
    out.truncate(out.len() - 1);
    out.push_str("\t};\n");
    let _ = writeln!(out, "\trootObject = {} /* Project object */;", project.id);
    out.push_str("}\n");
    out
}

fn open_section(out: &mut String, isa: &str) {
    out.push_str(&begin_marker(isa));
    out.push('\n');
}

fn close_section(out: &mut String, isa: &str) {
    out.push_str(&end_marker(isa));
    out.push_str("\n\n");
}

fn render_build_files(out: &mut String, project: &Project) {
    open_section(out, "PBXBuildFile");
    for build_file in &project.build_files {
        out.push_str(&build_file_row(build_file));
    }
    close_section(out, "PBXBuildFile");
}

fn render_file_references(out: &mut String, project: &Project) {
    open_section(out, "PBXFileReference");
    out.push_str(&file_ref_row(&project.product_ref));
    for file_ref in &project.file_refs {
        out.push_str(&file_ref_row(file_ref));
    }
    close_section(out, "PBXFileReference");
}

fn render_phase_section(out: &mut String, project: &Project, phase: &BuildPhase) {
    open_section(out, phase.kind.isa());
    let _ = writeln!(out, "\t\t{} /* {} */ = {{", phase.id, phase.kind.comment());
    let _ = writeln!(out, "\t\t\tisa = {};", phase.kind.isa());
    out.push_str("\t\t\tbuildActionMask = 2147483647;\n");
    out.push_str("\t\t\tfiles = (\n");
    for id in &phase.files {
        let name = project.build_file_name(id).unwrap_or_default();
        out.push_str(&phase_entry_row(id, name, phase.kind.comment()));
    }
    out.push_str("\t\t\t);\n");
    out.push_str("\t\t\trunOnlyForDeploymentPostprocessing = 0;\n");
    out.push_str("\t\t};\n");
    close_section(out, phase.kind.isa());
}

fn render_group(out: &mut String, group: &Group) {
    let comment = group.name.as_deref().or(group.path.as_deref());
    match comment {
        Some(comment) => {
            let _ = writeln!(out, "\t\t{} /* {} */ = {{", group.id, comment);
        }
        None => {
            let _ = writeln!(out, "\t\t{} = {{", group.id);
        }
    }
    out.push_str("\t\t\tisa = PBXGroup;\n");
    out.push_str("\t\t\tchildren = (\n");
    for child in &group.children {
        out.push_str(&group_child_row(&child.id, &child.comment));
    }
    out.push_str("\t\t\t);\n");
    if let Some(name) = &group.name {
        let _ = writeln!(out, "\t\t\tname = {};", quote(name));
    }
    if let Some(path) = &group.path {
        let _ = writeln!(out, "\t\t\tpath = {};", quote(path));
    }
    out.push_str("\t\t\tsourceTree = \"<group>\";\n");
    out.push_str("\t\t};\n");
}

fn render_groups(out: &mut String, project: &Project) {
    open_section(out, "PBXGroup");
    render_group(out, &project.main_group);
    render_group(out, &project.products_group);
    render_group(out, &project.app_group);
    close_section(out, "PBXGroup");
}

fn render_native_target(out: &mut String, project: &Project) {
    let target = &project.target;
    open_section(out, "PBXNativeTarget");
    let _ = writeln!(out, "\t\t{} /* {} */ = {{", target.id, target.name);
    out.push_str("\t\t\tisa = PBXNativeTarget;\n");
    let _ = writeln!(
        out,
        "\t\t\tbuildConfigurationList = {} /* Build configuration list for {} */;",
        target.config_list, project.target_config_list.owner
    );
    out.push_str("\t\t\tbuildPhases = (\n");
    for phase in [
        &project.sources_phase,
        &project.frameworks_phase,
        &project.resources_phase,
    ] {
        let _ = writeln!(out, "\t\t\t\t{} /* {} */,", phase.id, phase.kind.comment());
    }
    out.push_str("\t\t\t);\n");
    out.push_str("\t\t\tbuildRules = (\n");
    out.push_str("\t\t\t);\n");
    out.push_str("\t\t\tdependencies = (\n");
    out.push_str("\t\t\t);\n");
    let _ = writeln!(out, "\t\t\tname = {};", quote(&target.name));
    let _ = writeln!(out, "\t\t\tproductName = {};", quote(&target.name));
    let _ = writeln!(
        out,
        "\t\t\tproductReference = {} /* {} */;",
        target.product_ref, project.product_ref.name
    );
    out.push_str("\t\t\tproductType = \"com.apple.product-type.application\";\n");
    out.push_str("\t\t};\n");
    close_section(out, "PBXNativeTarget");
}

fn render_project_object(out: &mut String, project: &Project) {
    open_section(out, "PBXProject");
    let _ = writeln!(out, "\t\t{} /* Project object */ = {{", project.id);
    out.push_str("\t\t\tisa = PBXProject;\n");
    out.push_str("\t\t\tattributes = {\n");
    out.push_str("\t\t\t\tBuildIndependentTargetsInParallel = 1;\n");
    out.push_str("\t\t\t\tLastSwiftUpdateCheck = 1500;\n");
    out.push_str("\t\t\t\tLastUpgradeCheck = 1500;\n");
    out.push_str("\t\t\t\tTargetAttributes = {\n");
    let _ = writeln!(out, "\t\t\t\t\t{} = {{", project.target.id);
    out.push_str("\t\t\t\t\t\tCreatedOnToolsVersion = 15.0;\n");
    out.push_str("\t\t\t\t\t};\n");
    out.push_str("\t\t\t\t};\n");
    out.push_str("\t\t\t};\n");
    let _ = writeln!(
        out,
        "\t\t\tbuildConfigurationList = {} /* Build configuration list for {} */;",
        project.project_config_list.id, project.project_config_list.owner
    );
    out.push_str("\t\t\tcompatibilityVersion = \"Xcode 14.0\";\n");
    out.push_str("\t\t\tdevelopmentRegion = en;\n");
    out.push_str("\t\t\thasScannedForEncodings = 0;\n");
    out.push_str("\t\t\tknownRegions = (\n");
    out.push_str("\t\t\t\ten,\n");
    out.push_str("\t\t\t\tBase,\n");
    out.push_str("\t\t\t);\n");
    let _ = writeln!(out, "\t\t\tmainGroup = {};", project.main_group.id);
    let _ = writeln!(
        out,
        "\t\t\tproductRefGroup = {} /* Products */;",
        project.products_group.id
    );
    out.push_str("\t\t\tprojectDirPath = \"\";\n");
    out.push_str("\t\t\tprojectRoot = \"\";\n");
    out.push_str("\t\t\ttargets = (\n");
    let _ = writeln!(out, "\t\t\t\t{} /* {} */,", project.target.id, project.target.name);
    out.push_str("\t\t\t);\n");
    out.push_str("\t\t};\n");
    close_section(out, "PBXProject");
}

fn render_configuration(out: &mut String, config: &BuildConfiguration) {
    let _ = writeln!(out, "\t\t{} /* {} */ = {{", config.id, config.name);
    out.push_str("\t\t\tisa = XCBuildConfiguration;\n");
    out.push_str("\t\t\tbuildSettings = {\n");
    for (key, value) in &config.settings {
        match value {
            SettingValue::Literal(literal) => {
                let _ = writeln!(out, "\t\t\t\t{} = {};", key, quote(literal));
            }
            SettingValue::List(items) => {
                let _ = writeln!(out, "\t\t\t\t{} = (", key);
                for item in items {
                    let _ = writeln!(out, "\t\t\t\t\t\"{}\",", item);
                }
                out.push_str("\t\t\t\t);\n");
            }
        }
    }
    out.push_str("\t\t\t};\n");
    let _ = writeln!(out, "\t\t\tname = {};", config.name);
    out.push_str("\t\t};\n");
}

fn render_build_configurations(out: &mut String, project: &Project) {
    open_section(out, "XCBuildConfiguration");
    for config in project
        .project_configurations
        .iter()
        .chain(&project.target_configurations)
    {
        render_configuration(out, config);
    }
    close_section(out, "XCBuildConfiguration");
}

fn render_configuration_list(out: &mut String, list: &ConfigurationList, names: &[String]) {
    let _ = writeln!(
        out,
        "\t\t{} /* Build configuration list for {} */ = {{",
        list.id, list.owner
    );
    out.push_str("\t\t\tisa = XCConfigurationList;\n");
    out.push_str("\t\t\tbuildConfigurations = (\n");
    for (id, name) in list.configurations.iter().zip(names) {
        let _ = writeln!(out, "\t\t\t\t{id} /* {name} */,");
    }
    out.push_str("\t\t\t);\n");
    out.push_str("\t\t\tdefaultConfigurationIsVisible = 0;\n");
    let _ = writeln!(
        out,
        "\t\t\tdefaultConfigurationName = {};",
        list.default_configuration
    );
    out.push_str("\t\t};\n");
}

fn render_configuration_lists(out: &mut String, project: &Project) {
    open_section(out, "XCConfigurationList");
    let project_names: Vec<String> = project
        .project_configurations
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let target_names: Vec<String> = project
        .target_configurations
        .iter()
        .map(|c| c.name.clone())
        .collect();
    render_configuration_list(out, &project.project_config_list, &project_names);
    render_configuration_list(out, &project.target_config_list, &target_names);
    close_section(out, "XCConfigurationList");
}
