//! Product settings and the default Debug/Release build-setting tables.
//!
//! The tables carry the fixed key set the generated manifest always ships
//! with; only `IPHONEOS_DEPLOYMENT_TARGET` and `PRODUCT_BUNDLE_IDENTIFIER`
//! vary with the product settings. When patching, existing configuration
//! blocks are preserved verbatim and these tables are never consulted.

/// Deployment target used when neither the CLI nor the configuration file
/// provides one.
pub const DEFAULT_DEPLOYMENT_TARGET: &str = "16.0";

/// Product-level settings that drive manifest generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSettings {
    /// Application name; also names the target and the source directory.
    pub product_name: String,

    /// Reverse-DNS bundle identifier.
    pub bundle_identifier: String,

    /// Minimum iOS version.
    pub deployment_target: String,
}

/// A single build-setting value: either a scalar or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Literal(String),
    List(Vec<String>),
}

impl SettingValue {
    fn lit(value: &str) -> SettingValue {
        SettingValue::Literal(value.to_string())
    }

    fn list(values: &[&str]) -> SettingValue {
        SettingValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

/// An ordered build-settings table; keys are emitted in the order given.
pub type SettingsTable = Vec<(String, SettingValue)>;

fn table(entries: &[(&str, SettingValue)]) -> SettingsTable {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Project-level keys shared by the Debug and Release configurations.
fn project_common(deployment_target: &str) -> Vec<(&'static str, SettingValue)> {
    vec![
        ("ALWAYS_SEARCH_USER_PATHS", SettingValue::lit("NO")),
        (
            "ASSETCATALOG_COMPILER_GENERATE_SWIFT_ASSET_SYMBOL_EXTENSIONS",
            SettingValue::lit("YES"),
        ),
        ("CLANG_ANALYZER_NONNULL", SettingValue::lit("YES")),
        (
            "CLANG_ANALYZER_NUMBER_OBJECT_CONVERSION",
            SettingValue::lit("YES_AGGRESSIVE"),
        ),
        ("CLANG_CXX_LANGUAGE_STANDARD", SettingValue::lit("gnu++20")),
        ("CLANG_ENABLE_MODULES", SettingValue::lit("YES")),
        ("CLANG_ENABLE_OBJC_ARC", SettingValue::lit("YES")),
        ("CLANG_ENABLE_OBJC_WEAK", SettingValue::lit("YES")),
        ("CLANG_WARN_BLOCK_CAPTURE_AUTORELEASING", SettingValue::lit("YES")),
        ("CLANG_WARN_BOOL_CONVERSION", SettingValue::lit("YES")),
        ("CLANG_WARN_COMMA", SettingValue::lit("YES")),
        ("CLANG_WARN_CONSTANT_CONVERSION", SettingValue::lit("YES")),
        (
            "CLANG_WARN_DEPRECATED_OBJC_IMPLEMENTATIONS",
            SettingValue::lit("YES"),
        ),
        ("CLANG_WARN_DIRECT_OBJC_ISA_USAGE", SettingValue::lit("YES_ERROR")),
        ("CLANG_WARN_DOCUMENTATION_COMMENTS", SettingValue::lit("YES")),
        ("CLANG_WARN_EMPTY_BODY", SettingValue::lit("YES")),
        ("CLANG_WARN_ENUM_CONVERSION", SettingValue::lit("YES")),
        ("CLANG_WARN_INFINITE_RECURSION", SettingValue::lit("YES")),
        ("CLANG_WARN_INT_CONVERSION", SettingValue::lit("YES")),
        (
            "CLANG_WARN_NON_LITERAL_NULL_CONVERSION",
            SettingValue::lit("YES"),
        ),
        ("CLANG_WARN_OBJC_IMPLICIT_RETAIN_SELF", SettingValue::lit("YES")),
        ("CLANG_WARN_OBJC_LITERAL_CONVERSION", SettingValue::lit("YES")),
        ("CLANG_WARN_OBJC_ROOT_CLASS", SettingValue::lit("YES_ERROR")),
        (
            "CLANG_WARN_QUOTED_INCLUDE_IN_FRAMEWORK_HEADER",
            SettingValue::lit("YES"),
        ),
        ("CLANG_WARN_RANGE_LOOP_ANALYSIS", SettingValue::lit("YES")),
        ("CLANG_WARN_STRICT_PROTOTYPES", SettingValue::lit("YES")),
        ("CLANG_WARN_SUSPICIOUS_MOVE", SettingValue::lit("YES")),
        (
            "CLANG_WARN_UNGUARDED_AVAILABILITY",
            SettingValue::lit("YES_AGGRESSIVE"),
        ),
        ("CLANG_WARN_UNREACHABLE_CODE", SettingValue::lit("YES")),
        ("CLANG_WARN__DUPLICATE_METHOD_MATCH", SettingValue::lit("YES")),
        ("COPY_PHASE_STRIP", SettingValue::lit("NO")),
        ("ENABLE_STRICT_OBJC_MSGSEND", SettingValue::lit("YES")),
        ("ENABLE_USER_SCRIPT_SANDBOXING", SettingValue::lit("YES")),
        ("GCC_C_LANGUAGE_STANDARD", SettingValue::lit("gnu17")),
        ("GCC_NO_COMMON_BLOCKS", SettingValue::lit("YES")),
        ("GCC_WARN_64_TO_32_BIT_CONVERSION", SettingValue::lit("YES")),
        ("GCC_WARN_ABOUT_RETURN_TYPE", SettingValue::lit("YES_ERROR")),
        ("GCC_WARN_UNDECLARED_SELECTOR", SettingValue::lit("YES")),
        (
            "GCC_WARN_UNINITIALIZED_AUTOS",
            SettingValue::lit("YES_AGGRESSIVE"),
        ),
        ("GCC_WARN_UNUSED_FUNCTION", SettingValue::lit("YES")),
        ("GCC_WARN_UNUSED_VARIABLE", SettingValue::lit("YES")),
        ("IPHONEOS_DEPLOYMENT_TARGET", SettingValue::lit(deployment_target)),
        ("LOCALIZATION_PREFERS_STRING_CATALOGS", SettingValue::lit("YES")),
        ("MTL_FAST_MATH", SettingValue::lit("YES")),
        ("SDKROOT", SettingValue::lit("iphoneos")),
    ]
}

/// Project-level Debug settings.
pub fn project_debug_settings(deployment_target: &str) -> SettingsTable {
    let mut entries = project_common(deployment_target);
    entries.extend([
        ("DEBUG_INFORMATION_FORMAT", SettingValue::lit("dwarf")),
        ("ENABLE_TESTABILITY", SettingValue::lit("YES")),
        ("GCC_DYNAMIC_NO_PIC", SettingValue::lit("NO")),
        ("GCC_OPTIMIZATION_LEVEL", SettingValue::lit("0")),
        (
            "GCC_PREPROCESSOR_DEFINITIONS",
            SettingValue::list(&["DEBUG=1", "$(inherited)"]),
        ),
        ("MTL_ENABLE_DEBUG_INFO", SettingValue::lit("INCLUDE_SOURCE")),
        ("ONLY_ACTIVE_ARCH", SettingValue::lit("YES")),
        (
            "SWIFT_ACTIVE_COMPILATION_CONDITIONS",
            SettingValue::lit("DEBUG $(inherited)"),
        ),
        ("SWIFT_OPTIMIZATION_LEVEL", SettingValue::lit("-Onone")),
    ]);
    entries.sort_by_key(|entry| entry.0);
    table(&entries)
}

/// Project-level Release settings.
pub fn project_release_settings(deployment_target: &str) -> SettingsTable {
    let mut entries = project_common(deployment_target);
    entries.extend([
        ("DEBUG_INFORMATION_FORMAT", SettingValue::lit("dwarf-with-dsym")),
        ("ENABLE_NS_ASSERTIONS", SettingValue::lit("NO")),
        ("MTL_ENABLE_DEBUG_INFO", SettingValue::lit("NO")),
        ("SWIFT_COMPILATION_MODE", SettingValue::lit("wholemodule")),
        ("VALIDATE_PRODUCT", SettingValue::lit("YES")),
    ]);
    entries.sort_by_key(|entry| entry.0);
    table(&entries)
}

/// Target-level settings; identical for Debug and Release.
pub fn target_settings(bundle_identifier: &str) -> SettingsTable {
    let entries = vec![
        ("ASSETCATALOG_COMPILER_APPICON_NAME", SettingValue::lit("AppIcon")),
        (
            "ASSETCATALOG_COMPILER_GLOBAL_ACCENT_COLOR_NAME",
            SettingValue::lit("AccentColor"),
        ),
        ("CODE_SIGN_STYLE", SettingValue::lit("Automatic")),
        ("CURRENT_PROJECT_VERSION", SettingValue::lit("1")),
        ("DEVELOPMENT_TEAM", SettingValue::lit("")),
        ("ENABLE_PREVIEWS", SettingValue::lit("YES")),
        ("GENERATE_INFOPLIST_FILE", SettingValue::lit("YES")),
        (
            "INFOPLIST_KEY_UIApplicationSceneManifest_Generation",
            SettingValue::lit("YES"),
        ),
        (
            "INFOPLIST_KEY_UIApplicationSupportsIndirectInputEvents",
            SettingValue::lit("YES"),
        ),
        (
            "INFOPLIST_KEY_UILaunchScreen_Generation",
            SettingValue::lit("YES"),
        ),
        (
            "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPad",
            SettingValue::lit(
                "UIInterfaceOrientationPortrait UIInterfaceOrientationPortraitUpsideDown \
                 UIInterfaceOrientationLandscapeLeft UIInterfaceOrientationLandscapeRight",
            ),
        ),
        (
            "INFOPLIST_KEY_UISupportedInterfaceOrientations_iPhone",
            SettingValue::lit(
                "UIInterfaceOrientationPortrait UIInterfaceOrientationLandscapeLeft \
                 UIInterfaceOrientationLandscapeRight",
            ),
        ),
        (
            "LD_RUNPATH_SEARCH_PATHS",
            SettingValue::list(&["$(inherited)", "@executable_path/Frameworks"]),
        ),
        ("MARKETING_VERSION", SettingValue::lit("1.0")),
        ("PRODUCT_BUNDLE_IDENTIFIER", SettingValue::lit(bundle_identifier)),
        ("PRODUCT_NAME", SettingValue::lit("$(TARGET_NAME)")),
        ("SWIFT_EMIT_LOC_STRINGS", SettingValue::lit("YES")),
        ("SWIFT_VERSION", SettingValue::lit("5.0")),
        ("TARGETED_DEVICE_FAMILY", SettingValue::lit("1,2")),
    ];
    table(&entries)
}
