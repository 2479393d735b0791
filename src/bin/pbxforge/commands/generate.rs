//! `pbxforge generate` command

use anyhow::{bail, Result};

use crate::cli::GenerateArgs;
use pbxforge::core::settings::{ProductSettings, DEFAULT_DEPLOYMENT_TARGET};
use pbxforge::ops::generate::{write_manifest, GenerateOptions};
use pbxforge::util::config::{Config, CONFIG_FILE};
use pbxforge::util::fs;
use pbxforge::util::shell::{Shell, Status};

pub fn execute(args: GenerateArgs, shell: &Shell) -> Result<()> {
    let config = load_config(&args)?;

    let Some(name) = args.name.clone().or_else(|| config.product.name.clone()) else {
        shell.error("no product name: pass NAME or set [product] name in pbxforge.toml");
        bail!("missing product name");
    };

    let settings = ProductSettings {
        bundle_identifier: args
            .bundle_id
            .clone()
            .or_else(|| config.product.bundle_identifier.clone())
            .unwrap_or_else(|| format!("com.example.{}", name.to_lowercase())),
        deployment_target: args
            .deployment_target
            .clone()
            .or_else(|| config.product.deployment_target.clone())
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT_TARGET.to_string()),
        product_name: name,
    };

    let sources = if !args.sources.is_empty() {
        args.sources.clone()
    } else if !config.sources.include.is_empty() {
        fs::glob_sources(&args.root, &config.sources.include)?
    } else {
        let app_dir = args.root.join(&settings.product_name);
        fs::walk_swift_sources(&args.root, &app_dir)?
    };

    if sources.is_empty() {
        shell.error(format!(
            "no source files found under {}",
            args.root.join(&settings.product_name).display()
        ));
        bail!("no source files found");
    }

    let opts = GenerateOptions { settings, sources };
    let path = write_manifest(&args.root, &opts)?;

    shell.status(
        Status::Created,
        format!("{} ({} source files)", path.display(), opts.sources.len()),
    );
    for file in &opts.sources {
        tracing::debug!(file = %file, "included");
    }
    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "generate",
            "manifest": path.to_string_lossy(),
            "files": opts.sources,
        }));
    }

    Ok(())
}

fn load_config(args: &GenerateArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load(path);
    }
    let default = args.root.join(CONFIG_FILE);
    if default.exists() {
        Config::load(&default)
    } else {
        Ok(Config::default())
    }
}
