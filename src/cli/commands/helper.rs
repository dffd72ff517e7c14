use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config, load_config_file},
    registry::RuleRegistry,
};

/// Configuration resolved for one command run.
pub struct Settings {
    pub config: Config,
    /// Where the config came from, `None` for defaults.
    pub config_path: Option<PathBuf>,
    /// Directory `includes` and `ignores` are relative to.
    pub base_dir: PathBuf,
    pub registry: RuleRegistry,
}

/// Load the config named by `--config`, or the nearest one above the working
/// directory, and build the rule registry from it.
pub fn load_settings(common: &CommonArgs) -> Result<Settings> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;

    let (config, config_path) = match &common.config {
        Some(path) => (load_config_file(path)?, Some(path.clone())),
        None => {
            let loaded = load_config(&cwd)?;
            (loaded.config, loaded.path)
        }
    };

    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or(cwd);

    let registry = RuleRegistry::from_config(&config.rules).with_context(|| match &config_path {
        Some(path) => format!("Invalid rule configuration in {:?}", path),
        None => "Invalid rule configuration".to_string(),
    })?;

    Ok(Settings {
        config,
        config_path,
        base_dir,
        registry,
    })
}
