use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::divisions::*;

pub const DEFAULT_DATA_DIRECTORY: &str = "csv_files";

/// The content of a configuration file. Every field is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivnetConfig {
    pub data_directory: Option<String>,
    pub selection: Option<Vec<u32>>,
    pub layout: Option<String>,
    pub remove_empty_nodes: Option<bool>,
    pub seed: Option<u64>,
    pub title: Option<String>,
    pub party_colors: Option<BTreeMap<String, String>>,
    pub skip_malformed: Option<bool>,
    pub output_path: Option<String>,
}

/// A configuration and the directory its relative paths are resolved against.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LoadedConfig {
    pub config: DivnetConfig,
    pub root: PathBuf,
}

impl Default for LoadedConfig {
    fn default() -> LoadedConfig {
        LoadedConfig {
            config: DivnetConfig::default(),
            root: PathBuf::from("."),
        }
    }
}

pub fn read_config(path: &str) -> DivnetResult<LoadedConfig> {
    let config_str = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: DivnetConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    let root = Path::new(path)
        .parent()
        .context(MissingParentDirSnafu { path })?
        .to_path_buf();
    Ok(LoadedConfig { config, root })
}

impl LoadedConfig {
    /// Command-line paths are used as given, paths of the file are relative
    /// to the file.
    pub fn data_directory(&self, cli: &Option<String>) -> PathBuf {
        match (cli, &self.config.data_directory) {
            (Some(p), _) => PathBuf::from(p),
            (None, Some(p)) => self.resolve(p),
            (None, None) => PathBuf::from(DEFAULT_DATA_DIRECTORY),
        }
    }

    /// The output location, or `None` for the standard output.
    pub fn output_path(&self, cli: &Option<String>) -> Option<PathBuf> {
        match (cli, &self.config.output_path) {
            (Some(p), _) if p == "stdout" => None,
            (Some(p), _) => Some(PathBuf::from(p)),
            (None, Some(p)) if p == "stdout" => None,
            (None, Some(p)) => Some(self.resolve(p)),
            (None, None) => None,
        }
    }

    pub fn malformed_policy(&self, skip_malformed: bool) -> MalformedPolicy {
        if skip_malformed || self.config.skip_malformed.unwrap_or(false) {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }

    pub fn selection(&self, cli: &Option<Vec<u32>>) -> Vec<u32> {
        cli.clone()
            .or_else(|| self.config.selection.clone())
            .unwrap_or_default()
    }

    pub fn layout_name(&self, cli: &Option<String>) -> String {
        cli.clone()
            .or_else(|| self.config.layout.clone())
            .unwrap_or_else(|| LayoutAlgorithm::Spring.name().to_string())
    }

    pub fn render_options(
        &self,
        layout: LayoutAlgorithm,
        keep_empty_nodes: bool,
        seed: Option<u64>,
        title: &Option<String>,
    ) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            remove_empty_nodes: !keep_empty_nodes
                && self
                    .config
                    .remove_empty_nodes
                    .unwrap_or(defaults.remove_empty_nodes),
            layout,
            seed: seed.or(self.config.seed).unwrap_or(defaults.seed),
            title: title
                .clone()
                .or_else(|| self.config.title.clone())
                .unwrap_or(defaults.title),
        }
    }

    /// The reference colours, extended with the ones of the file.
    pub fn party_colors(&self) -> PartyColors {
        let mut colors = PartyColors::default();
        if let Some(extra) = &self.config.party_colors {
            colors.extend(extra);
        }
        colors
    }

    fn resolve(&self, p: &str) -> PathBuf {
        let path = Path::new(p);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
