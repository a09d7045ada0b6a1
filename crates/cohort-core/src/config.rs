use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "cohort.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortConfig {
    #[serde(default = "default_users_path")]
    pub users: PathBuf,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub partition: PartitionSettings,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            users: default_users_path(),
            graph: GraphConfig::default(),
            partition: PartitionSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Keep followed accounts with more than this many followers.
    #[serde(default = "default_min_common")]
    pub min_common: usize,
    #[serde(default)]
    pub min_degree: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_common: default_min_common(),
            min_degree: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSettings {
    /// BFS depth bound. Signed so that configs may say `-1`; negative
    /// values clamp to zero.
    #[serde(default = "default_max_depth")]
    pub max_depth: i64,
    #[serde(default = "default_clusters")]
    pub clusters: usize,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            clusters: default_clusters(),
            parallel: false,
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `./cohort.toml` is tried, then
/// `<config dir>/cohort/config.toml`, then built-in defaults.
///
/// # Errors
///
/// Returns an error if an explicit path is missing or any config file
/// fails to read or parse.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<CohortConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        return read_config(path);
    }

    let local = working_dir.join(PROJECT_CONFIG_FILE);
    if local.exists() {
        return read_config(&local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("cohort/config.toml");
        if user.exists() {
            return read_config(&user);
        }
    }

    Ok(CohortConfig::default())
}

fn read_config(path: &Path) -> Result<CohortConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CohortConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_users_path() -> PathBuf {
    PathBuf::from("users.json")
}

const fn default_min_common() -> usize {
    1
}

const fn default_max_depth() -> i64 {
    5
}

const fn default_clusters() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: CohortConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg, CohortConfig::default());
        assert_eq!(cfg.graph.min_common, 1);
        assert_eq!(cfg.partition.max_depth, 5);
        assert_eq!(cfg.partition.clusters, 3);
        assert!(!cfg.partition.parallel);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let cfg: CohortConfig = toml::from_str(
            "users = \"data/u.json\"\n[partition]\nmax_depth = -2\nparallel = true\n",
        )
        .expect("parse");
        assert_eq!(cfg.users, PathBuf::from("data/u.json"));
        assert_eq!(cfg.partition.max_depth, -2);
        assert!(cfg.partition.parallel);
        assert_eq!(cfg.partition.clusters, 3);
        assert_eq!(cfg.graph, GraphConfig::default());
    }

    #[test]
    fn local_file_is_picked_up() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[graph]\nmin_common = 0\nmin_degree = 2\n",
        )
        .expect("write config");

        let cfg = load_config(None, dir.path()).expect("load");
        assert_eq!(cfg.graph.min_common, 0);
        assert_eq!(cfg.graph.min_degree, 2);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(missing.as_path()), dir.path()).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[partition\nmax_depth = ").expect("write config");
        let err = load_config(Some(path.as_path()), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
