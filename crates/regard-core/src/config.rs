use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the project root holding config, store and templates.
pub const REGARD_DIR: &str = ".regard";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub comment: CommentConfig,
    #[serde(default)]
    pub outreach: OutreachConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How many users each run selects for outreach.
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Notifications older than this many hours are ignored at collection.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
    /// Store records older than this many hours are dropped at merge.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            lookback_hours: default_lookback_hours(),
            retention_hours: default_retention_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentConfig {
    #[serde(default = "default_templates_path")]
    pub templates: PathBuf,
    /// Names longer than this (in characters) are not interpolated.
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            templates: default_templates_path(),
            max_name_chars: default_max_name_chars(),
        }
    }
}

/// External command invoked by `rgd post`. `{url}` and `{comment}` in the
/// argv are substituted per user before spawning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutreachConfig {
    #[serde(default)]
    pub command: Vec<String>,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(REGARD_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

impl ProjectConfig {
    /// Store path resolved against the project root.
    #[must_use]
    pub fn store_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.store.path)
    }

    /// Template file path resolved against the project root.
    #[must_use]
    pub fn templates_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.comment.templates)
    }
}

fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

const fn default_target_count() -> usize {
    5
}

const fn default_lookback_hours() -> i64 {
    12
}

const fn default_retention_hours() -> i64 {
    24
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".regard/engagement.json")
}

fn default_templates_path() -> PathBuf {
    PathBuf::from(".regard/templates.json")
}

const fn default_max_name_chars() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::{load_project_config, ProjectConfig};
    use std::path::{Path, PathBuf};

    #[test]
    fn missing_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.pipeline.target_count, 5);
        assert_eq!(cfg.pipeline.lookback_hours, 12);
        assert_eq!(cfg.pipeline.retention_hours, 24);
        assert_eq!(cfg.comment.max_name_chars, 10);
        assert!(cfg.outreach.command.is_empty());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".regard")).expect("mkdir");
        std::fs::write(
            root.path().join(".regard/config.toml"),
            r#"
[pipeline]
target_count = 3

[outreach]
command = ["bird", "post", "--url", "{url}", "--body", "{comment}"]
"#,
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.pipeline.target_count, 3);
        assert_eq!(cfg.pipeline.lookback_hours, 12);
        assert_eq!(cfg.outreach.command.len(), 6);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".regard")).expect("mkdir");
        std::fs::write(root.path().join(".regard/config.toml"), "pipeline = [nope")
            .expect("write config");
        assert!(load_project_config(root.path()).is_err());
    }

    #[test]
    fn paths_resolve_against_root() {
        let cfg = ProjectConfig::default();
        let root = Path::new("/srv/shop");
        assert_eq!(
            cfg.store_path(root),
            PathBuf::from("/srv/shop/.regard/engagement.json")
        );
        assert_eq!(
            cfg.templates_path(root),
            PathBuf::from("/srv/shop/.regard/templates.json")
        );

        let mut absolute = ProjectConfig::default();
        absolute.store.path = PathBuf::from("/var/lib/regard/engagement.json");
        assert_eq!(
            absolute.store_path(root),
            PathBuf::from("/var/lib/regard/engagement.json")
        );
    }
}
