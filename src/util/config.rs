//! Configuration file support for cbuild.
//!
//! cbuild reads two optional configuration files:
//! - Global: `~/.cbuild/config.toml` - User-wide defaults
//! - Project: `<solution-dir>/.cbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::{Backend, Options};

/// cbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Explicit tool locations
    pub tools: ToolsConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default number of parallel jobs (None = let the build tool decide)
    pub jobs: Option<usize>,

    /// Default CMake generator
    pub generator: Option<String>,

    /// Default toolchain passed to the converter
    pub toolchain: Option<String>,

    /// Default backend (cmake, cbuildgen)
    pub backend: Option<String>,

    /// Always install missing packs
    pub packs: bool,
}

/// Paths to external tools, overriding discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub csolution: Option<PathBuf>,
    pub cpackget: Option<PathBuf>,
    pub cbuildgen: Option<PathBuf>,
    pub cbuild2cmake: Option<PathBuf>,
    pub cmake: Option<PathBuf>,
    pub ninja: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.toolchain.is_some() {
            self.build.toolchain = other.build.toolchain;
        }
        if other.build.backend.is_some() {
            self.build.backend = other.build.backend;
        }
        if other.build.packs {
            self.build.packs = true;
        }

        let tools = other.tools;
        macro_rules! take {
            ($($field:ident),*) => {
                $(if tools.$field.is_some() {
                    self.tools.$field = tools.$field;
                })*
            };
        }
        take!(csolution, cpackget, cbuildgen, cbuild2cmake, cmake, ninja);
    }

    /// Parse backend from config string.
    pub fn backend(&self) -> Option<Backend> {
        self.build.backend.as_ref().and_then(|s| match s.parse() {
            Ok(backend) => Some(backend),
            Err(e) => {
                tracing::warn!("ignoring configured backend: {}", e);
                None
            }
        })
    }

    /// Fill options the command line left unset.
    pub fn apply_defaults(&self, options: &mut Options, cli_backend_set: bool) {
        if options.jobs.is_none() {
            options.jobs = self.build.jobs;
        }
        if options.toolchain.is_none() {
            options.toolchain = self.build.toolchain.clone();
        }
        if options.generator.is_none() {
            options.generator = self.build.generator.clone();
        }
        if !cli_backend_set {
            if let Some(backend) = self.backend() {
                options.backend = backend;
            }
        }
        options.packs |= self.build.packs;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cbuild/config.toml)
/// 2. Global config (~/.cbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global cbuild config directory (~/.cbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cbuild"))
}

/// Get the global config path (~/.cbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<solution-dir>/.cbuild/config.toml).
pub fn project_config_path(solution_dir: &Path) -> PathBuf {
    solution_dir.join(".cbuild").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::DEFAULT_GENERATOR;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.backend.is_none());
        assert!(config.build.jobs.is_none());
        assert!(!config.build.packs);
        assert!(config.tools.cmake.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
backend = "cbuildgen"
jobs = 8
packs = true

[tools]
cmake = "/opt/cmake/bin/cmake"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.backend, Some("cbuildgen".to_string()));
        assert_eq!(config.build.jobs, Some(8));
        assert!(config.build.packs);
        assert_eq!(config.tools.cmake, Some(PathBuf::from("/opt/cmake/bin/cmake")));
        assert_eq!(config.backend(), Some(Backend::Cbuildgen));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.generator = Some("Unix Makefiles".to_string());
        base.build.jobs = Some(4);
        base.tools.ninja = Some(PathBuf::from("/usr/bin/ninja"));

        let mut override_cfg = Config::default();
        override_cfg.build.generator = Some("Ninja".to_string());
        override_cfg.tools.cmake = Some(PathBuf::from("/opt/cmake"));

        base.merge(override_cfg);

        assert_eq!(base.build.generator, Some("Ninja".to_string()));
        assert_eq!(base.build.jobs, Some(4));
        assert_eq!(base.tools.ninja, Some(PathBuf::from("/usr/bin/ninja")));
        assert_eq!(base.tools.cmake, Some(PathBuf::from("/opt/cmake")));
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[build]\njobs = 2\ntoolchain = \"AC6\"\n").unwrap();
        std::fs::write(&project, "[build]\ntoolchain = \"GCC\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.build.jobs, Some(2));
        assert_eq!(config.build.toolchain, Some("GCC".to_string()));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build\njobs = ").unwrap();

        let config = load_config(None, &path);
        assert!(config.build.jobs.is_none());
    }

    #[test]
    fn test_cli_wins_over_config() {
        let mut config = Config::default();
        config.build.jobs = Some(4);
        config.build.toolchain = Some("AC6".to_string());
        config.build.backend = Some("cbuildgen".to_string());

        let mut options = Options {
            jobs: Some(16),
            ..Options::default()
        };
        config.apply_defaults(&mut options, true);
        assert_eq!(options.jobs, Some(16));
        assert_eq!(options.toolchain.as_deref(), Some("AC6"));
        assert_eq!(options.backend, Backend::CbuildIndex);

        let mut options = Options::default();
        config.apply_defaults(&mut options, false);
        assert_eq!(options.jobs, Some(4));
        assert_eq!(options.backend, Backend::Cbuildgen);
    }

    #[test]
    fn test_explicit_generator_and_jobs_beat_config() {
        let mut config = Config::default();
        config.build.generator = Some("Unix Makefiles".to_string());
        config.build.jobs = Some(4);

        // `-g Ninja -j 0` names the defaults explicitly
        let mut options = Options {
            generator: Some(DEFAULT_GENERATOR.to_string()),
            jobs: Some(0),
            ..Options::default()
        };
        config.apply_defaults(&mut options, false);
        assert_eq!(options.generator(), DEFAULT_GENERATOR);
        assert_eq!(options.jobs, Some(0));

        let mut options = Options::default();
        config.apply_defaults(&mut options, false);
        assert_eq!(options.generator(), "Unix Makefiles");
        assert_eq!(options.jobs, Some(4));
    }

    #[test]
    fn test_generator_defaults_without_config() {
        let mut options = Options::default();
        Config::default().apply_defaults(&mut options, false);
        assert_eq!(options.generator(), DEFAULT_GENERATOR);
        assert_eq!(options.jobs, None);
    }
}
