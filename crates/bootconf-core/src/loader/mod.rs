//! Layered configuration loading.
//!
//! A named configuration is assembled from up to three files in a directory:
//! 1. `<name>.json` (master, required for anything else to load)
//! 2. `<name>.local.*`
//! 3. `<name>.<env>.*`
//!
//! For the variants, a script sibling (e.g. `<name>.local.js`) wins over
//! `<name>.local.json`. Later files are merged over earlier ones with the
//! structural merge, so overrides can only replace leaves, never reshape
//! the master.

mod error;

pub use error::{codes, ConfigError};

use crate::merge::merge;
use crate::resolver::{Loader, PathResolver};
use bootconf_util::fs;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Evaluates script configuration files on behalf of the host.
///
/// The returned value must be the configuration object the script exports.
pub trait ScriptEvaluator: Send + Sync {
    fn evaluate(&self, path: &Path) -> Result<Value, String>;
}

/// Loads and merges named configuration files.
pub struct ConfigLoader {
    resolver: PathResolver,
    scripts: Option<Box<dyn ScriptEvaluator>>,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("resolver", &self.resolver)
            .field("scripts", &self.scripts.is_some())
            .finish()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(PathResolver::default())
    }
}

impl ConfigLoader {
    #[must_use]
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            scripts: None,
        }
    }

    /// Register the evaluator used for script variants.
    #[must_use]
    pub fn with_script_evaluator(mut self, scripts: Box<dyn ScriptEvaluator>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Find the files making up configuration `name` for `env`, in merge order.
    ///
    /// Returns nothing when the master `<name>.json` is missing.
    ///
    /// # Errors
    /// Returns an error if a directory exists but cannot be read, or a stat
    /// fails for a reason other than "not found".
    pub fn find_config_files(
        &self,
        dir: &Path,
        env: &str,
        name: &str,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let master = if_exists(&dir.join(format!("{name}.json")))?;
        let local = self.if_exists_with_any_ext(dir, &format!("{name}.local"))?;
        let env_variant = self.if_exists_with_any_ext(dir, &format!("{name}.{env}"))?;

        let Some(master) = master else {
            if local.is_some() || env_variant.is_some() {
                warn!(dir = %dir.display(), "Main config file \"{name}.json\" is missing");
            }
            return Ok(Vec::new());
        };

        Ok([Some(master), local, env_variant]
            .into_iter()
            .flatten()
            .collect())
    }

    /// `<file_name>.<ext>` with a preferred extension, else `<file_name>.json`.
    fn if_exists_with_any_ext(
        &self,
        dir: &Path,
        file_name: &str,
    ) -> Result<Option<PathBuf>, ConfigError> {
        let files = fs::try_read_dir(dir).map_err(ConfigError::read(dir))?;
        let base = dir.join(file_name);

        let fixed = self
            .resolver
            .fix_file_extension(&base, &files, false)
            .map_err(ConfigError::read(&base))?;

        if let Some(fixed) = fixed {
            if fs::is_file(&fixed).map_err(ConfigError::read(&fixed))? {
                return Ok(Some(fixed));
            }
        }

        if_exists(&dir.join(format!("{file_name}.json")))
    }

    /// Load a single configuration file according to its extension's loader.
    ///
    /// # Errors
    /// Read, parse, and evaluation failures, and non-object contents.
    pub fn load_config_file(&self, path: &Path) -> Result<Value, ConfigError> {
        let value = match self.resolver.extensions.loader_for(path) {
            Some(Loader::Json) => parse_json(path)?,
            Some(Loader::Yaml) => {
                let bytes = std::fs::read(path).map_err(ConfigError::read(path))?;
                serde_yaml::from_slice(&bytes).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some(Loader::Script {
                exports_function: true,
            }) => {
                let Some(scripts) = &self.scripts else {
                    return Err(ConfigError::Unsupported {
                        path: path.to_path_buf(),
                    });
                };
                scripts
                    .evaluate(path)
                    .map_err(|message| ConfigError::Script {
                        path: path.to_path_buf(),
                        message,
                    })?
            }
            Some(Loader::Script { .. } | Loader::Native) | None => {
                return Err(ConfigError::Unsupported {
                    path: path.to_path_buf(),
                })
            }
        };

        if !value.is_object() {
            return Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            });
        }
        Ok(value)
    }

    /// Load configuration `name` from `dir` for environment `env`.
    ///
    /// Returns an empty object when the master file is missing.
    ///
    /// # Errors
    /// Any load failure, or [`ConfigError::Merge`] naming the file whose
    /// values could not be applied.
    pub fn load_named(&self, dir: &Path, env: &str, name: &str) -> Result<Value, ConfigError> {
        let files = self.find_config_files(dir, env, name)?;
        if !files.is_empty() {
            debug!("found {env} {name} files");
            for file in &files {
                debug!("  {}", file.display());
            }
        }

        let merged = self.merge_files(&files)?;
        debug!(%merged, "merged {env} {name} configuration");
        Ok(merged)
    }

    /// Load `files` in order and merge each over the result of the previous ones.
    ///
    /// The first file is the base; an empty list yields an empty object.
    ///
    /// # Errors
    /// Any load failure, or [`ConfigError::Merge`] naming the file whose
    /// values could not be applied.
    pub fn merge_files(&self, files: &[PathBuf]) -> Result<Value, ConfigError> {
        let mut files = files.iter();
        let mut merged = match files.next() {
            Some(first) => self.load_config_file(first)?,
            None => Value::Object(Map::new()),
        };

        for file in files {
            let next = self.load_config_file(file)?;
            merge(&mut merged, &next).map_err(|source| ConfigError::Merge {
                path: file.clone(),
                source,
            })?;
        }

        Ok(merged)
    }
}

/// Read `<dir>/<file_name>.json`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
/// Malformed JSON and I/O failures other than "not found".
pub fn try_read_json_config(dir: &Path, file_name: &str) -> Result<Option<Value>, ConfigError> {
    let path = dir.join(format!("{file_name}.json"));
    if !fs::is_file(&path).map_err(ConfigError::read(&path))? {
        return Ok(None);
    }
    parse_json(&path).map(Some)
}

fn parse_json(path: &Path) -> Result<Value, ConfigError> {
    let bytes = std::fs::read(path).map_err(ConfigError::read(path))?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn if_exists(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    Ok(fs::exists(path)
        .map_err(ConfigError::read(path))?
        .then(|| path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergeError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    struct FixedScript(Value);

    impl ScriptEvaluator for FixedScript {
        fn evaluate(&self, _path: &Path) -> Result<Value, String> {
            Ok(self.0.clone())
        }
    }

    struct FailingScript;

    impl ScriptEvaluator for FailingScript {
        fn evaluate(&self, _path: &Path) -> Result<Value, String> {
            Err("SyntaxError: Unexpected token".to_string())
        }
    }

    #[test]
    fn test_env_variant_overrides_master() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"x":1}"#).unwrap();
        fs::write(dir.path().join("config.production.json"), r#"{"x":2}"#).unwrap();

        let merged = ConfigLoader::default()
            .load_named(dir.path(), "production", "config")
            .unwrap();
        assert_eq!(merged, json!({"x": 2}));

        let merged = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap();
        assert_eq!(merged, json!({"x": 1}));
    }

    #[test]
    fn test_merge_order_master_local_env() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("middleware.json"),
            r#"{"a": 1, "b": 1, "c": 1}"#,
        )
        .unwrap();
        fs::write(dir.path().join("middleware.local.json"), r#"{"b": 2, "c": 2}"#).unwrap();
        fs::write(dir.path().join("middleware.test.json"), r#"{"c": 3}"#).unwrap();

        let loader = ConfigLoader::default();
        let files = loader
            .find_config_files(dir.path(), "test", "middleware")
            .unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("middleware.json"),
                dir.path().join("middleware.local.json"),
                dir.path().join("middleware.test.json"),
            ]
        );

        let merged = loader.load_named(dir.path(), "test", "middleware").unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn test_missing_master_loads_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.local.json"), r#"{"x":1}"#).unwrap();

        let loader = ConfigLoader::default();
        assert!(loader
            .find_config_files(dir.path(), "development", "config")
            .unwrap()
            .is_empty());
        assert_eq!(
            loader
                .load_named(dir.path(), "development", "config")
                .unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let dir = tempdir().unwrap();
        let merged = ConfigLoader::default()
            .load_named(&dir.path().join("missing"), "development", "config")
            .unwrap();
        assert_eq!(merged, json!({}));
    }

    #[test]
    fn test_yaml_variant_preferred_over_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"port": 3000, "host": "a"}"#).unwrap();
        fs::write(dir.path().join("config.local.json"), r#"{"port": 1}"#).unwrap();
        fs::write(dir.path().join("config.local.yaml"), "port: 4000\n").unwrap();

        let merged = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap();
        assert_eq!(merged, json!({"port": 4000, "host": "a"}));
    }

    #[test]
    fn test_script_variant_uses_evaluator() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"port": 3000}"#).unwrap();
        fs::write(dir.path().join("config.production.js"), "module.exports = {}").unwrap();
        fs::write(dir.path().join("config.production.json"), r#"{"port": 1}"#).unwrap();

        let loader = ConfigLoader::default()
            .with_script_evaluator(Box::new(FixedScript(json!({"port": 443}))));
        let merged = loader
            .load_named(dir.path(), "production", "config")
            .unwrap();
        assert_eq!(merged, json!({"port": 443}));
    }

    #[test]
    fn test_script_variant_without_evaluator_is_unsupported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join("config.local.js"), "").unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert_eq!(err.code(), codes::CONFIG_LOADER_UNSUPPORTED);
    }

    #[test]
    fn test_script_failure_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join("config.local.js"), "").unwrap();

        let err = ConfigLoader::default()
            .with_script_evaluator(Box::new(FailingScript))
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert_eq!(err.code(), codes::CONFIG_SCRIPT_FAILED);
        assert!(err.to_string().contains("SyntaxError"));
    }

    #[test]
    fn test_merge_failure_names_file_and_key() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"ports": [80, 443]}"#).unwrap();
        let env_file = dir.path().join("config.staging.json");
        fs::write(&env_file, r#"{"ports": [8080]}"#).unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "staging", "config")
            .unwrap_err();
        let ConfigError::Merge { path, source } = &err else {
            panic!("expected merge error, got {err:?}");
        };
        assert_eq!(path, &env_file);
        assert_eq!(source.key_path(), "ports");
        assert!(matches!(source, MergeError::ArrayLengthMismatch { .. }));
        assert!(err.to_string().starts_with("Cannot apply "));
    }

    #[test]
    fn test_malformed_variant_propagates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join("config.local.json"), "{ nope").unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert_eq!(err.code(), codes::CONFIG_PARSE_FAILED);
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), b"{\"name\": \"a\xff\"}").unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert_eq!(err.code(), codes::CONFIG_PARSE_FAILED);
    }

    #[test]
    fn test_invalid_utf8_yaml_variant_is_a_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"name": "a"}"#).unwrap();
        fs::write(dir.path().join("config.local.yaml"), b"name: a\xff\n").unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert_eq!(err.code(), codes::CONFIG_PARSE_FAILED);
    }

    #[test]
    fn test_non_object_config_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "[1, 2]").unwrap();

        let err = ConfigLoader::default()
            .load_named(dir.path(), "development", "config")
            .unwrap_err();
        assert_eq!(err.code(), codes::CONFIG_NOT_AN_OBJECT);
    }

    #[test]
    fn test_try_read_json_config() {
        let dir = tempdir().unwrap();
        assert!(try_read_json_config(dir.path(), "config").unwrap().is_none());

        fs::write(dir.path().join("config.json"), r#"{"a": true}"#).unwrap();
        assert_eq!(
            try_read_json_config(dir.path(), "config").unwrap(),
            Some(json!({"a": true}))
        );

        fs::write(dir.path().join("broken.json"), "{").unwrap();
        let err = try_read_json_config(dir.path(), "broken").unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }
}
