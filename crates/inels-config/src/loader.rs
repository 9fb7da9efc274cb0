//! YAML loading with `!include`, `!secret` and `!env_var` resolution

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Custom tags understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Include,
    Secret,
    EnvVar,
}

impl Tag {
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim_start_matches('!') {
            "include" => Some(Tag::Include),
            "secret" => Some(Tag::Secret),
            "env_var" => Some(Tag::EnvVar),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tag::Include => "!include",
            Tag::Secret => "!secret",
            Tag::EnvVar => "!env_var",
        }
    }
}

pub struct YamlLoader {
    config_dir: PathBuf,
    secrets: Secrets,
    /// Files currently being loaded, outermost first
    include_chain: Vec<PathBuf>,
}

impl YamlLoader {
    /// Loader for a config directory, reading its secrets.yaml if present
    pub fn new(config_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_dir = config_dir.into();
        let secrets = Secrets::load(&config_dir)?;
        Ok(Self::with_secrets(config_dir, secrets))
    }

    pub fn with_secrets(config_dir: impl Into<PathBuf>, secrets: Secrets) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets,
            include_chain: Vec::new(),
        }
    }

    /// Load a file, relative to the config directory unless absolute
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = self.config_dir.join(path.as_ref());
        if self.include_chain.contains(&path) {
            return Err(ConfigError::CircularInclude { path });
        }
        debug!(path = %path.display(), depth = self.include_chain.len(), "Loading YAML file");

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;

        self.include_chain.push(path.clone());
        let result = self.load_string(&content, &path);
        self.include_chain.pop();
        result
    }

    /// Parse YAML text and resolve its tags
    ///
    /// `source_path` anchors relative includes and names the source in errors.
    pub fn load_string(&mut self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source,
        })?;
        self.resolve(value, source_path)
    }

    fn resolve(&mut self, value: Value, source_path: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.resolve_tagged(*tagged, source_path),
            Value::Mapping(map) => {
                let mut resolved = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key, self.resolve(value, source_path)?);
                }
                Ok(Value::Mapping(resolved))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.resolve(v, source_path))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            other => Ok(other),
        }
    }

    fn resolve_tagged(&mut self, tagged: TaggedValue, source_path: &Path) -> ConfigResult<Value> {
        let Some(tag) = Tag::parse(&tagged.tag.to_string()) else {
            // Unknown tags pass through with their contents resolved
            let value = self.resolve(tagged.value, source_path)?;
            return Ok(Value::Tagged(Box::new(TaggedValue {
                tag: tagged.tag,
                value,
            })));
        };

        let argument = match tagged.value {
            Value::String(s) => s,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: tag.as_str().to_string(),
                    reason: format!("expected a string argument, got {:?}", other),
                })
            }
        };
        trace!(tag = tag.as_str(), %argument, "Resolving tag");

        match tag {
            Tag::Include => {
                let path = self.include_path(&argument, source_path)?;
                self.load_file(path)
            }
            Tag::Secret => Ok(Value::String(self.secrets.get(&argument)?.to_string())),
            Tag::EnvVar => std::env::var(&argument)
                .map(Value::String)
                .map_err(|_| ConfigError::EnvVarNotFound { var: argument }),
        }
    }

    /// Include paths are relative to the including file's directory
    fn include_path(&self, argument: &str, source_path: &Path) -> ConfigResult<PathBuf> {
        if argument.trim().is_empty() {
            return Err(ConfigError::InvalidIncludePath {
                path: argument.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        let base = source_path.parent().unwrap_or(&self.config_dir);
        Ok(base.join(argument))
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Load a YAML file with full tag processing
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_file(file)
}

/// Load YAML text with tag processing; includes resolve against `config_dir`
pub fn load_yaml_string(
    config_dir: impl Into<PathBuf>,
    content: &str,
    source_name: &str,
) -> ConfigResult<Value> {
    let mut loader = YamlLoader::new(config_dir)?;
    let source = loader.config_dir().join(source_name);
    loader.load_string(content, &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn get<'a>(value: &'a Value, key: &str) -> &'a Value {
        value.get(key).unwrap_or_else(|| panic!("missing key {}", key))
    }

    #[test]
    fn test_tag_parse() {
        assert_eq!(Tag::parse("!include"), Some(Tag::Include));
        assert_eq!(Tag::parse("secret"), Some(Tag::Secret));
        assert_eq!(Tag::parse("!include_dir_list"), None);
    }

    #[test]
    fn test_include_relative_to_including_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "devices/list.yaml", "- unique_id: a\n");
        write_file(dir.path(), "devices/index.yaml", "items: !include list.yaml\n");
        write_file(dir.path(), "inels.yaml", "devices: !include devices/index.yaml\n");

        let value = load_yaml(dir.path(), "inels.yaml").unwrap();
        let items = get(get(&value, "devices"), "items");
        assert_eq!(items.as_sequence().unwrap().len(), 1);
    }

    #[test]
    fn test_secret_and_env_var() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "secrets.yaml", "broker_password: hunter2\n");
        std::env::set_var("INELS_CONFIG_TEST_HOST", "broker.local");
        write_file(
            dir.path(),
            "inels.yaml",
            "password: !secret broker_password\nhost: !env_var INELS_CONFIG_TEST_HOST\n",
        );

        let value = load_yaml(dir.path(), "inels.yaml").unwrap();
        assert_eq!(get(&value, "password").as_str(), Some("hunter2"));
        assert_eq!(get(&value, "host").as_str(), Some("broker.local"));
        std::env::remove_var("INELS_CONFIG_TEST_HOST");
    }

    #[test]
    fn test_missing_env_var() {
        let dir = TempDir::new().unwrap();
        let result = load_yaml_string(
            dir.path(),
            "host: !env_var INELS_CONFIG_TEST_UNSET\n",
            "inels.yaml",
        );
        assert!(matches!(
            result,
            Err(ConfigError::EnvVarNotFound { var }) if var == "INELS_CONFIG_TEST_UNSET"
        ));
    }

    #[test]
    fn test_circular_include() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.yaml", "b: !include b.yaml\n");
        write_file(dir.path(), "b.yaml", "a: !include a.yaml\n");

        let result = load_yaml(dir.path(), "a.yaml");
        assert!(matches!(result, Err(ConfigError::CircularInclude { .. })));
    }

    #[test]
    fn test_same_file_included_twice_is_not_circular() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "mqtt.yaml", "port: 1883\n");
        write_file(
            dir.path(),
            "inels.yaml",
            "first: !include mqtt.yaml\nsecond: !include mqtt.yaml\n",
        );

        let value = load_yaml(dir.path(), "inels.yaml").unwrap();
        assert_eq!(get(&value, "first"), get(&value, "second"));
    }

    #[test]
    fn test_non_string_argument() {
        let dir = TempDir::new().unwrap();
        let result = load_yaml_string(dir.path(), "x: !secret [a, b]\n", "inels.yaml");
        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "!secret"));
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let dir = TempDir::new().unwrap();
        let value = load_yaml_string(dir.path(), "x: !custom 5\n", "inels.yaml").unwrap();
        assert!(matches!(get(&value, "x"), Value::Tagged(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "broken.yaml", "key: [unclosed\n");

        match load_yaml(dir.path(), "broken.yaml") {
            Err(ConfigError::ParseYaml { path, .. }) => assert!(path.ends_with("broken.yaml")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
