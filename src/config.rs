//! Configuration file handling for costbook.
//!
//! The configuration file is stored at `$COSTBOOK_HOME/config.json` and records which schema
//! version the data file uses, where the data file lives, how searches behave, and the default
//! name for the "Logged By" column.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::model::{EntryDefaults, Schema, SchemaVersion, SearchFields, SearchScope};
use crate::session::Session;
use crate::store::RecordStore;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "costbook";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA_FILE: &str = "cost_data.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$COSTBOOK_HOME` and from there it loads `$COSTBOOK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    schema: Schema,
    scope: SearchScope,
}

/// Settings chosen at `init` time. Anything left as `None` gets its default.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub schema_version: SchemaVersion,
    pub data_file: Option<PathBuf>,
    pub logged_by: Option<String>,
}

impl Config {
    /// Creates the home directory and:
    /// - Creates an initial `config.json` from `options`
    /// - Creates a header-only data file, unless one already exists
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, options: InitOptions) -> Result<Self> {
        Self::create_inner(dir.into(), options)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf, options: InitOptions) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the costbook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let config_file = ConfigFile {
            schema_version: options.schema_version,
            data_file: options.data_file.unwrap_or_else(|| PathBuf::from(DATA_FILE)),
            logged_by: options.logged_by,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let config = Self::new(root, config_path, config_file)?;
        RecordStore::initialize(config.data_path(), config.schema())?;
        Ok(config)
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - validate the search columns against the schema
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Costbook home is missing, run 'costbook init' first")?;
        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        Self::new(root, config_path, config_file)
    }

    fn new(root: PathBuf, config_path: PathBuf, config_file: ConfigFile) -> Res<Self> {
        let schema = Schema::new(config_file.schema_version);
        let scope = config_file
            .search_fields()
            .resolve(&schema)
            .context("Invalid search columns in the config file")?;
        Ok(Self {
            root,
            config_path,
            config_file,
            schema,
            scope,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn search_scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn logged_by(&self) -> Option<&str> {
        self.config_file.logged_by.as_deref()
    }

    /// Returns the data file path if it is absolute, otherwise resolves it against the home.
    pub fn data_path(&self) -> PathBuf {
        let p = &self.config_file.data_file;
        if p.is_absolute() {
            return p.clone();
        }
        self.root.join(p)
    }

    /// Opens the data file and starts an editing session on it.
    pub fn session(&self) -> Result<Session> {
        let store = RecordStore::open(self.data_path(), self.schema.clone())?;
        let defaults = EntryDefaults::today(self.config_file.logged_by.clone());
        Ok(Session::new(store, self.scope.clone(), defaults))
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "costbook",
///   "config_version": 1,
///   "schema_version": "v2",
///   "data_file": "cost_data.csv",
///   "search": { "columns": ["Item Description", "Category"] },
///   "logged_by": "jdoe"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "costbook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The header layout of the data file
    schema_version: SchemaVersion,

    /// Path to the data file (relative to the home directory or absolute)
    data_file: PathBuf,

    /// Which columns a search looks at. Defaults by schema version if not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<SearchFields>,

    /// Filled into a blank "Logged By" field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logged_by: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            schema_version: SchemaVersion::default(),
            data_file: PathBuf::from(DATA_FILE),
            search: None,
            logged_by: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn search_fields(&self) -> SearchFields {
        self.search
            .clone()
            .unwrap_or_else(|| SearchFields::default_for(self.schema_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("costbook_home");
        let options = InitOptions {
            schema_version: SchemaVersion::V4,
            logged_by: Some("jdoe".to_string()),
            ..InitOptions::default()
        };

        let config = Config::create(&home_dir, options).await.unwrap();

        assert_eq!(config.schema().version(), SchemaVersion::V4);
        assert_eq!(config.logged_by(), Some("jdoe"));
        assert_eq!(config.search_scope(), &SearchScope::WholeRow);
        assert!(config.config_path().is_file());
        assert_eq!(config.data_path(), config.root().join(DATA_FILE));

        let content = utils::read(&config.data_path()).await.unwrap();
        assert!(content.starts_with("Item Description,"));
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), InitOptions::default())
            .await
            .unwrap();
        let e = Config::create(dir.path(), InitOptions::default())
            .await
            .unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
        assert!(e.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path(), InitOptions::default())
            .await
            .unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.config_file, loaded.config_file);
        assert_eq!(loaded.schema().version(), SchemaVersion::V2);
        assert_eq!(loaded.search_scope(), &SearchScope::Columns(vec![0, 1]));
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let e = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "costbook",
            "config_version": 1,
            "schema_version": "v3",
            "data_file": "/var/data/costs.csv"
        }"#;
        utils::write(temp_dir.path().join(CONFIG_JSON), json)
            .await
            .unwrap();

        let config = Config::load(temp_dir.path()).await.unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/var/data/costs.csv"));
        assert_eq!(config.logged_by(), None);
        assert_eq!(config.search_scope(), &SearchScope::WholeRow);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "schema_version": "v2",
            "data_file": "cost_data.csv"
        }"#;
        let path = temp_dir.path().join(CONFIG_JSON);
        utils::write(&path, json).await.unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_invalid_search_column() {
        let temp_dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "costbook",
            "config_version": 1,
            "schema_version": "v2",
            "data_file": "cost_data.csv",
            "search": { "columns": ["Reference File"] }
        }"#;
        utils::write(temp_dir.path().join(CONFIG_JSON), json)
            .await
            .unwrap();

        let e = Config::load(temp_dir.path()).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
        assert!(e.to_string().contains("Reference File"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("search"));
        assert!(!json.contains("logged_by"));
        assert!(json.contains(r#""schema_version":"v2""#));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let t = TempDir::new().unwrap();
        let path = t.path().join("file.json");
        let original = ConfigFile {
            search: Some(SearchFields::WholeRow),
            logged_by: Some("asmith".to_string()),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let read = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, read);
    }
}
