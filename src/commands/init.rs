use crate::args::InitArgs;
use crate::commands::Out;
use crate::config::InitOptions;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the home directory and:
/// - Creates an initial `config.json` file from `args` along with default settings
/// - Creates the data file with only a header row, unless a file is already there
///
/// # Arguments
/// - `costbook_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/costbook`
/// - `args` - The schema version, data file location and default "Logged By" name.
///
/// # Returns
/// The path of the data file.
///
/// # Errors
/// - Returns an error if a config already exists or any file operations fail.
pub async fn init(costbook_home: &Path, args: &InitArgs) -> Result<Out<PathBuf>> {
    let options = InitOptions {
        schema_version: args.schema(),
        data_file: args.data_file().map(Path::to_path_buf),
        logged_by: args.logged_by().map(str::to_string),
    };
    let config = Config::create(costbook_home, options)
        .await
        .context("Unable to create the home directory and configs")
        .pub_result(ErrorType::Config)?;
    let data_path = config.data_path();
    let message = format!(
        "Successfully created the costbook directory and config, entries are kept in {} using \
        the {} schema",
        data_path.display(),
        config.schema().version()
    );
    Ok(Out::new(message, data_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaVersion;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let args = InitArgs::new(SchemaVersion::V3, None, Some("jdoe".to_string()));
        let out = init(&home, &args).await.unwrap();
        assert!(out.message().contains("v3 schema"));
        let data_path = out.structure().unwrap();
        assert!(data_path.is_file());

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.schema().version(), SchemaVersion::V3);
        assert_eq!(config.logged_by(), Some("jdoe"));
    }

    #[tokio::test]
    async fn test_init_keeps_existing_data_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("costs.csv");
        std::fs::write(&data, "Item Description\n").unwrap();
        let args = InitArgs::new(SchemaVersion::V2, Some(data.clone()), None);
        init(&dir.path().join("home"), &args).await.unwrap();
        assert_eq!(std::fs::read_to_string(&data).unwrap(), "Item Description\n");
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs::new(SchemaVersion::V1, None, None);
        init(dir.path(), &args).await.unwrap();
        let e = init(dir.path(), &args).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
    }
}
