use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::importer::ImportPaths;

/// Optional overrides read from `caosdb.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CaosConfig {
    pub database: Option<String>,
    pub users: Option<String>,
    pub messages: Option<String>,
}

/// Per-invocation overrides from the command line
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub database: Option<PathBuf>,
    pub users: Option<PathBuf>,
    pub messages: Option<PathBuf>,
}

pub fn default_config_path_in(base: &Path) -> PathBuf {
    base.join("caosdb.toml")
}

pub fn load_config(path: &Path) -> anyhow::Result<Option<CaosConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let config: CaosConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Work out where everything lives. Command line beats config file beats
/// the default names; relative paths are taken from `base`.
pub fn resolve_paths(
    base: &Path,
    config: Option<&CaosConfig>,
    overrides: &PathOverrides,
) -> ImportPaths {
    let defaults = ImportPaths::in_dir(base);
    let pick = |cli: &Option<PathBuf>, file: Option<&String>, default: PathBuf| -> PathBuf {
        match (cli, file) {
            (Some(path), _) => base.join(path),
            (None, Some(path)) => base.join(path),
            (None, None) => default,
        }
    };

    ImportPaths {
        database: pick(
            &overrides.database,
            config.and_then(|c| c.database.as_ref()),
            defaults.database,
        ),
        users: pick(
            &overrides.users,
            config.and_then(|c| c.users.as_ref()),
            defaults.users,
        ),
        messages: pick(
            &overrides.messages,
            config.and_then(|c| c.messages.as_ref()),
            defaults.messages,
        ),
    }
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let base = Path::new("/work");
        let paths = resolve_paths(base, None, &PathOverrides::default());
        assert_eq!(paths.database, PathBuf::from("/work/caos.db"));
        assert_eq!(paths.users, PathBuf::from("/work/users.json"));
        assert_eq!(paths.messages, PathBuf::from("/work/msgcat.txt"));
    }

    #[test]
    fn test_precedence() {
        let base = Path::new("/work");
        let config = CaosConfig {
            database: Some("data/bot.db".into()),
            users: Some("/abs/users.json".into()),
            messages: None,
        };
        let overrides = PathOverrides {
            database: Some(PathBuf::from("cli.db")),
            ..Default::default()
        };

        let paths = resolve_paths(base, Some(&config), &overrides);
        assert_eq!(paths.database, PathBuf::from("/work/cli.db"));
        assert_eq!(paths.users, PathBuf::from("/abs/users.json"));
        assert_eq!(paths.messages, PathBuf::from("/work/msgcat.txt"));
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_config_path_in(dir.path());
        assert!(load_config(&path).unwrap().is_none());

        std::fs::write(&path, "database = \"bot.db\"\nmessages = \"log.txt\"\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("bot.db"));
        assert!(config.users.is_none());
        assert_eq!(config.messages.as_deref(), Some("log.txt"));
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("caos.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
