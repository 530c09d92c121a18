use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub mod cache;
pub mod location;
pub mod manager;
pub mod pairing;
pub mod store;
pub mod world;

pub use cache::{lock_record, LocationCache, SharedRecord};
pub use location::{Location, LocationKeyError, Offset};
pub use manager::{ContainerManager, TargetError, MAX_TARGET_RANGE};
pub use pairing::{find_pair, PAIR_PROBE_ORDER};
pub use store::{
    JsonRecordCodec, NewRecord, RecordCodec, RecordHandle, RecordStore, StoreConfig, StoreError,
    StoredEntry, DEFAULT_RECORD_EXTENSION,
};
pub use world::{ActorId, EnglishMessages, EntityKind, MessageKey, Messenger, WorldQuery};

pub const DATA_DIR_ENV_VAR: &str = "CHEST_RESTOCK_DATA_DIR";
const DEFAULT_DATA_DIR_NAME: &str = "chests";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("{var} is set but empty")]
    EmptyEnvRoot { var: &'static str },
}

/// Storage configuration from `CHEST_RESTOCK_DATA_DIR`, falling back to
/// `./chests`. The directory itself is created when the store is opened.
pub fn resolve_store_config() -> Result<StoreConfig, StartupError> {
    resolve_root(env::var(DATA_DIR_ENV_VAR)).map(StoreConfig::new)
}

fn resolve_root(raw: Result<String, env::VarError>) -> Result<PathBuf, StartupError> {
    match raw {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(StartupError::EmptyEnvRoot {
                    var: DATA_DIR_ENV_VAR,
                });
            }
            Ok(PathBuf::from(trimmed))
        }
        Err(env::VarError::NotPresent) => {
            let cwd = env::current_dir().map_err(StartupError::CurrentDir)?;
            Ok(cwd.join(DEFAULT_DATA_DIR_NAME))
        }
        Err(source) => Err(StartupError::EnvVar {
            var: DATA_DIR_ENV_VAR,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_is_used_verbatim() {
        let root = resolve_root(Ok(" /srv/chests ".to_string())).expect("root");
        assert_eq!(root, PathBuf::from("/srv/chests"));
    }

    #[test]
    fn missing_var_falls_back_to_cwd() {
        let cwd = env::current_dir().expect("cwd");
        let root = resolve_root(Err(env::VarError::NotPresent)).expect("root");
        assert_eq!(root, cwd.join("chests"));
    }

    #[test]
    fn empty_var_is_rejected() {
        assert!(matches!(
            resolve_root(Ok("  ".to_string())),
            Err(StartupError::EmptyEnvRoot { .. })
        ));
    }

    #[test]
    fn default_config_uses_json_extension() {
        let config = StoreConfig::new("/tmp/x");
        assert_eq!(config.extension, DEFAULT_RECORD_EXTENSION);
        assert_eq!(config.with_extension("yml").extension, "yml");
    }
}
