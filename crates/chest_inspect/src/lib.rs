use std::io::Write;
use std::path::PathBuf;

use chest_store::{resolve_store_config, JsonRecordCodec, Location, RecordStore, StoreConfig};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CommonOptions {
    pub root: Option<PathBuf>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    List,
    Show { key: String },
}

type InspectStore = RecordStore<JsonRecordCodec<serde_json::Value>>;

pub fn run(kind: CommandKind, options: CommonOptions, out: &mut dyn Write) -> Result<(), String> {
    let store = open_store(&options)?;
    debug!(root = %store.root().display(), command = ?kind, "inspect_command");
    match kind {
        CommandKind::List => list_records(&store, out),
        CommandKind::Show { key } => show_record(&store, &key, out),
    }
}

fn open_store(options: &CommonOptions) -> Result<InspectStore, String> {
    let mut config = match &options.root {
        Some(root) => StoreConfig::new(root.clone()),
        None => resolve_store_config().map_err(|error| error.to_string())?,
    };
    if let Some(extension) = &options.extension {
        config = config.with_extension(extension.clone());
    }
    RecordStore::open(config, JsonRecordCodec::new()).map_err(|error| error.to_string())
}

fn list_records(store: &InspectStore, out: &mut dyn Write) -> Result<(), String> {
    let entries = store.scan().map_err(|error| error.to_string())?;
    let mut malformed = 0usize;
    for entry in &entries {
        let line = match &entry.location {
            Ok(location) => format!("record {location} {}", entry.handle.path().display()),
            Err(error) => {
                malformed += 1;
                format!("malformed {} ({error})", entry.handle.path().display())
            }
        };
        writeln!(out, "{line}").map_err(|error| error.to_string())?;
    }
    writeln!(
        out,
        "records={} malformed={malformed}",
        entries.len() - malformed
    )
    .map_err(|error| error.to_string())
}

fn show_record(store: &InspectStore, key: &str, out: &mut dyn Write) -> Result<(), String> {
    let location = Location::decode(key).map_err(|error| error.to_string())?;
    let handle = store.path_for(&location);
    if !store.exists(&handle) {
        return Err(format!("no record stored for {location}"));
    }
    let record = store.load(&handle).map_err(|error| error.to_string())?;
    let text = serde_json::to_string_pretty(&record).map_err(|error| error.to_string())?;
    writeln!(out, "{text}").map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn options(temp: &TempDir) -> CommonOptions {
        CommonOptions {
            root: Some(temp.path().to_path_buf()),
            extension: None,
        }
    }

    fn run_to_string(kind: CommandKind, options: CommonOptions) -> Result<String, String> {
        let mut out = Vec::<u8>::new();
        run(kind, options, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn list_reports_records_and_malformed_files() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("world,1,64,1.json"), b"{}").expect("record");
        fs::write(temp.path().join("broken.json"), b"{}").expect("malformed");

        let output = run_to_string(CommandKind::List, options(&temp)).expect("list");
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("malformed "), "line={}", lines[0]);
        assert!(lines[1].starts_with("record world,1,64,1 "), "line={}", lines[1]);
        assert_eq!(lines[2], "records=1 malformed=1");
    }

    #[test]
    fn show_prints_stored_json() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(
            temp.path().join("world,0,70,-2.json"),
            br#"{"restock_seconds":120}"#,
        )
        .expect("record");

        let output = run_to_string(
            CommandKind::Show {
                key: "world,0,70,-2".to_string(),
            },
            options(&temp),
        )
        .expect("show");
        assert!(output.contains("\"restock_seconds\": 120"), "output={output}");
    }

    #[test]
    fn show_rejects_missing_and_malformed_keys() {
        let temp = TempDir::new().expect("tempdir");
        let missing = run_to_string(
            CommandKind::Show {
                key: "world,0,0,0".to_string(),
            },
            options(&temp),
        )
        .expect_err("missing");
        assert!(missing.contains("no record stored"), "error={missing}");

        let malformed = run_to_string(
            CommandKind::Show {
                key: "world,0".to_string(),
            },
            options(&temp),
        )
        .expect_err("malformed");
        assert!(malformed.contains("expected 4"), "error={malformed}");
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let error = run_to_string(
            CommandKind::List,
            CommonOptions {
                root: Some(temp.path().to_path_buf()),
                extension: Some("chest.json".to_string()),
            },
        )
        .expect_err("dotted extension");
        assert!(error.contains("chest.json"), "error={error}");
    }

    #[test]
    fn custom_extension_filters_listing() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("world,1,1,1.yml"), b"{}").expect("yml");
        fs::write(temp.path().join("world,2,2,2.json"), b"{}").expect("json");

        let output = run_to_string(
            CommandKind::List,
            CommonOptions {
                root: Some(temp.path().to_path_buf()),
                extension: Some("yml".to_string()),
            },
        )
        .expect("list");
        assert!(output.contains("record world,1,1,1 "));
        assert!(!output.contains("world,2,2,2"));
    }
}
