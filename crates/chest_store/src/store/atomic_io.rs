use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `bytes` next to `path` and renames over it. `rename` replaces the
/// destination in one step, so the live record is never missing.
pub(crate) fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path_for(path);
    if let Err(error) = write_synced(&staging, bytes) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    if let Err(error) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    Ok(())
}

/// Removes `path`, reporting whether a file was actually there.
pub(crate) fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn staging_path_for(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_os_string();
    staging.push(".tmp");
    PathBuf::from(staging)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file_and_leaves_no_staging_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("world,1,2,3.json");

        write_bytes_atomic(&path, b"first").expect("first write");
        write_bytes_atomic(&path, b"second").expect("second write");

        assert_eq!(fs::read(&path).expect("read"), b"second");
        assert!(!staging_path_for(&path).exists());
    }

    #[test]
    fn failed_rename_keeps_the_previous_record() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("world,0,0,0.json");
        fs::create_dir_all(&path).expect("directory in the record's place");

        assert!(write_bytes_atomic(&path, b"new").is_err());
        assert!(path.is_dir());
        assert!(!staging_path_for(&path).exists());
    }

    #[test]
    fn staging_file_sits_beside_the_record() {
        let path = Path::new("/data/chests/world,1,2,3.json");
        assert_eq!(
            staging_path_for(path),
            PathBuf::from("/data/chests/world,1,2,3.json.tmp")
        );
    }

    #[test]
    fn remove_if_exists_reports_presence() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("gone.json");
        fs::write(&path, b"{}").expect("write");

        assert!(remove_if_exists(&path).expect("remove present"));
        assert!(!remove_if_exists(&path).expect("remove missing"));
    }
}
