use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::{validate_key, KeyValueStore, Result, StorageError};

/// Directory-backed store: key `doubts` lives in `<dir>/doubts.json`.
///
/// Every `set` rewrites the whole file, so two processes sharing a directory
/// race with last-write-wins semantics.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Temp file next to the target, named per process.
fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("entry");
    path.with_file_name(format!(".{}.tmp-{}", name, std::process::id()))
}

/// The target is either the old contents or the new ones, never a partial write.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_path_for(path);
    let written = File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)
}

fn io_err(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(key)(e)),
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err(key))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        // Create parent directory if it doesn't exist
        fs::create_dir_all(&self.dir).map_err(io_err(key))?;

        write_atomic(&path, value.as_bytes()).map_err(io_err(key))?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(key)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("doubts").unwrap(), None);
        store.set("doubts", r#"[{"text":"a"}]"#).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("nested/doubts.json")).unwrap();
        assert_eq!(on_disk, r#"[{"text":"a"}]"#);
        assert_eq!(
            store.get("doubts").unwrap().as_deref(),
            Some(r#"[{"text":"a"}]"#)
        );

        store.remove("doubts").unwrap();
        assert_eq!(store.get("doubts").unwrap(), None);
        store.remove("doubts").unwrap();
    }

    #[test]
    fn test_survives_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("doubts", "[]").unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("doubts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("doubts", r#"[{"text":"keep"}]"#).unwrap();

        // a directory squatting on the temp path makes the next write fail
        let target = dir.path().join("doubts.json");
        fs::create_dir(tmp_path_for(&target)).unwrap();

        assert!(matches!(
            store.set("doubts", "[]"),
            Err(StorageError::Io { .. })
        ));
        assert_eq!(
            store.get("doubts").unwrap().as_deref(),
            Some(r#"[{"text":"keep"}]"#)
        );
    }

    #[test]
    fn test_set_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("doubts", "[]").unwrap();
        store.set("doubts", "[1]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["doubts.json"]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
