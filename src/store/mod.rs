pub mod prefs;
pub mod saved;
pub mod session;

use color_eyre::eyre::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key for the color theme preference
pub const THEME_KEY: &str = "theme";
/// Storage key for the demo session marker (the signed-in email)
pub const SESSION_KEY: &str = "demo_user";
/// Storage key for the serialized list of saved event identifiers
pub const SAVED_EVENTS_KEY: &str = "saved_events";
/// Storage key for the "show only saved" view flag
pub const SHOW_ONLY_SAVED_KEY: &str = "show_only_saved";

/// A small key/value store over a state directory, one file per key.
///
/// Reads never fail: an absent, unreadable, or malformed value is simply
/// reported as missing and consumers fall back to their defaults.
#[derive(Debug)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn open(dir: &Path) -> Result<Storage> {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("could not create the state directory: {:?}", dir))?;
        Ok(Storage {
            dir: dir.to_path_buf(),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("no stored value for {}: {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)
            .wrap_err_with(|| format!("could not persist the {} key", key))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).wrap_err_with(|| format!("could not remove the {} key", key)),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    pub(crate) fn temp_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().expect("could not create a temp dir");
        let storage = Storage::open(dir.path()).expect("could not open storage");
        (dir, storage)
    }

    #[test]
    fn set_get_remove_round_trip() {
        let (_dir, storage) = temp_storage();

        assert_eq!(storage.get(THEME_KEY), None);
        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));

        storage.remove(THEME_KEY).unwrap();
        assert_eq!(storage.get(THEME_KEY), None);
        // removing an absent key is not an error
        storage.remove(THEME_KEY).unwrap();
    }
}
