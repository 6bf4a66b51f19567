//! On-disk JSON storage for the food store.
//!
//! Two files live side by side in the data directory:
//! ```text
//! <DATA_DIR>/
//!   food_database.json     array of food records
//!   food_name_index.json   lowercase name -> food id
//! ```
//!
//! Both files are rewritten wholesale on every save. Each is written to a
//! temp file first and renamed into place, and neither rename happens until
//! both temp files are fully written. If the second rename fails the files
//! disagree until the next load repairs the name index.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::catalog::NameIndex;
use super::error::StoreError;
use crate::models::FoodRecord;

pub const DATABASE_FILE: &str = "food_database.json";
pub const NAME_INDEX_FILE: &str = "food_name_index.json";

/// Location of the two data files.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    database_path: PathBuf,
    index_path: PathBuf,
}

impl JsonStorage {
    /// Storage using the standard file names inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self::with_paths(data_dir.join(DATABASE_FILE), data_dir.join(NAME_INDEX_FILE))
    }

    pub fn with_paths(database_path: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            index_path: index_path.into(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Reads both files. Either one missing or malformed is an error.
    pub fn load(&self) -> Result<(Vec<FoodRecord>, NameIndex), StoreError> {
        let foods = read_json(&self.database_path)?;
        let index = read_json(&self.index_path)?;
        Ok((foods, index))
    }

    /// Writes both files.
    pub fn save(&self, foods: &[FoodRecord], index: &NameIndex) -> Result<(), StoreError> {
        let database_tmp = write_temp(&self.database_path, foods)?;
        let index_tmp = match write_temp(&self.index_path, index) {
            Ok(path) => path,
            Err(e) => {
                let _ = fs::remove_file(&database_tmp);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&database_tmp, &self.database_path) {
            let _ = fs::remove_file(&database_tmp);
            let _ = fs::remove_file(&index_tmp);
            return Err(StoreError::io(&self.database_path, e));
        }

        if let Err(e) = fs::rename(&index_tmp, &self.index_path) {
            let _ = fs::remove_file(&index_tmp);
            tracing::error!(
                "{} was replaced but {} was not; the name index will be repaired on next load",
                self.database_path.display(),
                self.index_path.display()
            );
            return Err(StoreError::io(&self.index_path, e));
        }

        Ok(())
    }

    /// Creates an empty database and index.
    ///
    /// Fails without touching anything if either file already exists.
    pub fn initialize(&self) -> Result<(), StoreError> {
        for path in [&self.database_path, &self.index_path] {
            if path.exists() {
                return Err(StoreError::AlreadyInitialized(path.clone()));
            }
        }

        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        self.save(&[], &NameIndex::new())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serializes `value` as pretty JSON into `<path>.tmp` and returns that path.
fn write_temp<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, StoreError> {
    let temp_path = path.with_extension("json.tmp");

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    let mut file = File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| StoreError::io(&temp_path, e))?;
    file.sync_all().map_err(|e| StoreError::io(&temp_path, e))?;

    Ok(temp_path)
}
