//! Atomic TOML documents guarded by a lock file.
//!
//! Writers take an exclusive `fs2` lock on `<file>.lock`, write the new
//! document to a hidden temporary file next to the target, fsync it and
//! rename it over the target. Readers never observe a half-written file.

use poiedit_core::error::PoiError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors raised while reading or writing a TOML document.
#[derive(Debug)]
pub enum AtomicTomlError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Lock(String),
    /// Raised by an update closure to abort without writing
    Rejected(String),
}

impl std::fmt::Display for AtomicTomlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicTomlError::Io(e) => write!(f, "I/O error: {}", e),
            AtomicTomlError::Parse(e) => write!(f, "TOML parse error: {}", e),
            AtomicTomlError::Serialize(e) => write!(f, "TOML serialization error: {}", e),
            AtomicTomlError::Lock(e) => write!(f, "Lock error: {}", e),
            AtomicTomlError::Rejected(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AtomicTomlError {}

impl From<std::io::Error> for AtomicTomlError {
    fn from(e: std::io::Error) -> Self {
        AtomicTomlError::Io(e)
    }
}

impl From<toml::de::Error> for AtomicTomlError {
    fn from(e: toml::de::Error) -> Self {
        AtomicTomlError::Parse(e)
    }
}

impl From<toml::ser::Error> for AtomicTomlError {
    fn from(e: toml::ser::Error) -> Self {
        AtomicTomlError::Serialize(e)
    }
}

impl From<AtomicTomlError> for PoiError {
    fn from(e: AtomicTomlError) -> Self {
        match e {
            AtomicTomlError::Rejected(message) => PoiError::Storage(message),
            other => PoiError::storage(other.to_string()),
        }
    }
}

/// A TOML file holding one document of type `T`.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: the file exists and parsed
    /// - `Ok(None)`: the file is missing or blank
    /// - `Err`: the file could not be read or parsed
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Writes the document through a temporary file and an atomic rename.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Loads, modifies and saves the document under the exclusive lock.
    ///
    /// Nothing is written when `f` fails. The closure's value is returned
    /// after the write succeeded.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R, AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<R, AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let value = f(&mut data)?;
        self.save(&data)?;

        Ok(value)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
