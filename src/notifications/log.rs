//! Append-only notification log stored as a pretty-printed JSON array.
//!
//! Every append re-reads the file and replaces it through a temporary
//! sibling, so a crash mid-write leaves the previous contents intact.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;

use super::error::NotificationLogError;
use super::record::NotificationRecord;

/// Default log location, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "notifications.json";

/// Handle to the notification log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationLog {
    path: Utf8PathBuf,
}

impl NotificationLog {
    /// Creates a handle for `path`. Nothing is touched until the first read
    /// or append.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads every notification record in the log.
    ///
    /// A missing, unreadable, or malformed file reads as empty. Entries that
    /// are not notification records are skipped.
    #[must_use]
    pub fn load(&self) -> Vec<NotificationRecord> {
        self.load_entries()
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect()
    }

    /// Latest recorded timestamp for `repository`, if any.
    #[must_use]
    pub fn latest_time_for(&self, repository: &str) -> Option<String> {
        self.load()
            .into_iter()
            .filter(|record| record.repository == repository)
            .map(|record| record.time)
            .max()
    }

    /// Appends `record`, returning the number of entries now in the log.
    ///
    /// The parent directory is created when missing. Entries already in the
    /// file are preserved as-is, including ones this crate did not write.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationLogError`] when the directory cannot be
    /// prepared or the file cannot be replaced.
    pub fn append(&self, record: &NotificationRecord) -> Result<usize, NotificationLogError> {
        let file_name = self.file_name()?;
        let mut entries = self.load_entries();
        let serialised =
            serde_json::to_value(record).map_err(|error| NotificationLogError::Serialise {
                message: error.to_string(),
            })?;
        entries.push(serialised);

        let json = serde_json::to_string_pretty(&entries).map_err(|error| {
            NotificationLogError::Serialise {
                message: error.to_string(),
            }
        })?;

        let dir = open_or_create_parent(&self.path)?;
        let temporary = format!(".{file_name}.tmp");
        let write_error = |error: std::io::Error| NotificationLogError::Write {
            path: self.path.to_string(),
            message: error.to_string(),
        };
        dir.write(&temporary, json).map_err(write_error)?;
        dir.rename(&temporary, &dir, file_name).map_err(write_error)?;

        Ok(entries.len())
    }

    fn file_name(&self) -> Result<&str, NotificationLogError> {
        self.path
            .file_name()
            .ok_or_else(|| NotificationLogError::InvalidPath {
                path: self.path.to_string(),
            })
    }

    fn load_entries(&self) -> Vec<Value> {
        let Ok(file_name) = self.file_name() else {
            return Vec::new();
        };
        let parent = parent_of(&self.path);
        let content = match Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
        {
            Ok(content) => content,
            Err(error) => {
                tracing::debug!("notification log '{}' not readable: {error}", self.path);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!(
                    "notification log '{}' is not a JSON array; starting fresh",
                    self.path
                );
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(
                    "notification log '{}' is malformed ({error}); starting fresh",
                    self.path
                );
                Vec::new()
            }
        }
    }
}

fn parent_of(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Opens the directory holding `path`, creating it when missing.
fn open_or_create_parent(path: &Utf8Path) -> Result<Dir, NotificationLogError> {
    let parent = parent_of(path);
    let directory_error = |error: std::io::Error| NotificationLogError::Directory {
        path: parent.to_string(),
        message: error.to_string(),
    };

    let (base, relative) = if parent.is_absolute() {
        let root = Dir::open_ambient_dir("/", ambient_authority()).map_err(directory_error)?;
        let relative = parent
            .strip_prefix("/")
            .map_err(|_| NotificationLogError::Directory {
                path: parent.to_string(),
                message: "failed to normalise absolute path".to_owned(),
            })?;
        (root, relative)
    } else {
        let current = Dir::open_ambient_dir(".", ambient_authority()).map_err(directory_error)?;
        (current, parent)
    };

    if relative.as_str().is_empty() || relative == Utf8Path::new(".") {
        return Ok(base);
    }

    base.create_dir_all(relative).map_err(directory_error)?;
    base.open_dir(relative).map_err(directory_error)
}
