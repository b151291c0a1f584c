//! Output destinations for generated source.

use std::fmt;
use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use crate::error::{Result, WrapError};

/// Where generated source is written.
pub enum Destination<'a> {
    /// An already-open writable stream.
    Stream(&'a mut dyn Write),

    /// A filesystem path, replaced atomically.
    Path(PathBuf),
}

impl Destination<'_> {
    /// Human-readable name used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Stream(_) => "<stream>".to_string(),
            Self::Path(path) => path.display().to_string(),
        }
    }

    /// Write the complete text to the destination.
    ///
    /// Path destinations are written to a sibling temporary file that is
    /// persisted only after every byte is written; on failure the temporary
    /// file is removed and the target path is left untouched. A replaced file
    /// keeps its permissions; a new one is created `0644` less the umask.
    pub(crate) fn write_all(self, text: &str) -> Result<()> {
        let destination = self.describe();
        match self {
            Self::Stream(stream) => {
                stream
                    .write_all(text.as_bytes())
                    .and_then(|()| stream.flush())
                    .map_err(|e| WrapError::output(&destination, e))?;
            }
            Self::Path(path) => write_path(&path, text)?,
        }
        debug!("wrote {} bytes to {destination}", text.len());
        Ok(())
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Destination").field(&self.describe()).finish()
    }
}

impl<'a, W: Write> From<&'a mut W> for Destination<'a> {
    fn from(stream: &'a mut W) -> Self {
        Self::Stream(stream)
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Destination<'_> {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Destination<'_> {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for Destination<'_> {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

fn write_path(path: &Path, text: &str) -> Result<()> {
    let describe = || path.display().to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    if let Some(permissions) = default_permissions() {
        builder.permissions(permissions);
    }
    let mut file = builder
        .tempfile_in(dir)
        .map_err(|e| WrapError::output(describe(), e))?;

    match std::fs::metadata(path) {
        Ok(existing) if existing.is_file() => {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| WrapError::output(describe(), e))?;
        }
        _ => {}
    }

    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| WrapError::output(describe(), e))?;
    file.persist(path)
        .map_err(|e| WrapError::output(describe(), e.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
