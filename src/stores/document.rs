use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Whole-document byte storage
///
/// Callers always read or write the complete document; there is no partial
/// access. `read_all` returns `None` when no document has been written yet.
pub trait DocumentStore: Send + Sync {
    fn read_all(&self) -> io::Result<Option<Vec<u8>>>;

    fn write_all(&self, bytes: &[u8]) -> io::Result<()>;
}

/// Document kept in a single file on disk
///
/// Writes go to a temporary sibling file which is fsynced and renamed over
/// the target, so the file on disk is always either the previous complete
/// document or the new one.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl DocumentStore for FileDocument {
    fn read_all(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

/// In-memory document, for tests and ephemeral deployments
#[derive(Debug, Default)]
pub struct MemoryDocument {
    bytes: Mutex<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail with an I/O error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl DocumentStore for MemoryDocument {
    fn read_all(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "write rejected"));
        }

        let mut guard = self
            .bytes
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "document lock poisoned"))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}
