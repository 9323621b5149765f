use crate::core::error::StoreError;
use crate::models::user::{NewUser, User};
use crate::stores::document::{DocumentStore, FileDocument, MemoryDocument};
use crate::utils::id::IdSequence;
use crate::utils::time::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// On-disk shape: `{"users": [ ... ]}`
#[derive(Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Serialize)]
struct UsersFileRef<'a> {
    users: &'a [User],
}

struct Inner {
    users: Vec<User>,
    ids: IdSequence,
}

/// Durable, lock-guarded user set
///
/// Every operation takes the one exclusive lock for its whole duration,
/// including the document write for mutating operations. Memory is only
/// changed once the new document has been written, so a failed write leaves
/// both memory and disk as they were.
pub struct UserStore {
    inner: Mutex<Inner>,
    document: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    /// Load the user set from `document`; a missing document is an empty set
    pub fn open(document: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let users = match document.read_all()? {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                serde_json::from_slice::<UsersFile>(&bytes)?.users
            }
            _ => Vec::new(),
        };

        check_unique(&users)?;

        let ids = IdSequence::resume_after(users.iter().map(|u| u.id.as_str()));

        Ok(Self {
            inner: Mutex::new(Inner { users, ids }),
            document,
            clock,
        })
    }

    pub fn open_file(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        Self::open(Arc::new(FileDocument::new(path)), clock)
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: Vec::new(),
                ids: IdSequence::new(),
            }),
            document: Arc::new(MemoryDocument::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn persist(&self, users: &[User]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&UsersFileRef { users })?;
        self.document.write_all(&bytes)?;
        Ok(())
    }

    /// Insert a new user, assigning its id and `active` status
    ///
    /// The login check, id assignment, append and document write share one
    /// critical section, so two racing creations with the same login cannot
    /// both succeed and two creations can never receive the same id.
    pub fn create(&self, draft: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock()?;

        if inner.users.iter().any(|u| u.login == draft.login) {
            return Err(StoreError::AlreadyExists(draft.login));
        }

        let last = inner.ids.last();
        let id = inner
            .ids
            .next(self.clock.now_millis())
            .ok_or(StoreError::IdsExhausted(last))?;
        let user = draft.into_user(id);

        let mut next = inner.users.clone();
        next.push(user.clone());
        self.persist(&next)?;
        inner.users = next;

        Ok(user)
    }

    pub fn get_by_login(&self, login: &str) -> Result<User, StoreError> {
        let inner = self.lock()?;
        inner
            .users
            .iter()
            .find(|u| u.login == login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    pub fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let inner = self.lock()?;
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Independent snapshot of the whole set
    ///
    /// The lock is held only while copying; callers filter the snapshot
    /// without blocking writers.
    pub fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.clone())
    }

    /// Replace the whole set
    ///
    /// Rejects sets with duplicate logins or ids before touching anything.
    pub fn replace_all(&self, users: Vec<User>) -> Result<(), StoreError> {
        check_unique(&users)?;

        let mut inner = self.lock()?;
        self.persist(&users)?;
        inner.ids.observe(users.iter().map(|u| u.id.as_str()));
        inner.users = users;

        Ok(())
    }

    /// Read-modify-write of a single record under one lock hold
    ///
    /// `f` sees the current record and returns its replacement, or an error
    /// that aborts the operation without writing. The replacement always
    /// keeps the current id and login.
    pub fn update_with<F, E>(&self, id: &str, f: F) -> Result<User, E>
    where
        F: FnOnce(&User) -> Result<User, E>,
        E: From<StoreError>,
    {
        let mut inner = self.lock()?;

        let index = inner
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;

        let current = &inner.users[index];
        let mut replacement = f(current)?;
        replacement.id = current.id.clone();
        replacement.login = current.login.clone();

        let mut next = inner.users.clone();
        next[index] = replacement.clone();
        self.persist(&next)?;
        inner.users = next;

        Ok(replacement)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.users.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl fmt::Debug for UserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserStore")
            .field("users", &self.inner.try_lock().ok().map(|inner| inner.users.len()))
            .finish_non_exhaustive()
    }
}

fn check_unique(users: &[User]) -> Result<(), StoreError> {
    let mut logins = HashSet::with_capacity(users.len());
    let mut ids = HashSet::with_capacity(users.len());

    for user in users {
        if !logins.insert(user.login.as_str()) {
            return Err(StoreError::AlreadyExists(user.login.clone()));
        }
        if !ids.insert(user.id.as_str()) {
            return Err(StoreError::DuplicateId(user.id.clone()));
        }
    }

    Ok(())
}
