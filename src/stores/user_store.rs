use crate::core::error::{Constraint, StoreError};
use crate::models::user::User;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// In-memory user table
pub struct UserStore {
    by_name: DashMap<String, Arc<User>>,
    by_id: DashMap<u32, Arc<User>>,
    next_id: AtomicU32,
}

impl UserStore {
    /// Create a new UserStore instance
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            by_id: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Insert a user under a fresh id
    ///
    /// The username shard stays locked while `persist` runs, so two
    /// registrations for the same name cannot both succeed.
    pub fn insert_with<F>(
        &self,
        username: &str,
        password_hash: String,
        persist: F,
    ) -> Result<Arc<User>, StoreError>
    where
        F: FnOnce(&User) -> anyhow::Result<()>,
    {
        match self.by_name.entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::ConstraintViolation(Constraint::UniqueUsername)),
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let user = User::new(id, username.to_string(), password_hash);

                persist(&user)?;

                let user = Arc::new(user);
                self.by_id.insert(id, Arc::clone(&user));
                vacant.insert(Arc::clone(&user));
                Ok(user)
            }
        }
    }

    /// Put back a user read from the WAL, keeping its original id
    /// Returns false if the username is already present or the id leaves no
    /// room for the counter to move past it
    pub fn restore(&self, user: User) -> bool {
        let Some(next_id) = user.id.checked_add(1) else {
            return false;
        };

        match self.by_name.entry(user.username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                self.next_id.fetch_max(next_id, Ordering::SeqCst);
                let user = Arc::new(user);
                self.by_id.insert(user.id, Arc::clone(&user));
                vacant.insert(user);
                true
            }
        }
    }

    pub fn get_by_name(&self, username: &str) -> Option<Arc<User>> {
        self.by_name.get(username).map(|entry| Arc::clone(entry.value()))
    }

    pub fn get_by_id(&self, user_id: u32) -> Option<Arc<User>> {
        self.by_id.get(&user_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, user_id: u32) -> bool {
        self.by_id.contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
