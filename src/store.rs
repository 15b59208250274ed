//! Document store for students.
//!
//! [`StudentStore`] sits on a [`StoreBackend`] and adds what the raw key-value
//! backend lacks: JSON encoding, id assignment, newest-first listing and the
//! unique index on `email`.
//!
//! The email index lives in memory and is rebuilt from a full scan when the
//! store is opened. Its mutex doubles as the writer lock: every insert,
//! replace and delete holds it across the uniqueness check and the backend
//! write, so two writers can never both claim the same address. Reads go
//! straight to the backend.

use crate::backend::{BackendConfig, StoreBackend};
use crate::model::{NewStudent, Student};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the store and its backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization encode error: {0}")]
    Encode(String),
    #[error("Serialization decode error: {0}")]
    Decode(String),
    #[error("Duplicate key: {field} '{value}' already exists")]
    DuplicateKey { field: &'static str, value: String },
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    fn duplicate_email(email: &str) -> Self {
        Self::DuplicateKey {
            field: "email",
            value: email.to_string(),
        }
    }
}

pub struct StudentStore {
    backend: Box<dyn StoreBackend>,
    /// Lower-cased email -> owning id. Guarded by the writer lock.
    emails: Mutex<HashMap<String, Uuid>>,
}

impl StudentStore {
    /// Build the configured backend and load the email index from it.
    pub fn open(cfg: &BackendConfig) -> Result<Self, StoreError> {
        Self::with_backend(cfg.build()?)
    }

    /// Wrap an existing backend (e.g. in-memory for tests).
    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Result<Self, StoreError> {
        let mut emails = HashMap::new();
        backend.scan(&mut |data| {
            let student = decode(data)?;
            if let Some(owner) = emails.insert(student.email.clone(), student.id) {
                tracing::warn!(
                    email = %student.email,
                    first = %owner,
                    second = %student.id,
                    "duplicate email found while loading store"
                );
            }
            Ok(())
        })?;
        tracing::debug!(records = emails.len(), "student store opened");

        Ok(Self {
            backend,
            emails: Mutex::new(emails),
        })
    }

    fn writer(&self) -> Result<MutexGuard<'_, HashMap<String, Uuid>>, StoreError> {
        self.emails
            .lock()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }

    /// Persist a new student, assigning its id and timestamps.
    pub fn insert(&self, new: NewStudent, now: DateTime<Utc>) -> Result<Student, StoreError> {
        let mut emails = self.writer()?;
        if emails.contains_key(&new.email) {
            return Err(StoreError::duplicate_email(&new.email));
        }

        let student = Student {
            id: Uuid::new_v4(),
            name: new.name,
            age: new.age,
            course: new.course,
            email: new.email,
            grade: new.grade,
            enrollment_date: new.enrollment_date,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .put(&student.id.to_string(), &encode(&student)?)?;
        emails.insert(student.email.clone(), student.id);

        tracing::debug!(id = %student.id, "student inserted");
        Ok(student)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        self.backend
            .get(&id.to_string())?
            .map(|data| decode(&data))
            .transpose()
    }

    /// Every student, newest first.
    pub fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        self.find_by(|_| true)
    }

    /// Students matching `filter`, newest first.
    pub fn find_by<F>(&self, filter: F) -> Result<Vec<Student>, StoreError>
    where
        F: Fn(&Student) -> bool,
    {
        let mut students = Vec::new();
        self.backend.scan(&mut |data| {
            let student = decode(data)?;
            if filter(&student) {
                students.push(student);
            }
            Ok(())
        })?;
        sort_newest_first(&mut students);
        Ok(students)
    }

    /// Overwrite a stored student with the same id.
    ///
    /// Returns `Ok(false)` when no student has that id. Fails with
    /// [`StoreError::DuplicateKey`] if the email belongs to another student.
    pub fn replace(&self, student: &Student) -> Result<bool, StoreError> {
        let mut emails = self.writer()?;
        let key = student.id.to_string();
        let Some(previous) = self.backend.get(&key)?.map(|data| decode(&data)).transpose()? else {
            return Ok(false);
        };
        if let Some(owner) = emails.get(&student.email) {
            if *owner != student.id {
                return Err(StoreError::duplicate_email(&student.email));
            }
        }

        self.backend.put(&key, &encode(student)?)?;
        if previous.email != student.email {
            emails.remove(&previous.email);
            emails.insert(student.email.clone(), student.id);
        }

        tracing::debug!(id = %student.id, "student replaced");
        Ok(true)
    }

    /// Remove a student. Returns `Ok(false)` when no student has that id.
    pub fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut emails = self.writer()?;
        let key = id.to_string();
        let Some(previous) = self.backend.get(&key)?.map(|data| decode(&data)).transpose()? else {
            return Ok(false);
        };

        self.backend.delete(&key)?;
        if emails.get(&previous.email) == Some(&id) {
            emails.remove(&previous.email);
        }

        tracing::debug!(%id, "student deleted");
        Ok(true)
    }

    /// Number of distinct emails indexed, which equals the number of students.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.writer()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Round-trip a read to the backend. Used by readiness probes.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.backend.get("").map(|_| ())
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend.flush()
    }
}

fn sort_newest_first(students: &mut [Student]) {
    students.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn encode(student: &Student) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(student).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode(data: &[u8]) -> Result<Student, StoreError> {
    serde_json::from_slice(data).map_err(|e| StoreError::Decode(e.to_string()))
}
