//! The six record operations, with every failure classified.
//!
//! [`StudentService`] owns the store and is what HTTP handlers call. Each
//! operation either returns the affected record(s) or a [`RecordError`] that
//! maps one-to-one onto a response status.

use crate::model::Student;
use crate::store::{StoreError, StudentStore};
use crate::validation::{StudentInput, ValidationErrors, validate_new, validate_patch};
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// One or more fields failed validation; carries every message.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Student not found")]
    NotFound,
    #[error("Invalid student ID")]
    MalformedId,
    #[error("Email already exists")]
    EmailConflict,
    /// Anything the store could not do for reasons outside the request.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field: "email", .. } => RecordError::EmailConflict,
            other => RecordError::Store(other),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

pub struct StudentService {
    store: StudentStore,
}

impl StudentService {
    pub fn new(store: StudentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Every student, most recently created first.
    pub fn list_all(&self) -> RecordResult<Vec<Student>> {
        Ok(self.store.find_all()?)
    }

    pub fn get(&self, id: &str) -> RecordResult<Student> {
        let id = parse_id(id)?;
        self.store.find_by_id(id)?.ok_or(RecordError::NotFound)
    }

    pub fn create(&self, input: &StudentInput) -> RecordResult<Student> {
        let now = Utc::now();
        let new = validate_new(input, now)?;
        let student = self.store.insert(new, now)?;
        tracing::info!(id = %student.id, course = %student.course, "student created");
        Ok(student)
    }

    /// Overwrite the supplied fields of an existing student.
    ///
    /// The id is checked first, then existence, then the payload. The merged
    /// record is validated again as a whole before it is written.
    pub fn update(&self, id: &str, input: &StudentInput) -> RecordResult<Student> {
        let id = parse_id(id)?;
        let mut student = self.store.find_by_id(id)?.ok_or(RecordError::NotFound)?;
        let patch = validate_patch(input)?;

        let now = Utc::now();
        patch.apply(&mut student, now);
        validate_new(&StudentInput::from(&student), now)?;

        if !self.store.replace(&student)? {
            return Err(RecordError::NotFound);
        }
        tracing::info!(id = %student.id, "student updated");
        Ok(student)
    }

    pub fn delete(&self, id: &str) -> RecordResult<()> {
        let id = parse_id(id)?;
        if !self.store.delete(id)? {
            return Err(RecordError::NotFound);
        }
        tracing::info!(%id, "student deleted");
        Ok(())
    }

    /// Students whose course label equals `course` exactly.
    ///
    /// The label is not checked against the known courses; an unknown one
    /// simply matches nothing.
    pub fn list_by_course(&self, course: &str) -> RecordResult<Vec<Student>> {
        Ok(self.store.find_by(|s| s.course.label() == course)?)
    }
}

fn parse_id(id: &str) -> RecordResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| RecordError::MalformedId)
}
