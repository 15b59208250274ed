//! # Roster
//!
//! Storage and business rules for a student record service: the [`Student`]
//! schema, the validator that guards every write, a document store with a
//! unique email index, and [`StudentService`], which exposes the six record
//! operations and classifies their failures.
//!
//! The HTTP surface lives in the `roster-server` crate; nothing here knows
//! about requests or status codes.
//!
//! ## Example
//!
//! ```
//! use roster::{BackendConfig, StudentInput, StudentService, StudentStore};
//! use serde_json::json;
//!
//! let store = StudentStore::open(&BackendConfig::in_memory()).unwrap();
//! let service = StudentService::new(store);
//!
//! let input: StudentInput = serde_json::from_value(json!({
//!     "name": "Ada Lovelace",
//!     "age": 19,
//!     "course": "Mathematics",
//!     "email": "Ada@Example.com",
//! }))
//! .unwrap();
//!
//! let student = service.create(&input).unwrap();
//! assert_eq!(student.email, "ada@example.com");
//! assert_eq!(service.get(&student.id.to_string()).unwrap(), student);
//! ```

mod backend;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use backend::{BackendConfig, InMemoryBackend, StoreBackend};
pub use model::{Course, Grade, NewStudent, Student};
pub use service::{RecordError, RecordResult, StudentService};
pub use store::{StoreError, StudentStore};
pub use validation::{StudentInput, StudentPatch, ValidationErrors};
