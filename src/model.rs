//! Student record types.
//!
//! [`Student`] is the stored document. [`Course`] and [`Grade`] are the two
//! closed vocabularies the schema enforces; both serialize as their display
//! labels so the wire format matches what clients submit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Bounds on the trimmed `name`, in characters.
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

/// Inclusive bounds on `age`.
pub const AGE_MIN: i64 = 16;
pub const AGE_MAX: i64 = 100;

/// A stored student document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Store-assigned identifier. Never changes after creation.
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub course: Course,
    /// Always lower-case; unique across the collection.
    pub email: String,
    pub grade: Grade,
    pub enrollment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, normalized student that has not been persisted yet.
///
/// The store turns this into a [`Student`] by assigning the id and the
/// bookkeeping timestamps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub age: u8,
    pub course: Course,
    pub email: String,
    pub grade: Grade,
    pub enrollment_date: DateTime<Utc>,
}

/// The eight courses a student may be enrolled in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Course {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    Engineering,
    Business,
    Arts,
}

impl Course {
    pub const ALL: [Course; 8] = [
        Course::ComputerScience,
        Course::Mathematics,
        Course::Physics,
        Course::Chemistry,
        Course::Biology,
        Course::Engineering,
        Course::Business,
        Course::Arts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Course::ComputerScience => "Computer Science",
            Course::Mathematics => "Mathematics",
            Course::Physics => "Physics",
            Course::Chemistry => "Chemistry",
            Course::Biology => "Biology",
            Course::Engineering => "Engineering",
            Course::Business => "Business",
            Course::Arts => "Arts",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exact, case-sensitive match against the labels.
impl FromStr for Course {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Letter grade. Defaults to `C`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grade {
    A,
    B,
    #[default]
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|grade| grade.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A string that is not one of an enumeration's labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_labels_roundtrip_through_from_str() {
        for course in Course::ALL {
            assert_eq!(course.label().parse::<Course>(), Ok(course));
        }
    }

    #[test]
    fn course_match_is_case_sensitive() {
        assert!("computer science".parse::<Course>().is_err());
        assert!("Physics ".parse::<Course>().is_err());
    }

    #[test]
    fn grade_defaults_to_c() {
        assert_eq!(Grade::default(), Grade::C);
    }

    #[test]
    fn student_serializes_with_camel_case_labels() {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".into(),
            age: 20,
            course: Course::ComputerScience,
            email: "ada@example.com".into(),
            grade: Grade::A,
            enrollment_date: now,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["course"], "Computer Science");
        assert_eq!(value["grade"], "A");
        assert!(value.get("enrollmentDate").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
