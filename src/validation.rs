//! Field-level validation and normalization of student payloads.
//!
//! Every field is checked independently and all violations are collected, so a
//! client sees every problem with a submission at once. Fields are visited in
//! schema order (`name`, `age`, `course`, `email`, `grade`, `enrollmentDate`)
//! and each contributes at most one message.
//!
//! Creation runs [`validate_new`], which requires the four mandatory fields and
//! fills in defaults. Updates run [`validate_patch`], which only checks what the
//! client supplied.

use crate::model::{
    AGE_MAX, AGE_MIN, Course, Grade, NAME_MAX_LEN, NAME_MIN_LEN, NewStudent, Student,
};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// `\w` is ASCII-only here, so non-ASCII local parts are rejected.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
        .expect("email pattern compiles")
});

/// Raw student payload as submitted by a client.
///
/// Each field keeps the untyped JSON value so that type errors become
/// validation messages instead of parse failures. `None` means the key was
/// absent; `Some(Value::Null)` means it was sent as `null`. Unknown keys,
/// including `id`, `createdAt` and `updatedAt`, are ignored.
///
/// Only a JSON object deserializes into this; arrays and scalars are
/// rejected rather than read as positional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentInput {
    pub name: Option<Value>,
    pub age: Option<Value>,
    pub course: Option<Value>,
    pub email: Option<Value>,
    pub grade: Option<Value>,
    pub enrollment_date: Option<Value>,
}

impl<'de> Deserialize<'de> for StudentInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

impl From<Map<String, Value>> for StudentInput {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            name: fields.remove("name"),
            age: fields.remove("age"),
            course: fields.remove("course"),
            email: fields.remove("email"),
            grade: fields.remove("grade"),
            enrollment_date: fields.remove("enrollmentDate"),
        }
    }
}

impl From<&Student> for StudentInput {
    fn from(student: &Student) -> Self {
        Self {
            name: Some(Value::from(student.name.as_str())),
            age: Some(Value::from(student.age)),
            course: Some(Value::from(student.course.label())),
            email: Some(Value::from(student.email.as_str())),
            grade: Some(Value::from(student.grade.label())),
            enrollment_date: Some(Value::from(student.enrollment_date.to_rfc3339())),
        }
    }
}

/// Validated subset of fields to overwrite on an existing student.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub course: Option<Course>,
    pub email: Option<String>,
    pub grade: Option<Grade>,
    pub enrollment_date: Option<DateTime<Utc>>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the supplied fields. `id` and `created_at` are untouched.
    pub fn apply(self, student: &mut Student, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(course) = self.course {
            student.course = course;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
        if let Some(enrollment_date) = self.enrollment_date {
            student.enrollment_date = enrollment_date;
        }
        student.updated_at = now;
    }
}

/// Every violation found in a payload, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

/// Collects messages while the fields are walked.
#[derive(Default)]
struct Issues(Vec<String>);

impl Issues {
    fn issue(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.0)
    }
}

/// Validate a full creation payload.
///
/// Absent `grade` becomes `C` and absent `enrollmentDate` becomes `now`.
pub fn validate_new(input: &StudentInput, now: DateTime<Utc>) -> Result<NewStudent, ValidationErrors> {
    let mut issues = Issues::default();

    let name = required(&input.name, "Name is required", &mut issues)
        .and_then(|v| check_name(v, &mut issues));
    let age = required(&input.age, "Age is required", &mut issues)
        .and_then(|v| check_age(v, &mut issues));
    let course = required(&input.course, "Course is required", &mut issues)
        .and_then(|v| check_course(v, &mut issues));
    let email = required(&input.email, "Email is required", &mut issues)
        .and_then(|v| check_email(v, &mut issues));
    let grade = match supplied(&input.grade) {
        Some(v) => check_grade(v, &mut issues),
        None => Some(Grade::default()),
    };
    let enrollment_date = match supplied(&input.enrollment_date) {
        Some(v) => check_enrollment_date(v, &mut issues),
        None => Some(now),
    };

    match (name, age, course, email, grade, enrollment_date) {
        (Some(name), Some(age), Some(course), Some(email), Some(grade), Some(enrollment_date)) => {
            Ok(NewStudent {
                name,
                age,
                course,
                email,
                grade,
                enrollment_date,
            })
        }
        _ => Err(issues.into_errors()),
    }
}

/// Validate a partial update payload. Only supplied keys are checked; sending
/// `null` for a mandatory field is reported as missing.
pub fn validate_patch(input: &StudentInput) -> Result<StudentPatch, ValidationErrors> {
    let mut issues = Issues::default();

    let patch = StudentPatch {
        name: optional_required(&input.name, "Name is required", &mut issues)
            .and_then(|v| check_name(v, &mut issues)),
        age: optional_required(&input.age, "Age is required", &mut issues)
            .and_then(|v| check_age(v, &mut issues)),
        course: optional_required(&input.course, "Course is required", &mut issues)
            .and_then(|v| check_course(v, &mut issues)),
        email: optional_required(&input.email, "Email is required", &mut issues)
            .and_then(|v| check_email(v, &mut issues)),
        grade: supplied(&input.grade).and_then(|v| check_grade(v, &mut issues)),
        enrollment_date: supplied(&input.enrollment_date)
            .and_then(|v| check_enrollment_date(v, &mut issues)),
    };

    if issues.0.is_empty() {
        Ok(patch)
    } else {
        Err(issues.into_errors())
    }
}

/// Value of a key that was sent with something other than `null`.
fn supplied(field: &Option<Value>) -> Option<&Value> {
    field.as_ref().filter(|v| !v.is_null())
}

fn required<'a>(field: &'a Option<Value>, missing: &str, issues: &mut Issues) -> Option<&'a Value> {
    let value = supplied(field);
    if value.is_none() {
        issues.issue(missing);
    }
    value
}

/// Absent keys pass; keys sent as `null` are reported as missing.
fn optional_required<'a>(
    field: &'a Option<Value>,
    missing: &str,
    issues: &mut Issues,
) -> Option<&'a Value> {
    match field {
        None => None,
        Some(Value::Null) => {
            issues.issue(missing);
            None
        }
        Some(value) => Some(value),
    }
}

fn check_name(value: &Value, issues: &mut Issues) -> Option<String> {
    let Some(raw) = value.as_str() else {
        issues.issue("Name must be a string");
        return None;
    };
    let name = raw.trim();
    let len = name.chars().count();
    if len < NAME_MIN_LEN {
        issues.issue(format!("Name must be at least {NAME_MIN_LEN} characters long"));
        return None;
    }
    if len > NAME_MAX_LEN {
        issues.issue(format!("Name cannot exceed {NAME_MAX_LEN} characters"));
        return None;
    }
    Some(name.to_string())
}

enum Numeric {
    Whole(i64),
    Fractional,
    NotANumber,
}

fn numeric(value: &Value) -> Numeric {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Numeric::Whole(i),
            None => n.as_f64().map_or(Numeric::NotANumber, whole_number),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Numeric::Whole(i)
            } else if let Ok(f) = s.parse::<f64>() {
                whole_number(f)
            } else {
                Numeric::NotANumber
            }
        }
        _ => Numeric::NotANumber,
    }
}

fn whole_number(f: f64) -> Numeric {
    if !f.is_finite() {
        Numeric::NotANumber
    } else if f.fract() != 0.0 {
        Numeric::Fractional
    } else {
        // Saturating cast; anything this large is out of range anyway.
        Numeric::Whole(f as i64)
    }
}

fn check_age(value: &Value, issues: &mut Issues) -> Option<u8> {
    match numeric(value) {
        Numeric::NotANumber => {
            issues.issue("Age must be a number");
            None
        }
        Numeric::Fractional => {
            issues.issue("Age must be a whole number");
            None
        }
        Numeric::Whole(age) if age < AGE_MIN => {
            issues.issue(format!("Age must be at least {AGE_MIN}"));
            None
        }
        Numeric::Whole(age) if age > AGE_MAX => {
            issues.issue(format!("Age cannot exceed {AGE_MAX}"));
            None
        }
        Numeric::Whole(age) => u8::try_from(age).ok(),
    }
}

fn check_course(value: &Value, issues: &mut Issues) -> Option<Course> {
    let Some(raw) = value.as_str() else {
        issues.issue("Course must be a string");
        return None;
    };
    let course = raw.trim();
    match course.parse::<Course>() {
        Ok(course) => Some(course),
        Err(_) => {
            issues.issue(format!("{course} is not a valid course"));
            None
        }
    }
}

fn check_email(value: &Value, issues: &mut Issues) -> Option<String> {
    let Some(raw) = value.as_str() else {
        issues.issue("Email must be a string");
        return None;
    };
    let email = raw.to_lowercase();
    if EMAIL_PATTERN.is_match(&email) {
        Some(email)
    } else {
        issues.issue("Please provide a valid email address");
        None
    }
}

fn check_grade(value: &Value, issues: &mut Issues) -> Option<Grade> {
    let Some(raw) = value.as_str() else {
        issues.issue("Grade must be a string");
        return None;
    };
    match raw.parse::<Grade>() {
        Ok(grade) => Some(grade),
        Err(_) => {
            issues.issue(format!("{raw} is not a valid grade"));
            None
        }
    }
}

fn check_enrollment_date(value: &Value, issues: &mut Issues) -> Option<DateTime<Utc>> {
    let parsed = value.as_str().and_then(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
    });
    if parsed.is_none() {
        issues.issue("Enrollment date must be a valid date");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn input(value: Value) -> StudentInput {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "name": "  Grace Hopper ",
            "age": 21,
            "course": " Computer Science ",
            "email": "Grace.Hopper@Example.COM",
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
    }

    fn new_errors(value: Value) -> Vec<String> {
        validate_new(&input(value), now()).unwrap_err().into_messages()
    }

    #[test]
    fn normalizes_and_applies_defaults() {
        let student = validate_new(&input(valid()), now()).unwrap();
        assert_eq!(student.name, "Grace Hopper");
        assert_eq!(student.course, Course::ComputerScience);
        assert_eq!(student.email, "grace.hopper@example.com");
        assert_eq!(student.grade, Grade::C);
        assert_eq!(student.enrollment_date, now());
    }

    #[test]
    fn missing_required_fields_are_all_reported_in_order() {
        assert_eq!(
            new_errors(json!({})),
            vec![
                "Name is required",
                "Age is required",
                "Course is required",
                "Email is required",
            ]
        );
    }

    #[test]
    fn null_counts_as_missing_on_create() {
        let mut body = valid();
        body["email"] = Value::Null;
        assert_eq!(new_errors(body), vec!["Email is required"]);
    }

    #[test]
    fn age_below_minimum_mentions_the_bound() {
        let mut body = valid();
        body["age"] = json!(10);
        assert_eq!(new_errors(body), vec!["Age must be at least 16"]);
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for age in [16, 100] {
            let mut body = valid();
            body["age"] = json!(age);
            assert!(validate_new(&input(body), now()).is_ok(), "age {age}");
        }
        let mut body = valid();
        body["age"] = json!(101);
        assert_eq!(new_errors(body), vec!["Age cannot exceed 100"]);
    }

    #[test]
    fn age_accepts_numeric_strings_and_whole_floats() {
        let mut body = valid();
        body["age"] = json!("42");
        assert_eq!(validate_new(&input(body), now()).unwrap().age, 42);

        let mut body = valid();
        body["age"] = json!(30.0);
        assert_eq!(validate_new(&input(body), now()).unwrap().age, 30);
    }

    #[test]
    fn age_rejects_non_numbers_and_fractions() {
        let mut body = valid();
        body["age"] = json!("twenty");
        assert_eq!(new_errors(body), vec!["Age must be a number"]);

        let mut body = valid();
        body["age"] = json!(20.5);
        assert_eq!(new_errors(body), vec!["Age must be a whole number"]);

        let mut body = valid();
        body["age"] = json!(true);
        assert_eq!(new_errors(body), vec!["Age must be a number"]);
    }

    #[test]
    fn name_length_is_measured_after_trimming() {
        let mut body = valid();
        body["name"] = json!("  A  ");
        assert_eq!(new_errors(body), vec!["Name must be at least 2 characters long"]);

        let mut body = valid();
        body["name"] = json!("x".repeat(51));
        assert_eq!(new_errors(body), vec!["Name cannot exceed 50 characters"]);

        let mut body = valid();
        body["name"] = json!(format!("  {}  ", "x".repeat(50)));
        assert!(validate_new(&input(body), now()).is_ok());
    }

    #[test]
    fn unknown_course_is_named_in_the_message() {
        let mut body = valid();
        body["course"] = json!("Alchemy");
        assert_eq!(new_errors(body), vec!["Alchemy is not a valid course"]);
    }

    #[test]
    fn email_pattern() {
        for ok in ["a@b.co", "first.last@sub.domain.org", "x-y@d-e.io"] {
            let mut body = valid();
            body["email"] = json!(ok);
            assert!(validate_new(&input(body), now()).is_ok(), "{ok}");
        }
        for bad in ["plain", "a@b", "a@b.toolong", "a@@b.com", ".a@b.com", "ü@b.com"] {
            let mut body = valid();
            body["email"] = json!(bad);
            assert_eq!(
                new_errors(body),
                vec!["Please provide a valid email address"],
                "{bad}"
            );
        }
    }

    #[test]
    fn grade_and_enrollment_date_are_checked_when_present() {
        let mut body = valid();
        body["grade"] = json!("E");
        body["enrollmentDate"] = json!("not a date");
        assert_eq!(
            new_errors(body),
            vec!["E is not a valid grade", "Enrollment date must be a valid date"]
        );

        let mut body = valid();
        body["grade"] = json!("A");
        body["enrollmentDate"] = json!("2023-02-01");
        let student = validate_new(&input(body), now()).unwrap();
        assert_eq!(student.grade, Grade::A);
        assert_eq!(
            student.enrollment_date,
            Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn wrong_types_are_reported_per_field() {
        assert_eq!(
            new_errors(json!({
                "name": 7,
                "age": 20,
                "course": ["Physics"],
                "email": false,
                "grade": 1,
            })),
            vec![
                "Name must be a string",
                "Course must be a string",
                "Email must be a string",
                "Grade must be a string",
            ]
        );
    }

    #[test]
    fn patch_only_checks_supplied_fields() {
        let patch = validate_patch(&input(json!({ "age": 30 }))).unwrap();
        assert_eq!(
            patch,
            StudentPatch {
                age: Some(30),
                ..StudentPatch::default()
            }
        );
        assert!(validate_patch(&input(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn patch_rejects_null_for_mandatory_fields() {
        let errors = validate_patch(&input(json!({ "name": null, "grade": null })))
            .unwrap_err()
            .into_messages();
        assert_eq!(errors, vec!["Name is required"]);
    }

    #[test]
    fn patch_reports_invalid_course_by_value() {
        let errors = validate_patch(&input(json!({ "course": "Astrology" })))
            .unwrap_err()
            .into_messages();
        assert_eq!(errors, vec!["Astrology is not a valid course"]);
    }

    #[test]
    fn apply_keeps_identity_and_bumps_updated_at() {
        let created = now();
        let mut student = Student {
            id: uuid::Uuid::new_v4(),
            name: "Alan Turing".into(),
            age: 22,
            course: Course::Mathematics,
            email: "alan@example.com".into(),
            grade: Grade::B,
            enrollment_date: created,
            created_at: created,
            updated_at: created,
        };
        let id = student.id;
        let later = Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap();

        validate_patch(&input(json!({ "grade": "A", "id": "ignored" })))
            .unwrap()
            .apply(&mut student, later);

        assert_eq!(student.id, id);
        assert_eq!(student.grade, Grade::A);
        assert_eq!(student.created_at, created);
        assert_eq!(student.updated_at, later);
    }

    #[test]
    fn stored_student_revalidates() {
        let new = validate_new(&input(valid()), now()).unwrap();
        let student = Student {
            id: uuid::Uuid::new_v4(),
            name: new.name.clone(),
            age: new.age,
            course: new.course,
            email: new.email.clone(),
            grade: new.grade,
            enrollment_date: new.enrollment_date,
            created_at: now(),
            updated_at: now(),
        };
        let again = validate_new(&StudentInput::from(&student), now()).unwrap();
        assert_eq!(again, new);
    }

    #[test]
    fn only_objects_deserialize_as_input() {
        for body in [
            json!(["Ada Lovelace", 20, "Physics", "ada@x.io"]),
            json!([]),
            json!("Ada"),
            json!(42),
        ] {
            assert!(serde_json::from_value::<StudentInput>(body.clone()).is_err(), "{body}");
        }
    }

    #[test]
    fn null_and_absent_keys_stay_distinct() {
        let parsed = input(json!({ "name": null, "enrollmentDate": "2023-02-01", "extra": 1 }));
        assert_eq!(parsed.name, Some(Value::Null));
        assert_eq!(parsed.age, None);
        assert_eq!(parsed.enrollment_date, Some(json!("2023-02-01")));
    }
}
