//! Employee record and its identifier
//!
//! Identifiers arrive as strings or integers and are normalised to text.
//! Field rules live here so create and partial update share them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Maximum length for employee identifiers
const MAX_ID_LEN: usize = 64;

/// Maximum length for names and departments
const MAX_TEXT_LEN: usize = 256;

/// Maximum length of a single skill
const MAX_SKILL_LEN: usize = 64;

/// Upper bound on salary. Department sums stay finite in `f64` and in
/// PostgreSQL `double precision` for any realistic headcount.
pub const MAX_SALARY: f64 = 1e15;

/// Identifier pattern: starts with alphanumeric, then alphanumerics and `._:-`
static ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,63}$").expect("invalid id regex")
});

/// Validated employee identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create an identifier, validating its format.
    ///
    /// # Example
    /// ```
    /// use roster_core::model::EmployeeId;
    ///
    /// assert!(EmployeeId::new("E-1001").is_ok());
    /// assert!(EmployeeId::new("42").is_ok());
    /// assert!(EmployeeId::new("").is_err());
    /// assert!(EmployeeId::new("a/b").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty {
                field: "employee_id",
            });
        }

        if s.len() > MAX_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "employee_id",
                max: MAX_ID_LEN,
            });
        }

        if !ID_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "employee_id",
                reason: "must be alphanumeric with '.', '_', ':' or '-', starting with alphanumeric"
                    .into(),
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Wrap an identifier read back from storage, where it was validated on insert.
    pub(crate) fn from_stored(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier as it appears on the wire: text or integer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawEmployeeId {
    Text(String),
    Number(i64),
}

impl RawEmployeeId {
    /// Integers go through the same grammar as text, so a negative
    /// number is rejected rather than stored unreachable.
    pub fn parse(&self) -> Result<EmployeeId, ValidationError> {
        match self {
            Self::Text(s) => EmployeeId::new(s),
            Self::Number(n) => EmployeeId::new(&n.to_string()),
        }
    }
}

impl Serialize for EmployeeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEmployeeId::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored employee record. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub salary: f64,
    pub joining_date: NaiveDate,
    pub skills: BTreeSet<String>,
}

/// Create payload before validation.
///
/// Every field is optional here so a missing one is reported as
/// [`ValidationError::Missing`] instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEmployee {
    pub employee_id: Option<RawEmployeeId>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub joining_date: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl NewEmployee {
    /// Check every field and produce the record to store.
    pub fn validate(self) -> Result<Employee, ValidationError> {
        let employee_id = self
            .employee_id
            .ok_or(ValidationError::Missing {
                field: "employee_id",
            })?
            .parse()?;
        let name = validate_name(self.name.ok_or(ValidationError::Missing { field: "name" })?)?;
        let department = validate_department(self.department.ok_or(ValidationError::Missing {
            field: "department",
        })?)?;
        let salary = validate_salary(self.salary.ok_or(ValidationError::Missing { field: "salary" })?)?;
        let joining_date = parse_joining_date(
            self.joining_date
                .as_deref()
                .ok_or(ValidationError::Missing {
                    field: "joining_date",
                })?,
        )?;
        let skills = validate_skills(self.skills.ok_or(ValidationError::Missing { field: "skills" })?)?;

        Ok(Employee {
            employee_id,
            name,
            department,
            salary,
            joining_date,
            skills,
        })
    }
}

fn validate_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn validate_name(value: String) -> Result<String, ValidationError> {
    validate_text("name", value)
}

pub(crate) fn validate_department(value: String) -> Result<String, ValidationError> {
    validate_text("department", value)
}

/// Salary must be finite, non-negative and at most [`MAX_SALARY`].
pub(crate) fn validate_salary(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "salary",
            reason: "must be a finite number".into(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field: "salary" });
    }
    if value > MAX_SALARY {
        return Err(ValidationError::InvalidFormat {
            field: "salary",
            reason: format!("must not exceed {:e}", MAX_SALARY),
        });
    }
    Ok(value)
}

/// Normalise skills into a set. Blank entries are rejected; duplicates collapse.
pub(crate) fn validate_skills(values: Vec<String>) -> Result<BTreeSet<String>, ValidationError> {
    values
        .into_iter()
        .map(|skill| {
            let skill = skill.trim();
            if skill.is_empty() {
                return Err(ValidationError::Empty { field: "skill" });
            }
            if skill.chars().count() > MAX_SKILL_LEN {
                return Err(ValidationError::TooLong {
                    field: "skill",
                    max: MAX_SKILL_LEN,
                });
            }
            Ok(skill.to_owned())
        })
        .collect()
}

/// Parse a joining date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; the time part is dropped.
pub fn parse_joining_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: "joining_date",
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(ValidationError::InvalidFormat {
        field: "joining_date",
        reason: format!("'{}' is not a date (expected YYYY-MM-DD)", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "employee_id": "E001",
            "name": "Ada Lovelace",
            "department": "Engineering",
            "salary": 120000.0,
            "joining_date": "2021-06-01",
            "skills": ["Python", "Rust", "Python"]
        })
    }

    #[test]
    fn valid_ids() {
        assert!(EmployeeId::new("E001").is_ok());
        assert!(EmployeeId::new("emp.42_a:b-c").is_ok());
        assert_eq!(EmployeeId::new("  E7 ").unwrap().as_str(), "E7");
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(matches!(
            EmployeeId::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            EmployeeId::new("-lead").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            EmployeeId::new("has space").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        let long = "a".repeat(65);
        assert!(matches!(
            EmployeeId::new(&long).unwrap_err(),
            ValidationError::TooLong { max: 64, .. }
        ));
    }

    #[test]
    fn integer_ids_normalise_to_text() {
        let id: EmployeeId = serde_json::from_value(json!(1001)).unwrap();
        assert_eq!(id.as_str(), "1001");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("1001"));
    }

    #[test]
    fn negative_integer_ids_are_rejected() {
        let err = serde_json::from_value::<NewEmployee>(json!({"employee_id": -5}))
            .unwrap()
            .employee_id
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn salary_upper_bound() {
        assert_eq!(validate_salary(MAX_SALARY).unwrap(), MAX_SALARY);
        assert!(matches!(
            validate_salary(MAX_SALARY * 10.0).unwrap_err(),
            ValidationError::InvalidFormat { field: "salary", .. }
        ));
        assert!(validate_salary(1e308).is_err());
    }

    #[test]
    fn validate_full_payload() {
        let new: NewEmployee = serde_json::from_value(payload()).unwrap();
        let emp = new.validate().unwrap();

        assert_eq!(emp.employee_id.as_str(), "E001");
        assert_eq!(emp.joining_date, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(emp.skills.len(), 2);
    }

    #[test]
    fn missing_field_is_reported() {
        let mut body = payload();
        body.as_object_mut().unwrap().remove("department");
        let new: NewEmployee = serde_json::from_value(body).unwrap();

        assert_eq!(
            new.validate().unwrap_err(),
            ValidationError::Missing {
                field: "department"
            }
        );
    }

    #[test]
    fn rejects_negative_salary_and_empty_name() {
        let mut body = payload();
        body["salary"] = json!(-1.0);
        let new: NewEmployee = serde_json::from_value(body).unwrap();
        assert_eq!(
            new.validate().unwrap_err(),
            ValidationError::Negative { field: "salary" }
        );

        let mut body = payload();
        body["name"] = json!("   ");
        let new: NewEmployee = serde_json::from_value(body).unwrap();
        assert_eq!(
            new.validate().unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn unknown_create_fields_fail_to_deserialize() {
        let mut body = payload();
        body["manager"] = json!("Grace");
        assert!(serde_json::from_value::<NewEmployee>(body).is_err());
    }

    #[test]
    fn joining_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_eq!(parse_joining_date("2022-01-01").unwrap(), expected);
        assert_eq!(parse_joining_date("2022-01-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_joining_date("2022-01-01T09:30:00").unwrap(), expected);
        assert!(parse_joining_date("01/01/2022").is_err());
    }

    #[test]
    fn record_serializes_with_plain_date() {
        let emp = serde_json::from_value::<NewEmployee>(payload())
            .unwrap()
            .validate()
            .unwrap();
        let value = serde_json::to_value(&emp).unwrap();

        assert_eq!(value["joining_date"], json!("2021-06-01"));
        assert_eq!(value["skills"], json!(["Python", "Rust"]));
    }
}
