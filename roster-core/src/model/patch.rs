//! Field patch for partial updates
//!
//! A patch names only the fields to change. Field names are checked when the
//! patch is built: unknown names, `employee_id` and explicit nulls are
//! rejected, so applying a patch can never fail or blank a field.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::employee::{
    parse_joining_date, validate_department, validate_name, validate_salary, validate_skills,
};
use super::{Employee, ValidationError};

/// Validated set of field changes for one employee
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    name: Option<String>,
    department: Option<String>,
    salary: Option<f64>,
    joining_date: Option<NaiveDate>,
    skills: Option<BTreeSet<String>>,
}

impl FieldPatch {
    /// Build a patch from a JSON request body.
    ///
    /// # Example
    /// ```
    /// use roster_core::model::FieldPatch;
    /// use serde_json::json;
    ///
    /// let patch = FieldPatch::from_json(json!({"salary": 95000})).unwrap();
    /// assert_eq!(patch.salary(), Some(95000.0));
    ///
    /// assert!(FieldPatch::from_json(json!({"manager": "x"})).is_err());
    /// assert!(FieldPatch::from_json(json!({})).is_err());
    /// ```
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(ValidationError::InvalidFormat {
                field: "body",
                reason: "expected a JSON object".into(),
            }),
        }
    }

    /// Build a patch from a field-name → value map.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, ValidationError> {
        let mut patch = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "employee_id" => {
                    return Err(ValidationError::Immutable {
                        field: "employee_id",
                    })
                }
                "name" => patch = patch.with_name(expect_str("name", value)?)?,
                "department" => patch = patch.with_department(expect_str("department", value)?)?,
                "salary" => patch = patch.with_salary(expect_f64("salary", value)?)?,
                "joining_date" => {
                    let raw = expect_str("joining_date", value)?;
                    patch.joining_date = Some(parse_joining_date(&raw)?);
                }
                "skills" => patch = patch.with_skills(expect_str_list("skills", value)?)?,
                _ => return Err(ValidationError::UnknownField { name: key }),
            }
        }

        if patch.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(patch)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(validate_name(name.into())?);
        Ok(self)
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Result<Self, ValidationError> {
        self.department = Some(validate_department(department.into())?);
        Ok(self)
    }

    pub fn with_salary(mut self, salary: f64) -> Result<Self, ValidationError> {
        self.salary = Some(validate_salary(salary)?);
        Ok(self)
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = Some(validate_skills(skills.into_iter().map(Into::into).collect())?);
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn salary(&self) -> Option<f64> {
        self.salary
    }

    pub fn joining_date(&self) -> Option<NaiveDate> {
        self.joining_date
    }

    pub fn skills(&self) -> Option<&BTreeSet<String>> {
        self.skills.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Names of the fields this patch changes, in declaration order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.department.is_some() {
            fields.push("department");
        }
        if self.salary.is_some() {
            fields.push("salary");
        }
        if self.joining_date.is_some() {
            fields.push("joining_date");
        }
        if self.skills.is_some() {
            fields.push("skills");
        }
        fields
    }

    /// Overwrite the supplied fields; everything else keeps its value.
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(department) = &self.department {
            employee.department = department.clone();
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(date) = self.joining_date {
            employee.joining_date = date;
        }
        if let Some(skills) = &self.skills {
            employee.skills = skills.clone();
        }
    }
}

fn expect_str(field: &'static str, value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Err(ValidationError::Missing { field }),
        _ => Err(ValidationError::InvalidFormat {
            field,
            reason: "expected a string".into(),
        }),
    }
}

fn expect_f64(field: &'static str, value: Value) -> Result<f64, ValidationError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(ValidationError::InvalidFormat {
            field,
            reason: "number out of range".into(),
        }),
        Value::Null => Err(ValidationError::Missing { field }),
        _ => Err(ValidationError::InvalidFormat {
            field,
            reason: "expected a number".into(),
        }),
    }
}

fn expect_str_list(field: &'static str, value: Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(ValidationError::InvalidFormat {
                    field,
                    reason: "expected an array of strings".into(),
                }),
            })
            .collect(),
        Value::Null => Err(ValidationError::Missing { field }),
        _ => Err(ValidationError::InvalidFormat {
            field,
            reason: "expected an array of strings".into(),
        }),
    }
}
