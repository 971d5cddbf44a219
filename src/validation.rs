//! Request validation
//!
//! Turns a raw JSON body into a [`PredictionRequest`]. Validation collects
//! every violation rather than stopping at the first one, so a client sees all
//! problems with its request in a single response. Violations are reported in
//! field order: age, sex, bmi, children, smoker, region.
//!
//! Rules:
//! - all six fields are required; `null` counts as missing
//! - integers must be JSON integers (`25.0` and `"25"` are rejected)
//! - categorical values must match the vocabulary exactly, including case
//! - unknown keys are ignored

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FieldViolation, ValidationError};
use crate::preprocessing::{CategoricalField, Vocabulary};

/// A validated prediction request. Every field is within its domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub sex: String,
    pub bmi: f64,
    pub children: u32,
    pub smoker: String,
    pub region: String,
}

/// Validate a raw request body
pub fn validate(raw: &Value) -> Result<PredictionRequest, ValidationError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ValidationError::malformed("request body must be a JSON object"))?;

    let mut checker = Checker::new(obj);
    let age = checker.integer("age", 1);
    let sex = checker.category(CategoricalField::Sex);
    let bmi = checker.positive_number("bmi");
    let children = checker.integer("children", 0);
    let smoker = checker.category(CategoricalField::Smoker);
    let region = checker.category(CategoricalField::Region);

    match (age, sex, bmi, children, smoker, region) {
        (Some(age), Some(sex), Some(bmi), Some(children), Some(smoker), Some(region)) => {
            Ok(PredictionRequest {
                age,
                sex,
                bmi,
                children,
                smoker,
                region,
            })
        }
        _ => Err(ValidationError::new(checker.violations)),
    }
}

struct Checker<'a> {
    obj: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Checker<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            violations: Vec::new(),
        }
    }

    fn reject<T>(&mut self, field: &'static str, message: impl Into<String>) -> Option<T> {
        self.violations.push(FieldViolation::new(field, message));
        None
    }

    fn present(&mut self, field: &'static str) -> Option<&'a Value> {
        let obj: &'a Map<String, Value> = self.obj;
        match obj.get(field) {
            None | Some(Value::Null) => self.reject(field, "field required"),
            Some(value) => Some(value),
        }
    }

    /// Integer field with an inclusive lower bound
    fn integer(&mut self, field: &'static str, min: i64) -> Option<u32> {
        let value = self.present(field)?;
        let Some(n) = value.as_i64() else {
            return if value.as_u64().is_some() {
                self.reject(field, format!("must be at most {}", u32::MAX))
            } else {
                self.reject(field, "must be an integer")
            };
        };

        if n < min {
            let message = if min == 1 {
                "must be greater than 0".to_string()
            } else {
                format!("must be greater than or equal to {}", min)
            };
            return self.reject(field, message);
        }

        match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => self.reject(field, format!("must be at most {}", u32::MAX)),
        }
    }

    fn positive_number(&mut self, field: &'static str) -> Option<f64> {
        let value = self.present(field)?;
        let Some(x) = value.as_f64() else {
            return self.reject(field, "must be a number");
        };

        if !x.is_finite() {
            return self.reject(field, "must be a finite number");
        }
        if x <= 0.0 {
            return self.reject(field, "must be greater than 0");
        }
        Some(x)
    }

    fn category(&mut self, field: CategoricalField) -> Option<String> {
        let name = field.name();
        let value = self.present(name)?;
        let Some(s) = value.as_str() else {
            return self.reject(name, "must be a string");
        };

        let vocabulary = Vocabulary::for_field(field);
        if !vocabulary.contains(s) {
            return self.reject(name, format!("must be one of {}", vocabulary.describe()));
        }
        Some(s.to_string())
    }
}
