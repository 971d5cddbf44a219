//! Categorical encoding with fixed vocabularies
//!
//! Codes are positions in an alphabetically sorted vocabulary, matching what
//! the model saw at training time. Nothing here is fitted from request data.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Sex,
    Smoker,
    Region,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Sex,
        CategoricalField::Smoker,
        CategoricalField::Region,
    ];

    /// Request field name
    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::Sex => "sex",
            CategoricalField::Smoker => "smoker",
            CategoricalField::Region => "region",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of legal values for one categorical field.
///
/// The code of a value is its index in `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    field: CategoricalField,
    values: &'static [&'static str],
}

pub const SEX_VOCABULARY: Vocabulary = Vocabulary {
    field: CategoricalField::Sex,
    values: &["female", "male"],
};

pub const SMOKER_VOCABULARY: Vocabulary = Vocabulary {
    field: CategoricalField::Smoker,
    values: &["no", "yes"],
};

pub const REGION_VOCABULARY: Vocabulary = Vocabulary {
    field: CategoricalField::Region,
    values: &["northeast", "northwest", "southeast", "southwest"],
};

impl Vocabulary {
    /// The built-in vocabulary for `field`
    pub const fn for_field(field: CategoricalField) -> &'static Vocabulary {
        match field {
            CategoricalField::Sex => &SEX_VOCABULARY,
            CategoricalField::Smoker => &SMOKER_VOCABULARY,
            CategoricalField::Region => &REGION_VOCABULARY,
        }
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// Integer code of `value`
    pub fn code(&self, value: &str) -> Result<u8, EncodingError> {
        self.values
            .iter()
            .position(|v| *v == value)
            .map(|idx| idx as u8)
            .ok_or_else(|| EncodingError {
                field: self.field,
                value: value.to_string(),
            })
    }

    /// Allowed values formatted for error messages, e.g. `'female', 'male'`
    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Encodes categorical values against a fixed set of vocabularies
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    sex: &'static Vocabulary,
    smoker: &'static Vocabulary,
    region: &'static Vocabulary,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub const fn new() -> Self {
        Self {
            sex: &SEX_VOCABULARY,
            smoker: &SMOKER_VOCABULARY,
            region: &REGION_VOCABULARY,
        }
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &'static Vocabulary {
        match field {
            CategoricalField::Sex => self.sex,
            CategoricalField::Smoker => self.smoker,
            CategoricalField::Region => self.region,
        }
    }

    /// Map `value` to its integer code for `field`
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<u8, EncodingError> {
        self.vocabulary(field).code(value)
    }
}
