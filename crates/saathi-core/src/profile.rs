//! User profile: raw form state and its normalized record.
//!
//! The form holds exactly what the user typed. [`ProfileForm::normalize`] is
//! the only way to obtain a [`ProfileRecord`], and it is a pure function of
//! the form, so the chat workflow always sees a clean snapshot.

use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::SaathiError;

/// Editable profile fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Age,
    Income,
    State,
    District,
    Occupation,
    Category,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Age,
        ProfileField::Income,
        ProfileField::State,
        ProfileField::District,
        ProfileField::Occupation,
        ProfileField::Category,
    ];

    /// Localization key for the field label.
    pub fn label_key(&self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Income => "income",
            ProfileField::State => "state",
            ProfileField::District => "district",
            ProfileField::Occupation => "occupation",
            ProfileField::Category => "category",
        }
    }
}

impl FromStr for ProfileField {
    type Err = SaathiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "age" => Ok(ProfileField::Age),
            "income" => Ok(ProfileField::Income),
            "state" => Ok(ProfileField::State),
            "district" => Ok(ProfileField::District),
            "occupation" => Ok(ProfileField::Occupation),
            "category" => Ok(ProfileField::Category),
            other => Err(SaathiError::UnknownProfileField(other.to_string())),
        }
    }
}

/// Raw profile form state, exactly as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub age: String,
    pub income: String,
    pub state: String,
    pub district: String,
    pub occupation: String,
    pub category: String,
}

impl ProfileForm {
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Age => self.age = value,
            ProfileField::Income => self.income = value,
            ProfileField::State => self.state = value,
            ProfileField::District => self.district = value,
            ProfileField::Occupation => self.occupation = value,
            ProfileField::Category => self.category = value,
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Age => &self.age,
            ProfileField::Income => &self.income,
            ProfileField::State => &self.state,
            ProfileField::District => &self.district,
            ProfileField::Occupation => &self.occupation,
            ProfileField::Category => &self.category,
        }
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Normalize the raw form into a [`ProfileRecord`].
    pub fn normalize(&self) -> ProfileRecord {
        ProfileRecord {
            age: parse_amount(&self.age),
            income: parse_amount(&self.income),
            state: clean_text(&self.state),
            district: clean_text(&self.district),
            occupation: clean_text(&self.occupation),
            category: clean_text(&self.category),
        }
    }
}

/// Normalized profile snapshot sent with every chat request.
///
/// Numeric fields are `None` when the input was empty or unparseable; they are
/// never silently zero. Whole numbers serialize as JSON integers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(serialize_with = "serialize_amount")]
    pub age: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub income: Option<f64>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub occupation: Option<String>,
    pub category: Option<String>,
}

impl ProfileRecord {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a numeric form field: finite and non-negative, or absent.
fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        _ => None,
    }
}

fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn serialize_amount<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
            serializer.serialize_i64(*n as i64)
        }
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

// =============================================================================
// Tests
// =============================================================================
