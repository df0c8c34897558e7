//! Declarative form schemas
//!
//! A [`Schema`] is a list of fields, each with an ordered list of rules. The
//! first rule that fails for a field produces that field's message, so every
//! field carries at most one error at a time.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const FIELD_PIN: &str = "pin";
pub const FIELD_CONFIRM_PIN: &str = "konfirmasiPin";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_OTP: &str = "otp";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";
/// Body key the change-password endpoint expects the new password under
pub const FIELD_NEW_PASSWORD: &str = "newPassword";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]*[A-Za-z0-9_+\-](\.[A-Za-z0-9_'+\-]*[A-Za-z0-9_+\-])*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// Current values of a form, keyed by field name
pub type FormValues = BTreeMap<String, String>;

/// Field name to message for every field that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single check applied to a field value
#[derive(Debug, Clone)]
pub enum FieldRule {
    Required(&'static str),
    Numeric(&'static str),
    Email(&'static str),
    /// 8-15 ASCII letters or digits with at least one of each
    AlphanumericPassword(&'static str),
    ExactDigits { len: usize, message: &'static str },
    EqualsField { other: &'static str, message: &'static str },
}

impl FieldRule {
    fn check(&self, value: &str, values: &FormValues) -> Option<&'static str> {
        let passed = match self {
            FieldRule::Required(_) => !value.is_empty(),
            FieldRule::Numeric(_) => is_numeric(value),
            FieldRule::Email(_) => is_valid_email(value),
            FieldRule::AlphanumericPassword(_) => is_valid_password(value),
            FieldRule::ExactDigits { len, .. } => value.chars().count() == *len && is_numeric(value),
            FieldRule::EqualsField { other, .. } => {
                values.get(*other).map(String::as_str).unwrap_or("") == value
            }
        };

        if passed {
            None
        } else {
            Some(self.message())
        }
    }

    fn message(&self) -> &'static str {
        match self {
            FieldRule::Required(m)
            | FieldRule::Numeric(m)
            | FieldRule::Email(m)
            | FieldRule::AlphanumericPassword(m) => m,
            FieldRule::ExactDigits { message, .. } | FieldRule::EqualsField { message, .. } => {
                message
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub rules: Vec<FieldRule>,
}

impl FieldSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    /// Run every field's rules against `values`
    pub fn validate(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for field in &self.fields {
            let value = values.get(field.name).map(String::as_str).unwrap_or("");
            if let Some(message) = field.rules.iter().find_map(|rule| rule.check(value, values)) {
                errors.insert(field.name, message);
            }
        }
        errors
    }
}

pub fn pin_schema() -> Schema {
    Schema::new(vec![
        FieldSchema::new(FIELD_PIN)
            .rule(FieldRule::Required("Pin tidak boleh kosong"))
            .rule(FieldRule::Numeric("Pin harus berupa angka")),
        FieldSchema::new(FIELD_CONFIRM_PIN)
            .rule(FieldRule::Required("Konfirmasi pin tidak boleh kosong"))
            .rule(FieldRule::Numeric("Konfirmasi pin harus berupa angka"))
            .rule(FieldRule::EqualsField {
                other: FIELD_PIN,
                message: "Pin dan konfirmasi pin tidak sama",
            }),
    ])
}

pub fn forgot_password_schema() -> Schema {
    Schema::new(vec![FieldSchema::new(FIELD_EMAIL)
        .rule(FieldRule::Required("Input email tidak boleh kosong"))
        .rule(FieldRule::Email("Harap isi dengan email yang valid"))])
}

pub fn otp_schema() -> Schema {
    Schema::new(vec![FieldSchema::new(FIELD_OTP)
        .rule(FieldRule::Required("Kode OTP tidak boleh kosong"))
        .rule(FieldRule::ExactDigits {
            len: 4,
            message: "Kode OTP harus terdiri dari 4 digit angka",
        })])
}

pub fn new_password_schema() -> Schema {
    Schema::new(vec![
        FieldSchema::new(FIELD_PASSWORD)
            .rule(FieldRule::Required("Input password tidak boleh kosong"))
            .rule(FieldRule::AlphanumericPassword(
                "Password harus terdiri dari 8-15 karakter dan harus mengandung kombinasi huruf dan angka",
            )),
        FieldSchema::new(FIELD_CONFIRM_PASSWORD)
            .rule(FieldRule::Required("Input Konfirmasi password tidak boleh kosong"))
            .rule(FieldRule::EqualsField {
                other: FIELD_PASSWORD,
                message: "Konfirmasi password dan password tidak sama",
            }),
    ])
}

pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_password(value: &str) -> bool {
    let len = value.chars().count();
    (8..=15).contains(&len)
        && value.chars().all(|c| c.is_ascii_alphanumeric())
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Build a [`FormValues`] map from `(field, value)` pairs
pub fn values_of(pairs: &[(&str, &str)]) -> FormValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
