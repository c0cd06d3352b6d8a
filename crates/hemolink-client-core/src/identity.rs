//! Login-identifier classification, email normalization, and the form-level
//! checks the registration page enforced before submitting.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ClientInputError;

/// How a login identifier is presented to the backend.
///
/// The login form sent a value with interior whitespace as `full_name` and
/// anything else as `username`; the backend also accepts an email in the
/// username slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username(String),
    FullName(String),
}

impl LoginIdentifier {
    /// Classify a raw identifier the way the login form did.
    pub fn classify(raw: &str) -> Result<Self, ClientInputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClientInputError::EmptyIdentifier);
        }
        if trimmed.contains(char::is_whitespace) {
            Ok(Self::FullName(trimmed.to_string()))
        } else {
            Ok(Self::Username(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Username(value) | Self::FullName(value) => value,
        }
    }
}

pub fn normalize_email(raw: &str) -> Result<String, ClientInputError> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ClientInputError::EmptyEmail);
    }
    Ok(normalized)
}

/// The eight canonical blood groups offered by the donor forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodGroup {
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::OPositive,
        Self::ONegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = ClientInputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| ClientInputError::UnknownBloodGroup(raw.trim().to_string()))
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration check: a declared recent donation must fall within the last
/// three months and not in the future.
pub fn validate_last_donation(date: NaiveDate, today: NaiveDate) -> Result<(), ClientInputError> {
    let window_start = today
        .checked_sub_months(Months::new(3))
        .ok_or(ClientInputError::DonationDateOutOfWindow)?;
    if date < window_start || date > today {
        return Err(ClientInputError::DonationDateOutOfWindow);
    }
    Ok(())
}
