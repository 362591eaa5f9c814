use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifier of the user a subscription belongs to
///
/// Front-ends send these as either JSON strings or numbers. Comparison goes
/// through the string form so `42` and `"42"` refer to the same user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(Number),
}

impl UserId {
    /// The id as it would be printed by a loosely typed client
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            UserId::Text(s) => Cow::Borrowed(s),
            UserId::Number(n) => Cow::Owned(number_to_text(n)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            UserId::Text(s) => s.is_empty(),
            UserId::Number(_) => false,
        }
    }

    /// Returns None for an empty id so callers can treat it as absent
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn matches(&self, other: &UserId) -> bool {
        self.as_text() == other.as_text()
    }
}

fn number_to_text(n: &Number) -> String {
    // Integral floats print without the fraction, e.g. 42.0 is "42"
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        },
        _ => n.to_string(),
    }
}

impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for UserId {}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId::Text(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId::Text(value)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId::Number(value.into())
    }
}
