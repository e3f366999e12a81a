//! Field-level validators with explicit tri-state semantics.
//!
//! Every parser maps one raw JSON value to one of three outcomes:
//!
//! - [`Field::Absent`] - the key was not supplied; leave the stored value
//!   unchanged on update, use the default on create;
//! - [`Field::Clear`] - the key was supplied as null/empty; clear the stored
//!   value;
//! - [`Field::Set`] - the key carried a usable value, normalized.
//!
//! Mandatory fields ([`required_string`]) have no tri-state: absent and
//! empty both fail. Parsers take `Option<&Value>` where `None` means the key
//! was missing from the payload, so "missing key" and "explicit null" stay
//! distinguishable all the way down.
//!
//! The minute/rating asymmetry is intentional: a fractional match minute is
//! silently truncated toward zero, while a fractional skill rating is an
//! error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FieldError, FieldResult};
use crate::models::MatchStatus;

// =============================================================================
// Tri-State Field
// =============================================================================

/// A field value classified as absent, explicit-clear, or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    /// Key not supplied.
    Absent,
    /// Key supplied as null or empty: clear the stored value.
    Clear,
    /// Key supplied with a usable value.
    Set(T),
}

// Absent is the default for any T; a derive would demand `T: Default`.
impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Collapse to an option: `Set(v)` becomes `Some(v)`, everything else
    /// `None`. This is the create-path view, where clearing a field and
    /// leaving it at its default are the same thing.
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Apply to a stored slot: absent leaves it alone, clear empties it,
    /// set replaces it.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Field::Absent => {}
            Field::Clear => *slot = None,
            Field::Set(v) => *slot = Some(v),
        }
    }
}

// =============================================================================
// String Fields
// =============================================================================

/// A mandatory string: must be present, a string, and non-empty after trim.
pub fn required_string(value: Option<&Value>, field: &'static str, label: &str) -> FieldResult<String> {
    let required = || FieldError::new(field, format!("{label} is required."));

    let Some(Value::String(raw)) = value else {
        return Err(required());
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(required());
    }

    Ok(trimmed.to_string())
}

/// An optional nullable string: empty after trim clears, null clears when
/// `allow_null` is set (and is ignored otherwise).
pub fn optional_string(
    value: Option<&Value>,
    field: &'static str,
    label: &str,
    allow_null: bool,
) -> FieldResult<Field<String>> {
    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(if allow_null { Field::Clear } else { Field::Absent }),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(Field::Clear)
            } else {
                Ok(Field::Set(trimmed.to_string()))
            }
        }
        Some(_) => Err(FieldError::new(field, format!("{label} must be a string."))),
    }
}

/// The preferred-position string: null always clears; an empty string is
/// dropped on create (`allow_empty`) and clears on update.
pub fn position_pref(value: Option<&Value>, allow_empty: bool) -> FieldResult<Field<String>> {
    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(Field::Clear),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(if allow_empty { Field::Absent } else { Field::Clear })
            } else {
                Ok(Field::Set(trimmed.to_string()))
            }
        }
        Some(_) => Err(FieldError::new(
            "positionPref",
            "Preferred position must be a string.",
        )),
    }
}

// =============================================================================
// Status
// =============================================================================

/// The match status symbol, matched case-insensitively. Status has a
/// non-null default and is never clearable: with `allow_empty` unset, a
/// missing/null/empty value is an error rather than a clear.
pub fn status(value: Option<&Value>, allow_empty: bool) -> FieldResult<Option<MatchStatus>> {
    let invalid = || FieldError::new("status", "Status must be one of the supported values.");

    let raw = match value {
        None | Some(Value::Null) => {
            return if allow_empty { Ok(None) } else { Err(invalid()) };
        }
        Some(Value::String(raw)) => raw,
        Some(_) => return Err(invalid()),
    };

    if raw.trim().is_empty() {
        return if allow_empty { Ok(None) } else { Err(invalid()) };
    }

    MatchStatus::from_code(raw).map(Some).ok_or_else(invalid)
}

// =============================================================================
// Dates
// =============================================================================

/// A timestamp: ISO-8601 string or epoch milliseconds. An already-typed
/// timestamp arrives serialized as RFC 3339 and takes the string arm.
pub fn date(
    value: Option<&Value>,
    field: &'static str,
    label: &str,
    allow_empty: bool,
) -> FieldResult<Field<DateTime<Utc>>> {
    let invalid = || FieldError::new(field, format!("{label} must be a valid ISO string or timestamp."));

    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(if allow_empty { Field::Absent } else { Field::Clear }),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(if allow_empty { Field::Absent } else { Field::Clear });
            }
            parse_date_str(trimmed).map(Field::Set).ok_or_else(invalid)
        }
        Some(Value::Number(n)) => {
            let numeric = n.as_f64().filter(|f| f.is_finite()).ok_or_else(invalid)?;
            Utc.timestamp_millis_opt(numeric.trunc() as i64)
                .single()
                .map(Field::Set)
                .ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive datetimes and bare dates are treated as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?));
    }
    None
}

// =============================================================================
// Bounded Integers
// =============================================================================

/// The match minute: numbers and numeric strings, truncated toward zero,
/// zero or positive. Fractional input is accepted and truncated.
pub fn match_minute(value: Option<&Value>, allow_empty: bool) -> FieldResult<Field<u32>> {
    let not_a_number = || FieldError::new("matchMinute", "Match minute must be a number.");

    let numeric = match value {
        None => return Ok(Field::Absent),
        Some(Value::Null) => {
            return Ok(if allow_empty { Field::Clear } else { Field::Absent });
        }
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(if allow_empty { Field::Clear } else { Field::Absent });
            }
            trimmed.parse::<f64>().map_err(|_| not_a_number())?
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(not_a_number)?,
        Some(_) => return Err(not_a_number()),
    };

    if !numeric.is_finite() {
        return Err(not_a_number());
    }

    let integer = numeric.trunc();
    if integer < 0.0 {
        return Err(FieldError::new(
            "matchMinute",
            "Match minute must be zero or positive.",
        ));
    }

    Ok(Field::Set(integer as u32))
}

/// The skill rating: numbers and numeric strings, but fractional input is
/// rejected outright, unlike [`match_minute`].
pub fn skill_rating(value: Option<&Value>, allow_empty: bool) -> FieldResult<Field<u32>> {
    let not_a_number = || FieldError::new("skillRating", "Skill rating must be a number.");

    let numeric = match value {
        None => return Ok(Field::Absent),
        Some(Value::Null) => return Ok(Field::Clear),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(if allow_empty { Field::Absent } else { Field::Clear });
            }
            trimmed.parse::<f64>().map_err(|_| not_a_number())?
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(not_a_number)?,
        Some(_) => return Err(not_a_number()),
    };

    if !numeric.is_finite() {
        return Err(not_a_number());
    }

    let integer = numeric.trunc();
    if integer != numeric {
        return Err(FieldError::new(
            "skillRating",
            "Skill rating must be an integer.",
        ));
    }
    if integer < 0.0 {
        return Err(FieldError::new(
            "skillRating",
            "Skill rating must be zero or positive.",
        ));
    }

    Ok(Field::Set(integer as u32))
}

// =============================================================================
// Booleans
// =============================================================================

/// A boolean: literals plus the strings "true"/"false"/"1"/"0",
/// case-insensitive after trim. Empty string and null both clear.
pub fn boolean(value: Option<&Value>, field: &'static str, label: &str) -> FieldResult<Field<bool>> {
    let invalid = || FieldError::new(field, format!("{label} must be true or false."));

    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(Field::Clear),
        Some(Value::Bool(b)) => Ok(Field::Set(*b)),
        Some(Value::String(raw)) => match raw.trim().to_lowercase().as_str() {
            "" => Ok(Field::Clear),
            "true" | "1" => Ok(Field::Set(true)),
            "false" | "0" => Ok(Field::Set(false)),
            _ => Err(invalid()),
        },
        Some(_) => Err(invalid()),
    }
}

// =============================================================================
// Opaque Blobs
// =============================================================================

/// An opaque structured blob: objects and arrays pass through uninspected.
/// Scalars are silently dropped when `allow_empty` is set and fail with
/// `message` otherwise.
pub fn json_blob(
    value: Option<&Value>,
    field: &'static str,
    message: &str,
    allow_empty: bool,
) -> FieldResult<Field<Value>> {
    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(Field::Clear),
        Some(v @ (Value::Object(_) | Value::Array(_))) => Ok(Field::Set(v.clone())),
        Some(_) => {
            if allow_empty {
                Ok(Field::Absent)
            } else {
                Err(FieldError::new(field, message))
            }
        }
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// An entity identifier. Ids are typed UUIDs here; null and empty behave
/// like the other tri-state fields.
pub fn identifier(
    value: Option<&Value>,
    field: &'static str,
    allow_empty: bool,
) -> FieldResult<Field<Uuid>> {
    match value {
        None => Ok(Field::Absent),
        Some(Value::Null) => Ok(if allow_empty { Field::Clear } else { Field::Absent }),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(if allow_empty { Field::Clear } else { Field::Absent });
            }
            Uuid::parse_str(trimmed).map(Field::Set).map_err(|_| {
                FieldError::new(field, "Identifier must be a valid identifier.")
            })
        }
        Some(_) => Err(FieldError::new(field, "Identifier must be a string.")),
    }
}

// =============================================================================
// Tests
// =============================================================================
