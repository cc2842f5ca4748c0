//! Schema checks for transaction payloads before they reach the store.
//!
//! Each check reports every violated field so a client can fix a request in
//! one round trip.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    transaction::core::{NewTransaction, TransactionPatch, TransactionType, truncate_to_millis},
};

/// The maximum number of characters in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
/// The maximum number of characters in a transaction category.
pub const MAX_CATEGORY_LENGTH: usize = 100;

const TYPE_FIELD: &str = "type";
const AMOUNT_FIELD: &str = "amount";
const DESCRIPTION_FIELD: &str = "description";
const CATEGORY_FIELD: &str = "category";
const DATE_FIELD: &str = "date";

/// A validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The name of the offending field, as it appears in the request.
    pub field: String,
    /// A human readable explanation.
    pub message: String,
}

impl FieldError {
    /// Create an error for `field`.
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" {}", self.field, self.message)
    }
}

/// Check a payload for creating a transaction.
///
/// `type`, `amount` and `date` are required, `description` and `category`
/// default to empty strings.
///
/// # Errors
/// Returns [Error::Validation] listing every invalid, missing or unknown field.
pub fn validate_create(payload: &Value) -> Result<NewTransaction, Error> {
    let object = expect_object(payload)?;
    let mut errors = Vec::new();
    let patch = check_fields(object, &mut errors);

    for (field, is_missing) in [
        (TYPE_FIELD, !object.contains_key(TYPE_FIELD)),
        (AMOUNT_FIELD, !object.contains_key(AMOUNT_FIELD)),
        (DATE_FIELD, !object.contains_key(DATE_FIELD)),
    ] {
        if is_missing {
            errors.push(FieldError::new(field, "is required"));
        }
    }

    match patch {
        TransactionPatch {
            type_: Some(type_),
            amount: Some(amount),
            description,
            category,
            date: Some(date),
        } if errors.is_empty() => Ok(NewTransaction {
            type_,
            amount,
            description: description.unwrap_or_default(),
            category: category.unwrap_or_default(),
            date,
        }),
        _ => Err(Error::Validation(errors)),
    }
}

/// Check a payload for a partial update of a transaction.
///
/// Every field is optional, but at least one must be present.
///
/// # Errors
/// Returns [Error::Validation] listing every invalid or unknown field, or a
/// single error if the payload contains no fields.
pub fn validate_update(payload: &Value) -> Result<TransactionPatch, Error> {
    let object = expect_object(payload)?;

    if object.is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "body",
            "must contain at least one field",
        )]));
    }

    let mut errors = Vec::new();
    let patch = check_fields(object, &mut errors);

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(Error::Validation(errors))
    }
}

/// Parse a date as accepted in payloads and query strings.
///
/// Accepts a calendar date (`2024-01-31`, read as midnight UTC), an RFC 3339
/// date-time, or a date-time without an offset (`2024-01-31T23:00:00`, read
/// as UTC). The result is converted to UTC and must fall in the years
/// 0 to 9999, the range RFC 3339 can represent.
pub fn parse_date(text: &str) -> Option<OffsetDateTime> {
    parse_date_any_year(text.trim()).filter(|date| (0..=9999).contains(&date.year()))
}

fn parse_date_any_year(text: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.to_offset(time::UtcOffset::UTC));
    }

    PrimitiveDateTime::parse(
        text,
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        ),
    )
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}

fn expect_object(payload: &Value) -> Result<&Map<String, Value>, Error> {
    payload.as_object().ok_or_else(|| {
        Error::Validation(vec![FieldError::new("body", "must be a JSON object")])
    })
}

/// Check every field in `object`, collecting errors and the valid values.
fn check_fields(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> TransactionPatch {
    let mut patch = TransactionPatch::default();

    for (key, value) in object {
        match key.as_str() {
            TYPE_FIELD => patch.type_ = check_type(value, errors),
            AMOUNT_FIELD => patch.amount = check_amount(value, errors),
            DESCRIPTION_FIELD => {
                patch.description =
                    check_text(DESCRIPTION_FIELD, value, MAX_DESCRIPTION_LENGTH, errors)
            }
            CATEGORY_FIELD => {
                patch.category = check_text(CATEGORY_FIELD, value, MAX_CATEGORY_LENGTH, errors)
            }
            DATE_FIELD => patch.date = check_date(value, errors),
            unknown => errors.push(FieldError::new(unknown, "is not allowed")),
        }
    }

    patch
}

fn check_type(value: &Value, errors: &mut Vec<FieldError>) -> Option<TransactionType> {
    let parsed = value.as_str().and_then(|text| text.parse().ok());

    if parsed.is_none() {
        errors.push(FieldError::new(
            TYPE_FIELD,
            "must be one of [income, expense]",
        ));
    }

    parsed
}

fn check_amount(value: &Value, errors: &mut Vec<FieldError>) -> Option<f64> {
    match value.as_f64() {
        Some(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
        Some(_) => {
            errors.push(FieldError::new(AMOUNT_FIELD, "must be a positive number"));
            None
        }
        None => {
            errors.push(FieldError::new(AMOUNT_FIELD, "must be a number"));
            None
        }
    }
}

fn check_text(
    field: &str,
    value: &Value,
    max_length: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(text) = value.as_str() else {
        errors.push(FieldError::new(field, "must be a string"));
        return None;
    };

    let text = text.trim();

    if text.chars().count() > max_length {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max_length} characters long"),
        ));
        return None;
    }

    Some(text.to_owned())
}

fn check_date(value: &Value, errors: &mut Vec<FieldError>) -> Option<OffsetDateTime> {
    let parsed = value.as_str().and_then(parse_date).map(truncate_to_millis);

    if parsed.is_none() {
        errors.push(FieldError::new(DATE_FIELD, "must be a valid ISO 8601 date"));
    }

    parsed
}
