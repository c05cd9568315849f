//! Create-path validation beyond what deserialization already enforces.
//!
//! Deserialization rejects missing required fields, wrong primitive types,
//! and unknown enum values. This module covers what the type system cannot:
//! decimal-as-string fields must parse, progress must be non-negative, and
//! identifier strings must not be blank.

use rust_decimal::Decimal;

use crate::common::ServiceError;

use super::models::NewUserLimit;

pub fn assert_new_limit_valid(candidate: &NewUserLimit) -> Result<(), ServiceError> {
    assert_not_blank("userId", &candidate.user_id)?;
    assert_not_blank("brandId", &candidate.brand_id)?;
    assert_not_blank("currencyCode", &candidate.currency_code)?;

    parse_decimal("value", &candidate.value)?;
    if let Some(previous) = &candidate.previous_limit_value {
        parse_decimal("previousLimitValue", previous)?;
    }
    if let Some(progress) = &candidate.progress {
        let parsed = parse_decimal("progress", progress)?;
        if parsed.is_sign_negative() {
            return Err(ServiceError::validation(
                "invalid-new-user-limit",
                format!("progress must not be negative, got {progress}"),
            ));
        }
    }
    Ok(())
}

fn assert_not_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(
            "invalid-new-user-limit",
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, ServiceError> {
    value.parse::<Decimal>().map_err(|_| {
        ServiceError::validation(
            "invalid-new-user-limit",
            format!("{field} must be a decimal string, got {value:?}"),
        )
    })
}
