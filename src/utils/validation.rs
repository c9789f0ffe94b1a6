use crate::utils::error::{BookingError, Result};
use std::collections::BTreeSet;
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BookingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 檢查 0x 開頭、40 個十六進位字元的帳戶/合約地址
pub fn validate_address(field_name: &str, address: &str) -> Result<()> {
    let digits = address.strip_prefix("0x").unwrap_or("");
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Expected a 0x-prefixed 20-byte hex address".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BookingError::invalid_input(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BookingError::invalid_input(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_member<T: Ord + Display>(field_name: &str, value: &T, allowed: &BTreeSet<T>) -> Result<()> {
    if !allowed.contains(value) {
        let reason = if allowed.is_empty() {
            "No values are currently available".to_string()
        } else {
            let listed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
            format!("Value must be one of: {}", listed.join(", "))
        };
        return Err(BookingError::invalid_input(field_name, value, reason));
    }
    Ok(())
}
