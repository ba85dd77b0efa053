//! Validation for the free-text amount field of the transaction form.

/// Why an amount typed into the transaction form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountInputError {
    #[error("Amount is required.")]
    Empty,

    #[error("Amount may only contain digits and a single decimal point.")]
    InvalidCharacters(String),

    #[error("Amount must be a number.")]
    NotANumber(String),

    #[error("Amount is too large.")]
    TooLarge(String),
}

/// Parse the amount field of the transaction form.
///
/// Only digits and at most one decimal point are accepted, e.g. "1200",
/// "12.5" and ".5". Anything else, including signs, separators and a second
/// decimal point, is rejected before a request is made to the record store.
pub fn parse_amount_input(raw: &str) -> Result<f64, AmountInputError> {
    if raw.is_empty() {
        return Err(AmountInputError::Empty);
    }

    let has_only_digits_and_point = raw.chars().all(|c| c.is_ascii_digit() || c == '.');
    let decimal_points = raw.chars().filter(|&c| c == '.').count();

    if !has_only_digits_and_point || decimal_points > 1 {
        return Err(AmountInputError::InvalidCharacters(raw.to_owned()));
    }

    // A lone "." passes the character check but is not a number.
    let amount = raw
        .parse::<f64>()
        .map_err(|_| AmountInputError::NotANumber(raw.to_owned()))?;

    // Overflowing digit strings parse to infinity, which JSON cannot carry.
    if !amount.is_finite() {
        return Err(AmountInputError::TooLarge(raw.to_owned()));
    }

    Ok(amount)
}
