//! # Field Sanitizer
//!
//! Pure, total functions that normalize caller input into tokens that are
//! safe to place on the NVP wire. The protocol has no escaping mechanism,
//! so sanitization strips characters instead of encoding them.
//!
//! Every function here is lossy and never fails: malformed input degrades
//! to an empty string or a zero amount.

use serde::{Deserialize, Serialize};

/// Trim, keep at most `max_len` characters, then trim again.
///
/// Length is counted in Unicode scalar values so a multi-byte character is
/// never split.
pub fn truncate(text: &str, max_len: usize) -> String {
    let head: String = text.trim().chars().take(max_len).collect();
    head.trim().to_string()
}

/// Remove the NVP delimiters `&` and `=`, which the wire cannot escape.
pub fn strip_delimiters(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '&' | '=')).collect()
}

/// Free-text field rule: drop delimiters, then [`truncate`].
pub fn clean_text(text: &str, max_len: usize) -> String {
    truncate(&strip_delimiters(text), max_len)
}

/// Strip every character that is not an ASCII digit.
pub fn clean_digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a monetary amount out of free text.
///
/// Every character other than `0-9` and `.` is dropped. The numeric value is
/// the leading `digits[.digits]` run of what remains. With `whole_units` the
/// fraction is discarded (not rounded); otherwise it is rounded half-up to
/// cents.
///
/// ```
/// use payflow_core::sanitize::clean_amount;
///
/// assert_eq!(clean_amount("$1,500.00", false).to_string(), "1500.00");
/// assert_eq!(clean_amount("$1,500.00", true).to_string(), "1500");
/// ```
pub fn clean_amount(value: &str, whole_units: bool) -> Amount {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.splitn(3, '.');
    let units = parts.next().map(accumulate_digits).unwrap_or(0);
    let fraction = parts.next().unwrap_or("");

    let cents = if whole_units {
        0
    } else {
        round_to_cents(fraction)
    };

    Amount {
        minor_units: units.saturating_mul(100).saturating_add(cents),
        whole_units,
    }
}

fn accumulate_digits(digits: &str) -> u64 {
    digits
        .bytes()
        .map(|b| u64::from(b - b'0'))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

fn round_to_cents(fraction: &str) -> u64 {
    let mut digits = fraction.bytes().map(|b| u64::from(b - b'0'));
    let tens = digits.next().unwrap_or(0);
    let ones = digits.next().unwrap_or(0);
    let rest = digits.next().unwrap_or(0);
    tens * 10 + ones + u64::from(rest >= 5)
}

/// A sanitized monetary amount, held in minor units (cents).
///
/// Renders as a bare integer when built in whole-unit mode, otherwise with
/// exactly two decimals. No currency symbol is ever emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    minor_units: u64,
    whole_units: bool,
}

impl Amount {
    /// Build an amount directly from minor units, rendered with two decimals.
    pub fn from_minor_units(minor_units: u64) -> Self {
        Self {
            minor_units,
            whole_units: false,
        }
    }

    /// The amount in minor units (cents).
    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    /// Whether the amount renders without a fractional part.
    pub fn is_whole_units(&self) -> bool {
        self.whole_units
    }

    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.whole_units {
            write!(f, "{}", self.minor_units / 100)
        } else {
            write!(f, "{}.{:02}", self.minor_units / 100, self.minor_units % 100)
        }
    }
}
