//! Inline sensitive-data masking
//!
//! Messages mark sensitive values with a one-character tag between `|` delimiters:
//!
//! - `|N+380501234567|` renders as `+380XXXXXXXXX`
//! - `|Eivan.petrenko@example.com|` renders as `XXXX.XXXXXXXX@example.com`
//!
//! Spans with any other tag are left as written.

/// Opening and closing delimiter of a tagged span
pub const DELIMITER: char = '|';

/// Replacement for every redacted character
pub const MASK_CHAR: char = 'X';

/// Country prefix that replaces a masked `+XXX`
pub const DEFAULT_COUNTRY_PREFIX: &str = "+380";

const PHONE_TAG: char = 'N';
const EMAIL_TAG: char = 'E';

/// Replace every tagged span in `message` with its masked form.
///
/// An unterminated span ends the scan. An unknown tag keeps its span byte-for-byte and the
/// scan resumes after the span's closing delimiter, so `mask(mask(x)) == mask(x)`.
pub fn mask(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;

    loop {
        let Some(start) = rest.find(DELIMITER) else {
            break;
        };
        let body_start = start + DELIMITER.len_utf8();
        let Some(close) = rest[body_start..].find(DELIMITER) else {
            break;
        };
        let end = body_start + close;

        let span = &rest[body_start..end];
        let mut chars = span.chars();
        let masked = match chars.next() {
            Some(PHONE_TAG) => Some(mask_phone(chars.as_str())),
            Some(EMAIL_TAG) => Some(mask_email(chars.as_str())),
            _ => None,
        };

        let after = end + DELIMITER.len_utf8();
        match masked {
            Some(masked) => {
                out.push_str(&rest[..start]);
                out.push_str(&masked);
            }
            None => out.push_str(&rest[..after]),
        }
        rest = &rest[after..];
    }

    out.push_str(rest);
    out
}

fn mask_phone(phone: &str) -> String {
    let masked: String = phone
        .chars()
        .map(|c| if c.is_ascii_digit() { MASK_CHAR } else { c })
        .collect();
    let masked_prefix: String = std::iter::once('+')
        .chain(std::iter::repeat(MASK_CHAR).take(3))
        .collect();
    masked.replace(&masked_prefix, DEFAULT_COUNTRY_PREFIX)
}

fn mask_email(email: &str) -> String {
    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) => (local, Some(domain)),
        None => (email, None),
    };

    let mut masked: String = local
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { MASK_CHAR } else { c })
        .collect();

    if let Some(domain) = domain {
        masked.push('@');
        masked.push_str(domain);
    }
    masked
}
