//! Property-based tests for alert_logger using proptest

use alert_logger::core::markup::MARKDOWN_V2_SPECIAL;
use alert_logger::prelude::*;
use alert_logger::{escape_markdown_v2, mask, Template};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

/// Free text that cannot open a span
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.:@+()_-]{0,24}"
}

fn phone_body() -> impl Strategy<Value = String> {
    "\\+?[0-9 ()-]{0,15}"
}

fn email_parts() -> impl Strategy<Value = (String, String)> {
    ("[a-zA-Z0-9._+-]{1,12}", "[a-z0-9-]{1,10}\\.[a-z]{2,4}")
}

fn expected_phone(body: &str) -> String {
    body.chars()
        .map(|c| if c.is_ascii_digit() { 'X' } else { c })
        .collect::<String>()
        .replace("+XXX", "+380")
}

/// A message built from plain text and well-formed `|N..|` / `|E..|` spans
fn well_formed_message() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        plain_text(),
        phone_body().prop_map(|body| format!("|N{}|", body)),
        email_parts().prop_map(|(local, domain)| format!("|E{}@{}|", local, domain)),
    ];
    prop::collection::vec(segment, 0..6).prop_map(|segments| segments.concat())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel names parse back in any case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let name = if lower {
            level.as_str().to_lowercase()
        } else {
            level.as_str().to_string()
        };
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(level.to_string(), level.as_str());
    }

    /// Test that LogLevel ordering follows the numeric rank
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 <= level2, level1.rank() <= level2.rank());
        prop_assert_eq!(level1 < level2, level1.rank() < level2.rank());
        prop_assert_eq!(LogLevel::from_rank(level1.rank()), Some(level1));
    }
}

// ============================================================================
// Masking Tests
// ============================================================================

proptest! {
    /// Digits inside a phone span are masked, `+XXX` becomes the default prefix, and text
    /// around the span is untouched
    #[test]
    fn test_phone_span(prefix in plain_text(), body in phone_body(), suffix in plain_text()) {
        let message = format!("{}|N{}|{}", prefix, body, suffix);
        let masked = mask(&message);

        prop_assert_eq!(masked, format!("{}{}{}", prefix, expected_phone(&body), suffix));
    }

    /// The local part is masked character by character and the domain kept
    #[test]
    fn test_email_span((local, domain) in email_parts(), suffix in plain_text()) {
        let masked = mask(&format!("|E{}@{}|{}", local, domain, suffix));

        let expected_local: String = local
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { 'X' } else { c })
            .collect();
        prop_assert_eq!(masked, format!("{}@{}{}", expected_local, domain, suffix));
    }

    #[test]
    fn test_mask_idempotent(message in well_formed_message()) {
        let once = mask(&message);
        prop_assert_eq!(mask(&once), once.clone());
        prop_assert!(!once.contains('|'));
    }

    /// Any mix of delimiters, tags, digits and letters masks to a fixed point
    #[test]
    fn test_mask_idempotent_on_arbitrary_text(message in "[|NEZ0-9a-z@+. ]{0,40}") {
        let once = mask(&message);
        prop_assert_eq!(mask(&once), once);
    }

    /// Text with no delimiter passes through unchanged
    #[test]
    fn test_mask_identity_without_spans(message in "[^|]*") {
        prop_assert_eq!(mask(&message), message);
    }

    /// Arbitrary input never panics and never grows
    #[test]
    fn test_mask_total(message in ".*") {
        prop_assert!(mask(&message).len() <= message.len());
    }
}

// ============================================================================
// Escaping Tests
// ============================================================================

proptest! {
    /// Every reserved character is preceded by exactly one unescaped backslash, and
    /// unescaping gives the input back with backslashes turned into slashes
    #[test]
    fn test_escape_total(text in ".*") {
        let escaped = escape_markdown_v2(&text);

        let mut unescaped = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let next = chars.next();
                prop_assert!(
                    matches!(next, Some(n) if MARKDOWN_V2_SPECIAL.contains(&n)),
                    "backslash not followed by a reserved character in {:?}", escaped
                );
                unescaped.extend(next);
            } else {
                prop_assert!(!MARKDOWN_V2_SPECIAL.contains(&c), "bare {:?} in {:?}", c, escaped);
                unescaped.push(c);
            }
        }

        prop_assert_eq!(unescaped, text.replace('\\', "/"));
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// Brace-free text is a template of one literal
    #[test]
    fn test_template_literal_roundtrip(text in "[^{}]*") {
        let template = Template::parse(&text).unwrap();
        prop_assert_eq!(template.render(|_| String::new()), text);
    }

    /// Doubled braces always render as single braces
    #[test]
    fn test_template_escaped_braces(text in "[a-z ]{0,10}") {
        let template = Template::parse(&format!("{{{{{}}}}}", text)).unwrap();
        prop_assert_eq!(template.render(|_| String::new()), format!("{{{}}}", text));
    }

    /// Emitting never panics, whatever the message
    #[test]
    fn test_logger_emit_no_panic(level in any_level(), message in ".*") {
        let mut logger = Logger::builder("prop").format("{level}: {message}").build().unwrap();
        logger
            .add_console_writer(std::io::sink(), HandlerOptions::new().with_colors(false))
            .unwrap();
        logger.emit(level, message, Location::new("tests/property_tests.rs", 1));
        prop_assert_eq!(logger.metrics().failed(), 0);
    }
}
