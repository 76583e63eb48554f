//! Telegram MarkdownV2 escaping

/// Characters MarkdownV2 reserves for markup
pub const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape `text` so it renders literally under MarkdownV2.
///
/// Backslashes become forward slashes first (Windows paths would otherwise read as
/// escapes), then every reserved character gets a single backslash in front.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        match c {
            '\\' => out.push('/'),
            c if MARKDOWN_V2_SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
