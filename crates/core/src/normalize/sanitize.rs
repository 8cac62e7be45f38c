//! Filesystem-safe text via full-width lookalikes.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());
static CORNER_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"「([^」]*)」").unwrap());

/// Reserved characters and the lookalike each one is written as.
const RESERVED: &[(char, char)] = &[
    (':', '：'),
    ('?', '？'),
    ('!', '！'),
    ('|', '｜'),
    ('*', '＊'),
    ('/', '／'),
    ('\\', '＼'),
    ('<', '＜'),
    ('>', '＞'),
];

/// Maps reserved filesystem characters to full-width lookalikes.
///
/// Paired double quotes become corner brackets, a stray quote becomes a
/// full-width quote, `...` becomes an ellipsis and a trailing period becomes
/// an ideographic full stop (trailing dots are stripped on some filesystems).
pub fn sanitize_for_filesystem(text: &str) -> String {
    let quoted = QUOTED.replace_all(text, "「$1」");

    let mut out: String = quoted
        .chars()
        .map(|c| match c {
            '"' => '＂',
            _ => RESERVED
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c),
        })
        .collect();

    out = out.replace("...", "…");
    if out.ends_with('.') {
        out.pop();
        out.push('。');
    }
    out
}

/// Inverse of [`sanitize_for_filesystem`].
///
/// Also folds a few legacy lookalikes found in older libraries (`꞉`, `⁄`, `・`).
///
/// The round trip is exact for text that does not already contain the
/// lookalikes. A `。` is only restored at the end, where sanitizing puts
/// it, so Japanese sentence stops survive; a literal `…` or full-width
/// character in the original comes back as its ASCII form.
pub fn restore_from_filesystem(text: &str) -> String {
    let unquoted = CORNER_QUOTED.replace_all(text, "\"$1\"");

    let mut out: String = unquoted
        .chars()
        .map(|c| match c {
            '＂' => '"',
            '꞉' => ':',
            '⁄' | '・' => '/',
            _ => RESERVED
                .iter()
                .find(|(_, to)| *to == c)
                .map(|(from, _)| *from)
                .unwrap_or(c),
        })
        .collect();

    if out.ends_with('。') {
        out.pop();
        out.push('.');
    }
    out.replace('…', "...")
}
