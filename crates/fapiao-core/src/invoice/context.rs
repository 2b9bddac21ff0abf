//! Keyword-anchored context windows.

/// Default context radius in characters.
pub const DEFAULT_WINDOW: usize = 50;

/// Excerpts of `text` surrounding every occurrence of `keyword`.
///
/// Matching is case-insensitive and counts characters, not bytes. Each
/// excerpt spans `window` characters on both sides of the match, clipped to
/// the text; excerpts are joined with `'\n'` and may overlap. When the
/// keyword does not occur (or is empty) the whole text is returned so the
/// caller still has something to scan.
pub fn find_context(text: &str, keyword: &str, window: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = keyword.chars().collect();

    let positions = match_positions(&chars, &needle);
    if positions.is_empty() {
        return text.to_string();
    }

    positions
        .into_iter()
        .map(|pos| {
            let start = pos.saturating_sub(window);
            let end = (pos + needle.len() + window).min(chars.len());
            chars[start..end].iter().collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether `keyword` occurs in `text`, ignoring case.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = keyword.chars().collect();
    !match_positions(&chars, &needle).is_empty()
}

fn match_positions(chars: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > chars.len() {
        return Vec::new();
    }

    (0..=chars.len() - needle.len())
        .filter(|&i| {
            chars[i..i + needle.len()]
                .iter()
                .zip(needle)
                .all(|(a, b)| eq_ignore_case(*a, *b))
        })
        .collect()
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
