use log::debug;
use url::Url;

/// Characters that may not appear in a search term or location.
pub const FORBIDDEN_CHARS: [char; 7] = ['<', '>', '"', '\'', '{', '}', '&'];

/// Returns `false` if `input` contains any character from [`FORBIDDEN_CHARS`].
///
/// The empty string is safe.
pub fn is_input_safe(input: &str) -> bool {
    let safe = !input.chars().any(|c| FORBIDDEN_CHARS.contains(&c));
    if !safe {
        debug!("Rejected unsafe input: {:?}", input);
    }
    safe
}

pub fn mask_api_key(key: &str) -> String {
    match key.char_indices().nth(5) {
        Some((idx, _)) => format!("{}{}", &key[..idx], "*".repeat(key[idx..].chars().count())),
        None => key.to_string(),
    }
}

/// Parses `raw` and makes sure the path ends with exactly one slash so that
/// relative joins append to it instead of replacing the last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let normalized = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalized)
}
