//! Validation helpers for DTOs.

use validator::ValidationError;

const URI_PREFIX: &str = "spotify:playlist:";
const LINK_MARKER: &str = "open.spotify.com/playlist/";

/// Extract the base-62 playlist identifier from a raw id, a
/// `spotify:playlist:` URI or an `open.spotify.com` link.
///
/// # Examples
///
/// ```ignore
/// normalize_playlist_id("37i9dQZF1DXcBWIGoYBM5M")                        // Some(id)
/// normalize_playlist_id("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M")       // Some(id)
/// normalize_playlist_id("https://open.spotify.com/playlist/37i9...?si=x") // Some(id)
/// normalize_playlist_id("not a playlist")                                // None
/// ```
pub fn normalize_playlist_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let candidate = if let Some(rest) = raw.strip_prefix(URI_PREFIX) {
        rest
    } else if let Some(index) = raw.find(LINK_MARKER) {
        let rest = &raw[index + LINK_MARKER.len()..];
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        raw
    };

    (!candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| candidate.to_string())
}

/// Validates that `raw` designates a playlist (see [`normalize_playlist_id`]).
pub fn validate_playlist_id(raw: &str) -> Result<(), ValidationError> {
    if normalize_playlist_id(raw).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("playlist_id_format");
    err.message =
        Some("playlist id must be an id, a spotify:playlist: URI or an open.spotify.com link".into());
    Err(err)
}

/// Validates that a free-text field is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must not be blank".into());
        return Err(err);
    }
    Ok(())
}
