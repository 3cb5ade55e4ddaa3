//! Date and artist normalization applied before any container write

/// Prefix of the compact `DATE:YYYYMMDD` form
const DATE_PREFIX: &str = "DATE:";

/// Reduce a date-like string to its four-digit year.
///
/// - `"DATE:20230615"` -> `"2023"`
/// - `"20230615"`, `"2023-06-15"`, `"2023"` -> `"2023"`
/// - anything else is returned unchanged
///
/// Purely prefix based; never fails.
pub fn normalize_year(input: &str) -> String {
    if let Some(rest) = input.strip_prefix(DATE_PREFIX) {
        if let Some(year) = leading_year(rest) {
            return year.to_string();
        }
    }

    match leading_year(input) {
        Some(year) => year.to_string(),
        None => input.to_string(),
    }
}

/// First four characters of `s` if they are all ASCII digits
fn leading_year(s: &str) -> Option<&str> {
    let year = s.get(..4)?;
    year.bytes().all(|b| b.is_ascii_digit()).then_some(year)
}

/// Artist values to write after splitting a multi-artist string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledArtist {
    /// Single-artist field value
    pub artist: String,
    /// Album-artist field value, absent when there is nothing to write
    pub album_artist: Option<String>,
}

/// Split a comma-separated artist string into artist and album artist.
///
/// The album artist is taken from the explicit value when non-empty,
/// otherwise from the full, unsplit `artist`. Only the single-artist field
/// is reduced to the first name.
pub fn reconcile_artist(artist: &str, explicit_album_artist: Option<&str>) -> ReconciledArtist {
    let album_artist = match explicit_album_artist.filter(|a| !a.is_empty()) {
        Some(explicit) => Some(explicit.to_string()),
        None if !artist.is_empty() => Some(artist.to_string()),
        None => None,
    };

    let artist = match artist.split_once(',') {
        Some((first, _)) => first.trim().to_string(),
        None => artist.to_string(),
    };

    ReconciledArtist {
        artist,
        album_artist,
    }
}
