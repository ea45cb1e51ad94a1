//! Filename heuristics - turns loosely structured media file names into
//! title / year / season / episode identities.
//!
//! Everything here is pure text analysis: no I/O, no errors. When a name
//! doesn't match the expected patterns the functions fall back to a defined
//! value (movie classification, whole cleaned name) instead of failing.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::Path;

/// Recognized media file extensions (case-insensitive).
pub const MEDIA_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "avi", "mov"];

/// Whether the path carries one of the recognized media extensions.
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MEDIA_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}

// Years are accepted in 1900-2029. A bare token wins over a bracketed or
// parenthesized one because it is checked first.
static YEAR_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19\d{2}|20[0-2]\d)\b").expect("valid year pattern"));
static YEAR_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(19\d{2}|20[0-2]\d)\]").expect("valid year pattern"));
static YEAR_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((19\d{2}|20[0-2]\d)\)").expect("valid year pattern"));

static SEASON_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s(\d{1,2})e(\d{1,2})").expect("valid season/episode pattern"));

static RESOLUTION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(1080p|720p|480p)\s*$").expect("valid resolution pattern"));

static BRACKET_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid bracket pattern"));

/// Extract the first plausible release year from `text`.
///
/// Returns the 4-digit year as a string, or `None` when no token in the
/// accepted range is present.
pub fn extract_year(text: &str) -> Option<String> {
    for pattern in [&*YEAR_BARE, &*YEAR_BRACKETED, &*YEAR_PARENS] {
        if let Some(caps) = pattern.captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Position of the first year token in `text`, matching the same pattern
/// priority as [`extract_year`].
fn find_year_token(text: &str) -> Option<(usize, usize)> {
    for pattern in [&*YEAR_BARE, &*YEAR_BRACKETED, &*YEAR_PARENS] {
        if let Some(m) = pattern.find(text) {
            return Some((m.start(), m.end()));
        }
    }
    None
}

/// Derive a searchable movie title from a file name (without extension).
///
/// Dots and underscores become spaces; when a year token is present the
/// title is everything before it. Never returns an empty string for a
/// non-empty input: if the prefix trims to nothing the whole cleaned name
/// is returned instead.
pub fn extract_movie_title(name: &str) -> String {
    let clean = name.replace(['.', '_'], " ");
    if let Some((start, _)) = find_year_token(&clean) {
        let prefix = clean[..start].trim();
        if !prefix.is_empty() {
            return prefix.to_string();
        }
    }
    clean.trim().to_string()
}

/// Season/episode identity parsed out of a series file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesInfo {
    /// Cleaned series name, e.g. "Breaking Bad".
    pub name: String,
    /// Season number, no zero padding.
    pub season: u32,
    /// Episode number within the season.
    pub episode: u32,
    /// Year found alongside the series name, if any.
    pub year: Option<String>,
}

impl SeriesInfo {
    /// Folder-friendly season label, e.g. "Season 1".
    pub fn season_label(&self) -> String {
        format!("Season {}", self.season)
    }
}

/// Extract series identity from a file name.
///
/// Requires a case-insensitive `S<digits>E<digits>` token; without one the
/// file is a movie and `None` is returned. The series name is derived from
/// the text preceding the token: separators become spaces, a trailing
/// resolution tag and bracketed release-group tags are stripped, a trailing
/// year is stripped, and anything outside `[A-Za-z0-9 ]` is dropped. If
/// that leaves nothing, the file is unclassified and `None` is returned so
/// the caller falls back to movie handling.
pub fn extract_series_info(filename: &str) -> Option<SeriesInfo> {
    let caps = SEASON_EPISODE.captures(filename)?;
    let token = caps.get(0)?;
    let season: u32 = caps[1].parse().ok()?;
    let episode: u32 = caps[2].parse().ok()?;

    let head = filename[..token.start()].replace(['.', '_'], " ");
    let year = extract_year(&head);

    let mut name = RESOLUTION_TAG.replace(&head, "").into_owned();
    name = BRACKET_TAG.replace_all(&name, "").into_owned();
    name = name.trim().to_string();

    if let Some(ref y) = year {
        if let Some(stripped) = name.strip_suffix(y.as_str()) {
            name = stripped.trim_end().to_string();
        }
    }

    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let name = name.trim().to_string();

    if name.is_empty() {
        return None;
    }

    Some(SeriesInfo {
        name,
        season,
        episode,
        year,
    })
}

/// Media identity inferred from a file path.
///
/// Recomputed every time a file is observed; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFileName {
    /// File name including extension.
    pub raw_name: String,
    /// File stem as shown to the user.
    pub display_title: String,
    /// Cleaned title used for catalog queries and cache keys. Non-empty
    /// whenever the file name is non-empty.
    pub search_title: String,
    /// Inferred release year, if any.
    pub year: Option<String>,
    /// Season number for episodes, `None` for movies.
    pub season: Option<u32>,
    /// Episode number for episodes, `None` for movies.
    pub episode: Option<u32>,
}

impl MediaFileName {
    /// Parse media identity out of a filesystem path.
    pub fn parse(path: &Path) -> Self {
        let raw_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let display_title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let series = extract_series_info(&display_title);
        let mut search_title = match &series {
            Some(info) => info.name.clone(),
            None => extract_movie_title(&display_title),
        };
        // A stem of pure separators cleans to nothing; keep the raw stem so
        // the search title stays non-empty.
        if search_title.is_empty() {
            search_title = display_title.clone();
        }
        let year = extract_year(&display_title);

        Self {
            raw_name,
            display_title,
            search_title,
            year,
            season: series.as_ref().map(|s| s.season),
            episode: series.as_ref().map(|s| s.episode),
        }
    }

    /// Whether this file looks like a series episode.
    pub fn is_episode(&self) -> bool {
        self.season.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_year_bare() {
        assert_eq!(extract_year("Show.Name.2021.1080p"), Some("2021".to_string()));
    }

    #[test]
    fn test_extract_year_absent() {
        assert_eq!(extract_year("NoYearHere"), None);
    }

    #[test]
    fn test_extract_year_bracketed() {
        assert_eq!(extract_year("Movie[1999]"), Some("1999".to_string()));
    }

    #[test]
    fn test_extract_year_parenthesized() {
        assert_eq!(extract_year("Movie(2005)"), Some("2005".to_string()));
    }

    #[test]
    fn test_extract_year_rejects_out_of_range() {
        assert_eq!(extract_year("Future 2077"), None);
        assert_eq!(extract_year("Ancient 1844"), None);
    }

    #[test]
    fn test_extract_year_rejects_longer_digit_runs() {
        // 5+ digit runs are not years
        assert_eq!(extract_year("Track 201979"), None);
    }

    #[test]
    fn test_extract_movie_title_with_year() {
        assert_eq!(extract_movie_title("The.Matrix.1999.1080p"), "The Matrix");
    }

    #[test]
    fn test_extract_movie_title_without_year() {
        assert_eq!(extract_movie_title("Some_Random_Movie"), "Some Random Movie");
    }

    #[test]
    fn test_extract_movie_title_year_first_falls_back() {
        // A leading year would leave an empty prefix; fall back to the
        // whole cleaned name instead.
        assert_eq!(extract_movie_title("2012"), "2012");
    }

    #[test]
    fn test_extract_series_info_basic() {
        let info = extract_series_info("Breaking.Bad.S01E05.1080p.mkv").unwrap();
        assert_eq!(info.name, "Breaking Bad");
        assert_eq!(info.season, 1);
        assert_eq!(info.episode, 5);
        assert_eq!(info.season_label(), "Season 1");
    }

    #[test]
    fn test_extract_series_info_absent_token() {
        assert!(extract_series_info("Random Movie.mkv").is_none());
    }

    #[test]
    fn test_extract_series_info_case_insensitive() {
        let info = extract_series_info("the.office.s03e12.mkv").unwrap();
        assert_eq!(info.name, "the office");
        assert_eq!(info.season, 3);
        assert_eq!(info.episode, 12);
    }

    #[test]
    fn test_extract_series_info_no_zero_padding() {
        let info = extract_series_info("Show.S02E03.mkv").unwrap();
        assert_eq!(info.season_label(), "Season 2");
    }

    #[test]
    fn test_extract_series_info_strips_resolution_and_group() {
        let info = extract_series_info("Show.Name.2019.[GRP].720p.S01E01.mkv").unwrap();
        assert_eq!(info.name, "Show Name");
        assert_eq!(info.year, Some("2019".to_string()));
    }

    #[test]
    fn test_extract_series_info_strips_trailing_year() {
        let info = extract_series_info("True.Detective.2014.S01E01.mkv").unwrap();
        assert_eq!(info.name, "True Detective");
        assert_eq!(info.year, Some("2014".to_string()));
    }

    #[test]
    fn test_extract_series_info_empty_name_is_unclassified() {
        // Only punctuation before the token: treated as a movie.
        assert!(extract_series_info("---S01E01.mkv").is_none());
    }

    #[test]
    fn test_media_file_name_movie() {
        let file = MediaFileName::parse(&PathBuf::from("/videos/The.Matrix.1999.mkv"));
        assert_eq!(file.raw_name, "The.Matrix.1999.mkv");
        assert_eq!(file.display_title, "The.Matrix.1999");
        assert_eq!(file.search_title, "The Matrix");
        assert_eq!(file.year, Some("1999".to_string()));
        assert!(!file.is_episode());
    }

    #[test]
    fn test_media_file_name_episode() {
        let file = MediaFileName::parse(&PathBuf::from("Breaking.Bad.S01E05.1080p.mkv"));
        assert_eq!(file.search_title, "Breaking Bad");
        assert_eq!(file.season, Some(1));
        assert_eq!(file.episode, Some(5));
        assert!(file.is_episode());
    }

    #[test]
    fn test_media_file_name_search_title_never_empty() {
        // Stem ".." cleans to spaces and trims to nothing; the raw stem is
        // kept so the search title stays non-empty.
        let file = MediaFileName::parse(&PathBuf::from("...mkv"));
        assert_eq!(file.search_title, "..");
        let file = MediaFileName::parse(&PathBuf::from("x.mkv"));
        assert_eq!(file.search_title, "x");
    }

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("a.mkv")));
        assert!(is_media_file(Path::new("a.MP4")));
        assert!(is_media_file(Path::new("a.Avi")));
        assert!(is_media_file(Path::new("a.mov")));
        assert!(!is_media_file(Path::new("a.srt")));
        assert!(!is_media_file(Path::new("noext")));
    }
}
