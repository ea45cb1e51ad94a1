//! Catalog domain types shared by backends and the client.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// What kind of media a lookup is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Series,
}

/// One search result returned by a catalog backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Candidate title or series name.
    pub name: String,
    /// 4-digit release year, if the backend reported a date.
    pub year: Option<String>,
    /// Synopsis text.
    pub overview: Option<String>,
    /// Backend-relative poster image path.
    pub poster_path: Option<String>,
    /// Average rating.
    pub rating: Option<f32>,
    /// Raw genre identifiers as reported by the backend.
    pub genre_ids: Vec<u32>,
}

impl Candidate {
    /// Resolve genre ids through the static table, dropping unknown ids.
    pub fn genre_names(&self) -> Vec<String> {
        self.genre_ids
            .iter()
            .filter_map(|id| genre_name(*id))
            .map(str::to_string)
            .collect()
    }
}

// TMDB genre ids, movies and TV combined.
static GENRE_NAMES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (99, "Documentary"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
        (10402, "Music"),
        (9648, "Mystery"),
        (10749, "Romance"),
        (878, "Sci-Fi"),
        (10770, "TV Movie"),
        (53, "Thriller"),
        (10752, "War"),
        (37, "Western"),
        (10759, "Action & Adventure"),
        (10762, "Kids"),
        (10763, "News"),
        (10764, "Reality"),
        (10765, "Sci-Fi & Fantasy"),
        (10766, "Soap"),
        (10767, "Talk"),
        (10768, "War & Politics"),
    ])
});

/// Look up a genre name by backend id.
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRE_NAMES.get(&id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_name_known() {
        assert_eq!(genre_name(878), Some("Sci-Fi"));
        assert_eq!(genre_name(10765), Some("Sci-Fi & Fantasy"));
    }

    #[test]
    fn test_genre_name_unknown() {
        assert_eq!(genre_name(424242), None);
    }

    #[test]
    fn test_candidate_genre_names_drops_unknown_ids() {
        let candidate = Candidate {
            name: "Up".to_string(),
            year: Some("2009".to_string()),
            overview: None,
            poster_path: None,
            rating: None,
            genre_ids: vec![16, 424242, 35],
        };
        assert_eq!(candidate.genre_names(), vec!["Animation", "Comedy"]);
    }
}
