//! Cache key and metadata record types.

use std::borrow::Cow;

/// Normalized (title, year) identifier addressing persisted cache entries.
///
/// The key is the percent-encoded `"{title}"` or `"{title} {year}"` string,
/// so identical pairs always produce the same key and a missing year lives
/// in a distinct key space from any present year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a title and optional 4-digit year.
    pub fn new(title: &str, year: Option<&str>) -> Self {
        let stem = match year {
            Some(y) => Cow::Owned(format!("{title} {y}")),
            None => Cow::Borrowed(title),
        };
        Self(urlencoding::encode(&stem).into_owned())
    }

    /// The encoded key string (also the cache file stem).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Poster image file name for this key.
    pub fn poster_file(&self) -> String {
        format!("{}.jpg", self.0)
    }

    /// Synopsis text file name for this key.
    pub fn synopsis_file(&self) -> String {
        format!("{}.txt", self.0)
    }

    /// Sibling metadata file name for this key.
    pub fn meta_file(&self) -> String {
        format!("{}_meta.txt", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved metadata for one title, as persisted in the cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord {
    /// Average rating, if the catalog reported one.
    pub rating: Option<f32>,
    /// Resolved genre names, in catalog order.
    pub genres: Vec<String>,
    /// Resolved release year, or the originally-known year when the lookup
    /// produced nothing better.
    pub year: Option<String>,
    /// Synopsis text; empty when unavailable.
    pub synopsis: String,
}

impl MetadataRecord {
    /// Record representing "no data", keeping the originally-known year.
    pub fn empty(year: Option<&str>) -> Self {
        Self {
            year: year.map(str::to_string),
            ..Self::default()
        }
    }

    /// Encode the metadata fields (everything but the synopsis) as the
    /// single-line `rating|genre1,genre2,...|year` format. The literal
    /// `None` marks an absent rating; an absent year is an empty field.
    pub fn encode_meta_line(&self) -> String {
        let rating = match self.rating {
            Some(r) => r.to_string(),
            None => "None".to_string(),
        };
        format!(
            "{}|{}|{}",
            rating,
            self.genres.join(","),
            self.year.as_deref().unwrap_or("")
        )
    }

    /// Decode a metadata line together with its synopsis text.
    ///
    /// Returns `None` for malformed lines so callers treat them as a cache
    /// miss and refetch.
    pub fn decode_meta_line(line: &str, synopsis: String) -> Option<Self> {
        let parts: Vec<&str> = line.trim_end().splitn(3, '|').collect();
        if parts.len() != 3 {
            return None;
        }
        let rating = if parts[0] == "None" {
            None
        } else {
            Some(parts[0].parse::<f32>().ok()?)
        };
        let genres = if parts[1].is_empty() {
            Vec::new()
        } else {
            parts[1].split(',').map(str::to_string).collect()
        };
        let year = if parts[2].is_empty() {
            None
        } else {
            Some(parts[2].to_string())
        };
        Some(Self {
            rating,
            genres,
            year,
            synopsis,
        })
    }
}
