use serde::{Deserialize, Serialize};

/// Artwork reference as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub url: String,
}

/// Game record for the fields requested by the details lookup.
///
/// The catalog returns only the requested fields, so everything beyond the
/// id defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub storyline: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub cover: Option<Artwork>,
    #[serde(default)]
    pub artworks: Vec<Artwork>,
}

impl Game {
    /// Full-size cover URL, if the record has a cover.
    pub fn cover_url(&self) -> Option<String> {
        self.cover.as_ref().and_then(|c| normalize_artwork_url(&c.url))
    }

    /// Full-size URLs for all artworks with a usable URL.
    pub fn artwork_urls(&self) -> Vec<String> {
        self.artworks
            .iter()
            .filter_map(|a| normalize_artwork_url(&a.url))
            .collect()
    }
}

/// The catalog hands out protocol-relative thumbnail URLs; make them
/// absolute and swap the size segment for the 1080p rendition.
pub fn normalize_artwork_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let url = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };
    Some(url.replace("t_thumb", "t_1080p"))
}
