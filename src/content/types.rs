//! Post and category records as returned by the content store.
//!
//! Field names follow the store's JSON (`_id`, `publishedAt`, `mainImage`,
//! `slug.current`), so records can be passed through to clients unchanged.
//!
//! The store is lenient: projected fields that a document lacks come back as
//! `null`, and dereferencing a deleted category yields a `null` entry inside
//! `categories[]`. Every field here tolerates both.

use super::body::{Block, plain_text};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Offset used for date labels (the site is published in JST).
const LABEL_OFFSET_SECS: i32 = 9 * 3600;

/// Slug values the upstream tooling writes for "no slug".
const PLACEHOLDER_SLUGS: &[&str] = &["", "-"];

// ============================================================================
// Serde Helpers
// ============================================================================

/// Deserialize `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a possibly-null list, dropping entries that are `null` or
/// do not decode as `T`.
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

// ============================================================================
// Slug
// ============================================================================

/// Slug object (`{ "current": "..." }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
}

impl Slug {
    #[cfg(test)]
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }

    /// The slug value, or `None` for empty and placeholder slugs.
    pub fn value(&self) -> Option<&str> {
        let current = self.current.trim();
        (!PLACEHOLDER_SLUGS.contains(&current)).then_some(current)
    }
}

// ============================================================================
// Category
// ============================================================================

/// A category document, or the `{ _id, title, slug }` stub resolved on a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub slug: Option<Slug>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Slug used for matching, `None` when missing or blank.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_ref().and_then(Slug::value)
    }

    /// Trimmed title, `None` when missing or whitespace-only.
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Whether the category can be offered as a filter chip.
    pub fn is_selectable(&self) -> bool {
        self.display_title().is_some() && self.slug().is_some()
    }
}

// ============================================================================
// Post
// ============================================================================

/// Resolved image asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Main image reference of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainImage {
    #[serde(default)]
    pub asset: Option<ImageAsset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MainImage {
    pub fn url(&self) -> Option<&str> {
        self.asset.as_ref().and_then(|asset| asset.url.as_deref())
    }
}

/// A published article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub slug: Option<Slug>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<MainImage>,

    /// RFC 3339 timestamp, kept verbatim.
    #[serde(default)]
    pub published_at: Option<String>,

    /// Rich-text body; only the single-post query projects it.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Block>,

    /// Category stubs, in the order stored on the document (may repeat).
    #[serde(default, deserialize_with = "nullable_list")]
    pub categories: Vec<Category>,
}

impl Post {
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_ref().and_then(Slug::value)
    }

    /// Parsed publication time. Accepts full RFC 3339 or a bare `YYYY-MM-DD`.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.published_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        })
    }

    /// Publication date as `YYYY.MM.DD` in JST.
    pub fn published_label(&self) -> Option<String> {
        let offset = FixedOffset::east_opt(LABEL_OFFSET_SECS)?;
        let published = self.published_at()?.with_timezone(&offset);
        Some(published.format("%Y.%m.%d").to_string())
    }

    /// The excerpt, or the body text cut to `max_chars` characters when the
    /// excerpt is blank.
    pub fn summary(&self, max_chars: usize) -> String {
        let excerpt = self.excerpt.trim();
        if !excerpt.is_empty() {
            return excerpt.to_owned();
        }

        let text = plain_text(&self.body);
        let text = text.trim();
        match text.char_indices().nth(max_chars) {
            Some((end, _)) => format!("{}…", text[..end].trim_end()),
            None => text.to_owned(),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        self.main_image.as_ref().and_then(MainImage::url)
    }
}

// ============================================================================
// Tests
// ============================================================================
