//! Archive filter.
//!
//! Turns the posts and categories of one archive render into the category
//! chip row, the per-category post counts and the list of displayed posts
//! for the current selection.
//!
//! Category data is messy upstream: a post may reference the same category
//! twice, references may point at categories without a title or slug, and
//! posts may have no categories at all. None of this is an error. Post
//! category lists are deduplicated by slug before matching or counting,
//! and only categories with both a title and a slug become chips.

mod priority;

pub use priority::PriorityTable;

use crate::content::{ArchiveData, Category, Post};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Selection
// ============================================================================

/// The active filter: every post, or the posts of one category slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Category(String),
}

impl Selection {
    /// Parameter value that selects every post.
    pub const ALL: &'static str = "all";

    /// Parse a `?category=` value. Missing, blank and `all` (any case) mean
    /// [`Selection::All`].
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(Self::ALL) => Self::All,
            Some(slug) => Self::Category(slug.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Category(slug) => slug,
        }
    }
}

// ============================================================================
// Pure helpers
// ============================================================================

/// First entry per slug, in input order. Entries without a slug are dropped.
pub fn dedup_categories<'a, I>(categories: I) -> Vec<&'a Category>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut seen = HashSet::new();
    categories
        .into_iter()
        .filter(|category| category.slug().is_some_and(|slug| seen.insert(slug)))
        .collect()
}

/// Whether the deduplicated category list of `post` carries `slug`.
pub fn has_category(post: &Post, slug: &str) -> bool {
    dedup_categories(&post.categories)
        .into_iter()
        .any(|category| category.slug() == Some(slug))
}

/// Posts shown for `selection`, in input order.
pub fn filter_posts<'a>(posts: &'a [Post], selection: &Selection) -> Vec<&'a Post> {
    match selection {
        Selection::All => posts.iter().collect(),
        Selection::Category(slug) => posts
            .iter()
            .filter(|post| has_category(post, slug))
            .collect(),
    }
}

/// Categories that can be offered as chips, first occurrence per slug.
pub fn selectable_categories(categories: &[Category]) -> Vec<&Category> {
    dedup_categories(categories.iter().filter(|category| category.is_selectable()))
}

/// Number of distinct posts carrying each slug in `slugs`.
///
/// Posts are distinct by id; posts without an id each count once.
pub fn category_counts<'a, I>(posts: &[Post], slugs: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    slugs
        .into_iter()
        .map(|slug| {
            let mut ids = HashSet::new();
            let count = posts
                .iter()
                .filter(|post| has_category(post, slug))
                .filter(|post| post.id.is_empty() || ids.insert(post.id.as_str()))
                .count();
            (slug.to_owned(), count)
        })
        .collect()
}

// ============================================================================
// View model
// ============================================================================

/// One category chip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChip {
    pub slug: String,
    pub title: String,
    pub count: usize,
    pub active: bool,
}

/// Category label shown on a post card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLabel {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A post as listed in the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub summary: String,
    pub published_at: Option<String>,
    pub published_label: Option<String>,
    pub image_url: Option<String>,
    pub categories: Vec<CategoryLabel>,
}

impl PostCard {
    pub fn new(post: &Post, summary_chars: usize) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug().map(str::to_owned),
            summary: post.summary(summary_chars),
            published_at: post.published_at.clone(),
            published_label: post.published_label(),
            image_url: post.image_url().map(str::to_owned),
            categories: dedup_categories(&post.categories)
                .into_iter()
                .filter_map(|category| {
                    Some(CategoryLabel {
                        slug: category.slug()?.to_owned(),
                        title: category.display_title().map(str::to_owned),
                    })
                })
                .collect(),
        }
    }
}

/// Everything the archive page renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveView {
    /// `all` or the selected slug.
    pub selected: String,
    /// Title of the selected category, `None` for all records or an unknown slug.
    pub selected_title: Option<String>,
    pub total_records: usize,
    pub category_count: usize,
    pub chips: Vec<CategoryChip>,
    pub posts: Vec<PostCard>,
    /// No posts match; the page shows a "show all records" control.
    pub empty: bool,
}

// ============================================================================
// Filter
// ============================================================================

/// Archive state for one render: data, chip order, counts and selection.
#[derive(Debug, Clone)]
pub struct ArchiveFilter {
    posts: Vec<Post>,
    /// Selectable categories in chip order.
    categories: Vec<Category>,
    counts: BTreeMap<String, usize>,
    selection: Selection,
}

impl ArchiveFilter {
    pub fn new(data: ArchiveData, priority: &PriorityTable) -> Self {
        let ArchiveData { posts, categories } = data;

        let mut categories: Vec<Category> = selectable_categories(&categories)
            .into_iter()
            .cloned()
            .collect();
        priority.sort(&mut categories);

        let counts = category_counts(&posts, categories.iter().filter_map(Category::slug));

        Self {
            posts,
            categories,
            counts,
            selection: Selection::All,
        }
    }

    pub fn select(&mut self, selection: Selection) {
        match selection {
            Selection::All => self.reset(),
            category => self.selection = category,
        }
    }

    /// Back to all records.
    pub fn reset(&mut self) {
        self.selection = Selection::All;
    }

    #[cfg(test)]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[cfg(test)]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn count(&self, slug: &str) -> usize {
        self.counts.get(slug).copied().unwrap_or(0)
    }

    pub fn displayed(&self) -> Vec<&Post> {
        filter_posts(&self.posts, &self.selection)
    }

    /// Title of the selected chip, if the selection names one.
    pub fn selected_title(&self) -> Option<&str> {
        let Selection::Category(slug) = &self.selection else {
            return None;
        };
        self.categories
            .iter()
            .find(|category| category.slug() == Some(slug.as_str()))
            .and_then(Category::display_title)
    }

    pub fn view(&self, summary_chars: usize) -> ArchiveView {
        let chips = self
            .categories
            .iter()
            .filter_map(|category| {
                let slug = category.slug()?;
                Some(CategoryChip {
                    slug: slug.to_owned(),
                    title: category.display_title()?.to_owned(),
                    count: self.count(slug),
                    active: self.selection.as_str() == slug
                        && matches!(self.selection, Selection::Category(_)),
                })
            })
            .collect();

        let posts: Vec<PostCard> = self
            .displayed()
            .into_iter()
            .map(|post| PostCard::new(post, summary_chars))
            .collect();

        ArchiveView {
            selected: self.selection.as_str().to_owned(),
            selected_title: self.selected_title().map(str::to_owned),
            total_records: self.posts.len(),
            category_count: self.categories.len(),
            chips,
            empty: posts.is_empty(),
            posts,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
