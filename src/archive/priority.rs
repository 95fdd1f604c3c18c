//! Curated category ordering.

use crate::content::Category;

/// Ordered list of category slugs or titles that should lead the chip row.
///
/// An entry matches a category when it equals the category slug exactly.
/// Failing that, it matches when it equals the trimmed title, ignoring case.
/// Categories no entry matches follow in title order.
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    entries: Vec<String>,
    /// Lowercased entries for title matching.
    folded: Vec<String>,
}

impl PriorityTable {
    pub fn new<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_owned())
            .filter(|entry| !entry.is_empty())
            .collect();
        let folded = entries.iter().map(|entry| entry.to_lowercase()).collect();
        Self { entries, folded }
    }

    /// Position of the entry matching `category`, if any.
    pub fn rank(&self, category: &Category) -> Option<usize> {
        let by_slug = category
            .slug()
            .and_then(|slug| self.entries.iter().position(|entry| entry == slug));

        by_slug.or_else(|| {
            let title = category.display_title()?.to_lowercase();
            self.folded.iter().position(|entry| *entry == title)
        })
    }

    /// Sort matched categories by rank, then everything else by title.
    /// Equal keys keep their input order.
    pub fn sort(&self, categories: &mut [Category]) {
        categories.sort_by_cached_key(|category| {
            let rank = self.rank(category).unwrap_or(usize::MAX);
            (rank, category.display_title().unwrap_or_default().to_owned())
        });
    }
}
