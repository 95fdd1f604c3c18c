//! Content query layer.
//!
//! Reads posts and categories from the remote content store. Every read is
//! fail-open: a network error, a non-success status or an undecodable body
//! is logged under `[store]` and turned into an empty list (or `None` for a
//! single post), so the archive page always renders.
//!
//! Orderings are re-applied locally with stable sorts:
//!
//! | Operation          | Order                                  |
//! |--------------------|----------------------------------------|
//! | `list_posts`       | `publishedAt` descending, undated last |
//! | `list_categories`  | title ascending, untitled last         |

mod body;
mod query;
mod store;
mod types;

#[cfg(test)]
pub mod fake;

pub use query::QueryParams;
pub use store::{ContentStore, HttpStore, StoreError};
pub use types::{Category, Post, Slug};

use crate::log;
use query::{CATEGORIES_QUERY, POST_QUERY, POST_SLUGS_QUERY, POSTS_QUERY};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::{cmp::Reverse, collections::HashSet};

/// Posts and categories fetched together for one archive render.
#[derive(Debug, Clone, Default)]
pub struct ArchiveData {
    pub posts: Vec<Post>,
    pub categories: Vec<Category>,
}

/// Entry of the slug listing query.
#[derive(Debug, Deserialize)]
struct SlugEntry {
    #[serde(default)]
    slug: Option<Slug>,
}

/// Read-only view of the content store.
#[derive(Debug)]
pub struct ContentQuery<S> {
    store: S,
}

impl<S: ContentStore> ContentQuery<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All posts, newest first, with category stubs. Empty on failure.
    pub fn list_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.fetch_list("posts", POSTS_QUERY);
        posts.sort_by_cached_key(|post| Reverse(post.published_at()));
        posts
    }

    /// All categories by title. Empty on failure.
    pub fn list_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.fetch_list("categories", CATEGORIES_QUERY);
        categories.sort_by(|a, b| {
            let (a, b) = (a.display_title(), b.display_title());
            (a.is_none(), a).cmp(&(b.is_none(), b))
        });
        categories
    }

    /// The post with this slug, or `None` when it does not exist or the
    /// store cannot be reached.
    pub fn get_post(&self, slug: &str) -> Option<Post> {
        let slug = slug.trim();
        if slug.is_empty() {
            return None;
        }

        let params = QueryParams::new().with("slug", slug);
        let value = match self.store.fetch(POST_QUERY, &params) {
            Ok(value) => value,
            Err(err) => {
                log!("store"; "post `{slug}`: {err}");
                return None;
            }
        };

        if value.is_null() {
            return None;
        }

        match serde_json::from_value(value) {
            Ok(post) => Some(post),
            Err(err) => {
                log!("store"; "post `{slug}`: {}", StoreError::from(err));
                None
            }
        }
    }

    /// Slug of every post that defines one, in store order, without repeats.
    pub fn list_post_slugs(&self) -> Vec<String> {
        let entries: Vec<SlugEntry> = self.fetch_list("slugs", POST_SLUGS_QUERY);
        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter_map(|entry| entry.slug?.value().map(str::to_owned))
            .filter(|slug| seen.insert(slug.clone()))
            .collect()
    }

    /// Posts and categories for the archive, fetched concurrently.
    pub fn load_archive(&self) -> ArchiveData {
        let (posts, categories) = rayon::join(|| self.list_posts(), || self.list_categories());
        ArchiveData { posts, categories }
    }

    /// Run a list query. Entries that fail to decode are skipped; a failed
    /// request or a non-array result yields an empty list.
    fn fetch_list<T: DeserializeOwned>(&self, what: &str, query: &str) -> Vec<T> {
        let value = match self.store.fetch(query, &QueryParams::new()) {
            Ok(value) => value,
            Err(err) => {
                log!("store"; "{what}: {err}");
                return Vec::new();
            }
        };

        let entries = match value {
            Value::Array(entries) => entries,
            Value::Null => return Vec::new(),
            other => {
                log!("store"; "{what}: expected a list, got {}", kind_of(&other));
                return Vec::new();
            }
        };

        let total = entries.len();
        let decoded: Vec<T> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();

        if decoded.len() < total {
            log!("store"; "{what}: skipped {} malformed entries", total - decoded.len());
        }
        decoded
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeStore, category, post};
    use super::*;
    use serde_json::json;

    fn query(store: FakeStore) -> ContentQuery<FakeStore> {
        ContentQuery::new(store)
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|post| post.id.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // listPosts
    // ------------------------------------------------------------------------

    #[test]
    fn test_list_posts_newest_first() {
        let store = FakeStore::new(
            vec![
                post("old", "Old", "old", Some("2023-01-01T00:00:00Z"), &[]),
                post("undated", "Undated", "undated", None, &[]),
                post("new", "New", "new", Some("2024-06-01T09:00:00+09:00"), &[]),
            ],
            vec![],
        );

        let posts = query(store).list_posts();
        assert_eq!(ids(&posts), vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_list_posts_stable_for_equal_dates() {
        let same = Some("2024-01-01T00:00:00Z");
        let store = FakeStore::new(
            vec![
                post("a", "A", "a", same, &[]),
                post("b", "B", "b", same, &[]),
                post("c", "C", "c", same, &[]),
            ],
            vec![],
        );

        assert_eq!(ids(&query(store).list_posts()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_posts_resolves_category_stubs() {
        let posts = query(FakeStore::news_and_guide()).list_posts();

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].categories.len(), 2);
        assert_eq!(posts[0].categories[0].slug(), Some("news"));
        assert!(posts[2].categories.is_empty());
    }

    #[test]
    fn test_list_posts_fail_open() {
        let store = FakeStore::failing();
        let query = query(store);

        assert!(query.list_posts().is_empty());
        assert_eq!(query.store().calls(), 1);
    }

    #[test]
    fn test_list_posts_skips_malformed_entries() {
        let store = FakeStore::new(
            vec![
                post("ok", "Ok", "ok", None, &[]),
                json!("not a post"),
                json!({ "_id": "bad", "categories": "oops" }),
            ],
            vec![],
        );

        assert_eq!(ids(&query(store).list_posts()), vec!["ok"]);
    }

    #[test]
    fn test_list_posts_keeps_post_with_malformed_category() {
        let store = FakeStore::new(
            vec![json!({
                "_id": "p",
                "slug": { "current": "p" },
                "categories": [
                    { "_id": "c0", "title": 42, "slug": { "current": "news" } },
                    { "_id": "c1", "title": "Guide", "slug": { "current": "guide" } }
                ]
            })],
            vec![],
        );

        let posts = query(store).list_posts();
        assert_eq!(ids(&posts), vec!["p"]);
        assert_eq!(posts[0].categories.len(), 1);
        assert_eq!(posts[0].categories[0].slug(), Some("guide"));
    }

    #[test]
    fn test_list_posts_drops_dangling_references() {
        let store = FakeStore::new(
            vec![json!({
                "_id": "p",
                "slug": { "current": "p" },
                "categories": [null, { "_id": "c", "title": "News", "slug": { "current": "news" } }]
            })],
            vec![],
        );

        let posts = query(store).list_posts();
        assert_eq!(posts[0].categories.len(), 1);
    }

    // ------------------------------------------------------------------------
    // listCategories
    // ------------------------------------------------------------------------

    #[test]
    fn test_list_categories_by_title() {
        let store = FakeStore::new(
            vec![],
            vec![
                category("3", "NFT NEWS", "nft-news"),
                json!({ "_id": "4", "title": null, "slug": { "current": "untitled" } }),
                category("1", "MINT部屋", "mint"),
                category("2", "ChatGPTの使用例", "chatgpt"),
            ],
        );

        let categories = query(store).list_categories();
        let titles: Vec<_> = categories.iter().map(Category::display_title).collect();
        assert_eq!(
            titles,
            vec![Some("ChatGPTの使用例"), Some("MINT部屋"), Some("NFT NEWS"), None]
        );
    }

    #[test]
    fn test_list_categories_fail_open() {
        assert!(query(FakeStore::failing()).list_categories().is_empty());
    }

    // ------------------------------------------------------------------------
    // getPost
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_post_found() {
        let post = query(FakeStore::news_and_guide()).get_post("two").unwrap();
        assert_eq!(post.id, "p2");
        assert_eq!(post.title, "Two");
    }

    #[test]
    fn test_get_post_missing_slug_is_not_found() {
        let query = query(FakeStore::news_and_guide());
        assert!(query.get_post("missing-slug").is_none());
        assert_eq!(query.store().calls(), 1);
    }

    #[test]
    fn test_get_post_blank_slug_skips_fetch() {
        let query = query(FakeStore::news_and_guide());
        assert!(query.get_post("   ").is_none());
        assert_eq!(query.store().calls(), 0);
    }

    #[test]
    fn test_get_post_fail_open() {
        assert!(query(FakeStore::failing()).get_post("one").is_none());
    }

    #[test]
    fn test_get_post_trims_slug() {
        let post = query(FakeStore::news_and_guide()).get_post(" one ").unwrap();
        assert_eq!(post.id, "p1");
    }

    // ------------------------------------------------------------------------
    // listPostSlugs / loadArchive
    // ------------------------------------------------------------------------

    #[test]
    fn test_list_post_slugs() {
        let mut store = FakeStore::news_and_guide();
        store.posts.push(json!({ "_id": "p4", "slug": { "current": "-" } }));
        store.posts.push(json!({ "_id": "p5", "slug": { "current": "one" } }));
        store.posts.push(json!({ "_id": "p6", "slug": null }));

        let slugs = query(store).list_post_slugs();
        assert_eq!(slugs, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_list_post_slugs_fail_open() {
        assert!(query(FakeStore::failing()).list_post_slugs().is_empty());
    }

    #[test]
    fn test_load_archive_joins_both_lists() {
        let query = query(FakeStore::news_and_guide());
        let data = query.load_archive();

        assert_eq!(data.posts.len(), 3);
        assert_eq!(data.categories.len(), 2);
        assert_eq!(query.store().calls(), 2);
    }

    #[test]
    fn test_load_archive_fail_open() {
        let data = query(FakeStore::failing()).load_archive();
        assert!(data.posts.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&json!({})), "an object");
        assert_eq!(kind_of(&json!(1)), "a number");
    }
}
