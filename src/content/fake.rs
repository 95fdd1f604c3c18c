//! In-memory content store for tests.

use super::query::{CATEGORIES_QUERY, POST_QUERY, POST_SLUGS_QUERY, POSTS_QUERY, QueryParams};
use super::store::{ContentStore, StoreError};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers the four archive queries from canned documents.
#[derive(Debug, Default)]
pub struct FakeStore {
    pub posts: Vec<Value>,
    pub categories: Vec<Value>,
    pub failing: bool,
    calls: AtomicUsize,
}

impl FakeStore {
    pub fn new(posts: Vec<Value>, categories: Vec<Value>) -> Self {
        Self {
            posts,
            categories,
            ..Default::default()
        }
    }

    /// A store whose every request fails like an unreachable host.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// news/guide fixture: post 1 tagged news twice, post 2 guide, post 3 untagged.
    pub fn news_and_guide() -> Self {
        let news = category("c-news", "News", "news");
        let guide = category("c-guide", "Guide", "guide");
        Self::new(
            vec![
                post("p1", "One", "one", Some("2024-03-03T00:00:00Z"), &[news.clone(), news.clone()]),
                post("p2", "Two", "two", Some("2024-03-02T00:00:00Z"), &[guide.clone()]),
                post("p3", "Three", "three", Some("2024-03-01T00:00:00Z"), &[]),
            ],
            vec![news, guide],
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentStore for FakeStore {
    fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(StoreError::Status {
                status: 503,
                message: "service unavailable".into(),
            });
        }

        match query {
            POSTS_QUERY => Ok(Value::Array(self.posts.clone())),
            CATEGORIES_QUERY => Ok(Value::Array(self.categories.clone())),
            POST_QUERY => {
                let slug = params.get("slug").cloned().unwrap_or(Value::Null);
                Ok(self
                    .posts
                    .iter()
                    .find(|post| post.pointer("/slug/current") == Some(&slug))
                    .cloned()
                    .unwrap_or(Value::Null))
            }
            POST_SLUGS_QUERY => Ok(self
                .posts
                .iter()
                .filter(|post| post.pointer("/slug/current").is_some_and(|s| !s.is_null()))
                .map(|post| json!({ "slug": post["slug"] }))
                .collect()),
            _ => Err(StoreError::Status {
                status: 400,
                message: format!("unexpected query: {query}"),
            }),
        }
    }
}

pub fn category(id: &str, title: &str, slug: &str) -> Value {
    json!({ "_id": id, "title": title, "slug": { "_type": "slug", "current": slug } })
}

pub fn post(id: &str, title: &str, slug: &str, published_at: Option<&str>, categories: &[Value]) -> Value {
    json!({
        "_id": id,
        "title": title,
        "slug": { "_type": "slug", "current": slug },
        "excerpt": format!("{title} excerpt"),
        "publishedAt": published_at,
        "categories": categories,
    })
}
