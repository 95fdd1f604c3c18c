//! GROQ queries and their parameters.
//!
//! Projections name exactly the fields the archive needs. Category
//! references are dereferenced inline (`categories[]->`) so posts carry
//! `{ _id, title, slug }` stubs instead of bare references.

use serde_json::Value;
use std::collections::BTreeMap;

/// Every post, newest first, without bodies.
pub const POSTS_QUERY: &str = r#"*[_type == "post"] | order(publishedAt desc) {
  _id,
  title,
  slug,
  excerpt,
  mainImage { asset->{ _id, url }, alt },
  publishedAt,
  categories[]->{ _id, title, slug }
}"#;

/// One post by `$slug`, with body. `[0]` makes a miss come back as `null`.
pub const POST_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  _id,
  title,
  slug,
  excerpt,
  mainImage { asset->{ _id, url }, alt },
  publishedAt,
  body,
  categories[]->{ _id, title, slug }
}"#;

/// Every category, by title.
pub const CATEGORIES_QUERY: &str = r#"*[_type == "category"] | order(title asc) {
  _id,
  title,
  slug,
  description
}"#;

/// Slugs of posts that define one.
pub const POST_SLUGS_QUERY: &str = r#"*[_type == "post" && defined(slug.current)] { slug }"#;

/// Named query parameters (`$name` in GROQ).
///
/// Values are sent JSON-encoded, so a string parameter `slug = hello`
/// travels as `$slug="hello"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, Value>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Query-string pairs, e.g. `("$slug", "\"hello\"")`.
    pub fn encode(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| (format!("${name}"), value.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_encode_strings_as_json() {
        let params = QueryParams::new().with("slug", "hello-bucho");
        assert_eq!(
            params.encode(),
            vec![("$slug".to_string(), "\"hello-bucho\"".to_string())]
        );
    }

    #[test]
    fn test_params_encode_escapes_quotes() {
        let params = QueryParams::new().with("slug", r#"say "hi""#);
        assert_eq!(params.encode()[0].1, r#""say \"hi\"""#);
    }

    #[test]
    fn test_params_encode_non_strings() {
        let params = QueryParams::new()
            .with("limit", 10)
            .with("tags", json!(["a", "b"]));

        // BTreeMap keeps names sorted
        assert_eq!(
            params.encode(),
            vec![
                ("$limit".to_string(), "10".to_string()),
                ("$tags".to_string(), "[\"a\",\"b\"]".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_empty() {
        let params = QueryParams::new();
        assert!(params.encode().is_empty());
        assert!(params.get("slug").is_none());
    }

    #[test]
    fn test_single_post_query_uses_slug_parameter() {
        assert!(POST_QUERY.contains("$slug"));
        assert!(POST_QUERY.contains("[0]"));
        assert!(POST_QUERY.contains("body"));
        assert!(!POSTS_QUERY.contains("body"));
    }

    #[test]
    fn test_list_queries_are_ordered() {
        assert!(POSTS_QUERY.contains("order(publishedAt desc)"));
        assert!(CATEGORIES_QUERY.contains("order(title asc)"));
    }
}
