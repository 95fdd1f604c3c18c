//! `[archive]` section configuration.
//!
//! Controls how the article archive presents its category chips.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[archive]` section in archive.toml.
///
/// # Example
/// ```toml
/// [archive]
/// # category slugs or exact titles, highest priority first
/// priority = ["product", "活動報告"]
/// summary_chars = 80
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Curated category order. Each entry matches a category by exact slug,
    /// or by exact title (case-insensitive) when no slug matches.
    #[serde(default = "defaults::archive::priority")]
    #[educe(Default = defaults::archive::priority())]
    pub priority: Vec<String>,

    /// Maximum length of the body-derived summary used when a post has no excerpt.
    #[serde(default = "defaults::archive::summary_chars")]
    #[educe(Default = defaults::archive::summary_chars())]
    pub summary_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_archive_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.archive.priority.len(), 7);
        assert_eq!(config.archive.priority[0], "プロダクト紹介");
        assert_eq!(config.archive.priority[6], "ブログ/PV分析");
        assert_eq!(config.archive.summary_chars, 120);
    }

    #[test]
    fn test_archive_config_override() {
        let config = r#"
            [archive]
            priority = ["news", "guide"]
            summary_chars = 40
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.archive.priority, vec!["news", "guide"]);
        assert_eq!(config.archive.summary_chars, 40);
    }

    #[test]
    fn test_archive_config_empty_priority() {
        let config = r#"
            [archive]
            priority = []
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(config.archive.priority.is_empty());
    }

    #[test]
    fn test_archive_unknown_field_rejection() {
        let config = r#"
            [archive]
            order = ["news"]
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
    }
}
