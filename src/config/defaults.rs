//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [store] Section Defaults
// ============================================================================

pub mod store {
    pub fn dataset() -> String {
        "production".into()
    }

    pub fn api_version() -> String {
        "2023-05-03".into()
    }

    pub fn token_env() -> String {
        "SANITY_API_TOKEN".into()
    }

    pub fn timeout_secs() -> u64 {
        10
    }
}

// ============================================================================
// [archive] Section Defaults
// ============================================================================

pub mod archive {
    /// Curated chip order used by the site's category navigation.
    pub fn priority() -> Vec<String> {
        [
            "プロダクト紹介",
            "ChatGPTの使用例",
            "活動報告",
            "MINT部屋",
            "NFTを深く知る",
            "NFT NEWS",
            "ブログ/PV分析",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn summary_chars() -> usize {
        120
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}
