//! Catalog of transaction category tags known to the dashboard.
//!
//! Categories are open-ended strings; this catalog only decides how a tag is labelled and which
//! glyph represents it. Unknown tags fall back to [`DEFAULT_CATEGORY`].

/// Presentation metadata for a category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub tag: &'static str,
    pub label: &'static str,
    pub glyph: &'static str,
}

pub const DEFAULT_CATEGORY: CategoryInfo = CategoryInfo {
    tag: "other",
    label: "Other",
    glyph: "💳",
};

pub const KNOWN_CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        tag: "shopping",
        label: "Shopping",
        glyph: "🛍",
    },
    CategoryInfo {
        tag: "food",
        label: "Food & Drinks",
        glyph: "☕",
    },
    CategoryInfo {
        tag: "bills",
        label: "Housing & Bills",
        glyph: "🏠",
    },
    CategoryInfo {
        tag: "transport",
        label: "Transport",
        glyph: "🚗",
    },
    CategoryInfo {
        tag: "entertainment",
        label: "Entertainment",
        glyph: "🎁",
    },
    CategoryInfo {
        tag: "investment",
        label: "Investment",
        glyph: "📈",
    },
    CategoryInfo {
        tag: "crypto",
        label: "Crypto",
        glyph: "₿",
    },
    CategoryInfo {
        tag: "salary",
        label: "Salary",
        glyph: "💼",
    },
];

/// Resolves display metadata for `tag`, matching case-insensitively.
pub fn lookup(tag: &str) -> CategoryInfo {
    let needle = tag.trim();
    KNOWN_CATEGORIES
        .iter()
        .find(|info| info.tag.eq_ignore_ascii_case(needle))
        .copied()
        .unwrap_or(DEFAULT_CATEGORY)
}

pub fn is_known(tag: &str) -> bool {
    lookup(tag) != DEFAULT_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_regardless_of_case() {
        assert_eq!(lookup("Food").label, "Food & Drinks");
        assert_eq!(lookup(" salary ").glyph, "💼");
        assert!(is_known("crypto"));
    }

    #[test]
    fn unknown_tags_use_default_glyph() {
        let info = lookup("pets");
        assert_eq!(info, DEFAULT_CATEGORY);
        assert!(!is_known("pets"));
    }
}
