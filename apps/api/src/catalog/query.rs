use std::collections::BTreeSet;

use serde::{Deserialize, Serialize, Serializer};

/// Boolean filters the user can stack. Active filters combine with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogFilter {
    Favorite,
    Custom,
    Generate,
    Edit,
}

impl CatalogFilter {
    /// `generate` and `edit` are offered as a radio pair.
    fn exclusive_partner(self) -> Option<CatalogFilter> {
        match self {
            CatalogFilter::Generate => Some(CatalogFilter::Edit),
            CatalogFilter::Edit => Some(CatalogFilter::Generate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Recommend,
    Random,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Recommend => SortMode::Random,
            SortMode::Random => SortMode::Recommend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Named(String),
}

impl CategorySelection {
    pub const ALL_LABEL: &'static str = "all";

    /// `"all"` (any case) or a blank label selects everything.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(Self::ALL_LABEL) {
            CategorySelection::All
        } else {
            CategorySelection::Named(label.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Named(name) => name == category,
        }
    }
}

impl Serialize for CategorySelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategorySelection::All => serializer.serialize_str(Self::ALL_LABEL),
            CategorySelection::Named(name) => serializer.serialize_str(name),
        }
    }
}

/// Immutable description of what the user asked to see. Every change
/// produces a new value; `recompute` is a pure function of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CatalogQuery {
    pub keyword: String,
    pub category: CategorySelection,
    pub filters: BTreeSet<CatalogFilter>,
    pub sort: SortMode,
}

impl CatalogQuery {
    pub fn with_keyword(self, keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..self
        }
    }

    pub fn with_category(self, category: CategorySelection) -> Self {
        Self { category, ..self }
    }

    pub fn with_sort(self, sort: SortMode) -> Self {
        Self { sort, ..self }
    }

    /// Turns `filter` off if active, otherwise on. Enabling one mode filter
    /// switches its partner off.
    pub fn with_filter_toggled(self, filter: CatalogFilter) -> Self {
        let mut filters = self.filters.clone();
        if !filters.remove(&filter) {
            if let Some(partner) = filter.exclusive_partner() {
                filters.remove(&partner);
            }
            filters.insert(filter);
        }
        Self { filters, ..self }
    }

    /// Lowercased keyword. Surrounding spaces are significant.
    pub fn normalized_keyword(&self) -> String {
        self.keyword.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_filter_on_and_off() {
        let q = CatalogQuery::default().with_filter_toggled(CatalogFilter::Favorite);
        assert!(q.filters.contains(&CatalogFilter::Favorite));
        let q = q.with_filter_toggled(CatalogFilter::Favorite);
        assert!(q.filters.is_empty());
    }

    #[test]
    fn test_generate_and_edit_are_exclusive() {
        let q = CatalogQuery::default()
            .with_filter_toggled(CatalogFilter::Custom)
            .with_filter_toggled(CatalogFilter::Generate)
            .with_filter_toggled(CatalogFilter::Edit);
        assert_eq!(
            q.filters.iter().copied().collect::<Vec<_>>(),
            vec![CatalogFilter::Custom, CatalogFilter::Edit]
        );
    }

    #[test]
    fn test_category_label_parsing() {
        assert_eq!(CategorySelection::from_label("ALL"), CategorySelection::All);
        assert_eq!(CategorySelection::from_label("  "), CategorySelection::All);
        assert_eq!(
            CategorySelection::from_label("Portrait"),
            CategorySelection::Named("Portrait".into())
        );
        assert!(CategorySelection::Named("Portrait".into()).matches("Portrait"));
        assert!(!CategorySelection::Named("Portrait".into()).matches("portrait"));
    }

    #[test]
    fn test_query_serializes_category_label() {
        let json = serde_json::to_value(CatalogQuery::default()).unwrap();
        assert_eq!(json["category"], "all");
        assert_eq!(json["sort"], "recommend");
    }

    #[test]
    fn test_sort_toggle() {
        assert_eq!(SortMode::Recommend.toggled(), SortMode::Random);
        assert_eq!(SortMode::Random.toggled(), SortMode::Recommend);
    }
}
