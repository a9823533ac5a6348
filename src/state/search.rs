/// Search and category filtering over the catalog
use super::data::{CategoryFilter, ComposeEntry};

/// What the user is currently looking for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub category: CategoryFilter,
}

impl FilterCriteria {
    pub fn new(search_text: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search_text: search_text.into(),
            category,
        }
    }

    /// Whether `entry` passes both the category gate and the text gate
    pub fn matches(&self, entry: &ComposeEntry) -> bool {
        self.category.admits(entry.category) && matches_text(entry, &self.search_text.to_lowercase())
    }
}

/// Case-insensitive substring match against title, description or any tag.
/// `needle` must already be lowercased.
fn matches_text(entry: &ComposeEntry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    entry.title.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
        || entry.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Select the entries matching `criteria`, keeping their original order
pub fn filter<'a>(
    entries: impl IntoIterator<Item = &'a ComposeEntry>,
    criteria: &FilterCriteria,
) -> Vec<&'a ComposeEntry> {
    let needle = criteria.search_text.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| criteria.category.admits(entry.category) && matches_text(entry, &needle))
        .collect()
}

/// The "12 compose files found for "redis"" line under the heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub count: usize,
    pub query: String,
}

impl std::fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "{} compose file{} found", self.count, plural)?;
        if !self.query.is_empty() {
            write!(f, " for \"{}\"", self.query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::entry;
    use crate::state::data::CategoryId;
    use crate::state::library::Library;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn titles(entries: &[&ComposeEntry]) -> Vec<String> {
        entries.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn test_redis_search_finds_single_entry() {
        let library = Library::with_samples();
        let results = filter(library.all(), &FilterCriteria::new("redis", CategoryFilter::All));
        assert_eq!(titles(&results), vec!["Redis Cache"]);
    }

    #[test]
    fn test_databases_category_keeps_order() {
        let library = Library::with_samples();
        let criteria = FilterCriteria::new("", CategoryFilter::Only(CategoryId::Databases));
        let results = filter(library.all(), &criteria);

        assert_eq!(
            titles(&results),
            vec![
                "PostgreSQL with pgAdmin",
                "Redis Cache",
                "MongoDB Replica Set",
                "MySQL with phpMyAdmin",
            ]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_and_checks_tags() {
        let library = Library::with_samples();

        let by_tag = filter(library.all(), &FilterCriteria::new("AMQP", CategoryFilter::All));
        assert_eq!(titles(&by_tag), vec!["RabbitMQ Message Broker"]);

        let by_description = filter(library.all(), &FilterCriteria::new("S3-COMPATIBLE", CategoryFilter::All));
        assert_eq!(titles(&by_description), vec!["MinIO Object Storage"]);
    }

    #[test]
    fn test_both_gates_must_hold() {
        let library = Library::with_samples();
        let criteria = FilterCriteria::new("redis", CategoryFilter::Only(CategoryId::Messaging));
        assert!(filter(library.all(), &criteria).is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_empty_result() {
        let library = Library::new();
        assert!(filter(library.all(), &FilterCriteria::default()).is_empty());
        assert!(filter(library.all(), &FilterCriteria::new("x", CategoryFilter::All)).is_empty());
    }

    #[test]
    fn test_results_summary_wording() {
        let one = ResultsSummary { count: 1, query: String::new() };
        assert_eq!(one.to_string(), "1 compose file found");

        let many = ResultsSummary { count: 0, query: "redis".to_string() };
        assert_eq!(many.to_string(), "0 compose files found for \"redis\"");
    }

    fn arb_entry(index: usize) -> impl Strategy<Value = ComposeEntry> {
        (
            "[a-cA-C ]{0,6}",
            "[a-cA-C ]{0,6}",
            prop::collection::vec("[a-cA-C]{1,3}", 0..3),
            prop::sample::select(CategoryId::ALL.to_vec()),
        )
            .prop_map(move |(title, description, tags, category)| {
                let mut e = entry(&index.to_string(), "x", category);
                e.title = title;
                e.description = description;
                e.tags = tags;
                e
            })
    }

    fn arb_catalog() -> impl Strategy<Value = Vec<ComposeEntry>> {
        (0usize..12).prop_flat_map(|len| (0..len).map(arb_entry).collect::<Vec<_>>())
    }

    fn arb_filter() -> impl Strategy<Value = CategoryFilter> {
        prop_oneof![
            Just(CategoryFilter::All),
            prop::sample::select(CategoryId::ALL.to_vec()).prop_map(CategoryFilter::Only),
        ]
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_subsequence_of_matches(
            catalog in arb_catalog(),
            text in "[a-cA-C]{0,2}",
            category in arb_filter(),
        ) {
            let needle = text.to_lowercase();
            let criteria = FilterCriteria::new(text, category);
            let result = filter(catalog.iter(), &criteria);

            let expected: Vec<&ComposeEntry> = catalog
                .iter()
                .filter(|e| {
                    let category_gate = match category {
                        CategoryFilter::All => true,
                        CategoryFilter::Only(c) => e.category == c,
                    };
                    let text_gate = needle.is_empty()
                        || e.title.to_lowercase().contains(&needle)
                        || e.description.to_lowercase().contains(&needle)
                        || e.tags.iter().any(|t| t.to_lowercase().contains(&needle));
                    category_gate && text_gate
                })
                .collect();
            prop_assert!(expected.iter().all(|e| criteria.matches(e)));
            prop_assert_eq!(&result, &expected);

            // Same inputs, same output
            prop_assert_eq!(filter(catalog.iter(), &criteria), result);
        }
    }
}
