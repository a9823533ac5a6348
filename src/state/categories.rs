/// Category registry: the fixed category list with live counts
use super::data::{CategoryFilter, CategoryId, ComposeEntry};

/// One row of the category sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryFilter,
    pub display_name: &'static str,
    pub count: usize,
}

/// Derive the sidebar categories from a catalog snapshot.
///
/// "All" comes first with the catalog size, then every fixed category in
/// enumeration order with its membership count. Nothing is cached; call
/// this again after every mutation.
pub fn derive_categories<'a>(entries: impl IntoIterator<Item = &'a ComposeEntry>) -> Vec<Category> {
    let mut counts = [0usize; CategoryId::ALL.len()];
    let mut total = 0;

    for entry in entries {
        total += 1;
        if let Some(slot) = CategoryId::ALL.iter().position(|c| *c == entry.category) {
            counts[slot] += 1;
        }
    }

    let all = Category {
        id: CategoryFilter::All,
        display_name: CategoryFilter::All.display_name(),
        count: total,
    };

    std::iter::once(all)
        .chain(CategoryId::ALL.iter().zip(counts).map(|(id, count)| Category {
            id: CategoryFilter::Only(*id),
            display_name: id.display_name(),
            count,
        }))
        .collect()
}

/// Heading shown above the result grid for a category selection
pub fn heading(filter: CategoryFilter) -> &'static str {
    match filter {
        CategoryFilter::All => "All Compose Files",
        CategoryFilter::Only(category) => category.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::entry;
    use crate::state::library::Library;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_sample_counts() {
        let library = Library::with_samples();
        let counts: Vec<(&str, usize)> = derive_categories(library.all())
            .iter()
            .map(|c| (c.id.as_str(), c.count))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("all", 12),
                ("databases", 4),
                ("web-servers", 1),
                ("development", 1),
                ("monitoring", 2),
                ("cicd", 1),
                ("messaging", 2),
                ("storage", 1),
                ("security", 0),
            ]
        );
    }

    #[test]
    fn test_empty_catalog_has_all_rows() {
        let categories = derive_categories(Library::new().all());
        assert_eq!(categories.len(), 9);
        assert!(categories.iter().all(|c| c.count == 0));
        assert_eq!(categories[0].display_name, "All");
        assert_eq!(categories[6].display_name, "Message Queues");
    }

    #[test]
    fn test_counts_follow_mutations() {
        let mut library = Library::with_samples();
        library
            .insert_front(entry("new", "Vault", CategoryId::Security))
            .unwrap();

        let categories = derive_categories(library.all());
        assert_eq!(categories[0].count, 13);
        assert_eq!(categories[8].count, 1);
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading(CategoryFilter::All), "All Compose Files");
        assert_eq!(heading(CategoryFilter::Only(CategoryId::Cicd)), "CI/CD");
    }

    fn any_category() -> impl Strategy<Value = CategoryId> {
        prop::sample::select(CategoryId::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_counts_match_membership(cats in prop::collection::vec(any_category(), 0..40)) {
            let library = Library::from_entries(
                cats.iter().enumerate().map(|(i, c)| entry(&i.to_string(), "Entry", *c)),
            );
            let categories = derive_categories(library.all());

            prop_assert_eq!(categories[0].count, cats.len());
            for row in &categories[1..] {
                let expected = cats.iter().filter(|c| row.id == CategoryFilter::Only(**c)).count();
                prop_assert_eq!(row.count, expected);
            }
        }
    }
}
