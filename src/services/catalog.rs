use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{ApiEntry, CatalogField, FilterConfig, SortConfig, SortDirection};

/// In-memory narrowing and ordering of catalog snapshots
pub struct CatalogService;

impl CatalogService {
    /// Keep entries matching the search term and every non-empty allow-list.
    ///
    /// Relative order is preserved and the input is left untouched.
    pub fn filter(entries: &[ApiEntry], filter: &FilterConfig, search_term: &str) -> Vec<ApiEntry> {
        let needle = search_term.to_lowercase();

        entries
            .iter()
            .filter(|entry| needle.is_empty() || Self::matches_search(entry, &needle))
            .filter(|entry| {
                allows(&filter.status, entry.effective_status().as_str())
                    && allows(&filter.method, entry.field(CatalogField::Method))
                    && allows(&filter.category, entry.field(CatalogField::Category))
                    && allows(&filter.owner, entry.field(CatalogField::Owner))
            })
            .cloned()
            .collect()
    }

    /// Stable single-key sort into a new vector
    pub fn sort(entries: &[ApiEntry], config: &SortConfig) -> Vec<ApiEntry> {
        let mut sorted = entries.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = Self::compare(a, b, config.field);
            match config.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        sorted
    }

    /// Distinct non-empty values of a field, ascending
    pub fn unique_values(entries: &[ApiEntry], field: CatalogField) -> Vec<String> {
        entries
            .iter()
            .map(|entry| entry.field(field))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn toggle_direction(direction: SortDirection) -> SortDirection {
        direction.toggled()
    }

    fn matches_search(entry: &ApiEntry, needle: &str) -> bool {
        [
            CatalogField::Name,
            CatalogField::Endpoint,
            CatalogField::Category,
            CatalogField::Owner,
            CatalogField::Method,
        ]
        .into_iter()
        .any(|field| entry.field(field).to_lowercase().contains(needle))
    }

    fn compare(a: &ApiEntry, b: &ApiEntry, field: CatalogField) -> Ordering {
        match field {
            // Missing or unrecognized status sorts as active
            CatalogField::Status => a
                .effective_status()
                .priority()
                .cmp(&b.effective_status().priority()),
            _ => a
                .field(field)
                .to_lowercase()
                .cmp(&b.field(field).to_lowercase()),
        }
    }
}

fn allows(allow_list: &BTreeSet<String>, value: &str) -> bool {
    allow_list.is_empty() || allow_list.contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiStatus;

    fn entry(name: &str, status: Option<ApiStatus>) -> ApiEntry {
        ApiEntry {
            name: Some(name.to_string()),
            status,
            ..Default::default()
        }
    }

    fn full(name: &str, method: &str, endpoint: &str, category: &str, owner: &str) -> ApiEntry {
        ApiEntry {
            id: None,
            name: Some(name.to_string()),
            method: Some(method.to_string()),
            endpoint: Some(endpoint.to_string()),
            category: Some(category.to_string()),
            owner: Some(owner.to_string()),
            status: None,
        }
    }

    fn names(entries: &[ApiEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.field(CatalogField::Name)).collect()
    }

    fn sample() -> Vec<ApiEntry> {
        vec![
            full("List Users", "GET", "/users", "Identity", "alice"),
            full("create order", "POST", "/orders", "Commerce", "bob"),
            full("Refund", "POST", "/payments/refund", "Payments", "alice"),
            full("health", "GET", "/healthz", "", "ops"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let entries = sample();
        let result = CatalogService::filter(&entries, &FilterConfig::default(), "");
        assert_eq!(result, entries);
    }

    #[test]
    fn test_filter_by_status_uses_effective_status() {
        let entries = vec![
            entry("B", Some(ApiStatus::Deprecated)),
            entry("A", Some(ApiStatus::Active)),
            entry("C", None),
        ];
        let mut filter = FilterConfig::default();
        filter.status.insert("active".to_string());

        let result = CatalogService::filter(&entries, &filter, "");
        assert_eq!(names(&result), vec!["A", "C"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let entries = sample();

        let by_endpoint = CatalogService::filter(&entries, &FilterConfig::default(), "PAYMENTS/");
        assert_eq!(names(&by_endpoint), vec!["Refund"]);

        let by_owner = CatalogService::filter(&entries, &FilterConfig::default(), "Alice");
        assert_eq!(names(&by_owner), vec!["List Users", "Refund"]);

        let by_method = CatalogService::filter(&entries, &FilterConfig::default(), "post");
        assert_eq!(names(&by_method), vec!["create order", "Refund"]);

        let none = CatalogService::filter(&entries, &FilterConfig::default(), "graphql");
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_term_is_matched_verbatim() {
        let entries = vec![entry("List Users", None), entry("playlist", None)];

        let spaced = CatalogService::filter(&entries, &FilterConfig::default(), " ");
        assert_eq!(names(&spaced), vec!["List Users"]);

        let padded = CatalogService::filter(&entries, &FilterConfig::default(), "list ");
        assert_eq!(names(&padded), vec!["List Users"]);

        let bare = CatalogService::filter(&entries, &FilterConfig::default(), "list");
        assert_eq!(names(&bare), vec!["List Users", "playlist"]);
    }

    #[test]
    fn test_allow_lists_combine() {
        let entries = sample();
        let mut filter = FilterConfig::default();
        filter.method.insert("POST".to_string());
        filter.owner.insert("alice".to_string());

        let result = CatalogService::filter(&entries, &filter, "");
        assert_eq!(names(&result), vec!["Refund"]);

        filter.category.insert("Commerce".to_string());
        assert!(CatalogService::filter(&entries, &filter, "").is_empty());
    }

    #[test]
    fn test_filter_does_not_touch_input() {
        let entries = sample();
        let before = entries.clone();
        let _ = CatalogService::filter(&entries, &FilterConfig::default(), "users");
        assert_eq!(entries, before);
    }

    #[test]
    fn test_sort_by_status_ascending() {
        let entries = vec![
            entry("B", Some(ApiStatus::Deprecated)),
            entry("A", Some(ApiStatus::Active)),
        ];
        let config = SortConfig {
            field: CatalogField::Status,
            direction: SortDirection::Asc,
        };

        let sorted = CatalogService::sort(&entries, &config);
        assert_eq!(names(&sorted), vec!["B", "A"]);
    }

    #[test]
    fn test_sort_missing_status_ranks_as_active() {
        let entries = vec![
            entry("none", None),
            entry("dev", Some(ApiStatus::Development)),
            entry("active", Some(ApiStatus::Active)),
        ];
        let config = SortConfig {
            field: CatalogField::Status,
            direction: SortDirection::Desc,
        };

        // "none" and "active" tie at priority 3 and keep input order
        let sorted = CatalogService::sort(&entries, &config);
        assert_eq!(names(&sorted), vec!["none", "active", "dev"]);
    }

    #[test]
    fn test_sort_strings_case_folded() {
        let entries = sample();
        let sorted = CatalogService::sort(&entries, &SortConfig::default());
        assert_eq!(
            names(&sorted),
            vec!["create order", "health", "List Users", "Refund"]
        );
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let entries = vec![
            full("first", "GET", "/a", "x", "o"),
            full("second", "POST", "/b", "x", "o"),
            full("third", "GET", "/c", "x", "o"),
            full("fourth", "delete", "/d", "x", "o"),
        ];

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let config = SortConfig {
                field: CatalogField::Method,
                direction,
            };
            let sorted = CatalogService::sort(&entries, &config);
            let gets: Vec<_> = sorted
                .iter()
                .filter(|e| e.field(CatalogField::Method) == "GET")
                .map(|e| e.field(CatalogField::Name))
                .collect();
            assert_eq!(gets, vec!["first", "third"]);
        }
    }

    #[test]
    fn test_reverse_direction_reverses_distinct_keys() {
        let entries = sample();
        let asc = CatalogService::sort(
            &entries,
            &SortConfig {
                field: CatalogField::Endpoint,
                direction: SortDirection::Asc,
            },
        );
        let desc = CatalogService::sort(
            &asc,
            &SortConfig {
                field: CatalogField::Endpoint,
                direction: SortDirection::Desc,
            },
        );

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn test_unique_values_sorted_and_deduplicated() {
        let entries = sample();
        assert_eq!(
            CatalogService::unique_values(&entries, CatalogField::Owner),
            vec!["alice", "bob", "ops"]
        );
        assert_eq!(
            CatalogService::unique_values(&entries, CatalogField::Category),
            vec!["Commerce", "Identity", "Payments"]
        );
        assert!(CatalogService::unique_values(&entries, CatalogField::Status).is_empty());
    }

    #[test]
    fn test_toggle_direction() {
        assert_eq!(
            CatalogService::toggle_direction(SortDirection::Asc),
            SortDirection::Desc
        );
        assert_eq!(
            CatalogService::toggle_direction(SortDirection::Desc),
            SortDirection::Asc
        );
    }
}
