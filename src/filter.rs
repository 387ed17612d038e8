//! Free-text search and categorical filters over record collections.

use crate::models::{Lookup, Record};

/// Search state for one page.
///
/// A record matches when the lower-cased query is a substring of at least one
/// of its searchable fields and every non-empty categorical filter equals the
/// record's field text exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    pub filters: Vec<(&'static str, String)>,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: Vec::new(),
        }
    }

    /// Builder form of [`SearchFilter::set`].
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the filter for a field key. An empty value clears it.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.filters.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.filters.push((key, value)),
        }
    }

    /// Current value of a categorical filter, empty if unset.
    pub fn value(&self, key: &str) -> &str {
        self.filters
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.filters.clear();
    }

    /// Whether anything would be filtered out.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.filters.iter().any(|(_, v)| !v.is_empty())
    }

    pub fn matches<T: Record>(&self, record: &T, lookup: &dyn Lookup) -> bool {
        let needle = self.query.to_lowercase();
        let query_ok = needle.is_empty()
            || T::SEARCH_FIELDS
                .iter()
                .any(|key| record.field(key, lookup).contains_lowercase(&needle));

        query_ok
            && self
                .filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .all(|(key, value)| record.field(key, lookup).to_string() == *value)
    }
}

/// Records matching `filter`, in input order.
pub fn apply<'a, T: Record>(records: &'a [T], filter: &SearchFilter, lookup: &dyn Lookup) -> Vec<&'a T> {
    if !filter.is_active() {
        return records.iter().collect();
    }
    records.iter().filter(|r| filter.matches(*r, lookup)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, CommentStatus, NoLookup, RecordId, User, UserStatus};
    use crate::seed;
    use crate::store::Store;
    use quickcheck_macros::quickcheck;

    fn ids<T: Record>(records: &[&T]) -> Vec<u64> {
        records.iter().map(|r| r.id().0).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let users = seed::users();
        let result = apply(&users, &SearchFilter::default(), &NoLookup);
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let users = seed::users();
        let result = apply(&users, &SearchFilter::new("GARC"), &NoLookup);
        assert_eq!(ids(&result), vec![2]);

        let result = apply(&users, &SearchFilter::new("ejemplo.com"), &NoLookup);
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_categorical_filter_is_exact() {
        let users = seed::users();
        let filter = SearchFilter::default().with("status", "Active");
        assert_eq!(ids(&apply(&users, &filter, &NoLookup)), vec![1, 2]);

        let filter = SearchFilter::default().with("status", "Activ");
        assert!(apply(&users, &filter, &NoLookup).is_empty());
    }

    #[test]
    fn test_query_and_filters_combine() {
        let users = seed::users();
        let filter = SearchFilter::new("carlos").with("status", "Active");
        assert!(apply(&users, &filter, &NoLookup).is_empty());

        let filter = SearchFilter::new("carlos").with("status", "Inactive").with("role", "");
        assert_eq!(ids(&apply(&users, &filter, &NoLookup)), vec![3]);
    }

    #[test]
    fn test_status_scenario() {
        let mut comments = seed::comments();
        comments.truncate(2);
        comments[0].status = CommentStatus::Pending;
        comments[1].status = CommentStatus::Approved;

        let filter = SearchFilter::default().with("status", "Approved");
        assert_eq!(ids(&apply(&comments, &filter, &NoLookup)), vec![2]);
    }

    #[test]
    fn test_joined_fields_are_searchable() {
        let store = Store::seeded();
        let result = apply(&store.comments, &SearchFilter::new("john"), &store);
        assert_eq!(ids::<Comment>(&result), vec![2]);

        let result = apply(&store.packages, &SearchFilter::new("machu"), &store);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Aventura Inca");
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let mut filter = SearchFilter::default();
        filter.set("status", "Active");
        filter.set("status", "Inactive");
        assert_eq!(filter.filters.len(), 1);
        assert_eq!(filter.value("status"), "Inactive");
        assert_eq!(filter.value("role"), "");
    }

    fn users_from(rows: &[(String, bool)]) -> Vec<User> {
        rows.iter()
            .zip(1..)
            .map(|((name, active), id)| User {
                id: RecordId(id),
                name: name.clone(),
                email: format!("{id}@example.com"),
                role: "User".to_string(),
                status: if *active { UserStatus::Active } else { UserStatus::Inactive },
                created_at: chrono::NaiveDate::default(),
            })
            .collect()
    }

    #[quickcheck]
    fn prop_filter_is_idempotent(rows: Vec<(String, bool)>, query: String, active_only: bool) -> bool {
        let users = users_from(&rows);
        let mut filter = SearchFilter::new(query);
        if active_only {
            filter.set("status", "Active");
        }
        let once: Vec<User> = apply(&users, &filter, &NoLookup).into_iter().cloned().collect();
        let twice = apply(&once, &filter, &NoLookup);
        ids(&twice) == once.iter().map(|u| u.id.0).collect::<Vec<_>>()
    }

    #[quickcheck]
    fn prop_empty_filter_is_identity(rows: Vec<(String, bool)>) -> bool {
        let users = users_from(&rows);
        let result = apply(&users, &SearchFilter::default(), &NoLookup);
        result.len() == users.len() && result.iter().zip(&users).all(|(a, b)| a.id == b.id)
    }
}
