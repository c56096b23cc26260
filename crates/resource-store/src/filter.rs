//! # Local Filter & Sort
//!
//! List screens derive what they show from the mirrored collection: a free-text search
//! over a few fields, equality filters on categorical fields ("facets"), and a sort.
//! [`ListQuery::apply`] is a pure function of the collection and the query.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::Debug;

/// A comparable value extracted from an entity for sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Missing,
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
            // Mixed kinds only happen with an inconsistent `sort_key`; keep input order.
            _ => Ordering::Equal,
        }
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for SortKey {
    fn from(d: DateTime<Utc>) -> Self {
        SortKey::Date(d)
    }
}

impl<K: Into<SortKey>> From<Option<K>> for SortKey {
    fn from(value: Option<K>) -> Self {
        value.map(Into::into).unwrap_or(SortKey::Missing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Entities that list screens can search, filter and sort.
pub trait Filterable {
    type SortField: Copy + Eq + Debug;
    type Facet: Copy + Eq + Debug;

    /// The fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// The value of a categorical field, compared by equality.
    fn facet_value(&self, facet: Self::Facet) -> String;

    fn sort_key(&self, field: Self::SortField) -> SortKey;
}

/// Search text, facet filters and sort order for one list.
#[derive(Debug, Clone)]
pub struct ListQuery<T: Filterable> {
    pub search: String,
    pub facets: Vec<(T::Facet, String)>,
    pub sort: Option<(T::SortField, Direction)>,
}

impl<T: Filterable> Default for ListQuery<T> {
    fn default() -> Self {
        Self {
            search: String::new(),
            facets: Vec::new(),
            sort: None,
        }
    }
}

impl<T: Filterable + Clone> ListQuery<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Adds or replaces the filter on `facet`.
    pub fn facet(mut self, facet: T::Facet, value: impl Into<String>) -> Self {
        self.set_facet(facet, Some(value.into()));
        self
    }

    pub fn sort_by(mut self, field: T::SortField, direction: Direction) -> Self {
        self.sort = Some((field, direction));
        self
    }

    /// Sets or clears (`None`) the filter on `facet`.
    pub fn set_facet(&mut self, facet: T::Facet, value: Option<String>) {
        self.facets.retain(|(f, _)| *f != facet);
        if let Some(value) = value {
            self.facets.push((facet, value));
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        text_ok
            && self
                .facets
                .iter()
                .all(|(facet, value)| item.facet_value(*facet) == *value)
    }

    /// The filtered, sorted view of `items`. The sort is stable and keeps missing
    /// values last.
    pub fn apply(&self, items: &[T]) -> Vec<T> {
        let mut out: Vec<T> = items.iter().filter(|i| self.matches(i)).cloned().collect();
        if let Some((field, direction)) = self.sort {
            out.sort_by(|a, b| {
                let (ka, kb) = (a.sort_key(field), b.sort_key(field));
                let ord = ka.compare(&kb);
                match (&ka, &kb, direction) {
                    // Missing values stay at the end in both directions.
                    (SortKey::Missing, _, _) | (_, SortKey::Missing, _) => ord,
                    (_, _, Direction::Ascending) => ord,
                    (_, _, Direction::Descending) => ord.reverse(),
                }
            });
        }
        out
    }
}
