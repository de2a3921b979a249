//! Client-side search and facet filtering over fetched records

/// Records that can be searched by free text and narrowed by exact facets
pub trait Filterable {
    /// Facet selection type; the default value selects everything
    type Facets: Default + Clone + PartialEq + Send;

    /// Text fields the search term is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Whether every active facet equals this record's value
    fn matches_facets(&self, facets: &Self::Facets) -> bool;
}

/// Search term plus facet selection for one list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState<F> {
    pub query: String,
    pub facets: F,
}

impl<F> FilterState<F> {
    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Filterable<Facets = F>,
    {
        matches_query(item, &self.query) && item.matches_facets(&self.facets)
    }
}

/// Case-insensitive substring match across the record's search fields.
/// An empty query matches every record.
pub fn matches_query<T: Filterable>(item: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Positions of the matching records, in mirror order
pub fn filter_indices<T: Filterable>(items: &[T], state: &FilterState<T::Facets>) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| state.matches(*item))
        .map(|(i, _)| i)
        .collect()
}
