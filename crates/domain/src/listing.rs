use serde::{Deserialize, Serialize};

/// Uniform paged-listing envelope returned by every collection endpoint.
///
/// The service currently always answers with a single page; the envelope
/// exists so clients already speak the paged shape when real windowing
/// arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedListing<T> {
    pub size: usize,
    pub page: usize,
    pub total_size: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

impl<T> PaginatedListing<T> {
    /// Wrap a full collection as page zero of one.
    pub fn single_page(data: Vec<T>) -> Self {
        let size = data.len();
        Self {
            size,
            page: 0,
            total_size: size,
            total_pages: 1,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_collection_as_one_page() {
        let listing = PaginatedListing::single_page(vec!["a", "b", "c"]);
        assert_eq!(listing.size, 3);
        assert_eq!(listing.page, 0);
        assert_eq!(listing.total_size, 3);
        assert_eq!(listing.total_pages, 1);
        assert_eq!(listing.data, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_collection_still_reports_one_page() {
        let listing = PaginatedListing::<String>::single_page(vec![]);
        assert_eq!(listing.size, 0);
        assert_eq!(listing.total_size, 0);
        assert_eq!(listing.total_pages, 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let listing = PaginatedListing::single_page(vec![1, 2]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["totalSize"], 2);
        assert_eq!(json["totalPages"], 1);
    }
}
