//! Query-string binding for the search endpoint
//!
//! Binding is deliberately forgiving: every parameter arrives as an optional
//! string, and numbers that are missing, blank or unparsable fall back to
//! their defaults instead of rejecting the request.

use serde::Deserialize;

use crate::models::SearchQuery;

const DEFAULT_PAGE: u32 = 1;

/// Raw search parameters as they appear in the query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub search_name: Option<String>,
    #[serde(default)]
    pub selected_type: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

/// Parse a positive integer leniently: negatives and zero become 1,
/// oversized values saturate, anything else yields `None`
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let value: i64 = raw?.trim().parse().ok()?;
    Some(value.clamp(1, i64::from(u32::MAX)) as u32)
}

impl SearchParams {
    /// Normalize into a [`SearchQuery`] using `default_page_size` when the
    /// request does not carry a usable page size. Page sizes above
    /// `max_page_size` are clamped.
    pub fn into_query(self, default_page_size: u32, max_page_size: u32) -> SearchQuery {
        let page = parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(self.page_size.as_deref())
            .unwrap_or(default_page_size)
            .min(max_page_size.max(1));

        SearchQuery::new(self.search_name, self.selected_type, page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(page: Option<&str>, page_size: Option<&str>) -> SearchParams {
        SearchParams {
            page: page.map(String::from),
            page_size: page_size.map(String::from),
            ..SearchParams::default()
        }
    }

    #[rstest]
    #[case::missing(None, None, 1, 20)]
    #[case::garbage(Some("abc"), Some(""), 1, 20)]
    #[case::non_positive(Some("-4"), Some("0"), 1, 1)]
    #[case::padded(Some(" 3 "), Some(" 7"), 3, 7)]
    #[case::oversized(Some("2"), Some("99999999999"), 2, 200)]
    #[case::above_max(Some("4294967295"), Some("201"), u32::MAX, 200)]
    #[case::fractional(Some("2.5"), Some("10"), 1, 10)]
    fn test_lenient_number_binding(
        #[case] page: Option<&str>,
        #[case] page_size: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let query = params(page, page_size).into_query(20, 200);
        assert_eq!(query.page, expected_page);
        assert_eq!(query.page_size, expected_size);
    }

    #[test]
    fn test_deserializes_camel_case_keys() {
        let params: SearchParams =
            serde_json::from_str(r#"{"searchName":"pika","selectedType":"electric","pageSize":"5"}"#)
                .unwrap();
        assert_eq!(params.search_name.as_deref(), Some("pika"));
        assert_eq!(params.selected_type.as_deref(), Some("electric"));
        assert_eq!(params.into_query(20, 200).page_size, 5);
    }
}
