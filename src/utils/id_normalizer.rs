//! Identifier normalization
//!
//! Catalog identifiers arrive in whatever shape the producer had at hand:
//! plain integers, 64-bit integers, digit strings, floats from JSON, or
//! nothing at all. [`normalize_ids`] turns a sequence of such values into
//! canonical [`EntityId`]s, silently skipping anything that does not convert.

use crate::models::EntityId;

/// A loosely-typed scalar that may or may not denote an entity id
#[derive(Debug, Clone, PartialEq)]
pub enum RawId {
    Null,
    Int(i32),
    Wide(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Composite or otherwise unconvertible value
    Other,
}

impl RawId {
    /// Convert to a canonical id, or `None` if the value has no integer meaning
    pub fn to_entity_id(&self) -> Option<EntityId> {
        match self {
            RawId::Null | RawId::Other => None,
            RawId::Int(i) => Some(*i),
            RawId::Wide(l) => EntityId::try_from(*l).ok(),
            RawId::Unsigned(u) => EntityId::try_from(*u).ok(),
            RawId::Text(s) => s.trim().parse::<EntityId>().ok(),
            RawId::Float(f) => {
                let rounded = f.round_ties_even();
                if rounded.is_finite()
                    && rounded >= EntityId::MIN as f64
                    && rounded <= EntityId::MAX as f64
                {
                    Some(rounded as EntityId)
                } else {
                    None
                }
            }
            RawId::Bool(b) => Some(EntityId::from(*b)),
        }
    }
}

/// Lazily normalize heterogeneous id values, preserving input order
pub fn normalize_ids<I>(ids: I) -> impl Iterator<Item = EntityId>
where
    I: IntoIterator,
    I::Item: Into<RawId>,
{
    ids.into_iter().filter_map(|raw| raw.into().to_entity_id())
}

impl From<i32> for RawId {
    fn from(value: i32) -> Self {
        RawId::Int(value)
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        RawId::Wide(value)
    }
}

impl From<u32> for RawId {
    fn from(value: u32) -> Self {
        RawId::Unsigned(value as u64)
    }
}

impl From<u64> for RawId {
    fn from(value: u64) -> Self {
        RawId::Unsigned(value)
    }
}

impl From<usize> for RawId {
    fn from(value: usize) -> Self {
        RawId::Unsigned(value as u64)
    }
}

impl From<f64> for RawId {
    fn from(value: f64) -> Self {
        RawId::Float(value)
    }
}

impl From<bool> for RawId {
    fn from(value: bool) -> Self {
        RawId::Bool(value)
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        RawId::Text(value.to_string())
    }
}

impl From<String> for RawId {
    fn from(value: String) -> Self {
        RawId::Text(value)
    }
}

impl<T: Into<RawId>> From<Option<T>> for RawId {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawId::Null, Into::into)
    }
}

impl From<serde_json::Value> for RawId {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => RawId::Null,
            Value::Bool(b) => RawId::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawId::Wide(i)
                } else if let Some(u) = n.as_u64() {
                    RawId::Unsigned(u)
                } else {
                    n.as_f64().map_or(RawId::Other, RawId::Float)
                }
            }
            Value::String(s) => RawId::Text(s),
            Value::Array(_) | Value::Object(_) => RawId::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_integers_pass_through() {
        let ids: Vec<_> = normalize_ids(vec![1, 25, 151]).collect();
        assert_eq!(ids, vec![1, 25, 151]);
    }

    #[test]
    fn test_wide_integers_outside_range_are_skipped() {
        let ids: Vec<_> =
            normalize_ids(vec![7_i64, i64::from(i32::MAX) + 1, i64::from(i32::MIN)]).collect();
        assert_eq!(ids, vec![7, i32::MIN]);

        let ids: Vec<_> = normalize_ids(vec![u64::MAX, 3]).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_text_is_trimmed_and_parsed() {
        let ids: Vec<_> = normalize_ids(vec![" 42 ", "abc", "", "-3", "+9", "4.5"]).collect();
        assert_eq!(ids, vec![42, -3, 9]);
    }

    #[test]
    fn test_floats_round_half_to_even() {
        let ids: Vec<_> = normalize_ids(vec![2.5, 3.5, 10.0, f64::NAN, f64::INFINITY, 1e12]).collect();
        assert_eq!(ids, vec![2, 4, 10]);
    }

    #[test]
    fn test_optional_values() {
        let ids: Vec<_> = normalize_ids(vec![Some(5), None, Some(6)]).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_malformed_json_values_are_excluded() {
        let raw = vec![
            json!(1),
            json!("abc"),
            json!(null),
            json!({"id": 2}),
            json!([3]),
            json!("  4"),
            json!(5.0),
            json!(true),
        ];

        let ids: Vec<_> = normalize_ids(raw).collect();
        assert_eq!(ids, vec![1, 4, 5, 1]);
    }

    #[test]
    fn test_output_never_longer_than_input_and_order_preserved() {
        let raw = vec![
            RawId::Text("9".into()),
            RawId::Other,
            RawId::Int(3),
            RawId::Null,
            RawId::Wide(7),
        ];
        let len = raw.len();
        let ids: Vec<_> = normalize_ids(raw).collect();
        assert!(ids.len() <= len);
        assert_eq!(ids, vec![9, 3, 7]);
    }

    proptest! {
        #[test]
        fn prop_text_ids_match_trimmed_parse(
            raw in prop::collection::vec(".{0,12}", 0..40)
        ) {
            let expected: Vec<EntityId> =
                raw.iter().filter_map(|s| s.trim().parse().ok()).collect();
            let ids: Vec<_> = normalize_ids(raw).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
