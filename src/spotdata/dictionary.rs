use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::{Result, SpotDataError};
use crate::cube::Cube;

/// Ancillary fields (e.g. orography, land mask) keyed by name
pub type Ancillaries = HashMap<String, Cube>;

/// Anything that may hold named entries.
///
/// Only dynamically typed data such as [`serde_json::Value`] can turn out not
/// to be a mapping at runtime.
pub trait DataDictionary {
    type Value: ?Sized;

    /// Kind of data held, used in error messages
    fn kind(&self) -> &'static str;

    fn is_mapping(&self) -> bool;

    fn entry(&self, key: &str) -> Option<&Self::Value>;
}

impl<V, H: BuildHasher> DataDictionary for HashMap<String, V, H> {
    type Value = V;

    fn kind(&self) -> &'static str {
        "map"
    }

    fn is_mapping(&self) -> bool {
        true
    }

    fn entry(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

impl<V> DataDictionary for BTreeMap<String, V> {
    type Value = V;

    fn kind(&self) -> &'static str {
        "map"
    }

    fn is_mapping(&self) -> bool {
        true
    }

    fn entry(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

impl DataDictionary for serde_json::Map<String, Value> {
    type Value = Value;

    fn kind(&self) -> &'static str {
        "object"
    }

    fn is_mapping(&self) -> bool {
        true
    }

    fn entry(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl DataDictionary for Value {
    type Value = Value;

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn is_mapping(&self) -> bool {
        self.is_object()
    }

    fn entry(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

/// Fetch the entry stored under `key`, e.g. a field from the ancillaries.
///
/// The value is returned by reference, exactly as stored.
pub fn data_from_dictionary<'a, D>(dictionary_data: &'a D, key: &str) -> Result<&'a D::Value>
where
    D: DataDictionary + ?Sized,
{
    if !dictionary_data.is_mapping() {
        return Err(SpotDataError::InvalidDictionary(dictionary_data.kind()));
    }

    dictionary_data
        .entry(key)
        .ok_or_else(|| SpotDataError::MissingKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use serde_json::json;

    fn ancillaries() -> Ancillaries {
        let mut ancillaries = Ancillaries::new();
        ancillaries.insert(
            "orography".to_string(),
            Cube::new("surface_altitude", "/anc/orog.nc", ArrayD::zeros(IxDyn(&[3, 3]))).with_units("m"),
        );
        ancillaries.insert(
            "land_mask".to_string(),
            Cube::new("land_binary_mask", "/anc/mask.nc", ArrayD::ones(IxDyn(&[3, 3]))),
        );
        ancillaries
    }

    #[test]
    fn test_returns_stored_value_by_reference() {
        let ancillaries = ancillaries();
        let orography = data_from_dictionary(&ancillaries, "orography").unwrap();
        assert!(std::ptr::eq(orography, &ancillaries["orography"]));
        assert_eq!(orography.units.as_deref(), Some("m"));
    }

    #[test]
    fn test_missing_key() {
        let ancillaries = ancillaries();
        match data_from_dictionary(&ancillaries, "sea_mask") {
            Err(SpotDataError::MissingKey(key)) => assert_eq!(key, "sea_mask"),
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_btree_map() {
        let mut data = BTreeMap::new();
        data.insert("a".to_string(), 1);
        assert_eq!(*data_from_dictionary(&data, "a").unwrap(), 1);
        assert!(data_from_dictionary(&data, "b").is_err());
    }

    #[test]
    fn test_json_object() {
        let config = json!({"sites": {"count": 3}, "method": "use_nearest"});
        assert_eq!(data_from_dictionary(&config, "method").unwrap(), "use_nearest");
        assert_eq!(data_from_dictionary(&config, "sites").unwrap()["count"], 3);
    }

    #[test]
    fn test_non_mapping_rejected_regardless_of_key() {
        for value in [json!([1, 2, 3]), json!("orography"), json!(null), json!(4.5)] {
            for key in ["orography", "0", ""] {
                assert!(matches!(
                    data_from_dictionary(&value, key),
                    Err(SpotDataError::InvalidDictionary(_))
                ));
            }
        }
    }

    #[test]
    fn test_invalid_dictionary_names_kind() {
        let err = data_from_dictionary(&json!([1]), "a").unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
