//! Value model for document fields
//!
//! Documents are schema-less JSON objects. The value model is the tagged
//! `serde_json::Value` variant (null, bool, number, string, array, object)
//! together with its deep structural equality:
//!
//! - Arrays compare element-wise, in order
//! - Objects compare by key set and per-key value, independent of insertion
//!   order
//! - Numbers compare by numeric value, not textual form
//!
//! This equality is the sole definition of "changed" used by the diff
//! engine. Codec usage throughout the crate is stateless (`serde_json`
//! free functions); there is no shared mutable encoder state.

pub use serde_json::Value;

/// Unordered string-keyed field map of a document.
pub type FieldMap = serde_json::Map<String, Value>;

/// Deep structural equality between two values.
///
/// Delegates to `serde_json::Value`'s `PartialEq`, which implements the
/// contract above. Absent fields are represented as `Value::Null` by
/// callers; `values_equal(&Value::Null, &Value::Null)` is therefore true
/// and a field "set" to null on a document that never had it is not a
/// change.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_equality() {
        assert!(values_equal(&json!(null), &json!(null)));
        assert!(values_equal(&json!(true), &json!(true)));
        assert!(values_equal(&json!(100), &json!(100)));
        assert!(values_equal(&json!("draft"), &json!("draft")));
        assert!(!values_equal(&json!(100), &json!(120)));
        assert!(!values_equal(&json!("draft"), &json!("active")));
        assert!(!values_equal(&json!(0), &json!(false)));
    }

    #[test]
    fn test_array_equality_is_ordered() {
        assert!(values_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn test_object_equality_ignores_insertion_order() {
        let mut a = FieldMap::new();
        a.insert("price".to_string(), json!(100));
        a.insert("status".to_string(), json!("draft"));

        let mut b = FieldMap::new();
        b.insert("status".to_string(), json!("draft"));
        b.insert("price".to_string(), json!(100));

        assert!(values_equal(&Value::Object(a), &Value::Object(b)));
    }

    #[test]
    fn test_nested_structures_compare_deeply() {
        let a = json!({"tags": ["a", "b"], "meta": {"rev": 1}});
        let b = json!({"meta": {"rev": 1}, "tags": ["a", "b"]});
        let c = json!({"meta": {"rev": 2}, "tags": ["a", "b"]});
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &c));
    }

    #[test]
    fn test_null_differs_from_missing_key_value() {
        assert!(!values_equal(&json!(null), &json!("")));
        assert!(!values_equal(&json!(null), &json!(0)));
    }
}
