#![forbid(unsafe_code)]

//! Dotted-path lookup into a value graph.

use serde_json::Value;

/// Resolve `path` (e.g. `"owner.name"`) relative to `root`.
///
/// Each `.`-separated segment is an object key, or an index when the current
/// value is an array. When the path is absent, or any step lands on `null`
/// or a missing key, `root` itself is returned.
///
/// ```
/// use stickit_core::{evaluate_path, json};
///
/// let item = json!({"id": 7, "owner": {"name": "Ada"}});
/// assert_eq!(evaluate_path(&item, Some("owner.name")), &json!("Ada"));
/// assert_eq!(evaluate_path(&item, Some("owner.age")), &item);
/// assert_eq!(evaluate_path(&item, None), &item);
/// ```
#[must_use]
pub fn evaluate_path<'a>(root: &'a Value, path: Option<&str>) -> &'a Value {
    let Some(path) = path else {
        return root;
    };
    let mut current = root;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) if !value.is_null() => current = value,
            _ => return root,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects() {
        let v = json!({"a": {"b": {"c": 3}}});
        assert_eq!(evaluate_path(&v, Some("a.b.c")), &json!(3));
    }

    #[test]
    fn indexes_into_arrays() {
        let v = json!({"tags": ["x", "y"]});
        assert_eq!(evaluate_path(&v, Some("tags.1")), &json!("y"));
    }

    #[test]
    fn missing_intermediate_falls_back_to_root() {
        let v = json!({"a": null});
        assert_eq!(evaluate_path(&v, Some("a.b")), &v);
        assert_eq!(evaluate_path(&v, Some("zzz")), &v);
    }

    #[test]
    fn empty_path_falls_back_to_root() {
        let v = json!({"a": 1});
        assert_eq!(evaluate_path(&v, Some("")), &v);
    }

    #[test]
    fn scalar_root_is_returned_unchanged() {
        let v = json!("label");
        assert_eq!(evaluate_path(&v, Some("label")), &v);
    }

    #[test]
    fn falsy_leaf_is_not_treated_as_missing() {
        let v = json!({"count": 0, "flag": false});
        assert_eq!(evaluate_path(&v, Some("count")), &json!(0));
        assert_eq!(evaluate_path(&v, Some("flag")), &json!(false));
    }

    proptest! {
        #[test]
        fn single_key_lookup(key in "[a-z]{1,8}", n in any::<i32>()) {
            let v = json!({ key.clone(): n });
            prop_assert_eq!(evaluate_path(&v, Some(&key)), &json!(n));
        }

        #[test]
        fn unknown_paths_never_panic(path in "[a-z.0-9]{0,16}") {
            let v = json!({"a": [1, {"b": 2}], "c": "d"});
            let _ = evaluate_path(&v, Some(&path));
        }
    }
}
