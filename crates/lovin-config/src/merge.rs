//! Recursive merging of configuration documents.

use serde_json::Value;

/// Merge `update` into `target` in place.
///
/// Objects merge key by key, recursing into nested objects. Every other kind
/// of value in `update` (scalars, arrays, null) replaces the slot in `target`.
/// Keys present only in `target` are kept; keys present only in `update` are
/// appended after the existing ones, so declaration order is stable.
pub fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                match target_map.get_mut(key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

/// Merge a shared document with an app document. The app document wins.
///
/// Either side may be absent, in which case it contributes nothing.
///
/// # Example
///
/// ```
/// use lovin_config::merge_documents;
/// use serde_json::json;
///
/// let shared = json!({ "vendor": { "a": "x", "b": "y" } });
/// let app = json!({ "vendor": { "a": "z" } });
///
/// let merged = merge_documents(Some(shared), Some(app));
/// assert_eq!(merged, json!({ "vendor": { "a": "z", "b": "y" } }));
/// ```
pub fn merge_documents(shared: Option<Value>, app: Option<Value>) -> Value {
    let mut base = shared.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    if let Some(app) = app {
        merge_values(&mut base, &app);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_are_replaced() {
        let mut base = json!({ "minify": true, "srcmaps": false });
        merge_values(&mut base, &json!({ "minify": false }));
        assert_eq!(base, json!({ "minify": false, "srcmaps": false }));
    }

    #[test]
    fn nested_objects_merge_key_by_key() {
        let mut base = json!({ "vendor": { "jquery": "vendor/jquery.js", "ember": "vendor/ember.js" } });
        merge_values(
            &mut base,
            &json!({ "vendor": { "ember": "vendor/ember-1.0.js" } }),
        );
        assert_eq!(
            base,
            json!({ "vendor": { "jquery": "vendor/jquery.js", "ember": "vendor/ember-1.0.js" } })
        );
    }

    #[test]
    fn arrays_replace_wholesale() {
        let mut base = json!({ "list": [1, 2, 3] });
        merge_values(&mut base, &json!({ "list": [4] }));
        assert_eq!(base, json!({ "list": [4] }));
    }

    #[test]
    fn object_replaces_scalar() {
        let mut base = json!({ "vendor": null });
        merge_values(&mut base, &json!({ "vendor": { "a": "a.js" } }));
        assert_eq!(base, json!({ "vendor": { "a": "a.js" } }));
    }

    #[test]
    fn existing_key_order_is_preserved() {
        let mut base = json!({ "vendor": { "a": "1", "b": "2" } });
        merge_values(&mut base, &json!({ "vendor": { "c": "3", "a": "4" } }));
        let keys: Vec<&String> = base["vendor"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn absent_documents_yield_empty_mapping() {
        assert_eq!(merge_documents(None, None), json!({}));
        assert_eq!(
            merge_documents(None, Some(json!({ "minify": false }))),
            json!({ "minify": false })
        );
        assert_eq!(
            merge_documents(Some(json!({ "minify": false })), None),
            json!({ "minify": false })
        );
    }
}
