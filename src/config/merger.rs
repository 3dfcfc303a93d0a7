//! Deep merge of layered YAML configuration.
//!
//! - Mappings merge recursively
//! - Sequences and scalars in the overlay replace the base value
//! - A null in the overlay deletes the key, so the default applies again

use serde_yaml::Value;

/// Merge `overlay` onto `base`, with `overlay` winning at every conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge configs in order; the last one has the highest priority.
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}
