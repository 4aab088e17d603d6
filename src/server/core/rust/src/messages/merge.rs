/* src/server/core/rust/src/messages/merge.rs */

use serde_json::Value;

/// Merge `source` into `target`: objects merge key by key, anything else
/// (strings, numbers, arrays) replaces wholesale.
pub fn deep_merge(target: &mut Value, source: Value) {
  match (target, source) {
    (Value::Object(dst), Value::Object(src)) => {
      for (key, value) in src {
        match dst.get_mut(&key) {
          Some(existing) => deep_merge(existing, value),
          None => {
            dst.insert(key, value);
          }
        }
      }
    }
    (dst, src) => *dst = src,
  }
}
