// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Chart values helpers

use serde_json::{Map, Value};

/// Chart values: a JSON object passed to helm on stdin
pub type Values = Map<String, Value>;

/// Deep-merge `overrides` into `base`. Nested objects merge key by key; any
/// other value in `overrides` replaces the one in `base`.
pub fn merge_values(mut base: Values, overrides: Values) -> Values {
    for (key, value) in overrides {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(merge_values(existing, incoming))
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
    base
}
