//! Helpers for reading loosely-typed values out of wire param maps.

use serde_json::{Map, Value};

pub fn get_str<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

pub fn get_str_or<'a>(params: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    get_str(params, key).unwrap_or(default)
}

pub fn get_f64(params: &Map<String, Value>, key: &str) -> Option<f64> {
    params.get(key).and_then(Value::as_f64)
}

pub fn get_f64_or(params: &Map<String, Value>, key: &str, default: f64) -> f64 {
    get_f64(params, key).unwrap_or(default)
}

pub fn get_bool_or(params: &Map<String, Value>, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn get_map<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    params.get(key).and_then(Value::as_object)
}

/// Read a list of strings; non-string entries are skipped.
pub fn get_str_list(params: &Map<String, Value>, key: &str) -> Vec<String> {
    params
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
