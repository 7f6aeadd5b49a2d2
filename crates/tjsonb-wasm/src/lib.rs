//! WASM bindings for jsonb-core and tjsonb-engine.
//!
//! Every function takes and returns JSON strings. Paths are JSON arrays of
//! keys and indexes (`["a", 0, "b"]`), temporal documents use the serde form of
//! [`tjsonb_engine::Temporal`] (`{"subtype":"Sequence","instants":[...]}`).
//! Errors surface as thrown JS strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p tjsonb-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/tjsonb-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/tjsonb_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/tjsonb-js/wasm/tjsonb_wasm.js packages/tjsonb-js/wasm/tjsonb_wasm.cjs
//! ```

use jsonb_core::{Jsonb, Path};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tjsonb_engine::Temporal;
use wasm_bindgen::prelude::*;

type Outcome = Result<String, String>;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out
// ---------------------------------------------------------------------------

fn parse_doc(json: &str) -> Result<Jsonb, String> {
    json.trim()
        .parse::<Jsonb>()
        .map_err(|e| format!("Invalid document JSON: {}", e))
}

fn parse_as<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Outcome {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn to_js(outcome: Outcome) -> Result<String, JsValue> {
    outcome.map_err(|e| JsValue::from_str(&e))
}

// ---------------------------------------------------------------------------
// Plain documents
// ---------------------------------------------------------------------------

fn set_path_impl(doc: &str, path: &str, value: &str, create: bool) -> Outcome {
    let doc = parse_doc(doc)?;
    let path: Path = parse_as(path, "path")?;
    let value = parse_doc(value)?;
    jsonb_core::set_path(&doc, &path, &value, create)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn insert_path_impl(doc: &str, path: &str, value: &str, after: bool) -> Outcome {
    let doc = parse_doc(doc)?;
    let path: Path = parse_as(path, "path")?;
    let value = parse_doc(value)?;
    jsonb_core::insert_path(&doc, &path, &value, after)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn delete_path_impl(doc: &str, path: &str) -> Outcome {
    let doc = parse_doc(doc)?;
    let path: Path = parse_as(path, "path")?;
    jsonb_core::delete_path(&doc, &path)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn assign_path_impl(doc: &str, path: &str, value: &str) -> Outcome {
    let doc = parse_doc(doc)?;
    let path: Path = parse_as(path, "path")?;
    let value = parse_doc(value)?;
    jsonb_core::assign_path(&doc, &path, &value)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn delete_keys_impl(doc: &str, keys: &str) -> Outcome {
    let doc = parse_doc(doc)?;
    let keys: Vec<String> = parse_as(keys, "keys")?;
    jsonb_core::delete_keys(&doc, &keys)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn delete_index_impl(doc: &str, index: i32) -> Outcome {
    let doc = parse_doc(doc)?;
    jsonb_core::delete_index(&doc, index)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

fn concat_impl(left: &str, right: &str) -> Outcome {
    let left = parse_doc(left)?;
    let right = parse_doc(right)?;
    jsonb_core::concat(&left, &right)
        .map(|out| out.to_string())
        .map_err(|e| e.to_string())
}

/// Replace the value at `path` (a JSON array), adding the final element when
/// `create` is set and it is missing.
#[wasm_bindgen(js_name = "setPath")]
pub fn set_path(doc: &str, path: &str, value: &str, create: bool) -> Result<String, JsValue> {
    to_js(set_path_impl(doc, path, value, create))
}

/// Insert `value` before (or after) the array element at `path`, or add a
/// missing object key.
#[wasm_bindgen(js_name = "insertPath")]
pub fn insert_path(doc: &str, path: &str, value: &str, after: bool) -> Result<String, JsValue> {
    to_js(insert_path_impl(doc, path, value, after))
}

/// Remove the member at `path`.
#[wasm_bindgen(js_name = "deletePath")]
pub fn delete_path(doc: &str, path: &str) -> Result<String, JsValue> {
    to_js(delete_path_impl(doc, path))
}

/// Set the value at `path`, creating every missing level and padding arrays
/// with nulls.
#[wasm_bindgen(js_name = "assignPath")]
pub fn assign_path(doc: &str, path: &str, value: &str) -> Result<String, JsValue> {
    to_js(assign_path_impl(doc, path, value))
}

/// Remove top-level keys (a JSON array of strings) and matching string
/// elements of a top-level array.
#[wasm_bindgen(js_name = "deleteKeys")]
pub fn delete_keys(doc: &str, keys: &str) -> Result<String, JsValue> {
    to_js(delete_keys_impl(doc, keys))
}

/// Remove the array element at `index`; negative counts from the end.
#[wasm_bindgen(js_name = "deleteIndex")]
pub fn delete_index(doc: &str, index: i32) -> Result<String, JsValue> {
    to_js(delete_index_impl(doc, index))
}

/// Concatenate two documents. Objects merge with the right side winning,
/// anything else becomes an array.
#[wasm_bindgen]
pub fn concat(left: &str, right: &str) -> Result<String, JsValue> {
    to_js(concat_impl(left, right))
}

// ---------------------------------------------------------------------------
// Temporal documents
// ---------------------------------------------------------------------------

fn parse_temporal(json: &str) -> Result<Temporal<Jsonb>, String> {
    parse_as(json, "temporal")
}

fn temporal_set_path_impl(temp: &str, path: &str, value: &str, create: bool) -> Outcome {
    let temp = parse_temporal(temp)?;
    let path: Path = parse_as(path, "path")?;
    let value = parse_doc(value)?;
    let out = tjsonb_engine::set_tjsonb_path(&temp, &path, &value, create)
        .map_err(|e| e.to_string())?;
    to_json(&out)
}

fn temporal_insert_path_impl(temp: &str, path: &str, value: &str, after: bool) -> Outcome {
    let temp = parse_temporal(temp)?;
    let path: Path = parse_as(path, "path")?;
    let value = parse_doc(value)?;
    let out = tjsonb_engine::insert_tjsonb_path(&temp, &path, &value, after)
        .map_err(|e| e.to_string())?;
    to_json(&out)
}

fn temporal_delete_path_impl(temp: &str, path: &str) -> Outcome {
    let temp = parse_temporal(temp)?;
    let path: Path = parse_as(path, "path")?;
    let out = tjsonb_engine::delete_tjsonb_path(&temp, &path).map_err(|e| e.to_string())?;
    to_json(&out)
}

fn temporal_delete_key_impl(temp: &str, key: &str) -> Outcome {
    let temp = parse_temporal(temp)?;
    let out = tjsonb_engine::delete_tjsonb_key(&temp, key).map_err(|e| e.to_string())?;
    to_json(&out)
}

/// An operand object with a `subtype` key must be a valid temporal document;
/// anything else is plain and gets applied at every instant of the other side.
fn parse_operand(json: &str) -> Result<Option<Temporal<Jsonb>>, String> {
    let value: serde_json::Value = parse_as(json.trim(), "document")?;
    if value.as_object().is_some_and(|obj| obj.contains_key("subtype")) {
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| format!("Invalid temporal JSON: {}", e))
    } else {
        Ok(None)
    }
}

/// Either operand may be a temporal document. Both plain is an ordinary concat.
fn temporal_concat_impl(left: &str, right: &str) -> Outcome {
    let left_temp = parse_operand(left)?;
    let right_temp = parse_operand(right)?;
    let out = match (left_temp, right_temp) {
        (Some(a), Some(b)) => tjsonb_engine::concat_tjsonb_tjsonb(&a, &b),
        (Some(a), None) => tjsonb_engine::concat_tjsonb_jsonb(&a, &parse_doc(right)?),
        (None, Some(b)) => tjsonb_engine::concat_jsonb_tjsonb(&parse_doc(left)?, &b),
        (None, None) => return concat_impl(left, right),
    }
    .map_err(|e| e.to_string())?;
    to_json(&out)
}

fn temporal_at_value_impl(temp: &str, value: &str) -> Outcome {
    let temp = parse_temporal(temp)?;
    let out = tjsonb_engine::at_value(&temp, &parse_doc(value)?).map_err(|e| e.to_string())?;
    to_json(&out)
}

fn temporal_minus_value_impl(temp: &str, value: &str) -> Outcome {
    let temp = parse_temporal(temp)?;
    let out = tjsonb_engine::minus_value(&temp, &parse_doc(value)?).map_err(|e| e.to_string())?;
    to_json(&out)
}

/// [`set_path`] at every instant of a temporal document.
#[wasm_bindgen(js_name = "temporalSetPath")]
pub fn temporal_set_path(
    temp: &str,
    path: &str,
    value: &str,
    create: bool,
) -> Result<String, JsValue> {
    to_js(temporal_set_path_impl(temp, path, value, create))
}

/// [`insert_path`] at every instant of a temporal document.
#[wasm_bindgen(js_name = "temporalInsertPath")]
pub fn temporal_insert_path(
    temp: &str,
    path: &str,
    value: &str,
    after: bool,
) -> Result<String, JsValue> {
    to_js(temporal_insert_path_impl(temp, path, value, after))
}

/// [`delete_path`] at every instant of a temporal document.
#[wasm_bindgen(js_name = "temporalDeletePath")]
pub fn temporal_delete_path(temp: &str, path: &str) -> Result<String, JsValue> {
    to_js(temporal_delete_path_impl(temp, path))
}

/// Remove a top-level key at every instant. The result uses step
/// interpolation unless the input is discrete.
#[wasm_bindgen(js_name = "temporalDeleteKey")]
pub fn temporal_delete_key(temp: &str, key: &str) -> Result<String, JsValue> {
    to_js(temporal_delete_key_impl(temp, key))
}

/// Concatenate where either side may be temporal.
#[wasm_bindgen(js_name = "temporalConcat")]
pub fn temporal_concat(left: &str, right: &str) -> Result<String, JsValue> {
    to_js(temporal_concat_impl(left, right))
}

/// Restrict a temporal document to the times it equals `value`. Returns
/// `"null"` when it never does.
#[wasm_bindgen(js_name = "temporalAtValue")]
pub fn temporal_at_value(temp: &str, value: &str) -> Result<String, JsValue> {
    to_js(temporal_at_value_impl(temp, value))
}

/// Restrict a temporal document to the times it differs from `value`.
#[wasm_bindgen(js_name = "temporalMinusValue")]
pub fn temporal_minus_value(temp: &str, value: &str) -> Result<String, JsValue> {
    to_js(temporal_minus_value_impl(temp, value))
}
