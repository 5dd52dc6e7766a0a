//! Request Validation
//!
//! Turns loosely typed JSON bodies and query strings into the strongly typed
//! arguments the store accepts. Nothing past this module sees raw JSON.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

use crate::domain::{ItemId, Selection};
use crate::repository::ListQuery;

use super::error::ApiError;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 1000;

/// Any JSON body; a missing content type or malformed JSON is `INVALID_INPUT`
pub struct JsonBody(pub Value);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Integer id from a JSON number; `1.0` counts, `1.5` does not
fn id_from_json(value: &Value) -> Option<ItemId> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(id_from_f64)),
        _ => None,
    }
}

fn id_from_f64(n: f64) -> Option<ItemId> {
    // 2^63 is the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n) {
        Some(n as ItemId)
    } else {
        None
    }
}

/// Parse every element, or return the elements that are not valid ids
fn id_list(values: &[Value]) -> Result<Vec<ItemId>, Vec<Value>> {
    let mut ids = Vec::with_capacity(values.len());
    let mut invalid = Vec::new();

    for value in values {
        match id_from_json(value) {
            Some(id) => ids.push(id),
            None => invalid.push(value.clone()),
        }
    }

    if invalid.is_empty() {
        Ok(ids)
    } else {
        Err(invalid)
    }
}

/// Body of the endpoints taking `{ "ids": [...] }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdsRequest {
    pub ids: Vec<ItemId>,
}

impl IdsRequest {
    /// Parse `{ ids }`, optionally rejecting an empty list
    pub fn from_body(body: &Value, allow_empty: bool) -> Result<Self, ApiError> {
        let values = body
            .get("ids")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::InvalidInput("ids must be an array".to_string()))?;

        if values.is_empty() && !allow_empty {
            return Err(ApiError::EmptyArray);
        }

        let ids = id_list(values).map_err(ApiError::InvalidIds)?;
        Ok(Self { ids })
    }
}

/// Body of `POST selection/update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSelectionRequest {
    pub selection: Selection,
}

impl UpdateSelectionRequest {
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        let selected = body
            .get("selectedIds")
            .and_then(Value::as_array)
            .ok_or(ApiError::SelectedIdsNotArray)?;
        let order = body
            .get("order")
            .and_then(Value::as_array)
            .ok_or(ApiError::OrderNotArray)?;

        let selected_ids = id_list(selected).map_err(ApiError::InvalidSelectedIds)?;
        let order = id_list(order).map_err(ApiError::InvalidOrderIds)?;

        Ok(Self {
            selection: Selection::new(selected_ids, order),
        })
    }
}

// ========================
// Query string
// ========================

/// Number parsing in the manner of JavaScript's `Number(string)`:
/// surrounding whitespace is ignored and a blank string is zero.
fn js_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn query_values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    let bracketed = format!("{}[]", key);
    pairs
        .iter()
        .filter(|(k, _)| k == key || *k == bracketed)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn parse_offset(raw: Option<&str>) -> Result<u64, ApiError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    match js_number(raw) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => Ok(n as u64),
        _ => Err(ApiError::InvalidOffset),
    }
}

fn parse_limit(raw: Option<&str>) -> Result<usize, ApiError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LIMIT);
    };
    match js_number(raw) {
        Some(n) if n.fract() == 0.0 && (1.0..=MAX_LIMIT as f64).contains(&n) => Ok(n as usize),
        _ => Err(ApiError::InvalidLimit),
    }
}

/// Decimal form of the filter, or `None` for blank, non-numeric or zero
fn parse_filter(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|r| !r.is_empty())?;
    let n = js_number(raw).filter(|n| *n != 0.0)?;
    Some(match id_from_f64(n) {
        Some(id) => id.to_string(),
        None => n.to_string(),
    })
}

/// Repeated keys, a JSON array, or a single number; junk entries are dropped
fn parse_exclusions(values: &[&str]) -> Vec<ItemId> {
    let as_id = |raw: &str| js_number(raw).and_then(id_from_f64);

    match values {
        [] => Vec::new(),
        [single] => {
            if single.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(single) {
                Ok(Value::Array(entries)) => entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(s) => as_id(s),
                        other => id_from_json(other),
                    })
                    .collect(),
                _ => as_id(*single).into_iter().collect(),
            }
        }
        many => many.iter().filter_map(|raw| as_id(*raw)).collect(),
    }
}

/// Query of `GET items`
pub fn list_query_from_pairs(pairs: &[(String, String)]) -> Result<ListQuery, ApiError> {
    let first = |key: &str| query_values(pairs, key).first().copied();

    let filter = parse_filter(first("filterId"));
    let exclude = parse_exclusions(&query_values(pairs, "excludeSelectedIds"));
    let offset = parse_offset(first("offset"))?;
    let limit = parse_limit(first("limit"))?;

    let mut query = ListQuery::page(offset, limit).excluding(exclude);
    query.filter = filter;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ids_request_shapes() {
        let req = IdsRequest::from_body(&json!({ "ids": [1, 2, 3] }), false).unwrap();
        assert_eq!(req.ids, vec![1, 2, 3]);

        let err = IdsRequest::from_body(&json!({ "ids": "not-an-array" }), false).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");

        let err = IdsRequest::from_body(&json!([1, 2]), false).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");

        let err = IdsRequest::from_body(&json!({ "ids": [] }), false).unwrap_err();
        assert_eq!(err.code(), "EMPTY_ARRAY");

        let req = IdsRequest::from_body(&json!({ "ids": [] }), true).unwrap();
        assert!(req.ids.is_empty());
    }

    #[test]
    fn test_ids_request_reports_invalid_entries() {
        let err = IdsRequest::from_body(&json!({ "ids": [1, "invalid", 3, 1.5] }), false)
            .unwrap_err();
        match err {
            ApiError::InvalidIds(invalid) => assert_eq!(invalid, vec![json!("invalid"), json!(1.5)]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_integral_floats_accepted() {
        let req = IdsRequest::from_body(&json!({ "ids": [2.0, -4] }), false).unwrap();
        assert_eq!(req.ids, vec![2, -4]);
    }

    #[test]
    fn test_update_selection_codes() {
        let req = UpdateSelectionRequest::from_body(&json!({ "selectedIds": [1, 2], "order": [2, 1] }))
            .unwrap();
        assert_eq!(req.selection, Selection::new(vec![1, 2], vec![2, 1]));

        let check = |body: Value, code: &str| {
            let err = UpdateSelectionRequest::from_body(&body).unwrap_err();
            assert_eq!(err.code(), code);
        };
        check(json!({ "selectedIds": "x", "order": [] }), "INVALID_SELECTED_IDS");
        check(json!({ "selectedIds": [], "order": {} }), "INVALID_ORDER");
        check(json!({ "selectedIds": [1, "a"], "order": [] }), "INVALID_SELECTED_IDS");
        check(json!({ "selectedIds": [1], "order": [null] }), "INVALID_ORDER_IDS");
        check(json!({}), "INVALID_SELECTED_IDS");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = list_query_from_pairs(&[]).unwrap();
        assert_eq!(query, ListQuery::page(0, DEFAULT_LIMIT));
    }

    #[test]
    fn test_list_query_bounds() {
        let err = list_query_from_pairs(&pairs(&[("offset", "-1"), ("limit", "10")])).unwrap_err();
        assert_eq!(err.code(), "INVALID_OFFSET");

        let err = list_query_from_pairs(&pairs(&[("offset", "abc")])).unwrap_err();
        assert_eq!(err.code(), "INVALID_OFFSET");

        let err = list_query_from_pairs(&pairs(&[("offset", "0"), ("limit", "2000")])).unwrap_err();
        assert_eq!(err.code(), "INVALID_LIMIT");

        let err = list_query_from_pairs(&pairs(&[("limit", "0")])).unwrap_err();
        assert_eq!(err.code(), "INVALID_LIMIT");

        let query = list_query_from_pairs(&pairs(&[("offset", " 20 "), ("limit", "1000")])).unwrap();
        assert_eq!((query.offset, query.limit), (20, 1000));
    }

    #[test]
    fn test_filter_parsing() {
        let filter = |raw: &str| list_query_from_pairs(&pairs(&[("filterId", raw)])).unwrap().filter;

        assert_eq!(filter("123"), Some("123".to_string()));
        assert_eq!(filter("007"), Some("7".to_string()));
        assert_eq!(filter(""), None);
        assert_eq!(filter("0"), None);
        assert_eq!(filter("abc"), None);
    }

    #[test]
    fn test_exclusion_forms() {
        let exclude = |items: &[(&str, &str)]| {
            let mut ids: Vec<ItemId> = list_query_from_pairs(&pairs(items))
                .unwrap()
                .exclude
                .into_iter()
                .collect();
            ids.sort();
            ids
        };

        assert_eq!(exclude(&[("excludeSelectedIds", "[3,1,2]")]), vec![1, 2, 3]);
        assert_eq!(exclude(&[("excludeSelectedIds", "5")]), vec![5]);
        assert_eq!(
            exclude(&[("excludeSelectedIds", "4"), ("excludeSelectedIds", "6")]),
            vec![4, 6]
        );
        assert_eq!(
            exclude(&[("excludeSelectedIds[]", "8"), ("excludeSelectedIds[]", "x")]),
            vec![8]
        );
        assert_eq!(exclude(&[("excludeSelectedIds", "[\"9\", true, 10]")]), vec![9, 10]);
        assert!(exclude(&[("excludeSelectedIds", "")]).is_empty());
        assert!(exclude(&[("excludeSelectedIds", "junk")]).is_empty());
    }
}
