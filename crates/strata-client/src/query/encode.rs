//! Bracket-nested query-string encoding.
//!
//! Encodes a nested parameter map into the `parent[child][0]=value` grammar
//! the CMS query parser expects. Keys and brackets are emitted literally;
//! leaf text is percent-encoded. This reproduces the observable output of
//! stringifying with a nested-bracket encoder and then decoding the
//! structural delimiters, without the double pass.
//!
//! Determinism: the parameter map preserves insertion order (serde_json's
//! `preserve_order` feature), so identical input structures always encode to
//! byte-identical strings.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Characters that would corrupt the bracket grammar if they appeared in a
/// key segment. Keys are caller-authored field names, so this is an input
/// error, not something to escape around.
const RESERVED_KEY_CHARS: [char; 6] = ['[', ']', '&', '=', '#', '?'];

/// Encode a parameter map into a query string (no leading `?`).
///
/// - absent fields are omitted entirely; JSON `null` encodes as `key=`
/// - arrays encode as repeated bracketed-index keys (`key[0]=a&key[1]=b`)
/// - empty objects and arrays contribute nothing
pub fn encode(params: &Map<String, Value>) -> Result<String, Error> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        append_value(&mut pairs, checked_key(key)?, value)?;
    }
    Ok(pairs.join("&"))
}

/// Convert any serializable value into the JSON tree the encoder walks.
pub fn to_query_value<T: Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::Encode(e.to_string()))
}

fn checked_key(key: &str) -> Result<&str, Error> {
    if key.contains(&RESERVED_KEY_CHARS[..]) {
        return Err(Error::Encode(format!(
            "query key `{key}` contains a reserved character (one of `[ ] & = # ?`)"
        )));
    }
    Ok(key)
}

fn append_value(pairs: &mut Vec<String>, key: &str, value: &Value) -> Result<(), Error> {
    match value {
        Value::Null => pairs.push(format!("{key}=")),
        Value::Bool(flag) => pairs.push(format!("{key}={flag}")),
        Value::Number(number) => pairs.push(format!("{key}={number}")),
        Value::String(text) => pairs.push(format!("{key}={}", urlencoding::encode(text))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_value(pairs, &format!("{key}[{index}]"), item)?;
            }
        }
        Value::Object(fields) => {
            for (name, item) in fields {
                append_value(pairs, &format!("{key}[{}]", checked_key(name)?), item)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOptions, NumberCondition, StringCondition};
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_operator_set_round_trip() {
        let filters = FilterOptions::new()
            .field("price", NumberCondition::new().gte(50u64).between(100u64, 1000u64));
        let mut map = Map::new();
        map.insert("filters".to_string(), to_query_value(&filters).unwrap());

        let query = encode(&map).unwrap();
        assert_eq!(
            query,
            "filters[price][$gte]=50&filters[price][$between][0]=100&filters[price][$between][1]=1000"
        );
    }

    #[test]
    fn test_nested_relation_filter() {
        let filters = FilterOptions::new().relation(
            "category",
            FilterOptions::new().field("name", StringCondition::new().eq("Electronics")),
        );
        let mut map = Map::new();
        map.insert("filters".to_string(), to_query_value(&filters).unwrap());

        let query = encode(&map).unwrap();
        assert_eq!(query, "filters[category][name][$eq]=Electronics");
    }

    #[test]
    fn test_boolean_composition_indexing() {
        let filters = FilterOptions::new().and([
            FilterOptions::new().field("a", StringCondition::new().eq("1")),
            FilterOptions::new().field("b", StringCondition::new().eq("2")),
        ]);
        let mut map = Map::new();
        map.insert("filters".to_string(), to_query_value(&filters).unwrap());

        let query = encode(&map).unwrap();
        assert_eq!(query, "filters[$and][0][a][$eq]=1&filters[$and][1][b][$eq]=2");
    }

    #[test]
    fn test_arrays_as_repeated_indexed_keys() {
        let map = params(json!({"sort": ["price:asc", "title:desc"]}));
        let query = encode(&map).unwrap();
        assert_eq!(query, "sort[0]=price%3Aasc&sort[1]=title%3Adesc");
    }

    #[test]
    fn test_null_is_explicit_and_absent_is_omitted() {
        let map = params(json!({"a": null, "b": "x"}));
        assert_eq!(encode(&map).unwrap(), "a=&b=x");

        let map = params(json!({"b": "x"}));
        assert_eq!(encode(&map).unwrap(), "b=x");
    }

    #[test]
    fn test_leaf_text_is_percent_encoded() {
        let map = params(json!({"q": "kahve & çay"}));
        assert_eq!(encode(&map).unwrap(), "q=kahve%20%26%20%C3%A7ay");
    }

    #[test]
    fn test_scalars_unquoted() {
        let map = params(json!({"page": 2, "draft": false}));
        assert_eq!(encode(&map).unwrap(), "page=2&draft=false");
    }

    #[test]
    fn test_empty_containers_contribute_nothing() {
        let map = params(json!({"filters": {}, "sort": [], "locale": "en"}));
        assert_eq!(encode(&map).unwrap(), "locale=en");
    }

    #[test]
    fn test_determinism() {
        let build = || {
            params(json!({
                "pagination": {"page": 1, "pageSize": 25},
                "sort": ["price:asc"],
                "filters": {"name": {"$containsi": "tea"}}
            }))
        };
        assert_eq!(encode(&build()).unwrap(), encode(&build()).unwrap());
    }

    #[test]
    fn test_reserved_key_characters_fail_fast() {
        let map = params(json!({"bad[key": "x"}));
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(err.to_string().contains("bad[key"));

        let map = params(json!({"outer": {"in=ner": "x"}}));
        assert!(encode(&map).is_err());
    }
}
