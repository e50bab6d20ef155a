//! Lenient decoding for documents written by JavaScript clients.
//!
//! The bot stores every number as a double, older documents hold integers or
//! numeric strings, and some fields are explicitly `null` or hold a value of
//! the wrong type. A bad field decodes to its default so that one sloppy
//! document never fails a whole guild scan.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A stored number in whichever form it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_i64(self) -> i64 {
        match self {
            Number::Int(v) => v,
            // `as` saturates at the i64 bounds
            Number::Float(v) if v.is_finite() => v.round() as i64,
            Number::Float(_) => 0,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) if v.is_finite() => v,
            Number::Float(_) => 0.0,
        }
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        Ok(Number::Int(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        Ok(Number::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        let v = v.trim();
        Ok(v.parse::<i64>()
            .map(Number::Int)
            .or_else(|_| v.parse::<f64>().map(Number::Float))
            .unwrap_or(Number::Int(0)))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Number, E> {
        Ok(Number::Int(0))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Number, E> {
        Ok(Number::Int(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Number, E> {
        Ok(Number::Int(0))
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Number, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Number, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Number::Int(0))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Number, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Number::Int(0))
    }
}

/// A number that accepts anything, defaulting to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LenientNumber(Number);

impl<'de> Deserialize<'de> for LenientNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(NumberVisitor).map(LenientNumber)
    }
}

/// Text field as stored. Numbers are kept as their decimal form.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

impl Text {
    fn into_option(self) -> Option<String> {
        match self {
            Text::Str(s) => Some(s),
            Text::Int(v) => Some(v.to_string()),
            Text::Float(v) => Some(v.to_string()),
            Text::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapOr<V> {
    Map(BTreeMap<String, V>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeqOr<V> {
    Seq(Vec<V>),
    Other(IgnoredAny),
}

fn map_or_empty<'de, D, V>(d: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(match MapOr::deserialize(d)? {
        MapOr::Map(map) => map,
        MapOr::Other(_) => BTreeMap::new(),
    })
}

/// `deserialize_with` helper for a single integer field.
pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(NumberVisitor).map(Number::to_i64)
}

/// `deserialize_with` helper for a `{ key: integer }` map. A non-map is empty.
pub fn int_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, i64>, D::Error> {
    let raw: BTreeMap<String, LenientNumber> = map_or_empty(d)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.0.to_i64()))
        .collect())
}

/// `deserialize_with` helper for a `{ key: number }` map. A non-map is empty.
pub fn float_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
    let raw: BTreeMap<String, LenientNumber> = map_or_empty(d)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.0.to_f64()))
        .collect())
}

/// `deserialize_with` helper for optional text. Non-text values are `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Text::deserialize(d).map(Text::into_option)
}

/// `deserialize_with` helper for required text, empty when unusable.
pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(opt_string(d)?.unwrap_or_default())
}

/// `deserialize_with` helper for a set of strings. Non-text entries are dropped.
pub fn string_set<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<String>, D::Error> {
    Ok(match SeqOr::<Text>::deserialize(d)? {
        SeqOr::Seq(items) => items.into_iter().filter_map(Text::into_option).collect(),
        SeqOr::Other(_) => BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "int")]
        n: i64,
        #[serde(default, deserialize_with = "int_map")]
        m: BTreeMap<String, i64>,
        #[serde(default, deserialize_with = "float_map")]
        f: BTreeMap<String, f64>,
        #[serde(default, deserialize_with = "opt_string")]
        s: Option<String>,
        #[serde(default, deserialize_with = "string_set")]
        tags: BTreeSet<String>,
    }

    fn decode(value: serde_json::Value) -> Doc {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accepts_integers_doubles_and_null() {
        let doc = decode(json!({ "n": 41.6, "m": { "a": 3, "b": 2.0, "c": null } }));
        assert_eq!(doc.n, 42);
        assert_eq!(doc.m.get("a"), Some(&3));
        assert_eq!(doc.m.get("b"), Some(&2));
        assert_eq!(doc.m.get("c"), Some(&0));

        let doc = decode(json!({ "n": null, "m": null }));
        assert_eq!(doc.n, 0);
        assert!(doc.m.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = decode(json!({}));
        assert_eq!(doc.n, 0);
        assert!(doc.m.is_empty());
        assert!(doc.f.is_empty());
        assert_eq!(doc.s, None);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        assert_eq!(decode(json!({ "n": "12" })).n, 12);
        assert_eq!(decode(json!({ "n": " 7.5 " })).n, 8);
        assert_eq!(decode(json!({ "n": "lots" })).n, 0);
    }

    #[test]
    fn test_wrong_types_become_defaults() {
        let doc = decode(json!({
            "n": { "nested": 1 },
            "m": [1, 2],
            "f": { "ok": 0.25, "null": null, "text": "x", "list": [1] },
            "s": true,
            "tags": "early"
        }));
        assert_eq!(doc.n, 0);
        assert!(doc.m.is_empty());
        assert_eq!(doc.f.get("ok"), Some(&0.25));
        assert_eq!(doc.f.get("null"), Some(&0.0));
        assert_eq!(doc.f.get("text"), Some(&0.0));
        assert_eq!(doc.f.get("list"), Some(&0.0));
        assert_eq!(doc.s, None);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_text_accepts_numbers_and_drops_junk_entries() {
        let doc = decode(json!({ "s": 12345, "tags": ["early", 3, null, { "a": 1 }] }));
        assert_eq!(doc.s.as_deref(), Some("12345"));
        assert_eq!(
            doc.tags.into_iter().collect::<Vec<_>>(),
            vec!["3".to_string(), "early".to_string()]
        );
    }
}
