//! Untyped values

use serde::{
    de::{self, Deserialize, Deserializer},
    ser::{self, Serialize, Serializer},
};
use std::{cell::Cell, collections::BTreeMap};

/// How many values may be nested inside each other when encoding or decoding
pub const MAX_DEPTH: usize = 128;

/// A value of any shape
///
/// This is the document type for callers that do not have a static type for
/// what they store. Types outside this model can be carried through the
/// [`Custom`](Value::Custom) variant by naming them with a tag and describing
/// their contents as another value.
///
/// Values nested deeper than [`MAX_DEPTH`] cannot be encoded or decoded.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absence of a value
    Null,
    /// A boolean
    Bool(bool),
    /// A signed integer
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A string
    Str(String),
    /// A byte string
    Bytes(Vec<u8>),
    /// A sequence of values
    List(Vec<Value>),
    /// A mapping from strings to values
    Map(BTreeMap<String, Value>),
    /// A value of a caller-defined type
    Custom {
        /// The name of the type
        tag: String,
        /// The contents
        value: Box<Value>,
    },
}

derive_base64_conversions!(Value);

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Creates a value of a caller-defined type
    pub fn custom<S, V>(tag: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        Value::Custom {
            tag: tag.into(),
            value: Box::new(value.into()),
        }
    }

    /// Checks whether this is [`Null`](Value::Null)
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Gets the boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Gets the integer, if this is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Gets the number as a float
    ///
    /// Integers are converted only when no precision is lost, that is when
    /// their magnitude is at most 2^53.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) if i.unsigned_abs() <= 1 << f64::MANTISSA_DIGITS => Some(*i as f64),
            _ => None,
        }
    }

    /// Gets the string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Gets the byte string, if this is one
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Gets the elements, if this is a sequence
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Gets the entries, if this is a mapping
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a key, if this is a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Gets the type name, if this is a caller-defined type
    pub fn tag(&self) -> Option<&str> {
        match self {
            Value::Custom { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl<V> std::iter::FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
}

/// One level of nesting, released on drop
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        DEPTH.with(|depth| {
            let d = depth.get();
            if d >= MAX_DEPTH {
                return None;
            }
            depth.set(d + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

const TOO_DEEP: &str = "value nested too deeply";

// Both mirrors must list the variants in the same order as `Value`.
#[derive(Serialize)]
#[serde(rename = "Value")]
enum ValueRef<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
    List(&'a [Value]),
    Map(&'a BTreeMap<String, Value>),
    Custom { tag: &'a str, value: &'a Value },
}

impl<'a> ValueRef<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Null => ValueRef::Null,
            Value::Bool(b) => ValueRef::Bool(*b),
            Value::Int(i) => ValueRef::Int(*i),
            Value::Float(x) => ValueRef::Float(*x),
            Value::Str(s) => ValueRef::Str(s),
            Value::Bytes(b) => ValueRef::Bytes(b),
            Value::List(v) => ValueRef::List(v),
            Value::Map(m) => ValueRef::Map(m),
            Value::Custom { tag, value } => ValueRef::Custom { tag, value },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename = "Value")]
enum ValueRepr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Custom { tag: String, value: Box<Value> },
}

impl ValueRepr {
    fn into_value(self) -> Value {
        match self {
            ValueRepr::Null => Value::Null,
            ValueRepr::Bool(b) => Value::Bool(b),
            ValueRepr::Int(i) => Value::Int(i),
            ValueRepr::Float(x) => Value::Float(x),
            ValueRepr::Str(s) => Value::Str(s),
            ValueRepr::Bytes(b) => Value::Bytes(b),
            ValueRepr::List(v) => Value::List(v),
            ValueRepr::Map(m) => Value::Map(m),
            ValueRepr::Custom { tag, value } => Value::Custom { tag, value },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let _guard =
            DepthGuard::enter().ok_or_else(|| <S::Error as ser::Error>::custom(TOO_DEEP))?;
        ValueRef::of(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let _guard =
            DepthGuard::enter().ok_or_else(|| <D::Error as de::Error>::custom(TOO_DEEP))?;
        ValueRepr::deserialize(deserializer).map(ValueRepr::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Value, MAX_DEPTH};
    use crate::{Error, FromBytes, ToBytes};
    use std::{collections::BTreeMap, str::FromStr};

    fn sample() -> Value {
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), Value::from(1i64));
        m.insert("b".to_string(), vec![1i64, 2, 3].into_iter().collect());
        m.insert(
            "c".to_string(),
            Value::custom("Point", vec![Value::from(0.5), Value::from(-2.0)]),
        );
        Value::Map(m)
    }

    #[test]
    fn accessors_match_variants() {
        let v = sample();

        assert_eq!(v.get("a").and_then(Value::as_int), Some(1));
        assert_eq!(v.get("a").and_then(Value::as_float), Some(1.0));
        assert_eq!(v.get("b").and_then(Value::as_list).map(<[_]>::len), Some(3));
        assert_eq!(v.get("c").and_then(Value::tag), Some("Point"));
        assert_eq!(v.get("missing"), None);
        assert_eq!(v.as_str(), None);
        assert!(Value::default().is_null());
        assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn inexact_integers_are_not_floats() {
        let edge = 1i64 << 53;

        assert_eq!(Value::from(edge).as_float(), Some(edge as f64));
        assert_eq!(Value::from(-edge).as_float(), Some(-edge as f64));
        assert_eq!(Value::from(edge + 1).as_float(), None);
        assert_eq!(Value::from(i64::min_value()).as_float(), None);
    }

    #[test]
    fn nesting_up_to_max_depth_roundtrips() {
        let nested = |levels: usize| (1..levels).fold(Value::Null, |v, _| Value::List(vec![v]));
        let deepest = nested(MAX_DEPTH);

        let bytes = deepest.to_bytes().unwrap();
        let recovered = Value::from_bytes(&bytes).unwrap();

        assert_eq!(deepest, recovered);
        assert!(matches!(nested(MAX_DEPTH + 1).to_bytes(), Err(Error::Encoding(_))));
    }

    #[test]
    fn nesting_beyond_max_depth_fails_to_decode() {
        let mut bytes = Vec::new();
        for _ in 0..MAX_DEPTH {
            bytes.extend_from_slice(&8u32.to_be_bytes());
            bytes.extend_from_slice(&1u64.to_be_bytes());
            bytes.push(b't');
        }
        bytes.extend_from_slice(&0u32.to_be_bytes());

        let r = Value::from_bytes(&bytes);

        assert!(matches!(r, Err(Error::Decoding(_))));

        let ok = Value::from_bytes(&bytes[13..]).unwrap();
        assert_eq!(ok.tag(), Some("t"));
    }

    #[test]
    fn value_roundtrips_via_base64() {
        let original = sample();

        let exported = original.to_string();
        dbg!(&exported);

        let recovered = Value::from_str(&exported).unwrap();

        assert_eq!(original, recovered);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let r = Value::from_str("not base64!");

        assert!(matches!(r, Err(Error::Base64(_))));
    }

    #[test]
    fn valid_base64_with_bad_contents_is_rejected() {
        let r = Value::from_str("_____w");

        assert!(matches!(r, Err(Error::Decoding(_))));
    }
}
