//! Serde support for plain configuration blocks.
//!
//! Properties and tagged child blocks become map entries, bare values and
//! anonymous blocks become sequence elements. Scalars are parsed from their
//! text on demand, so `x = 5` deserializes into an `i64`, an `f64` or a
//! `String` depending on the target field.

use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, forward_to_deserialize_any};

use crate::data::{GsmlData, GsmlElement};
use crate::error::ParseError;
use std::fmt;

/// Deserializes a value of type `T` from a parsed block.
pub fn from_data<'a, T>(data: &'a GsmlData) -> Result<T, ParseError>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_data(data);
    T::deserialize(&mut deserializer).map_err(|e| ParseError::Deserialize(e.0))
}

#[derive(Debug)]
pub struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error(msg.to_string())
    }
}

enum Input<'de> {
    Block(&'de GsmlData),
    Scalar(&'de str),
}

pub struct Deserializer<'de> {
    input: Input<'de>,
}

impl<'de> Deserializer<'de> {
    pub fn from_data(input: &'de GsmlData) -> Self {
        Deserializer {
            input: Input::Block(input),
        }
    }

    fn from_scalar(input: &'de str) -> Self {
        Deserializer {
            input: Input::Scalar(input),
        }
    }

    fn scalar(&self, expected: &str) -> Result<&'de str, Error> {
        match self.input {
            Input::Scalar(s) => Ok(s),
            Input::Block(b) => Err(Error(format!(
                "Expected {}, found block '{}'",
                expected,
                b.tag_or_empty()
            ))),
        }
    }

    fn parse_scalar<T: std::str::FromStr>(&self, expected: &str) -> Result<T, Error> {
        let s = self.scalar(expected)?;
        s.parse::<T>()
            .map_err(|_| Error(format!("Invalid {}: {}", expected, s)))
    }
}

macro_rules! deserialize_number {
    ($method:ident, $ty:ty, $visit:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: Visitor<'de>,
        {
            visitor.$visit(self.parse_scalar::<$ty>(stringify!($ty))?)
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Input::Scalar(s) => visitor.visit_borrowed_str(s),
            Input::Block(b) => {
                // Heuristic: a block with keyed entries is a map, otherwise a list.
                if b.properties().next().is_some() || b.children().any(|c| c.tag().is_some()) {
                    self.deserialize_map(visitor)
                } else {
                    self.deserialize_seq(visitor)
                }
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.scalar("bool")? {
            "yes" | "true" => visitor.visit_bool(true),
            "no" | "false" => visitor.visit_bool(false),
            other => Err(Error(format!("Invalid bool: {}", other))),
        }
    }

    deserialize_number!(deserialize_i8, i8, visit_i8);
    deserialize_number!(deserialize_i16, i16, visit_i16);
    deserialize_number!(deserialize_i32, i32, visit_i32);
    deserialize_number!(deserialize_i64, i64, visit_i64);
    deserialize_number!(deserialize_u8, u8, visit_u8);
    deserialize_number!(deserialize_u16, u16, visit_u16);
    deserialize_number!(deserialize_u32, u32, visit_u32);
    deserialize_number!(deserialize_u64, u64, visit_u64);
    deserialize_number!(deserialize_f32, f32, visit_f32);
    deserialize_number!(deserialize_f64, f64, visit_f64);

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.scalar("string")?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // Absent keys are handled by the map visitor; if we are here there is a value.
        visitor.visit_some(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let s = self.scalar("enum variant")?;
        let variant: de::value::StrDeserializer<'_, Error> = s.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Input::Block(b) => visitor.visit_seq(BlockSeq {
                iter: b.elements().iter(),
            }),
            Input::Scalar(s) => Err(Error(format!("Expected list, found '{}'", s))),
        }
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Input::Block(b) => visitor.visit_map(BlockMap {
                iter: b.elements().iter(),
                value: None,
            }),
            Input::Scalar(s) => Err(Error(format!("Expected block, found '{}'", s))),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        char bytes byte_buf unit unit_struct tuple
        tuple_struct identifier ignored_any
    }
}

struct BlockSeq<'de> {
    iter: std::slice::Iter<'de, GsmlElement>,
}

impl<'de> SeqAccess<'de> for BlockSeq<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(GsmlElement::Value(v)) => {
                let mut de = Deserializer::from_scalar(v);
                seed.deserialize(&mut de).map(Some)
            }
            Some(GsmlElement::Child(c)) => {
                let mut de = Deserializer::from_data(c);
                seed.deserialize(&mut de).map(Some)
            }
            Some(GsmlElement::Property(p)) => Err(Error(format!(
                "Expected list element, got property '{}'",
                p.key
            ))),
            None => Ok(None),
        }
    }
}

struct BlockMap<'de> {
    iter: std::slice::Iter<'de, GsmlElement>,
    value: Option<Deserializer<'de>>,
}

impl<'de> MapAccess<'de> for BlockMap<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let (key, value) = match self.iter.next() {
            Some(GsmlElement::Property(p)) => {
                (p.key.as_str(), Deserializer::from_scalar(p.value.as_str()))
            }
            Some(GsmlElement::Child(c)) => match c.tag() {
                Some(tag) => (tag, Deserializer::from_data(c)),
                None => return Err(Error("Anonymous block inside a map".to_string())),
            },
            Some(GsmlElement::Value(v)) => {
                return Err(Error(format!("Expected key, got bare value '{}'", v)));
            }
            None => return Ok(None),
        };
        self.value = Some(value);
        let mut de = Deserializer::from_scalar(key);
        seed.deserialize(&mut de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let mut de = self.value.take().ok_or(Error(
            "MapAccess::next_value called before next_key".to_string(),
        ))?;
        seed.deserialize(&mut de)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    enum Mode {
        #[serde(rename = "fast")]
        Fast,
        #[serde(rename = "strict")]
        Strict,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Settings {
        mode: Mode,
        ratio: f64,
        #[serde(default)]
        missing: Option<i32>,
    }

    #[test]
    fn test_enum_and_float() {
        let data = parse_str("mode = strict ratio = 0.5").unwrap();
        let s: Settings = from_data(&data).unwrap();
        assert_eq!(
            s,
            Settings {
                mode: Mode::Strict,
                ratio: 0.5,
                missing: None
            }
        );
    }

    #[test]
    fn test_type_mismatch_reports_error() {
        let data = parse_str("mode = fast ratio = abc").unwrap();
        let r: Result<Settings, _> = from_data(&data);
        assert!(matches!(r, Err(ParseError::Deserialize(_))));
    }
}
