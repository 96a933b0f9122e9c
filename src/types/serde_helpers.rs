//! Custom serde helpers for Last.fm's loosely typed JSON.
//!
//! Last.fm encodes most numbers as strings, collapses single-element lists
//! into a bare object, and omits lists entirely when they would be empty.
//! These modules absorb those quirks at the deserialization boundary.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::Serializer;

/// Deserialize a list that may arrive as an array, a single object, or not at all.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use scrobble_stats::types::serde_helpers::one_or_many;
///
/// #[derive(Deserialize, Debug)]
/// struct Item {
///     name: String,
/// }
///
/// #[derive(Deserialize, Debug)]
/// struct Page {
///     #[serde(deserialize_with = "one_or_many::deserialize", default)]
///     item: Vec<Item>,
/// }
///
/// let page: Page = serde_json::from_str(r#"{"item":{"name":"Solo"}}"#).unwrap();
/// assert_eq!(page.item.len(), 1);
///
/// let page: Page = serde_json::from_str(r#"{"item":[{"name":"A"},{"name":"B"}]}"#).unwrap();
/// assert_eq!(page.item.len(), 2);
/// ```
pub mod one_or_many {
    use super::*;

    /// Deserialize an array, a lone object, or null into a `Vec<T>`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for OneOrManyVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = Vec<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an array, a single object, or null")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(items)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let item = T::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(vec![item])
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                // An empty list sometimes arrives as "" or "\n ".
                if v.trim().is_empty() {
                    Ok(Vec::new())
                } else {
                    let deserializer: de::value::StrDeserializer<'_, E> = v.into_deserializer();
                    Ok(vec![T::deserialize(deserializer)?])
                }
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Vec::new())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Vec::new())
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

/// Deserialize an unsigned integer sent either as a JSON number or a string.
///
/// An empty string reads as zero.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use scrobble_stats::types::serde_helpers::lenient_u64;
///
/// #[derive(Deserialize, Debug)]
/// struct User {
///     #[serde(deserialize_with = "lenient_u64::deserialize")]
///     playcount: u64,
/// }
///
/// let user: User = serde_json::from_str(r#"{"playcount":"12345"}"#).unwrap();
/// assert_eq!(user.playcount, 12345);
///
/// let user: User = serde_json::from_str(r#"{"playcount":12345}"#).unwrap();
/// assert_eq!(user.playcount, 12345);
/// ```
pub mod lenient_u64 {
    use super::*;

    /// Deserialize a number or numeric string into a `u64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LenientU64Visitor;

        impl<'de> Visitor<'de> for LenientU64Visitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an unsigned integer or a numeric string")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v).map_err(de::Error::custom)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let v = v.trim();
                if v.is_empty() {
                    return Ok(0);
                }
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(LenientU64Visitor)
    }
}

/// Serialize/deserialize an `Option<time::Date>` as `"YYYY-MM-DD"` or null.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use time::macros::date;
/// use scrobble_stats::types::serde_helpers::iso_date_option;
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Streak {
///     #[serde(with = "iso_date_option")]
///     end: Option<time::Date>,
/// }
///
/// let streak = Streak { end: Some(date!(2024 - 01 - 05)) };
/// let json = serde_json::to_string(&streak).unwrap();
/// assert_eq!(json, r#"{"end":"2024-01-05"}"#);
/// assert_eq!(serde_json::from_str::<Streak>(&json).unwrap(), streak);
/// ```
pub mod iso_date_option {
    use super::*;
    use time::Date;
    use time::macros::format_description;

    /// Serialize as an ISO calendar date or null.
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = date
                    .format(format_description!("[year]-[month]-[day]"))
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an ISO calendar date or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            Some(s) if !s.is_empty() => {
                Date::parse(&s, format_description!("[year]-[month]-[day]"))
                    .map(Some)
                    .map_err(de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// Helper for empty strings that should be deserialized as None.
///
/// Last.fm returns `""` for missing album names, URLs and image links.
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning None if empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty()))
    }
}
