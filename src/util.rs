use futures::StreamExt;
use futures::stream::BoxStream;
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use tokio::sync::{broadcast, watch};

use crate::content::Difficulty;
use crate::search::types::ContentType;

/// Deserialize a field leniently: `null` or a value of the wrong shape reads
/// as the field's default instead of failing the whole document
pub fn deserialize_lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }

    Ok(T::deserialize(value).unwrap_or_else(|e| {
        tracing::debug!("Ignoring malformed value: {}", e);
        T::default()
    }))
}

/// Deserialize a list, dropping malformed items. Anything that is not a
/// list reads as an empty one.
pub fn deserialize_lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!("Expected a list, ignoring {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            T::deserialize(item)
                .inspect_err(|e| tracing::warn!("Skipping malformed item at index {}: {}", index, e))
                .ok()
        })
        .collect())
}

/// Custom deserializer for difficulty levels that never fails on odd input.
///
/// Accepts any casing of `beginner`, `intermediate` or `advanced`. Unknown
/// strings, `null` and values of any other shape read as "no difficulty".
pub fn deserialize_difficulty_lenient<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientVisitor {
        parse: Difficulty::parse,
        expecting: "a difficulty level string",
    })
}

/// Custom deserializer for content types with the same tolerance as
/// [`deserialize_difficulty_lenient`]
pub fn deserialize_content_type_lenient<'de, D>(
    deserializer: D,
) -> Result<Option<ContentType>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientVisitor {
        parse: ContentType::parse,
        expecting: "a content type string",
    })
}

/// Reads a string through `parse`; everything else reads as `None`
struct LenientVisitor<T> {
    parse: fn(&str) -> Option<T>,
    expecting: &'static str,
}

impl<'de, T> Visitor<'de> for LenientVisitor<T> {
    type Value = Option<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok((self.parse)(value))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_i64<E>(self, _value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_u64<E>(self, _value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_f64<E>(self, _value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Turn a watch receiver into a stream that yields the current value first,
/// then every later value. Ends when the sender is dropped.
pub fn watch_stream<T>(rx: watch::Receiver<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + Sync + 'static,
{
    futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let value = rx.borrow_and_update().clone();
        Some((value, (rx, false)))
    })
    .boxed()
}

/// Turn a broadcast receiver into a stream. Lagged receivers skip ahead
/// instead of ending the stream.
pub fn broadcast_stream<T>(rx: broadcast::Receiver<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + 'static,
{
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(value) => return Some((value, rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::trace!("broadcast stream lagged by {} values", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}
