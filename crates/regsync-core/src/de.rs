//! Deserialization helpers shared by the wire types.

use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` as `T::default()`.
///
/// Pair with `#[serde(default)]` so an absent field gets the same value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
