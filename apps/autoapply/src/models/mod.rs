pub mod application;
pub mod job;
pub mod profile;
pub mod resume;

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing field.
/// The backend stores profiles loosely, so list fields can arrive as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
