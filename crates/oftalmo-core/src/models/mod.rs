pub mod attachment;
pub mod clinic;
pub mod collaborator;
pub mod evaluation;
pub mod eye;
pub mod patient;
pub mod refraction;
pub mod surgery;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) when deserializing partial updates.
pub(crate) fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
