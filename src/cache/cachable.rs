//! Entity Capability Set
//!
//! The hooks an entity type implements to be cached by [`Cache`](super::Cache).

use serde::{de::DeserializeOwned, Serialize};

use crate::codec::Format;

// == Cachable ==
/// A value cached under a primary key and optionally found through
/// secondary keys.
///
/// Only [`cache_key`](Cachable::cache_key) is mandatory. The other hooks have
/// neutral defaults and are consulted on every call, so they may depend on
/// whichever fields the caller populated.
///
/// ```
/// use entity_cache::Cachable;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct User {
///     id: u64,
///     email: String,
/// }
///
/// impl Cachable for User {
///     fn cache_key(&self) -> Option<String> {
///         (self.id > 0).then(|| format!("user:id:{}", self.id))
///     }
///
///     fn cache_subkeys(&self) -> Vec<String> {
///         if self.email.is_empty() {
///             Vec::new()
///         } else {
///             vec![format!("user:email:{}", self.email)]
///         }
///     }
/// }
/// ```
pub trait Cachable: Serialize + DeserializeOwned {
    /// Storage key of the serialized entity. `None` (or an empty string)
    /// means the entity has no stable identifier right now.
    fn cache_key(&self) -> Option<String>;

    /// Alternate lookup keys, each stored as a pointer to the primary key.
    fn cache_subkeys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Seconds to live when saved without an explicit expiry. `None` or
    /// `Some(0)` means no expiry.
    fn cache_expire(&self) -> Option<u64> {
        None
    }

    /// Codec used for this entity instead of the cache default.
    fn cache_codec(&self) -> Option<Format> {
        None
    }
}

/// Primary key with empty strings treated as absent.
pub(crate) fn primary_key<E: Cachable>(entity: &E) -> Option<String> {
    entity.cache_key().filter(|key| !key.is_empty())
}

/// Explicit expiry wins over the entity's own; zero means none.
pub(crate) fn resolve_expire<E: Cachable>(entity: &E, explicit: Option<u64>) -> Option<u64> {
    explicit
        .or_else(|| entity.cache_expire())
        .filter(|secs| *secs > 0)
}

pub(crate) fn entity_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}
