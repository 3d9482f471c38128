//! Cache Engine Module
//!
//! Resolves primary and secondary keys, picks the codec and talks to the
//! store for both raw key/value access and entity access.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::cachable::{entity_name, primary_key, resolve_expire, Cachable};
use crate::codec::{Codec, CodecError, Format};
use crate::error::{CacheError, CodecOp, Result, StoreOp};
use crate::store::{Pairs, Store};

// == Cache ==
/// Object cache on top of a batch key/value [`Store`].
///
/// An entity is stored as `primary key -> payload`. Each of its secondary
/// keys is stored as `secondary key -> primary key bytes`, so a store that
/// only supports exact-key lookup can still find the entity by an alternate
/// attribute at the cost of one extra round trip.
///
/// The store and default codec are fixed at construction. The engine holds
/// no other state and takes no locks; concurrent calls are as consistent as
/// the store's batch operations make them.
#[derive(Debug)]
pub struct Cache<S, C = Format> {
    store: S,
    codec: C,
}

impl<S: Store, C: Codec> Cache<S, C> {
    // == Constructor ==
    /// Creates a cache over `store` using `codec` unless an entity overrides it.
    pub fn new(store: S, codec: C) -> Self {
        Self { store, codec }
    }

    /// The backing store, e.g. for existence probes.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The default codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    // == Raw Access ==
    /// Encodes `value` with the default codec and stores it under `key`.
    pub fn write<T>(&self, key: &str, value: &T, expire_secs: Option<u64>) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let mut pairs = Pairs::with_capacity(1);
        pairs.set(key, encode_with(&self.codec, key, value)?);
        self.save_pairs(pairs, expire_secs.filter(|secs| *secs > 0))
    }

    /// Reads and decodes the value stored under `key`.
    ///
    /// Fails with [`CacheError::CacheMiss`] when nothing is stored.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let data = self
            .fetch(&[key])?
            .take(key)
            .ok_or_else(|| miss(key))?;

        self.codec
            .decode(&data)
            .map_err(CacheError::codec(CodecOp::Decode, key))
    }

    /// Removes `keys`. Keys that were never stored are ignored.
    pub fn delete(&self, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        debug!(count = keys.len(), "deleting keys");
        self.store
            .delete(keys)
            .map_err(CacheError::store(StoreOp::Delete))
    }

    /// Encodes every item with the default codec and stores them in one
    /// batch. Nothing is written if any item fails to encode.
    pub fn write_many<K, V, I>(&self, items: I, expire_secs: Option<u64>) -> Result<()>
    where
        K: Into<String>,
        V: Serialize,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut pairs = Pairs::new();
        for (key, value) in items {
            let key = key.into();
            let data = encode_with(&self.codec, &key, &value)?;
            pairs.set(key, data);
        }

        if pairs.is_empty() {
            return Ok(());
        }
        self.save_pairs(pairs, expire_secs.filter(|secs| *secs > 0))
    }

    /// Reads every stored key among `keys` and decodes it.
    ///
    /// Best effort: payloads that fail to decode are skipped (and logged)
    /// instead of failing the batch. The output order is unspecified and
    /// does not tell which key an item came from; use [`Cache::read`] per key
    /// when that correlation matters.
    pub fn read_many<T: DeserializeOwned>(&self, keys: &[&str]) -> Result<Vec<T>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.fetch(keys)?;
        let mut items = Vec::with_capacity(found.len());
        for (key, data) in found.iter() {
            match self.codec.decode(data) {
                Ok(item) => items.push(item),
                Err(err) => warn!(key, error = %err, "skipping undecodable cache entry"),
            }
        }
        Ok(items)
    }

    // == Entity Access ==
    /// Stores `entity` under its primary key and points each of its secondary
    /// keys at that primary key, all in one store call.
    ///
    /// `expire_secs` takes precedence over [`Cachable::cache_expire`]; zero
    /// or neither means no expiry.
    pub fn save<E: Cachable>(&self, entity: &E, expire_secs: Option<u64>) -> Result<()> {
        let key = primary_key(entity).ok_or(CacheError::InvalidKey {
            entity: entity_name::<E>(),
        })?;
        let data = self.encode_entity(&key, entity)?;
        let subkeys = secondary_keys(entity, Some(&key));

        let mut pairs = Pairs::with_capacity(1 + subkeys.len());
        pairs.set(key.as_str(), data);
        for subkey in subkeys {
            pairs.set(subkey, key.as_bytes());
        }

        let expire = resolve_expire(entity, expire_secs);
        debug!(
            key = %key,
            subkeys = pairs.len() - 1,
            expire_secs = ?expire,
            "saving entity"
        );
        self.save_pairs(pairs, expire)
    }

    /// Fills `entity` in place from the cache.
    ///
    /// The caller populates enough fields to derive either the primary key
    /// or at least one secondary key. Without a primary key, the secondary
    /// keys are looked up and the primary key they point at is used; a
    /// pointer whose payload is gone reads as a miss.
    pub fn load<E: Cachable>(&self, entity: &mut E) -> Result<()> {
        let key = match primary_key(entity) {
            Some(key) => key,
            None => self.resolve_primary_key(entity)?,
        };

        let data = self
            .fetch(&[key.as_str()])?
            .take(&key)
            .ok_or_else(|| miss(&key))?;

        *entity = self.decode_entity(&key, entity, &data)?;
        debug!(key = %key, "loaded entity");
        Ok(())
    }

    /// Removes the primary and secondary keys of every entity with a single
    /// store call.
    ///
    /// If any entity lacks a primary key the call fails before anything is
    /// deleted.
    pub fn invalidate<'a, E, I>(&self, entities: I) -> Result<()>
    where
        E: Cachable + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut keys = Vec::new();
        for entity in entities {
            let key = primary_key(entity).ok_or(CacheError::InvalidKey {
                entity: entity_name::<E>(),
            })?;
            let subkeys = secondary_keys(entity, Some(&key));
            keys.push(key);
            keys.extend(subkeys);
        }

        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.delete(&keys)
    }

    // == Helpers ==
    fn resolve_primary_key<E: Cachable>(&self, entity: &E) -> Result<String> {
        let subkeys = secondary_keys(entity, None);
        if subkeys.is_empty() {
            return Err(CacheError::KeyUnavailable {
                entity: entity_name::<E>(),
            });
        }

        let lookup: Vec<&str> = subkeys.iter().map(String::as_str).collect();
        let found = self.fetch(&lookup)?;

        let mut primary_keys: Vec<String> = found
            .values()
            .map(|pointer| String::from_utf8_lossy(pointer).into_owned())
            .collect();
        primary_keys.sort_unstable();
        primary_keys.dedup();

        if primary_keys.len() > 1 {
            return Err(CacheError::ConflictingSubkeys { primary_keys });
        }
        primary_keys.pop().ok_or_else(|| miss(&subkeys.join(", ")))
    }

    fn encode_entity<E: Cachable>(&self, key: &str, entity: &E) -> Result<Vec<u8>> {
        match entity.cache_codec() {
            Some(format) => encode_with(&format, key, entity),
            None => encode_with(&self.codec, key, entity),
        }
    }

    fn decode_entity<E: Cachable>(&self, key: &str, probe: &E, data: &[u8]) -> Result<E> {
        let decoded = match probe.cache_codec() {
            Some(format) => format.decode(data),
            None => self.codec.decode(data),
        };
        decoded.map_err(CacheError::codec(CodecOp::Decode, key))
    }

    fn fetch(&self, keys: &[&str]) -> Result<Pairs> {
        self.store.get(keys).map_err(CacheError::store(StoreOp::Get))
    }

    fn save_pairs(&self, pairs: Pairs, expire_secs: Option<u64>) -> Result<()> {
        self.store
            .save(pairs, expire_secs)
            .map_err(CacheError::store(StoreOp::Save))
    }
}

/// Non-empty secondary keys, minus any that would overwrite the payload.
fn secondary_keys<E: Cachable>(entity: &E, primary: Option<&str>) -> Vec<String> {
    entity
        .cache_subkeys()
        .into_iter()
        .filter(|subkey| {
            if subkey.is_empty() {
                return false;
            }
            if primary == Some(subkey.as_str()) {
                warn!(key = %subkey, "secondary key equals primary key, skipped");
                return false;
            }
            true
        })
        .collect()
}

fn encode_with<K, T>(codec: &K, key: &str, value: &T) -> Result<Vec<u8>>
where
    K: Codec,
    T: Serialize + ?Sized,
{
    let data = codec
        .encode(value)
        .map_err(CacheError::codec(CodecOp::Encode, key))?;
    if data.is_empty() {
        return Err(CacheError::codec(CodecOp::Encode, key)(CodecError::EmptyPayload));
    }
    Ok(data)
}

fn miss(key: &str) -> CacheError {
    CacheError::CacheMiss {
        key: key.to_string(),
    }
}
