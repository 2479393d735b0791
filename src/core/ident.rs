//! Object identifiers and the per-operation identifier registry.
//!
//! Identifiers are opaque 24-character uppercase hex tokens, the manifest
//! format's sole cross-referencing mechanism. They are derived by hashing
//! rather than drawn from a random source so that regenerating a manifest
//! from identical inputs reproduces it byte for byte.

use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::core::ModelError;

/// Length of a manifest object identifier in hex characters.
pub const ID_LEN: usize = 24;

/// Bounded retries before a collision is escalated to an error.
const MAX_ATTEMPTS: u32 = 16;

/// Opaque identifier for one manifest object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    fn derive(kind: &str, seed: &str, attempt: u32) -> ObjectId {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(b"\0");
        hasher.update(seed.as_bytes());
        hasher.update(b"\0");
        hasher.update(attempt.to_be_bytes());
        let digest = hex::encode(hasher.finalize());
        ObjectId(digest[..ID_LEN].to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of identifiers issued or observed during one generation or patch
/// operation.
///
/// Scoped to a single operation: callers pass it to every entity-creation
/// call instead of relying on process-global state. An identifier is never
/// handed out twice.
#[derive(Debug, Default)]
pub struct IdRegistry {
    issued: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        IdRegistry::default()
    }

    /// Mark an identifier already present in an existing manifest as taken.
    pub fn reserve(&mut self, raw: &str) {
        self.issued.insert(raw.to_ascii_uppercase());
    }

    /// Number of identifiers tracked.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Issue a fresh identifier for an entity of `kind` seeded by `seed`.
    ///
    /// Collisions are retried with a bumped attempt counter up to a bounded
    /// count, then escalated as [`ModelError::Collision`].
    pub fn mint(&mut self, kind: &str, seed: &str) -> Result<ObjectId, ModelError> {
        for attempt in 0..MAX_ATTEMPTS {
            let id = ObjectId::derive(kind, seed, attempt);
            if self.issued.insert(id.0.clone()) {
                if attempt > 0 {
                    tracing::debug!(kind, seed, attempt, "identifier collision resolved by retry");
                }
                return Ok(id);
            }
        }
        Err(ModelError::Collision {
            id: ObjectId::derive(kind, seed, MAX_ATTEMPTS - 1).0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = IdRegistry::new().mint("PBXFileReference", "App/Main.swift").unwrap();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = IdRegistry::new().mint("PBXBuildFile", "App/Main.swift").unwrap();
        let b = IdRegistry::new().mint("PBXBuildFile", "App/Main.swift").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_retries_to_a_fresh_id() {
        let mut ids = IdRegistry::new();
        let first = ids.mint("PBXGroup", "Products").unwrap();
        let second = ids.mint("PBXGroup", "Products").unwrap();
        assert_ne!(first, second);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_kind_separates_identifier_spaces() {
        let mut ids = IdRegistry::new();
        let file_ref = ids.mint("PBXFileReference", "A.swift").unwrap();
        let build_file = ids.mint("PBXBuildFile", "A.swift").unwrap();
        assert_ne!(file_ref, build_file);
    }

    #[test]
    fn test_reserved_ids_are_never_reissued() {
        let probe = IdRegistry::new().mint("PBXFileReference", "A.swift").unwrap();

        let mut ids = IdRegistry::new();
        ids.reserve(probe.as_str());
        let minted = ids.mint("PBXFileReference", "A.swift").unwrap();
        assert_ne!(minted, probe);
    }

    #[test]
    fn test_exhausted_retries_escalate() {
        // Occupy every id the derivation chain can produce for this seed.
        let mut probes = IdRegistry::new();
        let mut taken = Vec::new();
        for _ in 0..MAX_ATTEMPTS {
            taken.push(probes.mint("PBXBuildFile", "collide.swift").unwrap());
        }

        let mut ids = IdRegistry::new();
        for id in &taken {
            ids.reserve(id.as_str());
        }
        let err = ids.mint("PBXBuildFile", "collide.swift").unwrap_err();
        assert!(matches!(err, ModelError::Collision { .. }));
    }
}
