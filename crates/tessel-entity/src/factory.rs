//! Registry of named entity constructors.
//!
//! Level loaders and spawning entities create kinds by string key so that
//! nothing needs a static dependency on every kind. A constructor receives the
//! spawn position and returns a ready [`Entity`].

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::entity::Entity;
use crate::EntityError;

/// Builds an entity of one kind at `(x, y)`.
pub type Constructor = Box<dyn Fn(f64, f64) -> anyhow::Result<Entity>>;

/// Maps type keys to constructors.
#[derive(Default)]
pub struct EntityFactory {
    constructors: HashMap<String, Constructor>,
}

impl EntityFactory {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `type_key`, replacing any previous one.
    pub fn register<F>(&mut self, type_key: &str, constructor: F)
    where
        F: Fn(f64, f64) -> anyhow::Result<Entity> + 'static,
    {
        if self
            .constructors
            .insert(type_key.to_owned(), Box::new(constructor))
            .is_some()
        {
            warn!(type_key, "entity factory overwritten");
        } else {
            debug!(type_key, "entity factory registered");
        }
    }

    /// Remove the constructor for `type_key`. Returns whether one existed.
    pub fn unregister(&mut self, type_key: &str) -> bool {
        self.constructors.remove(type_key).is_some()
    }

    /// Build an entity, turning every failure into an error value.
    ///
    /// Constructor errors and constructor panics are both caught.
    pub fn try_create(&self, type_key: &str, x: f64, y: f64) -> Result<Entity, EntityError> {
        let constructor = self
            .constructors
            .get(type_key)
            .ok_or_else(|| EntityError::UnknownType(type_key.to_owned()))?;

        match catch_unwind(AssertUnwindSafe(|| constructor(x, y))) {
            Ok(Ok(entity)) => Ok(entity),
            Ok(Err(source)) => Err(EntityError::ConstructionFailed {
                type_key: type_key.to_owned(),
                source,
            }),
            Err(_) => Err(EntityError::ConstructionPanicked(type_key.to_owned())),
        }
    }

    /// Build an entity, or `None` if the key is unknown or construction
    /// failed. Failures are logged.
    pub fn create(&self, type_key: &str, x: f64, y: f64) -> Option<Entity> {
        match self.try_create(type_key, x, y) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(type_key, x, y, error = %e, "entity creation failed");
                None
            }
        }
    }

    /// Whether a constructor is registered for `type_key`.
    pub fn has_factory(&self, type_key: &str) -> bool {
        self.constructors.contains_key(type_key)
    }

    /// Registered keys, sorted.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl std::fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityFactory")
            .field("types", &self.registered_types())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
