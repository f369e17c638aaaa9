// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Late-bound worker construction.
//!
//! Maps string identifiers to constructor functions, populated at
//! startup. This replaces dynamic class loading: `loadbot <id>` looks
//! the identifier up here instead of resolving a type at runtime.

use crate::Bot;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Constructor for a registered bot type.
pub type BotCtor = Box<dyn Fn() -> Arc<dyn Bot> + Send + Sync>;

/// Registry of known bot identifiers.
#[derive(Default)]
pub struct BotRegistry {
    ctors: HashMap<String, BotCtor>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under an identifier. Last registration
    /// wins.
    pub fn register<F>(&mut self, identifier: impl Into<String>, ctor: F)
    where
        F: Fn() -> Arc<dyn Bot> + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        debug!(identifier, "registering bot constructor");
        self.ctors.insert(identifier, Box::new(ctor));
    }

    /// Construct a bot for an identifier, if known.
    pub fn construct(&self, identifier: &str) -> Option<Arc<dyn Bot>> {
        self.ctors.get(identifier).map(|ctor| ctor())
    }

    /// Known identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ctors.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
