//! Deserialization contexts — resolve persisted attribute type names on load.
//!
//! The store never interprets a context. It hands each attribute's type name to
//! [`DeserializationContext::resolve_type`] and keeps whatever name comes back.
//! An unresolved name makes the whole load fail as corrupted.

use std::collections::HashMap;

use crate::types::type_names;

/// Resolves a persisted type name to the name the value is restored under.
pub trait DeserializationContext {
    /// Return the canonical type name, or `None` if the type is unknown.
    fn resolve_type(&self, type_name: &str) -> Option<String>;
}

impl<F> DeserializationContext for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_type(&self, type_name: &str) -> Option<String> {
        self(type_name)
    }
}

/// Accepts every type name as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyType;

impl DeserializationContext for AnyType {
    fn resolve_type(&self, type_name: &str) -> Option<String> {
        Some(type_name.to_string())
    }
}

// ─────────────────────────────────────────────
// TypeRegistry
// ─────────────────────────────────────────────

/// An allowlist of known attribute types, with aliases for renamed ones.
///
/// Built-in scalar names (`string`, `integer`, `float`, `boolean`) are always
/// registered.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    /// Registered name → canonical name. Canonical names map to themselves.
    names: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let names = type_names::BUILTIN
            .iter()
            .map(|n| (n.to_string(), n.to_string()))
            .collect();
        Self { names }
    }

    /// Register a type under its own name.
    pub fn register(mut self, type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        self.names.insert(name.clone(), name);
        self
    }

    /// Restore values persisted as `old_name` under `current_name`.
    ///
    /// `current_name` is registered too if it wasn't already.
    pub fn alias(mut self, old_name: impl Into<String>, current_name: impl Into<String>) -> Self {
        let current = current_name.into();
        self.names
            .entry(current.clone())
            .or_insert_with(|| current.clone());
        self.names.insert(old_name.into(), current);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.names.contains_key(type_name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeserializationContext for TypeRegistry {
    fn resolve_type(&self, type_name: &str) -> Option<String> {
        self.names.get(type_name).cloned()
    }
}
