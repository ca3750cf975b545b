//! Tool Registry - the authoritative mapping from tool name to descriptor.
//!
//! This module provides:
//! - An insertion-ordered registry with register / resolve / list_all
//! - A builder that folds independent descriptor sources into one registry
//!
//! Registration order is listing order. Registering a name twice replaces the
//! earlier descriptor in place, so the name keeps its original position.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::descriptor::{ToolDescriptor, ToolInfo};
use crate::core::error::{Error, Result};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - maps tool names to descriptors.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a registry from descriptor sources.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Insert a descriptor, replacing any previous one with the same name.
    ///
    /// Descriptors with an empty name are skipped.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        if descriptor.name.is_empty() {
            warn!("Skipping tool with an empty name");
            return;
        }
        match self.index.get(&descriptor.name) {
            Some(&slot) => {
                debug!("Replacing tool: {}", descriptor.name);
                self.tools[slot] = descriptor;
            }
            None => {
                debug!("Registering tool: {}", descriptor.name);
                self.index.insert(descriptor.name.clone(), self.tools.len());
                self.tools.push(descriptor);
            }
        }
    }

    /// Look up the descriptor registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&slot| &self.tools[slot])
    }

    /// Outward view of every tool, in registration order.
    pub fn list_all(&self) -> impl Iterator<Item = ToolInfo> + '_ {
        self.tools.iter().map(ToolDescriptor::info)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Keep only the tools named in `allowed`, preserving order.
    fn retain_named(&mut self, allowed: &[String]) {
        self.tools.retain(|t| allowed.contains(&t.name));
        self.index = self
            .tools
            .iter()
            .enumerate()
            .map(|(slot, t)| (t.name.clone(), slot))
            .collect();
    }
}

impl Extend<ToolDescriptor> for ToolRegistry {
    fn extend<I: IntoIterator<Item = ToolDescriptor>>(&mut self, iter: I) {
        for descriptor in iter {
            self.register(descriptor);
        }
    }
}

impl FromIterator<ToolDescriptor> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = ToolDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Folds any number of descriptor sources into one registry.
///
/// Sources are applied in the order they are added; on a name collision the
/// later source wins.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
    allow_list: Option<Vec<String>>,
}

impl ToolRegistryBuilder {
    /// Add every descriptor from `source`.
    pub fn with_source<I>(mut self, source: I) -> Self
    where
        I: IntoIterator<Item = ToolDescriptor>,
    {
        self.registry.extend(source);
        self
    }

    /// Add a single descriptor.
    pub fn with_tool(mut self, descriptor: ToolDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    /// Restrict the built registry to the named tools (`None` keeps all).
    pub fn with_allow_list(mut self, allow_list: Option<Vec<String>>) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Build the registry.
    ///
    /// Fails when the allow-list names a tool that no source provided.
    pub fn build(self) -> Result<ToolRegistry> {
        let mut registry = self.registry;

        if let Some(allowed) = self.allow_list {
            let unknown: Vec<&str> = allowed
                .iter()
                .filter(|name| registry.resolve(name).is_none())
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                return Err(Error::config(format!(
                    "Unknown tools in allow-list: {}",
                    unknown.join(", ")
                )));
            }
            registry.retain_named(&allowed);
        }

        Ok(registry)
    }
}
