// src/integrations/registry.rs — Integration registry

use std::collections::HashMap;

use crate::integrations::types::{Integration, MessagingAdapter};

/// Registry of connected integrations.
pub struct IntegrationRegistry {
    integrations: HashMap<String, Box<dyn Integration>>,
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self {
            integrations: HashMap::new(),
        }
    }

    /// Register an integration.
    pub fn register(&mut self, integration: Box<dyn Integration>) {
        let id = integration.id().to_string();
        self.integrations.insert(id, integration);
    }

    /// Get an integration by ID.
    pub fn get(&self, id: &str) -> Option<&dyn Integration> {
        self.integrations.get(id).map(|b| b.as_ref())
    }

    /// Messaging adapter of an integration, if it has one.
    pub fn messaging(&self, id: &str) -> Option<&dyn MessagingAdapter> {
        self.get(id).and_then(|i| i.messaging())
    }

    /// List all registered integration IDs, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.integrations.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
