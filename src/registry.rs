//! Handler Registry
//!
//! Maps intent names to capability handlers. Built once at startup and
//! shared read-only behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::intent::IntentHandler;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn IntentHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every intent it declares
    pub fn register(&mut self, handler: Arc<dyn IntentHandler>) {
        let intents: Vec<&'static str> = handler.supported_intents().to_vec();
        self.register_for(&intents, handler);
    }

    /// Register a handler for an explicit set of intent names
    pub fn register_for(&mut self, intents: &[&str], handler: Arc<dyn IntentHandler>) {
        for intent in intents {
            if let Some(previous) = self
                .handlers
                .insert(intent.to_string(), Arc::clone(&handler))
            {
                warn!(
                    "⚠️ Intent '{}' was handled by '{}', now by '{}'",
                    intent,
                    previous.name(),
                    handler.name()
                );
            } else {
                debug!("Registered '{}' -> {}", intent, handler.name());
            }
        }
    }

    pub fn lookup(&self, intent: &str) -> Option<Arc<dyn IntentHandler>> {
        self.handlers.get(intent).cloned()
    }

    /// Intent name -> handler name, sorted by intent
    pub fn list(&self) -> BTreeMap<String, String> {
        self.handlers
            .iter()
            .map(|(intent, handler)| (intent.clone(), handler.name().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("intents", &self.handlers.len())
            .finish()
    }
}
