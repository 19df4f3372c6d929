use std::collections::HashMap;
use std::sync::Arc;

use activity_core::Platform;
use activity_providers::Provider;

/// Resolves the [`Provider`] bound to each platform, so the orchestrator
/// (which deals with accounts across every platform at once) doesn't need
/// to know each provider's concrete type.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Platform, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.platform(), provider);
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn Provider>> {
        self.providers.get(&platform).cloned()
    }
}
