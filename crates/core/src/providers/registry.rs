use super::rest::RestBackendProvider;
use super::traits::BackendProvider;

/// Registry of backend providers.
///
/// Providers are tried in registration order until one succeeds, so a
/// mirror or an offline fixture source can sit behind the primary
/// backend without any caller changes.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn BackendProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with the REST backend pre-configured.
    /// `base_url` overrides the production URL when set.
    pub fn new_with_defaults(base_url: Option<&str>) -> Self {
        let mut registry = Self::new();
        match base_url {
            Some(url) => registry.register(Box::new(RestBackendProvider::with_base_url(url))),
            None => registry.register(Box::new(RestBackendProvider::new())),
        }
        registry
    }

    /// Register a provider. Order determines fallback priority.
    pub fn register(&mut self, provider: Box<dyn BackendProvider>) {
        self.providers.push(provider);
    }

    /// All providers in fallback order.
    pub fn providers(&self) -> Vec<&dyn BackendProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    /// Whether any provider is registered at all.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
