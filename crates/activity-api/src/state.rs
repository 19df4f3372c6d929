use std::sync::Arc;

use activity_crypto::TokenCipher;
use activity_ingest::AccountLocks;
use activity_rate_limit::Gate;
use activity_refresh::{BackgroundTasks, ProviderRegistry};
use activity_store::{Backend, Directory};

/// Shared handles every route handler needs: the Backend/Directory/Gate/
/// provider registry, plus the crypto and background-task hooks.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub backend: Arc<dyn Backend>,
    pub cipher: Arc<TokenCipher>,
    pub gate: Gate,
    pub locks: AccountLocks,
    pub providers: ProviderRegistry,
    pub background: Arc<dyn BackgroundTasks>,
}
