use std::sync::Arc;

use storefront::avatar_path::StorageBase;

use crate::domain::Platform;

// Application state shared by all handlers; immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<dyn Platform>,
    // Origin used to build public avatar URLs.
    pub storage: StorageBase,
    // Frontend origin for recovery redirects and CORS.
    pub frontend_url: Arc<str>,
}
