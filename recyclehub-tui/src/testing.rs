use std::sync::Arc;

use recyclehub_core::service::RecycleHubService;
use reqwest::Client;

/// Service pointed at an unroutable backend; tests using it never hit the network.
pub(crate) fn test_service() -> Arc<RecycleHubService> {
    let backend = recyclehub_backend::backend(Client::new(), "http://127.0.0.1:9/api", None);
    Arc::new(RecycleHubService::new(Arc::new(backend)))
}
