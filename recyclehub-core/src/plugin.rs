//! Bundle of ports implementing one backend.

use std::sync::Arc;

use crate::ports::{CarbonPort, CatalogPort, ClassifierPort, RecyclePointPort};

#[derive(Debug, Clone)]
/// Metadata describing where a backend lives.
pub struct BackendMeta {
    /// Human-friendly backend name.
    pub name: String,
    /// Base URL all requests are relative to.
    pub base_url: String,
    /// Base URL for recycle point lookups, usually the same as `base_url`.
    pub points_base_url: String,
}

/// Collection of ports served by a single backend.
pub struct Backend {
    /// Static metadata.
    pub meta: BackendMeta,
    /// Product listing.
    pub catalog: Arc<dyn CatalogPort>,
    /// Recycle point lookup.
    pub recycle_points: Arc<dyn RecyclePointPort>,
    /// Emission estimates.
    pub carbon: Arc<dyn CarbonPort>,
    /// Waste image classification.
    pub classifier: Arc<dyn ClassifierPort>,
}
