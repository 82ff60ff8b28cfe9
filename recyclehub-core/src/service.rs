//! High-level service facade over a backend.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::geo::NearestPointFinder;
use crate::model::{
    CarbonEstimate, CarbonQuery, GeoPoint, NearestPoint, Product, RecyclePoint, ScanImage,
    WasteClassification,
};
use crate::plugin::{Backend, BackendMeta};
use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq)]
/// Recycle points around a location together with the closest one.
pub struct RecyclePointSearch {
    /// Every point the backend returned, in backend order.
    pub points: Vec<RecyclePoint>,
    /// Closest point, `None` when `points` is empty.
    pub nearest: Option<NearestPoint>,
}

/// Public entry point for catalog, recycle point, carbon, and scan requests.
///
/// Cart state is not held here; callers own a [`crate::cart::CartStore`].
pub struct RecycleHubService {
    backend: Arc<Backend>,
}

impl RecycleHubService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    /// Metadata of the bound backend.
    #[must_use]
    pub fn backend(&self) -> &BackendMeta {
        &self.backend.meta
    }

    /// Load the product catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails.
    pub async fn products(&self) -> Result<Vec<Product>, PortError> {
        let products = self.backend.catalog.products().await?;
        info!(count = products.len(), "loaded catalog");
        Ok(products)
    }

    /// Fetch recycle points around `user` and pick the nearest.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails.
    pub async fn recycle_points_near(&self, user: GeoPoint) -> Result<RecyclePointSearch, PortError> {
        let points = self.backend.recycle_points.nearby(&user).await?;
        let nearest = NearestPointFinder::find(user, &points);

        match &nearest {
            Some(found) => info!(
                count = points.len(),
                nearest = %found.point.name,
                distance_km = found.distance_km,
                "located nearest recycle point"
            ),
            None => info!(%user, "no recycle points returned"),
        }

        Ok(RecyclePointSearch { points, nearest })
    }

    /// Estimate trip emissions.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Internal`] for a negative or non-finite distance, or a
    /// [`PortError`] from the backend call.
    pub async fn estimate_carbon(&self, query: CarbonQuery) -> Result<CarbonEstimate, PortError> {
        if !query.distance_value.is_finite() || query.distance_value < 0.0 {
            warn!(distance = query.distance_value, "rejected carbon query");
            return Err(PortError::Internal(format!(
                "distance must be a non-negative number, got {}",
                query.distance_value
            )));
        }

        debug!(?query, "estimating emissions");
        self.backend.carbon.estimate(&query).await
    }

    /// Classify a photo of waste.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::EmptyImage`] for an empty payload, or a [`PortError`]
    /// from the backend call.
    pub async fn classify(&self, image: ScanImage) -> Result<WasteClassification, PortError> {
        if image.bytes.is_empty() {
            warn!(filename = %image.filename, "refusing to upload empty image");
            return Err(PortError::EmptyImage);
        }

        debug!(filename = %image.filename, size = image.bytes.len(), "uploading scan");
        self.backend.classifier.classify(image).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::{ItemId, PointId};
    use crate::ports::{CarbonPort, CatalogPort, ClassifierPort, RecyclePointPort};

    struct Fixture;

    #[async_trait]
    impl CatalogPort for Fixture {
        async fn products(&self) -> Result<Vec<Product>, PortError> {
            Ok(vec![Product {
                id: ItemId::from("bamboo-brush"),
                name: "Bamboo brush".to_owned(),
                unit_price: Decimal::new(299, 2),
                image: None,
            }])
        }
    }

    #[async_trait]
    impl RecyclePointPort for Fixture {
        async fn nearby(&self, _near: &GeoPoint) -> Result<Vec<RecyclePoint>, PortError> {
            Ok(vec![
                RecyclePoint {
                    id: PointId("far".to_owned()),
                    name: "Far depot".to_owned(),
                    location: GeoPoint::new(0.0, 2.0),
                },
                RecyclePoint {
                    id: PointId("near".to_owned()),
                    name: "Near bin".to_owned(),
                    location: GeoPoint::new(0.0, 0.1),
                },
            ])
        }
    }

    #[async_trait]
    impl CarbonPort for Fixture {
        async fn estimate(&self, query: &CarbonQuery) -> Result<CarbonEstimate, PortError> {
            Ok(CarbonEstimate {
                co2e_kg: query.distance_value * 0.15,
            })
        }
    }

    #[async_trait]
    impl ClassifierPort for Fixture {
        async fn classify(&self, image: ScanImage) -> Result<WasteClassification, PortError> {
            Ok(WasteClassification {
                filename: image.filename,
                classification: "plastic bottle".to_owned(),
                waste_material: "PET".to_owned(),
                recyclable: true,
                guidelines: "Rinse and crush".to_owned(),
            })
        }
    }

    fn service() -> RecycleHubService {
        let fixture = Arc::new(Fixture);
        RecycleHubService::new(Arc::new(Backend {
            meta: BackendMeta {
                name: "fixture".to_owned(),
                base_url: "http://localhost".to_owned(),
                points_base_url: "http://localhost".to_owned(),
            },
            catalog: fixture.clone(),
            recycle_points: fixture.clone(),
            carbon: fixture.clone(),
            classifier: fixture,
        }))
    }

    #[tokio::test]
    async fn recycle_point_search_marks_nearest() {
        let search = service()
            .recycle_points_near(GeoPoint::new(0.0, 0.0))
            .await
            .expect("fixture never fails");

        assert_eq!(search.points.len(), 2);
        let nearest = search.nearest.expect("points were returned");
        assert_eq!(nearest.point.id, PointId("near".to_owned()));
    }

    #[tokio::test]
    async fn negative_distance_is_rejected_before_backend() {
        let result = service()
            .estimate_carbon(CarbonQuery::for_distance_km(-1.0))
            .await;
        assert!(matches!(result, Err(PortError::Internal(_))));
    }

    #[tokio::test]
    async fn carbon_estimate_is_forwarded() {
        let estimate = service()
            .estimate_carbon(CarbonQuery::for_distance_km(100.0))
            .await
            .expect("valid distance");
        assert!((estimate.co2e_kg - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_scan_is_rejected() {
        let result = service().classify(ScanImage::jpeg(Vec::new())).await;
        assert!(matches!(result, Err(PortError::EmptyImage)));
    }

    #[tokio::test]
    async fn scan_reaches_classifier() {
        let result = service()
            .classify(ScanImage::jpeg(vec![0xFF, 0xD8, 0xFF]))
            .await
            .expect("non-empty image");
        assert!(result.recyclable);
        assert_eq!(result.filename, "upload.jpg");
    }

    #[tokio::test]
    async fn products_are_loaded() {
        let products = service().products().await.expect("fixture never fails");
        assert_eq!(products.len(), 1);
    }
}
