//! Traits describing backend capabilities and the shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{
    CarbonEstimate, CarbonQuery, GeoPoint, Product, RecyclePoint, ScanImage, WasteClassification,
};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the backend.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// A product price could not be read as a decimal amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    /// The image to classify has no content.
    #[error("Image is empty")]
    EmptyImage,
    /// The backend response lacked a required field.
    #[error("Missing field in response: {0}")]
    MissingData(&'static str),
    /// Internal or input error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Source of eco products.
pub trait CatalogPort: Send + Sync {
    /// Fetch the full product listing.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or a product cannot be decoded.
    async fn products(&self) -> Result<Vec<Product>, PortError>;
}

#[async_trait]
/// Source of recycle points around a location.
pub trait RecyclePointPort: Send + Sync {
    /// Fetch recycle points close to `near`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn nearby(&self, near: &GeoPoint) -> Result<Vec<RecyclePoint>, PortError>;
}

#[async_trait]
/// Travel emission calculator.
pub trait CarbonPort: Send + Sync {
    /// Estimate emissions for the given trip.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the response has no estimate.
    async fn estimate(&self, query: &CarbonQuery) -> Result<CarbonEstimate, PortError>;
}

#[async_trait]
/// Image-based waste classifier.
pub trait ClassifierPort: Send + Sync {
    /// Upload an image and return the predicted waste class.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the upload fails.
    async fn classify(&self, image: ScanImage) -> Result<WasteClassification, PortError>;
}
