//! Domain data structures for products, cart lines, recycle points, and backend results.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Backend-assigned identifier of a catalog product.
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        ItemId(raw.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Product listed in the eco catalog.
pub struct Product {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Price of a single unit, currency-agnostic.
    pub unit_price: Decimal,
    /// Optional image reference (usually a URL).
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One product's quantity entry within a cart.
pub struct CartLine {
    /// Product this line refers to.
    pub item_id: ItemId,
    /// Display name copied from the product.
    pub name: String,
    /// Unit price copied from the product.
    pub unit_price: Decimal,
    /// Image reference copied from the product.
    pub image: Option<String>,
    /// Number of units, always at least one.
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Latitude/longitude pair in degrees.
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl GeoPoint {
    /// Construct a point from degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a recycle point.
pub struct PointId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Physical location accepting recyclable materials.
pub struct RecyclePoint {
    /// Unique identifier.
    pub id: PointId,
    /// Display label.
    pub name: String,
    /// Where the point is.
    pub location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Recycle point annotated with its distance from the user.
pub struct NearestPoint {
    /// The matched point, unchanged.
    pub point: RecyclePoint,
    /// Great-circle distance in kilometers.
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Parameters for a travel emission estimate.
pub struct CarbonQuery {
    /// Emission factor dataset.
    pub cluster_name: String,
    /// Vehicle class.
    pub vehicle_type: String,
    /// Fuel used by the vehicle.
    pub fuel_type: String,
    /// Travelled distance.
    pub distance_value: f64,
    /// Unit of `distance_value`.
    pub distance_unit: String,
    /// Include well-to-tank emissions.
    pub include_wtt: bool,
}

impl CarbonQuery {
    /// Query for a petrol supermini over `distance_km` kilometers.
    #[must_use]
    pub fn for_distance_km(distance_km: f64) -> Self {
        Self {
            distance_value: distance_km,
            ..Self::default()
        }
    }
}

impl Default for CarbonQuery {
    fn default() -> Self {
        Self {
            cluster_name: "VE-Oct-2022".to_owned(),
            vehicle_type: "Car-Type-Supermini".to_owned(),
            fuel_type: "petrol".to_owned(),
            distance_value: 0.0,
            distance_unit: "km".to_owned(),
            include_wtt: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Result of a carbon estimate.
pub struct CarbonEstimate {
    /// Emitted CO2 equivalent in kilograms.
    pub co2e_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of classifying a photo of waste.
pub struct WasteClassification {
    /// Name the backend stored the upload under.
    pub filename: String,
    /// Predicted class label.
    pub classification: String,
    /// Material of the detected item.
    pub waste_material: String,
    /// Whether the item can be recycled.
    pub recyclable: bool,
    /// Disposal guidelines.
    pub guidelines: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Image payload submitted for classification.
pub struct ScanImage {
    /// File name reported to the backend.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime: String,
    /// Raw image data.
    pub bytes: Vec<u8>,
}

impl ScanImage {
    /// Wrap JPEG bytes using the default upload name.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            filename: "upload.jpg".to_owned(),
            mime: "image/jpeg".to_owned(),
            bytes,
        }
    }
}
