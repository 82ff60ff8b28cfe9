//! Backend implementation against the RecycleHub REST API.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use recyclehub_core::{
    model::{
        CarbonEstimate, CarbonQuery, GeoPoint, ItemId, PointId, Product, RecyclePoint, ScanImage,
        WasteClassification,
    },
    plugin::{Backend, BackendMeta},
    ports::{CarbonPort, CatalogPort, ClassifierPort, PortError, RecyclePointPort},
};

/// Production API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://recyclehub-production.up.railway.app/api";

/// Identifier that the API sends either as a number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(number) => number.to_string(),
            RawId::Text(text) => text,
        }
    }
}

/// Price as a JSON number or a display string such as "$12.50".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

/// Product entry from /api/products
#[derive(Debug, Deserialize)]
struct ProductEntry {
    #[serde(rename = "_id", alias = "id")]
    id: RawId,
    name: String,
    price: RawPrice,
    #[serde(default)]
    image: Option<String>,
}

/// Recycle point entry from /api/recycle-points
#[derive(Debug, Deserialize)]
struct PointEntry {
    #[serde(alias = "_id")]
    id: RawId,
    name: String,
    latitude: f64,
    longitude: f64,
}

/// Request body for /api/carbon
#[derive(Debug, Serialize)]
struct CarbonRequest<'req> {
    cluster_name: &'req str,
    vehicle_type: &'req str,
    fuel_type: &'req str,
    distance_value: f64,
    distance_unit: &'req str,
    include_wtt: &'static str,
}

/// Response wrapper from /api/carbon
#[derive(Debug, Deserialize)]
struct CarbonResponse {
    data: Option<CarbonData>,
}

#[derive(Debug, Deserialize)]
struct CarbonData {
    co2e_kg: f64,
}

/// Response from /api/upload
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    filename: String,
    classification: String,
    #[serde(default)]
    waste_material: String,
    recyclable: RawFlag,
    #[serde(default)]
    guidelines: String,
}

/// Flag that arrives as a boolean or as "Yes"/"No".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

impl RawFlag {
    fn is_set(&self) -> bool {
        match self {
            RawFlag::Bool(flag) => *flag,
            RawFlag::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "yes" | "y" | "true"
            ),
        }
    }
}

/// Shared HTTP state for every port of this backend.
#[derive(Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Catalog implementation.
pub struct HttpCatalogPort {
    endpoint: Endpoint,
}

#[async_trait]
impl CatalogPort for HttpCatalogPort {
    async fn products(&self) -> Result<Vec<Product>, PortError> {
        let req = self.endpoint.client.get(self.endpoint.url("products"));
        let entries = fetch_json::<Vec<ProductEntry>>(req).await?;
        entries.into_iter().map(map_product).collect()
    }
}

/// Recycle point lookup implementation.
pub struct HttpRecyclePointPort {
    endpoint: Endpoint,
}

#[async_trait]
impl RecyclePointPort for HttpRecyclePointPort {
    async fn nearby(&self, near: &GeoPoint) -> Result<Vec<RecyclePoint>, PortError> {
        let req = self
            .endpoint
            .client
            .get(self.endpoint.url("recycle-points"))
            .query(&[("lat", near.latitude), ("lng", near.longitude)]);

        let entries = fetch_json::<Vec<PointEntry>>(req).await?;
        Ok(entries.into_iter().map(map_point).collect())
    }
}

/// Emission estimate implementation.
pub struct HttpCarbonPort {
    endpoint: Endpoint,
}

#[async_trait]
impl CarbonPort for HttpCarbonPort {
    async fn estimate(&self, query: &CarbonQuery) -> Result<CarbonEstimate, PortError> {
        let body = CarbonRequest {
            cluster_name: &query.cluster_name,
            vehicle_type: &query.vehicle_type,
            fuel_type: &query.fuel_type,
            distance_value: query.distance_value,
            distance_unit: &query.distance_unit,
            include_wtt: if query.include_wtt { "Y" } else { "N" },
        };

        let req = self
            .endpoint
            .client
            .post(self.endpoint.url("carbon"))
            .json(&body);

        let resp = fetch_json::<CarbonResponse>(req).await?;
        let data = resp.data.ok_or(PortError::MissingData("data"))?;
        Ok(CarbonEstimate {
            co2e_kg: data.co2e_kg,
        })
    }
}

/// Waste scan implementation.
pub struct HttpClassifierPort {
    endpoint: Endpoint,
}

#[async_trait]
impl ClassifierPort for HttpClassifierPort {
    async fn classify(&self, image: ScanImage) -> Result<WasteClassification, PortError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.filename)
            .mime_str(&image.mime)?;
        let form = Form::new().part("image", part);

        let req = self
            .endpoint
            .client
            .post(self.endpoint.url("upload"))
            .multipart(form);

        let resp = fetch_json::<UploadResponse>(req).await?;
        Ok(map_classification(resp))
    }
}

/// Build the backend bundle for the API rooted at `base_url`.
///
/// Recycle point lookups go to `points_base_url` when one is given, since that
/// service can be deployed on a separate host.
#[must_use]
pub fn backend(
    client: Client,
    base_url: impl Into<String>,
    points_base_url: Option<String>,
) -> Backend {
    let endpoint = Endpoint {
        client,
        base_url: base_url.into(),
    };
    let points_endpoint = Endpoint {
        client: endpoint.client.clone(),
        base_url: points_base_url.unwrap_or_else(|| endpoint.base_url.clone()),
    };

    Backend {
        meta: BackendMeta {
            name: String::from("RecycleHub"),
            base_url: endpoint.base_url.clone(),
            points_base_url: points_endpoint.base_url.clone(),
        },
        catalog: Arc::new(HttpCatalogPort {
            endpoint: endpoint.clone(),
        }),
        recycle_points: Arc::new(HttpRecyclePointPort {
            endpoint: points_endpoint,
        }),
        carbon: Arc::new(HttpCarbonPort {
            endpoint: endpoint.clone(),
        }),
        classifier: Arc::new(HttpClassifierPort { endpoint }),
    }
}

fn map_product(entry: ProductEntry) -> Result<Product, PortError> {
    let unit_price = parse_price(entry.price)?;
    Ok(Product {
        id: ItemId(entry.id.into_string()),
        name: entry.name,
        unit_price,
        image: entry.image.filter(|image| !image.is_empty()),
    })
}

fn map_point(entry: PointEntry) -> RecyclePoint {
    RecyclePoint {
        id: PointId(entry.id.into_string()),
        name: entry.name,
        location: GeoPoint::new(entry.latitude, entry.longitude),
    }
}

fn map_classification(resp: UploadResponse) -> WasteClassification {
    WasteClassification {
        recyclable: resp.recyclable.is_set(),
        filename: resp.filename,
        classification: resp.classification,
        waste_material: resp.waste_material,
        guidelines: resp.guidelines,
    }
}

/// Read a price, tolerating currency symbols and thousands separators.
fn parse_price(raw: RawPrice) -> Result<Decimal, PortError> {
    let text = match raw {
        RawPrice::Number(number) => number.to_string(),
        RawPrice::Text(text) => text,
    };

    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();

    let price = Decimal::from_str(&cleaned).map_err(|_err| PortError::InvalidPrice(text.clone()))?;
    if price.is_sign_negative() {
        return Err(PortError::InvalidPrice(text));
    }
    Ok(price)
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let resp = req
        .send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?;

    debug!(url = %resp.url(), status = %resp.status(), "backend responded");

    resp.json().await.map_err(PortError::from)
}
