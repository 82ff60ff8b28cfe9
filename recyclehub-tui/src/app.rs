use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use recyclehub_core::{
    model::{CarbonEstimate, GeoPoint, NearestPoint, Product, WasteClassification},
    cart::CartStore,
    geo::NearestPointFinder,
    pickup::{PickupError, PickupRequest, ScheduledPickup},
    service::{RecycleHubService, RecyclePointSearch},
};

use crate::config::CarbonConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Catalog,
    Cart,
    RecyclePoints,
    Carbon,
    Pickup,
    Scan,
}

impl Screen {
    pub(crate) const ALL: [Screen; 6] = [
        Screen::Catalog,
        Screen::Cart,
        Screen::RecyclePoints,
        Screen::Carbon,
        Screen::Pickup,
        Screen::Scan,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Screen::Catalog => "Shop",
            Screen::Cart => "Cart",
            Screen::RecyclePoints => "Recycle points",
            Screen::Carbon => "Carbon",
            Screen::Pickup => "Pickup",
            Screen::Scan => "Scan",
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|screen| *screen == self)
            .unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        let idx = (self.position() + 1) % Self::ALL.len();
        Self::ALL.get(idx).copied().unwrap_or(Screen::Catalog)
    }

    pub(crate) fn previous(self) -> Self {
        let idx = (self.position() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL.get(idx).copied().unwrap_or(Screen::Catalog)
    }

    /// Screens that take free text, where plain `q` must not quit.
    pub(crate) fn accepts_text(self) -> bool {
        matches!(self, Screen::Carbon | Screen::Pickup | Screen::Scan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickupField {
    Address,
    Articles,
    DaysAhead,
    Images,
}

impl PickupField {
    pub(crate) fn next(self) -> Self {
        match self {
            PickupField::Address => PickupField::Articles,
            PickupField::Articles => PickupField::DaysAhead,
            PickupField::DaysAhead => PickupField::Images,
            PickupField::Images => PickupField::Address,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<RecycleHubService>,
    pub carbon_config: CarbonConfig,

    pub screen: Screen,

    pub products: Vec<Product>,
    pub product_index: usize,

    pub cart: CartStore,
    pub cart_index: usize,

    pub user_location: GeoPoint,
    pub ranked_points: Vec<NearestPoint>,
    pub nearest: Option<NearestPoint>,
    pub point_index: usize,

    pub carbon_input: String,
    pub carbon_result: Option<CarbonEstimate>,

    pub pickup_address: String,
    pub pickup_articles: u32,
    pub pickup_days_ahead: u64,
    pub pickup_field: PickupField,
    pub pickup_image_input: String,
    pub pickup_images: Vec<PathBuf>,
    pub pickup_confirmation: Option<ScheduledPickup>,

    pub scan_input: String,
    pub scan_result: Option<WasteClassification>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<RecycleHubService>,
        cart: CartStore,
        user_location: GeoPoint,
        carbon_config: CarbonConfig,
    ) -> Self {
        Self {
            service,
            carbon_config,
            screen: Screen::Catalog,
            products: Vec::new(),
            product_index: 0,
            cart,
            cart_index: 0,
            user_location,
            ranked_points: Vec::new(),
            nearest: None,
            point_index: 0,
            carbon_input: String::new(),
            carbon_result: None,
            pickup_address: String::new(),
            pickup_articles: 1,
            pickup_days_ahead: 1,
            pickup_field: PickupField::Address,
            pickup_image_input: String::new(),
            pickup_images: Vec::new(),
            pickup_confirmation: None,
            scan_input: String::new(),
            scan_result: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn selected_product(&self) -> Option<&Product> {
        self.products.get(self.product_index)
    }

    pub(crate) fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.product_index = 0;
    }

    pub(crate) fn add_selected_to_cart(&mut self) {
        if let Some(product) = self.products.get(self.product_index) {
            self.cart.add_item(product);
        }
    }

    pub(crate) fn change_selected_product_quantity(&mut self, delta: i64) {
        if let Some(product) = self.products.get(self.product_index) {
            self.cart.change_quantity(product, delta);
        }
    }

    /// Cart lines carry every product field, so the line itself stands in for the product.
    pub(crate) fn change_selected_line_quantity(&mut self, delta: i64) {
        let Some(line) = self.cart.snapshot().lines.into_iter().nth(self.cart_index) else {
            return;
        };
        let product = Product {
            id: line.item_id,
            name: line.name,
            unit_price: line.unit_price,
            image: line.image,
        };
        self.cart.change_quantity(&product, delta);
        self.clamp_cart_index();
    }

    pub(crate) fn remove_selected_line(&mut self) {
        if let Some(line) = self.cart.snapshot().lines.get(self.cart_index) {
            self.cart.remove_item(&line.item_id);
        }
        self.clamp_cart_index();
    }

    fn clamp_cart_index(&mut self) {
        let count = self.cart.snapshot().line_count;
        self.cart_index = self.cart_index.min(count.saturating_sub(1));
    }

    pub(crate) fn apply_recycle_points(&mut self, search: RecyclePointSearch) {
        self.ranked_points = NearestPointFinder::rank(self.user_location, &search.points);
        self.nearest = search.nearest;
        self.point_index = 0;
        if self.nearest.is_none() {
            self.error_message = Some("No recycle points found.".into());
        }
    }

    pub(crate) fn pickup_request(&self, today: NaiveDate) -> PickupRequest {
        let date = today
            .checked_add_days(Days::new(self.pickup_days_ahead))
            .unwrap_or(today);
        let mut request = PickupRequest::new(date, self.pickup_address.clone());
        request.articles = self.pickup_articles;
        for image in &self.pickup_images {
            request.add_image(image.clone());
        }
        request
    }

    /// Attach the typed photo path to the pickup and clear the input.
    pub(crate) fn attach_pickup_image(&mut self) {
        let path = PathBuf::from(self.pickup_image_input.trim());
        if path.as_os_str().is_empty() {
            self.error_message = Some("Type an image path first".into());
            return;
        }
        if !path.is_file() {
            self.error_message = Some(format!("No image at {}", path.display()));
            return;
        }
        self.pickup_images.push(path);
        self.pickup_image_input.clear();
        self.error_message = None;
    }

    /// Detach the most recently attached photo.
    pub(crate) fn remove_last_pickup_image(&mut self) {
        self.pickup_images.pop();
    }

    pub(crate) fn schedule_pickup(&mut self, today: NaiveDate) -> Result<(), PickupError> {
        let scheduled = self.pickup_request(today).validate(today)?;
        self.pickup_confirmation = Some(scheduled);
        Ok(())
    }
}

/// Parse a user-typed distance in kilometers.
pub(crate) fn parse_distance(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|distance| distance.is_finite() && *distance >= 0.0)
}

/// Directions link to hand to an external maps application.
pub(crate) fn directions_url(destination: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.latitude, destination.longitude
    )
}
