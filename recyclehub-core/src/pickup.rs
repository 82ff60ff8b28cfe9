//! Pickup requests for collecting recyclables at a given address.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a pickup request is rejected.
pub enum PickupError {
    /// Address is empty or whitespace.
    #[error("Please provide a pickup address")]
    MissingAddress,
    /// Fewer than one article was requested.
    #[error("At least one article is required")]
    NoArticles,
    /// Pickup date lies before today.
    #[error("Pickup date {0} is in the past")]
    DateInPast(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pickup request as edited by the user.
pub struct PickupRequest {
    /// Requested collection day.
    pub date: NaiveDate,
    /// Free-form collection address.
    pub address: String,
    /// Number of articles to collect.
    pub articles: u32,
    /// Photos of the articles.
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Request that passed validation.
pub struct ScheduledPickup {
    /// Collection day.
    pub date: NaiveDate,
    /// Trimmed address.
    pub address: String,
    /// Number of articles.
    pub articles: u32,
    /// Number of attached photos.
    pub image_count: usize,
}

impl PickupRequest {
    /// Start a request for `date` with a single article and no photos.
    #[must_use]
    pub fn new(date: NaiveDate, address: impl Into<String>) -> Self {
        Self {
            date,
            address: address.into(),
            articles: 1,
            images: Vec::new(),
        }
    }

    /// Attach a photo.
    pub fn add_image(&mut self, path: impl Into<PathBuf>) {
        self.images.push(path.into());
    }

    /// Detach the photo at `index`; returns it when the index was valid.
    pub fn remove_image(&mut self, index: usize) -> Option<PathBuf> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Check the request against `today`.
    ///
    /// # Errors
    ///
    /// Returns a [`PickupError`] for a blank address, zero articles, or a past date.
    pub fn validate(&self, today: NaiveDate) -> Result<ScheduledPickup, PickupError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(PickupError::MissingAddress);
        }
        if self.articles < 1 {
            return Err(PickupError::NoArticles);
        }
        if self.date < today {
            return Err(PickupError::DateInPast(self.date));
        }

        Ok(ScheduledPickup {
            date: self.date,
            address: address.to_owned(),
            articles: self.articles,
            image_count: self.images.len(),
        })
    }
}

impl ScheduledPickup {
    /// Confirmation text shown once the pickup is booked.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Date: {}\nAddress: {}\nArticles: {}\nImages: {} uploaded",
            self.date.format("%a %b %d %Y"),
            self.address,
            self.articles,
            self.image_count
        )
    }
}
