//! Restaurant listing models
//!
//! Field names on the wire follow the stored document layout of the
//! `restaurant` collection (`menuURL`, `imagesUrl`, `saftyInstruction`).

use super::opening_time::{OpeningWindow, WeeklyDraft};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Restaurant category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Fast Food")]
    FastFood,
    #[serde(rename = "Fine Dining")]
    FineDining,
    #[serde(rename = "Casual Dining")]
    CasualDining,
    #[serde(rename = "Cafe")]
    Cafe,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::FastFood,
        Category::FineDining,
        Category::CasualDining,
        Category::Cafe,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FastFood => "Fast Food",
            Self::FineDining => "Fine Dining",
            Self::CasualDining => "Casual Dining",
            Self::Cafe => "Cafe",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discount offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Whether the restaurant offers a discount at all
    #[serde(default)]
    pub offered: bool,
    /// Percentage off, required when `offered` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Calendar dates the discount applies to
    #[serde(default)]
    pub dates: BTreeSet<NaiveDate>,
}

/// Editable listing fields, as posted by the owner's form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub address: String,
    /// Decimal string, e.g. "40.7128"
    #[serde(default)]
    pub latitude: String,
    /// Decimal string, e.g. "-74.0060"
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub starting_price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "saftyInstruction")]
    pub safety_instructions: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default, rename = "productService")]
    pub products_services: Vec<String>,
    #[serde(default, rename = "specialize")]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub atmosphere: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_deposit: Option<Decimal>,
    #[serde(default)]
    pub discount: Discount,
    /// Per-weekday edit state, positionally aligned with `WEEKDAYS`
    #[serde(default, rename = "openingTime")]
    pub opening_times: WeeklyDraft,
}

/// Stored listing document (everything except the document id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    pub name: String,
    pub category: Category,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub capacity: u32,
    pub starting_price: Decimal,
    pub description: String,
    #[serde(rename = "saftyInstruction")]
    pub safety_instructions: String,
    pub additional_info: String,
    pub payment_methods: Vec<String>,
    #[serde(rename = "productService")]
    pub products_services: Vec<String>,
    #[serde(rename = "specialize")]
    pub specializations: Vec<String>,
    pub atmosphere: Vec<String>,
    pub cuisines: Vec<String>,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_deposit: Option<Decimal>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(rename = "openingTime")]
    pub opening_times: Vec<OpeningWindow>,
    #[serde(rename = "imagesUrl")]
    pub image_urls: Vec<String>,
    #[serde(rename = "menuURL")]
    pub menu_url: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    /// Creation time, milliseconds since epoch
    #[serde(default)]
    pub created_at: i64,
}

impl ListingDetails {
    /// Assemble a stored document from the editable fields plus the values
    /// the form does not control (owner, uploaded file URLs, rendered hours).
    pub fn assemble(
        draft: ListingDraft,
        opening_times: Vec<OpeningWindow>,
        image_urls: Vec<String>,
        menu_url: String,
        owner_id: String,
        created_at: i64,
    ) -> Self {
        Self {
            name: draft.name,
            category: draft.category,
            address: draft.address,
            latitude: draft.latitude,
            longitude: draft.longitude,
            capacity: draft.capacity,
            starting_price: draft.starting_price,
            description: draft.description,
            safety_instructions: draft.safety_instructions,
            additional_info: draft.additional_info,
            payment_methods: draft.payment_methods,
            products_services: draft.products_services,
            specializations: draft.specializations,
            atmosphere: draft.atmosphere,
            cuisines: draft.cuisines,
            phone_number: draft.phone_number,
            minimum_deposit: draft.minimum_deposit,
            discount: draft.discount,
            opening_times,
            image_urls,
            menu_url,
            owner_id,
            created_at,
        }
    }
}

/// Listing document with its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(flatten)]
    pub details: ListingDetails,
}

/// Read model for the listing detail page
///
/// Additional info and safety instructions are stored as free text; the
/// detail page shows them as bullet items split on `.`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetailView {
    #[serde(flatten)]
    pub listing: Listing,
    pub additional_info_items: Vec<String>,
    pub safety_instruction_items: Vec<String>,
    /// First image, used as the cover picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl From<Listing> for ListingDetailView {
    fn from(listing: Listing) -> Self {
        let additional_info_items = sentence_items(&listing.details.additional_info);
        let safety_instruction_items = sentence_items(&listing.details.safety_instructions);
        let cover_image = listing.details.image_urls.first().cloned();
        Self {
            listing,
            additional_info_items,
            safety_instruction_items,
            cover_image,
        }
    }
}

fn sentence_items(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
