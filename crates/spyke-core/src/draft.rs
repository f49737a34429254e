//! # Product Draft
//!
//! Form data a seller fills in while creating a listing.
//!
//! ## Field Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ProductDraft by wizard step                         │
//! │                                                                         │
//! │  1 Basics       title, type, category, industry,                       │
//! │                 shortDescription, fullDescription                      │
//! │  2 HowItWorks   howItWorks[] { title, description }                    │
//! │  3 Media        images[]                                               │
//! │  4 Pricing      price, originalPrice?                                  │
//! │  5 Details      tags[], setupTime, requirements[]                      │
//! │  6 Support      supportEmail, demoUrl?                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`DraftUpdate`] so the wizard can tell which
//! field changed and clear exactly that field's error.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// How It Works Step
// =============================================================================

/// One entry of the "How it works" section of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HowItWorksStep {
    pub title: String,
    pub description: String,
}

impl HowItWorksStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        HowItWorksStep {
            title: title.into(),
            description: description.into(),
        }
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// An unsubmitted listing.
///
/// Unknown JSON fields are ignored and missing ones default, so drafts saved
/// by older clients still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub title: String,

    /// Listing type, e.g. "agent", "workflow", "template".
    #[serde(rename = "type")]
    pub product_type: String,

    pub category: String,
    pub industry: String,
    pub short_description: String,
    pub full_description: String,

    pub how_it_works: Vec<HowItWorksStep>,

    /// Image URLs, first one is the cover.
    pub images: Vec<String>,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    #[serde(with = "money::major_units::option")]
    #[ts(type = "number | null")]
    pub original_price: Option<Money>,

    pub tags: Vec<String>,

    /// Free text such as "1-2 days".
    pub setup_time: String,

    pub requirements: Vec<String>,

    pub support_email: String,
    pub demo_url: Option<String>,
}

impl ProductDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single-field update and returns the field it touched.
    pub fn apply(&mut self, update: DraftUpdate) -> DraftField {
        let field = update.field();
        match update {
            DraftUpdate::Title(v) => self.title = v,
            DraftUpdate::ProductType(v) => self.product_type = v,
            DraftUpdate::Category(v) => self.category = v,
            DraftUpdate::Industry(v) => self.industry = v,
            DraftUpdate::ShortDescription(v) => self.short_description = v,
            DraftUpdate::FullDescription(v) => self.full_description = v,
            DraftUpdate::HowItWorks(v) => self.how_it_works = v,
            DraftUpdate::Images(v) => self.images = v,
            DraftUpdate::Price(v) => self.price = v,
            DraftUpdate::OriginalPrice(v) => self.original_price = v,
            DraftUpdate::Tags(v) => self.tags = v,
            DraftUpdate::SetupTime(v) => self.setup_time = v,
            DraftUpdate::Requirements(v) => self.requirements = v,
            DraftUpdate::SupportEmail(v) => self.support_email = v,
            DraftUpdate::DemoUrl(v) => self.demo_url = v,
        }
        field
    }
}

// =============================================================================
// Draft Field
// =============================================================================

/// Field names used as keys of the error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Title,
    #[serde(rename = "type")]
    ProductType,
    Category,
    Industry,
    ShortDescription,
    FullDescription,
    HowItWorks,
    Images,
    Price,
    OriginalPrice,
    Tags,
    SetupTime,
    Requirements,
    SupportEmail,
    DemoUrl,
}

impl DraftField {
    /// The camelCase name the web form uses for this field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::ProductType => "type",
            DraftField::Category => "category",
            DraftField::Industry => "industry",
            DraftField::ShortDescription => "shortDescription",
            DraftField::FullDescription => "fullDescription",
            DraftField::HowItWorks => "howItWorks",
            DraftField::Images => "images",
            DraftField::Price => "price",
            DraftField::OriginalPrice => "originalPrice",
            DraftField::Tags => "tags",
            DraftField::SetupTime => "setupTime",
            DraftField::Requirements => "requirements",
            DraftField::SupportEmail => "supportEmail",
            DraftField::DemoUrl => "demoUrl",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Draft Update
// =============================================================================

/// A single-field change to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    Title(String),
    ProductType(String),
    Category(String),
    Industry(String),
    ShortDescription(String),
    FullDescription(String),
    HowItWorks(Vec<HowItWorksStep>),
    Images(Vec<String>),
    Price(Money),
    OriginalPrice(Option<Money>),
    Tags(Vec<String>),
    SetupTime(String),
    Requirements(Vec<String>),
    SupportEmail(String),
    DemoUrl(Option<String>),
}

impl DraftUpdate {
    /// The field this update writes.
    pub const fn field(&self) -> DraftField {
        match self {
            DraftUpdate::Title(_) => DraftField::Title,
            DraftUpdate::ProductType(_) => DraftField::ProductType,
            DraftUpdate::Category(_) => DraftField::Category,
            DraftUpdate::Industry(_) => DraftField::Industry,
            DraftUpdate::ShortDescription(_) => DraftField::ShortDescription,
            DraftUpdate::FullDescription(_) => DraftField::FullDescription,
            DraftUpdate::HowItWorks(_) => DraftField::HowItWorks,
            DraftUpdate::Images(_) => DraftField::Images,
            DraftUpdate::Price(_) => DraftField::Price,
            DraftUpdate::OriginalPrice(_) => DraftField::OriginalPrice,
            DraftUpdate::Tags(_) => DraftField::Tags,
            DraftUpdate::SetupTime(_) => DraftField::SetupTime,
            DraftUpdate::Requirements(_) => DraftField::Requirements,
            DraftUpdate::SupportEmail(_) => DraftField::SupportEmail,
            DraftUpdate::DemoUrl(_) => DraftField::DemoUrl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_returns_touched_field() {
        let mut draft = ProductDraft::new();
        let field = draft.apply(DraftUpdate::Title("Invoice Bot".into()));

        assert_eq!(field, DraftField::Title);
        assert_eq!(draft.title, "Invoice Bot");
    }

    #[test]
    fn test_field_names_match_serde() {
        let json = serde_json::to_value(DraftField::ProductType).unwrap();
        assert_eq!(json, serde_json::json!("type"));

        let json = serde_json::to_value(DraftField::SupportEmail).unwrap();
        assert_eq!(json, serde_json::json!(DraftField::SupportEmail.as_str()));
    }

    #[test]
    fn test_partial_json_loads_with_defaults() {
        let draft: ProductDraft =
            serde_json::from_str(r#"{"title": "CRM Sync", "type": "workflow", "price": 49.5}"#)
                .unwrap();

        assert_eq!(draft.title, "CRM Sync");
        assert_eq!(draft.product_type, "workflow");
        assert_eq!(draft.price, Money::from_cents(4950));
        assert!(draft.tags.is_empty());
        assert_eq!(draft.original_price, None);
    }
}
