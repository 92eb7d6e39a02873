//! Conversion of order summaries written by older builds.
//!
//! Those builds kept two role-specific lists, `buyerOrders` and
//! `sellerOrders`, holding flattened summaries instead of full orders. The
//! summaries carry no product id and only one side of the buyer/seller pair,
//! so the owner of the list has to be supplied when converting.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus, PaymentMethod, Product, UserRole};

pub const LEGACY_BUYER_ORDERS_KEY: &str = "buyerOrders";
pub const LEGACY_SELLER_ORDERS_KEY: &str = "sellerOrders";

/// Ids were random numbers in some builds and strings in others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyId {
    Text(String),
    Number(u64),
}

impl LegacyId {
    pub fn into_string(self) -> String {
        match self {
            LegacyId::Text(id) => id,
            LegacyId::Number(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOrderSummary {
    pub id: LegacyId,
    pub product_name: String,
    pub price: u64,
    pub order_date: String,
    pub status: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub buyer_address: Option<String>,
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_legacy_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

impl LegacyOrderSummary {
    /// Converts a summary found in `owner_id`'s list for `role`.
    ///
    /// Returns `None` when the status or date cannot be mapped.
    pub fn into_order(self, role: UserRole, owner_id: &str) -> Option<Order> {
        let id = self.id.into_string();
        let Some(status) = OrderStatus::from_legacy(&self.status) else {
            warn!("Legacy order {id} has unmappable status '{}'", self.status);
            return None;
        };
        let Some(order_date) = parse_legacy_date(&self.order_date) else {
            warn!("Legacy order {id} has unparseable date '{}'", self.order_date);
            return None;
        };

        let (buyer_id, seller_id) = match role {
            UserRole::Buyer => (owner_id.to_string(), self.seller_id.unwrap_or_default()),
            UserRole::Seller => (String::new(), owner_id.to_string()),
        };

        let product_details = Product {
            id: String::new(),
            name: self.product_name,
            price: self.price,
            description: String::new(),
            image_url: self.image_url,
            seller_id: seller_id.clone(),
            upi_qr: None,
        };

        Some(Order {
            id,
            product_id: String::new(),
            buyer_id,
            seller_id,
            total_amount: product_details.price,
            product_details,
            address: self.buyer_address.unwrap_or_default(),
            payment_method: PaymentMethod::Cod,
            status,
            order_date,
        })
    }
}

/// Counts reported by a legacy migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub migrated: usize,
    /// Entries left under their legacy key for a later run.
    pub skipped: usize,
}
