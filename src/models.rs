//! Marketplace records as they are persisted.
//!
//! Field names serialize in camelCase, which is the layout the front-end has
//! always written (`imageUrl`, `sellerId`, `orderDate`, ...). Older builds also
//! wrote snake_case columns and a `upiQrUrl` field; those spellings are
//! accepted on input through serde aliases and never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key of the product collection.
pub const PRODUCTS_KEY: &str = "products";

/// Key of the order collection.
pub const ORDERS_KEY: &str = "orders";

/// Prefix of per-user profile keys (`profile_<id>`).
pub const PROFILE_KEY_PREFIX: &str = "profile_";

pub fn profile_key(user_id: &str) -> String {
    format!("{PROFILE_KEY_PREFIX}{user_id}")
}

/// Generates a record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// An instrument listed for sale.
///
/// `price` is in minor currency units and is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "image_url")]
    pub image_url: String,
    #[serde(alias = "seller_id")]
    pub seller_id: String,
    /// Payment QR image shown at checkout when the buyer picks UPI.
    #[serde(
        default,
        alias = "upiQrUrl",
        alias = "upi_qr_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub upi_qr: Option<String>,
}

impl Product {
    /// Blank values written by older builds count as no QR code.
    pub fn has_upi_qr(&self) -> bool {
        self.upi_qr.as_deref().is_some_and(|qr| !qr.trim().is_empty())
    }
}

/// A product as submitted by a seller, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "image_url")]
    pub image_url: String,
    #[serde(alias = "seller_id")]
    pub seller_id: String,
    #[serde(
        default,
        alias = "upiQrUrl",
        alias = "upi_qr_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub upi_qr: Option<String>,
}

impl NewProduct {
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            seller_id: self.seller_id,
            upi_qr: self.upi_qr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Upi,
}

/// Order status. Only the two values the checkout writes exist; there is no
/// transition between them in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

impl OrderStatus {
    /// Maps the free-form status strings of older builds onto the canonical set.
    ///
    /// Returns `None` for values with no canonical counterpart, such as
    /// `Cancelled`.
    pub fn from_legacy(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" | "processing" => Some(OrderStatus::Pending),
            "confirmed" | "delivered" => Some(OrderStatus::Confirmed),
            _ => None,
        }
    }
}

/// A placed order. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    /// Copy of the product taken when the order was placed.
    pub product_details: Product,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub total_amount: u64,
}

impl Order {
    /// Builds a pending order for `product`, snapshotting it and copying its price.
    pub fn for_product(
        product: &Product,
        buyer_id: impl Into<String>,
        address: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        Order {
            id: new_record_id(),
            product_id: product.id.clone(),
            buyer_id: buyer_id.into(),
            seller_id: product.seller_id.clone(),
            product_details: product.clone(),
            address: address.into(),
            payment_method,
            status: OrderStatus::Pending,
            order_date: Utc::now(),
            total_amount: product.price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Seller => "seller",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "buyer" => Some(UserRole::Buyer),
            "seller" => Some(UserRole::Seller),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: UserRole,
}
