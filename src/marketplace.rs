//! The data-access object handed to every screen.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app_response::AppResponse;
use crate::catalog::{default_catalog, merge_catalog, search_products};
use crate::legacy::{
    LegacyOrderSummary, MigrationReport, LEGACY_BUYER_ORDERS_KEY, LEGACY_SELLER_ORDERS_KEY,
};
use crate::models::{Order, PaymentMethod, Product, UserRole};
use crate::order_repository::OrderRepository;
use crate::product_repository::ProductRepository;
use crate::profile_repository::ProfileRepository;
use crate::record_store::RecordStore;
use crate::session::SessionStore;
use crate::store_config::StoreConfig;

/// What the checkout screen submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub buyer_id: String,
    pub product_id: String,
    pub address: String,
    pub payment_method: PaymentMethod,
}

/// Owns the record store and hands out repository views over it.
///
/// ```
/// use musicmate_store::marketplace::Marketplace;
/// use musicmate_store::models::NewProduct;
///
/// let market = Marketplace::in_memory();
/// let guitar = market.products().add_product(NewProduct {
///     name: "Acoustic Guitar".to_string(),
///     price: 8500,
///     description: String::new(),
///     image_url: String::new(),
///     seller_id: "s1".to_string(),
///     upi_qr: None,
/// }).unwrap();
/// assert_eq!(market.products().get_product(&guitar.id), Some(guitar));
/// ```
pub struct Marketplace {
    store: RecordStore,
    catalog: Vec<Product>,
}

impl Marketplace {
    /// Wraps `store` with the built-in catalog.
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            catalog: default_catalog(),
        }
    }

    pub fn open(config: &StoreConfig) -> Result<Self, AppResponse> {
        Ok(Self::new(RecordStore::open(config)?))
    }

    pub fn in_memory() -> Self {
        Self::new(RecordStore::in_memory())
    }

    pub fn with_catalog(mut self, catalog: Vec<Product>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Flushes the backend and releases it.
    pub fn close(self) -> Result<(), AppResponse> {
        self.store.flush()?;
        info!("Marketplace store flushed and closed");
        Ok(())
    }

    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.store)
    }

    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.store)
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(&self.store)
    }

    pub fn session(&self) -> SessionStore<'_> {
        SessionStore::new(&self.store)
    }

    /// Everything a buyer can see, filtered by name.
    pub fn browse(&self, query: &str) -> Vec<Product> {
        let merged = merge_catalog(&self.catalog, self.products().get_products());
        search_products(merged, query)
    }

    /// Looks a product up in the same listing [`browse`](Self::browse) shows,
    /// so a catalog entry wins over a stored product with the same id.
    pub fn find_product(&self, id: &str) -> Option<Product> {
        merge_catalog(&self.catalog, self.products().get_products())
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Places an order for one product.
    ///
    /// `Ok(None)` means the product does not exist.
    pub fn place_order(&self, request: CheckoutRequest) -> Result<Option<Order>, AppResponse> {
        if request.address.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "A delivery address is required".to_string(),
            ));
        }
        let Some(product) = self.find_product(&request.product_id) else {
            return Ok(None);
        };
        if request.payment_method == PaymentMethod::Upi && !product.has_upi_qr() {
            return Err(AppResponse::ValidationError(format!(
                "Product {} has no UPI QR code; choose cash on delivery",
                product.id
            )));
        }

        let order = Order::for_product(
            &product,
            request.buyer_id,
            request.address,
            request.payment_method,
        );
        self.orders().save_order(order.clone())?;
        Ok(Some(order))
    }

    /// Moves `buyerOrders`/`sellerOrders` summaries of the signed-in user into
    /// `orders`.
    ///
    /// A legacy key is deleted only once every entry in it has been migrated
    /// (now or by an earlier run). Entries that cannot be decoded or mapped
    /// stay under their key and are counted as skipped.
    pub fn migrate_legacy_orders(&self) -> Result<MigrationReport, AppResponse> {
        let mut report = MigrationReport::default();
        let Some(owner_id) = self.session().user_id() else {
            info!("No session user; skipping legacy order migration");
            return Ok(report);
        };

        let orders = self.orders();
        let mut known: HashSet<String> = orders.get_orders().into_iter().map(|o| o.id).collect();
        let mut converted = Vec::new();
        let mut leftovers = Vec::new();

        for (key, role) in [
            (LEGACY_BUYER_ORDERS_KEY, UserRole::Buyer),
            (LEGACY_SELLER_ORDERS_KEY, UserRole::Seller),
        ] {
            let Some(raw) = self.store.read_scalar(key) else {
                continue;
            };
            let entries: Vec<Value> = match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Legacy list '{key}' is not a JSON array, leaving it in place: {e}");
                    report.skipped += 1;
                    continue;
                }
            };

            let mut retained = Vec::new();
            for entry in entries {
                let order = match serde_json::from_value::<LegacyOrderSummary>(entry.clone()) {
                    Ok(summary) => summary.into_order(role, &owner_id),
                    Err(e) => {
                        warn!("Undecodable entry in '{key}': {e}");
                        None
                    }
                };
                match order {
                    Some(order) if known.insert(order.id.clone()) => converted.push(order),
                    Some(order) => debug!("Legacy order {} already migrated", order.id),
                    None => {
                        report.skipped += 1;
                        retained.push(entry);
                    }
                }
            }
            leftovers.push((key, retained));
        }

        report.migrated = converted.len();
        orders.save_orders(converted)?;
        for (key, retained) in leftovers {
            if retained.is_empty() {
                self.store.remove(key)?;
            } else {
                self.store.write(key, &retained)?;
            }
        }
        info!(
            "Legacy order migration for {owner_id}: {} migrated, {} skipped",
            report.migrated, report.skipped
        );
        Ok(report)
    }
}
