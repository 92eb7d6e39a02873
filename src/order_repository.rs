use log::info;

use crate::app_response::AppResponse;
use crate::models::{Order, ORDERS_KEY};
use crate::record_store::RecordStore;

/// Append-only order log stored under `orders`.
///
/// Appends happen in placement order, so every query below returns orders
/// chronologically. There is no update or delete.
pub struct OrderRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> OrderRepository<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn save_order(&self, order: Order) -> Result<(), AppResponse> {
        let mut orders = self.get_orders();
        info!(
            "Saving order {} (buyer {}, seller {}, total {})",
            order.id, order.buyer_id, order.seller_id, order.total_amount
        );
        orders.push(order);
        self.store.write(ORDERS_KEY, &orders)
    }

    /// Appends several orders with a single write.
    pub fn save_orders(&self, new_orders: Vec<Order>) -> Result<(), AppResponse> {
        if new_orders.is_empty() {
            return Ok(());
        }
        let mut orders = self.get_orders();
        orders.extend(new_orders);
        self.store.write(ORDERS_KEY, &orders)
    }

    pub fn get_orders(&self) -> Vec<Order> {
        self.store.read_collection(ORDERS_KEY)
    }

    pub fn get_order(&self, id: &str) -> Option<Order> {
        self.get_orders().into_iter().find(|o| o.id == id)
    }

    pub fn get_buyer_orders(&self, buyer_id: &str) -> Vec<Order> {
        self.get_orders()
            .into_iter()
            .filter(|o| o.buyer_id == buyer_id)
            .collect()
    }

    pub fn get_seller_orders(&self, seller_id: &str) -> Vec<Order> {
        self.get_orders()
            .into_iter()
            .filter(|o| o.seller_id == seller_id)
            .collect()
    }
}
