use log::{debug, info};

use crate::app_response::AppResponse;
use crate::catalog::search_products;
use crate::models::{new_record_id, NewProduct, Product, PRODUCTS_KEY};
use crate::record_store::RecordStore;

/// Product listings stored under `products`.
///
/// Every call reads the whole collection; mutations write the whole
/// collection back.
pub struct ProductRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> ProductRepository<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Assigns an id to `product`, appends it and returns the stored record.
    pub fn add_product(&self, product: NewProduct) -> Result<Product, AppResponse> {
        if product.name.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "Product name must not be empty".to_string(),
            ));
        }
        let product = product.into_product(new_record_id());
        let mut products = self.get_products();
        products.push(product.clone());
        self.store.write(PRODUCTS_KEY, &products)?;
        info!("Seller {} listed product {}", product.seller_id, product.id);
        Ok(product)
    }

    pub fn get_products(&self) -> Vec<Product> {
        self.store.read_collection(PRODUCTS_KEY)
    }

    pub fn get_product(&self, id: &str) -> Option<Product> {
        self.get_products().into_iter().find(|p| p.id == id)
    }

    /// Drops the product with `id`. Unknown ids leave the collection untouched.
    pub fn remove_product(&self, id: &str) -> Result<(), AppResponse> {
        let products = self.get_products();
        let before = products.len();
        let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();
        if remaining.len() == before {
            debug!("remove_product: no product with id {id}");
            return Ok(());
        }
        self.store.write(PRODUCTS_KEY, &remaining)
    }

    pub fn get_seller_products(&self, seller_id: &str) -> Vec<Product> {
        self.get_products()
            .into_iter()
            .filter(|p| p.seller_id == seller_id)
            .collect()
    }

    pub fn search_seller_products(&self, seller_id: &str, query: &str) -> Vec<Product> {
        search_products(self.get_seller_products(seller_id), query)
    }
}
