//! Built-in instrument catalog and product search.

use std::collections::HashSet;

use crate::models::Product;

fn catalog_entry(id: &str, name: &str, price: u64, image_url: &str, seller_id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: String::new(),
        image_url: image_url.to_string(),
        seller_id: seller_id.to_string(),
        upi_qr: None,
    }
}

/// The instruments every buyer sees before any seller has listed anything.
pub fn default_catalog() -> Vec<Product> {
    vec![
        catalog_entry(
            "1",
            "Acoustic Guitar",
            8500,
            "https://images.unsplash.com/photo-1550291652-6ea9114a47b1?w=500&auto=format&fit=crop&q=60",
            "101",
        ),
        catalog_entry(
            "2",
            "Electric Keyboard",
            12000,
            "https://images.unsplash.com/photo-1556449895-a33c9dba33dd?w=500&auto=format&fit=crop&q=60",
            "102",
        ),
        catalog_entry(
            "3",
            "Professional Drum Set",
            25000,
            "https://images.unsplash.com/photo-1543443258-92b04ad5ec6b?w=500&auto=format&fit=crop&q=60",
            "101",
        ),
        catalog_entry(
            "4",
            "Violin - Beginner",
            7000,
            "https://images.unsplash.com/photo-1465821185615-20b3c2fbf41b?w=500&auto=format&fit=crop&q=60",
            "103",
        ),
    ]
}

/// Catalog entries first, then stored products not already listed by id.
pub fn merge_catalog(catalog: &[Product], stored: Vec<Product>) -> Vec<Product> {
    let mut seen: HashSet<String> = catalog.iter().map(|p| p.id.clone()).collect();
    let mut merged = catalog.to_vec();
    for product in stored {
        if seen.insert(product.id.clone()) {
            merged.push(product);
        }
    }
    merged
}

/// Case-insensitive substring match on the product name.
///
/// A blank query matches everything.
pub fn search_products(products: Vec<Product>, query: &str) -> Vec<Product> {
    let query = query.trim();
    if query.is_empty() {
        return products;
    }
    let needle = query.to_lowercase();
    products
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}
