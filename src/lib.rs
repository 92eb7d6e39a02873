//! # MusicMate Store
//!
//! Local storage core of the MusicMate instrument marketplace. Products,
//! orders, user profiles and the login session live as JSON records in an
//! LMDB environment, accessed through typed repositories.
//!
//! ## Layers
//!
//! - [`kv_store::KeyValueStore`] - raw string slots ([`lmdb_store::LmdbStore`], [`kv_store::MemoryStore`])
//! - [`record_store::RecordStore`] - typed JSON values; reads degrade to empty instead of failing
//! - repositories - [`product_repository`], [`order_repository`], [`profile_repository`], [`session`]
//! - [`marketplace::Marketplace`] - the data-access object that owns the store, plus checkout and browse
//!
//! ## FFI Functions
//!
//! UI shells drive the store through C-compatible functions. Every function
//! that returns `*const c_char` hands back a JSON-encoded [`AppResponse`]
//! which must be released with [`free_response`].
//!
//! - [`create_marketplace`] / [`create_marketplace_with_config`] - open a store
//! - [`add_product`], [`get_products`], [`get_product`], [`remove_product`], [`get_seller_products`], [`browse_products`]
//! - [`place_order`], [`save_order`], [`get_orders`], [`get_buyer_orders`], [`get_seller_orders`]
//! - [`save_user_profile`], [`get_user_profile`]
//! - [`migrate_legacy_orders`], [`clear_marketplace`]
//! - [`close_marketplace`] - flush and release the store

pub mod app_response;
pub mod catalog;
pub mod kv_store;
pub mod legacy;
pub mod lmdb_store;
pub mod marketplace;
pub mod models;
pub mod order_repository;
pub mod product_repository;
pub mod profile_repository;
pub mod record_store;
pub mod session;
pub mod store_config;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::app_response::AppResponse;
use crate::marketplace::{CheckoutRequest, Marketplace};
use crate::models::{NewProduct, Order, UserProfile};
use crate::store_config::StoreConfig;

/// Opens (or creates) the store `<name>.lmdb` with default settings.
///
/// # Returns
///
/// A pointer to the [`Marketplace`], or null if the name is null, not UTF-8,
/// or the environment cannot be opened. Release it with [`close_marketplace`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use musicmate_store::{create_marketplace, close_marketplace, free_response};
///
/// let name = CString::new("musicmate").unwrap();
/// let market = create_marketplace(name.as_ptr());
/// assert!(!market.is_null());
/// free_response(close_marketplace(market));
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_marketplace(name: *const c_char) -> *mut Marketplace {
    let name = match c_ptr_to_str(name) {
        Some(name) => name,
        None => {
            warn!("create_marketplace: null or non UTF-8 name");
            return std::ptr::null_mut();
        }
    };
    open_marketplace(&StoreConfig::new(name))
}

/// Opens a store from a JSON [`StoreConfig`] such as
/// `{"name":"musicmate","mapSize":52428800}`.
///
/// Returns null on a null pointer, malformed JSON or an invalid config.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_marketplace_with_config(config_json: *const c_char) -> *mut Marketplace {
    let json = match c_ptr_to_str(config_json) {
        Some(json) => json,
        None => {
            warn!("create_marketplace_with_config: null or non UTF-8 config");
            return std::ptr::null_mut();
        }
    };
    match StoreConfig::from_json(&json) {
        Ok(config) => open_marketplace(&config),
        Err(e) => {
            warn!("Rejected store config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_marketplace(config: &StoreConfig) -> *mut Marketplace {
    info!("Opening marketplace store at {}", config.lmdb_dir().display());
    match Marketplace::open(config) {
        Ok(market) => Box::into_raw(Box::new(market)),
        Err(e) => {
            warn!("Failed to open marketplace store: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Lists a new product. `product_json` is a [`NewProduct`]; the response
/// carries the stored product including its generated id.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn add_product(state: *mut Marketplace, product_json: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "add_product") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let product: NewProduct = match parse_json_arg(product_json, "product JSON") {
        Ok(p) => p,
        Err(err) => return err,
    };
    match market.products().add_product(product) {
        Ok(stored) => json_response(&stored),
        Err(e) => response_to_c_string(&e),
    }
}

/// All seller-listed products, in listing order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_products(state: *mut Marketplace) -> *const c_char {
    match marketplace_ref(state, "get_products") {
        Ok(market) => json_response(&market.products().get_products()),
        Err(err) => err,
    }
}

/// One product by id, from seller listings or the catalog. Unknown ids
/// answer `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_product(state: *mut Marketplace, id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "get_product") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let id = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    match market.find_product(&id) {
        Some(product) => json_response(&product),
        None => response_to_c_string(&AppResponse::NotFound(format!(
            "No product found with id: {id}"
        ))),
    }
}

/// Removes a listing. Removing an unknown id succeeds without changes.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn remove_product(state: *mut Marketplace, id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "remove_product") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let id = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    match market.products().remove_product(&id) {
        Ok(()) => response_to_c_string(&AppResponse::success(format!("Product {id} removed"))),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_seller_products(state: *mut Marketplace, seller_id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "get_seller_products") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match c_ptr_to_string(seller_id, "seller id") {
        Ok(seller_id) => json_response(&market.products().get_seller_products(&seller_id)),
        Err(err) => err,
    }
}

/// Catalog plus seller listings whose name contains `query`
/// (case-insensitive). An empty query returns everything.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn browse_products(state: *mut Marketplace, query: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "browse_products") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match c_ptr_to_string(query, "query") {
        Ok(query) => json_response(&market.browse(&query)),
        Err(err) => err,
    }
}

/// Runs checkout for a [`CheckoutRequest`] and answers with the new order.
///
/// Answers `NotFound` for an unknown product and `ValidationError` for a
/// blank address or a UPI payment on a product without a QR code.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn place_order(state: *mut Marketplace, request_json: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "place_order") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let request: CheckoutRequest = match parse_json_arg(request_json, "checkout JSON") {
        Ok(r) => r,
        Err(err) => return err,
    };
    let product_id = request.product_id.clone();
    match market.place_order(request) {
        Ok(Some(order)) => json_response(&order),
        Ok(None) => response_to_c_string(&AppResponse::NotFound(format!(
            "No product found with id: {product_id}"
        ))),
        Err(e) => response_to_c_string(&e),
    }
}

/// Appends a fully formed [`Order`] as-is.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_order(state: *mut Marketplace, order_json: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "save_order") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let order: Order = match parse_json_arg(order_json, "order JSON") {
        Ok(o) => o,
        Err(err) => return err,
    };
    let id = order.id.clone();
    match market.orders().save_order(order) {
        Ok(()) => response_to_c_string(&AppResponse::success(format!("Order {id} saved"))),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_orders(state: *mut Marketplace) -> *const c_char {
    match marketplace_ref(state, "get_orders") {
        Ok(market) => json_response(&market.orders().get_orders()),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_buyer_orders(state: *mut Marketplace, buyer_id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "get_buyer_orders") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match c_ptr_to_string(buyer_id, "buyer id") {
        Ok(buyer_id) => json_response(&market.orders().get_buyer_orders(&buyer_id)),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_seller_orders(state: *mut Marketplace, seller_id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "get_seller_orders") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match c_ptr_to_string(seller_id, "seller id") {
        Ok(seller_id) => json_response(&market.orders().get_seller_orders(&seller_id)),
        Err(err) => err,
    }
}

/// Stores a [`UserProfile`], replacing any previous one with the same id.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_user_profile(state: *mut Marketplace, profile_json: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "save_user_profile") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let profile: UserProfile = match parse_json_arg(profile_json, "profile JSON") {
        Ok(p) => p,
        Err(err) => return err,
    };
    match market.profiles().save_user_profile(&profile) {
        Ok(()) => json_response(&profile),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_user_profile(state: *mut Marketplace, user_id: *const c_char) -> *const c_char {
    let market = match marketplace_ref(state, "get_user_profile") {
        Ok(m) => m,
        Err(err) => return err,
    };
    let user_id = match c_ptr_to_string(user_id, "user id") {
        Ok(id) => id,
        Err(err) => return err,
    };
    match market.profiles().get_user_profile(&user_id) {
        Some(profile) => json_response(&profile),
        None => response_to_c_string(&AppResponse::NotFound(format!(
            "No profile found for user: {user_id}"
        ))),
    }
}

/// Converts the signed-in user's `buyerOrders`/`sellerOrders` into orders.
/// The response carries a `{"migrated":n,"skipped":m}` report.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn migrate_legacy_orders(state: *mut Marketplace) -> *const c_char {
    let market = match marketplace_ref(state, "migrate_legacy_orders") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match market.migrate_legacy_orders() {
        Ok(report) => json_response(&report),
        Err(e) => response_to_c_string(&e),
    }
}

/// Deletes every record: products, orders, profiles, session and legacy lists.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_marketplace(state: *mut Marketplace) -> *const c_char {
    let market = match marketplace_ref(state, "clear_marketplace") {
        Ok(m) => m,
        Err(err) => return err,
    };
    match market.store().clear_all_records() {
        Ok(()) => response_to_c_string(&AppResponse::success("All records cleared successfully")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Flushes and releases a store opened by [`create_marketplace`].
///
/// The pointer must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_marketplace(state: *mut Marketplace) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_marketplace".to_string());
        return response_to_c_string(&error);
    }
    let market = unsafe { Box::from_raw(state) };
    match market.close() {
        Ok(()) => response_to_c_string(&AppResponse::success("Marketplace closed successfully")),
        Err(e) => {
            warn!("Closing marketplace failed: {e}");
            response_to_c_string(&e)
        }
    }
}

/// Releases a string returned by any function in this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr as *mut c_char));
    }
}

/// Serializes `value` and wraps it in [`AppResponse::Ok`].
fn json_response<T: Serialize>(value: &T) -> *const c_char {
    match serde_json::to_string(value) {
        Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Serializes `response` into a heap C string owned by the caller.
///
/// Returns null only if the response cannot be encoded.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

fn marketplace_ref<'a>(state: *mut Marketplace, fn_name: &str) -> Result<&'a Marketplace, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(market) => Ok(market),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn c_ptr_to_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok().map(str::to_string)
}

/// Converts a C string argument, answering `BadRequest` for null or invalid UTF-8.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn parse_json_arg<T: DeserializeOwned>(ptr: *const c_char, field_name: &str) -> Result<T, *const c_char> {
    let json = c_ptr_to_string(ptr, field_name)?;
    serde_json::from_str(&json).map_err(|e| {
        let error = AppResponse::SerializationError(format!("Invalid {field_name}: {e}"));
        response_to_c_string(&error)
    })
}
