//! The signed-in user, kept as plain string slots.
//!
//! These keys hold raw strings, not JSON, so UI code that reads them directly
//! keeps working.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::models::{UserProfile, UserRole};
use crate::record_store::RecordStore;

pub const USER_ROLE_KEY: &str = "userRole";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_MOBILE_KEY: &str = "userMobile";
pub const USER_ID_KEY: &str = "userId";
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Option<UserRole>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub logged_in: bool,
}

pub struct SessionStore<'a> {
    store: &'a RecordStore,
}

impl<'a> SessionStore<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Session {
        Session {
            role: self
                .store
                .read_scalar(USER_ROLE_KEY)
                .and_then(|r| UserRole::parse(&r)),
            user_id: self.store.read_scalar(USER_ID_KEY),
            name: self.store.read_scalar(USER_NAME_KEY),
            email: self.store.read_scalar(USER_EMAIL_KEY),
            mobile: self.store.read_scalar(USER_MOBILE_KEY),
            logged_in: self.is_logged_in(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.read_scalar(LOGGED_IN_KEY).as_deref() == Some("true")
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.read_scalar(USER_ID_KEY)
    }

    /// Records `profile` as the signed-in user.
    pub fn sign_in(&self, profile: &UserProfile) -> Result<(), AppResponse> {
        self.store.write_scalar(LOGGED_IN_KEY, "true")?;
        self.store.write_scalar(USER_ID_KEY, &profile.id)?;
        self.store.write_scalar(USER_NAME_KEY, &profile.name)?;
        self.store.write_scalar(USER_EMAIL_KEY, &profile.email)?;
        self.store.write_scalar(USER_MOBILE_KEY, &profile.mobile)?;
        self.set_role(Some(profile.role))?;
        info!("User {} signed in as {}", profile.id, profile.role.as_str());
        Ok(())
    }

    pub fn set_role(&self, role: Option<UserRole>) -> Result<(), AppResponse> {
        match role {
            Some(role) => self.store.write_scalar(USER_ROLE_KEY, role.as_str()),
            None => self.store.remove(USER_ROLE_KEY).map(|_| ()),
        }
    }

    /// Forgets the login and contact details. Role and user id stay, so the
    /// next sign-in lands on the same home page.
    pub fn sign_out(&self) -> Result<(), AppResponse> {
        for key in [LOGGED_IN_KEY, USER_NAME_KEY, USER_EMAIL_KEY, USER_MOBILE_KEY] {
            self.store.remove(key)?;
        }
        info!("User signed out");
        Ok(())
    }
}
