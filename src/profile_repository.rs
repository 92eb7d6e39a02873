use crate::app_response::AppResponse;
use crate::models::{profile_key, UserProfile};
use crate::record_store::RecordStore;

/// One profile per `profile_<id>` key. Saving replaces the whole record.
pub struct ProfileRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn save_user_profile(&self, profile: &UserProfile) -> Result<(), AppResponse> {
        self.store.write(&profile_key(&profile.id), profile)
    }

    pub fn get_user_profile(&self, user_id: &str) -> Option<UserProfile> {
        self.store.read(&profile_key(user_id))
    }
}
