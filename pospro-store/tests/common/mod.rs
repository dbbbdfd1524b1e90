//! Shared fixtures for store tests.

#![allow(dead_code)]

use pospro_model::{BusinessType, NewStaff, OwnerSetup, StaffPermissions};
use pospro_store::PosStore;
use pospro_types::BusinessId;

pub const OWNER_EMAIL: &str = "ayesha@example.com";
pub const OWNER_PASSWORD: &str = "karahi123";
pub const MOBILE: &str = "03001234567";
pub const PASSCODE: &str = "4321";

/// A license key whose hash is on the builtin allow-list.
pub const VALID_KEY: &str = "POSPRO-ANWUZJE";
pub const VALID_KEY_HASH: i32 = 1904797046;

pub fn setup_form(business_type: BusinessType) -> OwnerSetup {
    OwnerSetup {
        owner_name: "Ayesha Khan".into(),
        email: "  Ayesha@Example.com ".into(),
        business_name: "Khan Tikka House".into(),
        business_type,
        mobile_number: MOBILE.into(),
        password: OWNER_PASSWORD.into(),
        confirm_password: OWNER_PASSWORD.into(),
        passcode: PASSCODE.into(),
    }
}

/// An in-memory store with one BBQ business set up and nobody signed in.
pub fn store_with_owner() -> (PosStore, BusinessId) {
    let store = PosStore::open_in_memory().unwrap();
    let business = store
        .setup_owner(&setup_form(BusinessType::BbqRestaurant))
        .unwrap();
    (store, business)
}

pub fn cashier(username: &str) -> NewStaff {
    NewStaff {
        name: "Bilal".into(),
        username: username.into(),
        contact: "03110000000".into(),
        cnic: "35202-1234567-1".into(),
        permissions: StaffPermissions::default(),
        password: "counter1".into(),
    }
}
