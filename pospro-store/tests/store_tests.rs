mod common;

use common::*;
use pospro_model::{
    BusinessSettings, BusinessType, DisplayLanguage, NewProduct, ReceiptFontSize, ValidationError,
};
use pospro_store::{PosStore, StoreError};
use pospro_types::ProductId;
use pretty_assertions::assert_eq;

// ── Setup ────────────────────────────────────────────────────────

#[test]
fn fresh_store_has_no_owner() {
    let store = PosStore::open_in_memory().unwrap();
    assert!(!store.has_owner().unwrap());
    assert!(store.current_user().unwrap().is_none());
}

#[test]
fn setup_creates_business_with_defaults() {
    let (store, business) = store_with_owner();
    assert!(store.has_owner().unwrap());

    let details = store.business_details(business).unwrap();
    assert_eq!(details.id, business);
    assert_eq!(details.business_name, "Khan Tikka House");
    assert_eq!(details.business_type, BusinessType::BbqRestaurant);
    assert_eq!(details.email, OWNER_EMAIL);
    assert_eq!(details.passcode, PASSCODE);
    assert_eq!(details.display_language, DisplayLanguage::Both);
    assert_eq!(details.receipt_font_size, ReceiptFontSize::Medium);
    assert_eq!(details.receipt_footer, "Thank you for your purchase!");
    assert_eq!(details.tax_rate, 0.0);
    assert_eq!(details.activated_license_key_hash, None);
}

#[test]
fn setup_preloads_sample_products() {
    let (store, business) = store_with_owner();
    let mut names: Vec<String> = store
        .list_products(business)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();

    let mut expected: Vec<String> = BusinessType::BbqRestaurant
        .sample_products()
        .into_iter()
        .map(|p| p.name)
        .collect();
    expected.sort();
    assert_eq!(names, expected);
}

#[test]
fn setup_does_not_sign_in() {
    let (store, _) = store_with_owner();
    assert!(store.current_user().unwrap().is_none());
}

#[test]
fn second_setup_is_rejected() {
    let (store, _) = store_with_owner();
    let err = store
        .setup_owner(&setup_form(BusinessType::Hotel))
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadySetUp));
}

#[test]
fn invalid_setup_stores_nothing() {
    let store = PosStore::open_in_memory().unwrap();
    let mut form = setup_form(BusinessType::FastFood);
    form.passcode = "12a4".into();

    let err = store.setup_owner(&form).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidPasscode)
    ));
    assert!(!store.has_owner().unwrap());
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("pospro.db");

    let business = {
        let store = PosStore::open(&path).unwrap();
        store
            .setup_owner(&setup_form(BusinessType::Hotel))
            .unwrap()
    };

    let store = PosStore::open(&path).unwrap();
    assert!(store.has_owner().unwrap());
    assert_eq!(store.list_products(business).unwrap().len(), 3);
}

// ── Products ─────────────────────────────────────────────────────

fn lassi() -> NewProduct {
    NewProduct {
        name: "Sweet Lassi".into(),
        urdu_name: "میٹھی لسی".into(),
        price: 180.0,
        purchase_price: 90.0,
        category: "Drinks".into(),
    }
}

#[test]
fn add_update_delete_product() {
    let (store, business) = store_with_owner();

    let added = store.add_product(business, lassi()).unwrap();
    assert_eq!(store.get_product(added.id).unwrap(), added);
    assert_eq!(store.list_products(business).unwrap().len(), 4);

    let mut edited = added.clone();
    edited.price = 200.0;
    store.update_product(&edited).unwrap();
    assert_eq!(store.get_product(added.id).unwrap().price, 200.0);

    store.delete_product(added.id).unwrap();
    assert!(matches!(
        store.get_product(added.id),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(store.list_products(business).unwrap().len(), 3);
}

#[test]
fn product_validation_is_enforced() {
    let (store, business) = store_with_owner();

    let mut free = lassi();
    free.price = 0.0;
    assert!(matches!(
        store.add_product(business, free),
        Err(StoreError::Validation(ValidationError::InvalidPrice))
    ));

    let mut unnamed = lassi();
    unnamed.name = "  ".into();
    assert!(matches!(
        store.add_product(business, unnamed),
        Err(StoreError::Validation(ValidationError::Missing("name")))
    ));
}

#[test]
fn missing_products_are_not_found() {
    let (store, _) = store_with_owner();
    let ghost = lassi().with_id(ProductId::new());

    assert!(matches!(
        store.update_product(&ghost),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_product(ghost.id),
        Err(StoreError::NotFound(_))
    ));
}

// ── Business settings ────────────────────────────────────────────

#[test]
fn settings_update_applies_given_fields() {
    let (store, business) = store_with_owner();

    let updated = store
        .update_business_settings(
            business,
            &BusinessSettings {
                tax_rate: Some(16.0),
                receipt_footer: Some("Shukriya!".into()),
                display_language: Some(DisplayLanguage::Urdu),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.tax_rate, 16.0);
    assert_eq!(store.business_details(business).unwrap(), updated);
    assert_eq!(updated.business_name, "Khan Tikka House");
}

#[test]
fn out_of_range_tax_rate_changes_nothing() {
    let (store, business) = store_with_owner();
    let before = store.business_details(business).unwrap();

    let err = store
        .update_business_settings(
            business,
            &BusinessSettings {
                tax_rate: Some(120.0),
                business_name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidTaxRate)
    ));
    assert_eq!(store.business_details(business).unwrap(), before);
}
