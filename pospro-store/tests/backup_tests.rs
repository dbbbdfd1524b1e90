mod common;

use chrono::{TimeZone, Utc};
use common::*;
use pospro_license::{AccountDirectory, KeyHash};
use pospro_model::{BusinessType, NewProduct, Sale};
use pospro_store::{Backup, PosStore, StoreError};
use pospro_types::SaleId;
use pretty_assertions::assert_eq;

fn seeded() -> (PosStore, pospro_types::BusinessId) {
    let (store, business) = store_with_owner();
    store.add_staff(business, &cashier("bilal")).unwrap();
    store
        .record_sale(
            business,
            &Sale {
                id: SaleId::new(),
                items: Vec::new(),
                subtotal: 500.0,
                tax_amount: 0.0,
                total: 500.0,
                staff_name: "Bilal".into(),
                customer_name: Some("Walk-in".into()),
                timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            },
        )
        .unwrap();
    store
        .set_activated_hash(business, KeyHash::from_raw(VALID_KEY_HASH))
        .unwrap();
    (store, business)
}

#[test]
fn export_contains_all_sections() {
    let (store, business) = seeded();
    let json = store.export_data(business).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in ["products", "staff", "sales", "details"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["staff"][0]["username"], "bilal");
    assert!(value["staff"][0].get("password_hash").is_none());
    assert_eq!(value["details"]["activated_license_key_hash"], VALID_KEY_HASH);

    let backup: Backup = serde_json::from_str(&json).unwrap();
    assert_eq!(backup, store.backup(business).unwrap());
}

#[test]
fn import_replaces_catalog_and_sales() {
    let (source, source_business) = seeded();
    source
        .add_product(
            source_business,
            NewProduct {
                name: "Malai Boti".into(),
                urdu_name: "ملائی بوٹی".into(),
                price: 650.0,
                purchase_price: 400.0,
                category: "BBQ".into(),
            },
        )
        .unwrap();
    let json = source.export_data(source_business).unwrap();

    let target = PosStore::open_in_memory().unwrap();
    let mut form = setup_form(BusinessType::Hotel);
    form.email = "other@example.com".into();
    form.passcode = "9999".into();
    let business = target.setup_owner(&form).unwrap();

    target.import_data(business, &json).unwrap();

    let mut names: Vec<String> = target
        .list_products(business)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();
    let mut expected: Vec<String> = source
        .list_products(source_business)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    expected.sort();
    assert_eq!(names, expected);

    let sales = target.list_sales(business).unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].total, 500.0);

    let details = target.business_details(business).unwrap();
    assert_eq!(details.business_name, "Khan Tikka House");
    assert_eq!(details.email, "other@example.com");
    assert_eq!(details.passcode, "9999");
    assert_eq!(details.activated_license_key_hash, None);
    assert!(target.list_staff(business).unwrap().is_empty());
}

#[test]
fn import_keeps_existing_license_and_staff() {
    let (store, business) = seeded();
    let mut backup = store.backup(business).unwrap();
    backup.details.activated_license_key_hash = Some(12345);
    backup.staff.clear();
    let json = serde_json::to_string(&backup).unwrap();

    store.import_data(business, &json).unwrap();

    assert_eq!(
        store.activated_hash(business).unwrap(),
        Some(KeyHash::from_raw(VALID_KEY_HASH))
    );
    assert_eq!(store.list_staff(business).unwrap().len(), 1);
}

#[test]
fn import_rejects_incomplete_backup_without_changes() {
    let (store, business) = seeded();
    let before = store.backup(business).unwrap();

    let err = store
        .import_data(business, r#"{"products": [], "sales": [], "details": {}}"#)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(msg) if msg.contains("staff")));

    assert!(matches!(
        store.import_data(business, "not json"),
        Err(StoreError::Serialization(_))
    ));
    assert_eq!(store.backup(business).unwrap(), before);
}

#[test]
fn reset_clears_operational_data_only() {
    let (store, business) = seeded();
    store.reset_application(business).unwrap();

    assert!(store.list_products(business).unwrap().is_empty());
    assert!(store.list_staff(business).unwrap().is_empty());
    assert!(store.list_sales(business).unwrap().is_empty());
    assert!(store.login(OWNER_EMAIL, OWNER_PASSWORD).unwrap().is_some());
    assert_eq!(
        store.activated_hash(business).unwrap(),
        Some(KeyHash::from_raw(VALID_KEY_HASH))
    );
}

#[test]
fn reset_signs_out_staff_but_not_owner() {
    let (store, business) = seeded();
    store.login("bilal", "counter1").unwrap().expect("staff login");
    store.reset_application(business).unwrap();
    assert_eq!(store.current_user().unwrap(), None);

    let owner = store.login(OWNER_EMAIL, OWNER_PASSWORD).unwrap().expect("owner login");
    store.reset_application(business).unwrap();
    assert_eq!(store.current_user().unwrap(), Some(owner));
}
