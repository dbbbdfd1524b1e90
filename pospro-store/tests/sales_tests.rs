mod common;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::*;
use pospro_model::{BusinessSettings, Cart, DateRange, Sale, ValidationError};
use pospro_store::StoreError;
use pospro_types::SaleId;
use pretty_assertions::assert_eq;

fn sale_at(day: u32, total: f64) -> Sale {
    Sale {
        id: SaleId::new(),
        items: Vec::new(),
        subtotal: total,
        tax_amount: 0.0,
        total,
        staff_name: "Ayesha Khan".into(),
        customer_name: None,
        timestamp: Utc.with_ymd_and_hms(2025, 3, day, 12, 30, 0).unwrap(),
    }
}

#[test]
fn checkout_applies_business_tax_and_empties_cart() {
    let (store, business) = store_with_owner();
    store
        .update_business_settings(
            business,
            &BusinessSettings {
                tax_rate: Some(10.0),
                ..Default::default()
            },
        )
        .unwrap();

    let products = store.list_products(business).unwrap();
    let naan = products.iter().find(|p| p.name == "Naan").unwrap().clone();
    let mut cart = Cart::new();
    cart.add(naan.clone());
    cart.add(naan);

    let sale = store
        .checkout(business, &mut cart, "Ayesha Khan", Some("  Table 4 "))
        .unwrap();
    assert!(cart.is_empty());
    assert_eq!(sale.subtotal, 60.0);
    assert_eq!(sale.tax_amount, 6.0);
    assert_eq!(sale.total, 66.0);
    assert_eq!(sale.customer_name.as_deref(), Some("Table 4"));

    assert_eq!(store.list_sales(business).unwrap(), vec![sale]);
}

#[test]
fn empty_cart_checkout_fails_and_records_nothing() {
    let (store, business) = store_with_owner();
    let err = store
        .checkout(business, &mut Cart::new(), "Ayesha Khan", None)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyCart)
    ));
    assert!(store.list_sales(business).unwrap().is_empty());
}

#[test]
fn sales_are_listed_newest_first() {
    let (store, business) = store_with_owner();
    let older = sale_at(1, 100.0);
    let newer = sale_at(2, 200.0);
    store.record_sale(business, &older).unwrap();
    store.record_sale(business, &newer).unwrap();

    assert_eq!(store.list_sales(business).unwrap(), vec![newer, older]);
}

#[test]
fn timestamps_round_trip_exactly() {
    let (store, business) = store_with_owner();
    let mut sale = sale_at(5, 50.0);
    sale.timestamp += Duration::nanoseconds(123_456_789);
    store.record_sale(business, &sale).unwrap();

    assert_eq!(store.list_sales(business).unwrap()[0].timestamp, sale.timestamp);
}

#[test]
fn report_filters_by_inclusive_day_range() {
    let (store, business) = store_with_owner();
    for (day, total) in [(1, 100.0), (2, 200.0), (3, 400.0)] {
        store.record_sale(business, &sale_at(day, total)).unwrap();
    }

    let report = store
        .sales_report(
            business,
            DateRange {
                from: NaiveDate::from_ymd_opt(2025, 3, 2),
                to: NaiveDate::from_ymd_opt(2025, 3, 3),
            },
        )
        .unwrap();
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.total_revenue, 600.0);
}

#[test]
fn clear_sales_removes_history() {
    let (store, business) = store_with_owner();
    store.record_sale(business, &sale_at(1, 10.0)).unwrap();
    store.record_sale(business, &sale_at(2, 20.0)).unwrap();

    assert_eq!(store.clear_sales(business).unwrap(), 2);
    assert!(store.list_sales(business).unwrap().is_empty());
}
