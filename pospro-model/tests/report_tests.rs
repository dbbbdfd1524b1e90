use chrono::{NaiveDate, TimeZone, Utc};
use pospro_model::{Cart, DateRange, NewProduct, Role, Sale, SalesReport, SessionUser, StaffPermissions};
use pospro_types::{BusinessId, OwnerId, ProductId, StaffId};

fn sale_on(day: u32, price: f64, cost: f64) -> Sale {
    let mut cart = Cart::new();
    cart.add(
        NewProduct {
            name: "Item".into(),
            urdu_name: String::new(),
            price,
            purchase_price: cost,
            category: "X".into(),
        }
        .with_id(ProductId::new()),
    );
    let mut sale = Sale::checkout(&mut cart, 0.0, "Ali", None).unwrap();
    sale.timestamp = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
    sale
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[test]
fn open_range_includes_everything() {
    let sales = vec![sale_on(1, 100.0, 60.0), sale_on(5, 200.0, 150.0)];
    let report = SalesReport::build(&sales, DateRange::default());
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.total_revenue, 300.0);
    assert_eq!(report.total_cost, 210.0);
    assert_eq!(report.total_profit, 90.0);
}

#[test]
fn range_is_inclusive_and_newest_first() {
    let sales = vec![
        sale_on(1, 100.0, 60.0),
        sale_on(3, 200.0, 100.0),
        sale_on(5, 300.0, 100.0),
        sale_on(7, 400.0, 100.0),
    ];
    let report = SalesReport::build(
        &sales,
        DateRange {
            from: Some(day(3)),
            to: Some(day(5)),
        },
    );
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.sales[0].total, 300.0);
    assert_eq!(report.sales[1].total, 200.0);
    assert_eq!(report.total_revenue, 500.0);
}

#[test]
fn range_end_covers_whole_day() {
    let mut late = sale_on(5, 50.0, 10.0);
    late.timestamp = Utc.with_ymd_and_hms(2025, 3, 5, 23, 59, 59).unwrap();
    let range = DateRange {
        from: None,
        to: Some(day(5)),
    };
    assert!(range.contains(late.timestamp));
    assert!(!range.contains(Utc.with_ymd_and_hms(2025, 3, 6, 0, 0, 0).unwrap()));
}

#[test]
fn empty_report() {
    let report = SalesReport::build(&[], DateRange::default());
    assert_eq!(report.transaction_count, 0);
    assert_eq!(report.total_profit, 0.0);
}

#[test]
fn session_user_roles() {
    let business_id = BusinessId::new();
    let owner = SessionUser::Owner {
        id: OwnerId::new(),
        business_id,
        name: "Rajab".into(),
        email: "owner@example.com".into(),
    };
    let staff = SessionUser::Staff {
        id: StaffId::new(),
        business_id,
        name: "Ali".into(),
        username: "ali".into(),
        permissions: StaffPermissions::default(),
    };
    assert_eq!(owner.role(), Role::Owner);
    assert!(owner.can_access_admin());
    assert_eq!(staff.role(), Role::Staff);
    assert!(!staff.can_access_admin());
    assert_eq!(staff.business_id(), business_id);
    assert_eq!(staff.name(), "Ali");
}
