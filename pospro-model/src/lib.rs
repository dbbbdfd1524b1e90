//! Domain model for POS Pro.
//!
//! Defines the records every other crate passes around:
//! - [`BusinessDetails`] and the [`OwnerSetup`] form that creates them
//! - [`Product`] catalog entries
//! - [`Cart`], the checkout basket, and its [`CartSummary`]
//! - [`Sale`], a completed checkout, with cost and profit derived from
//!   the purchase prices captured at sale time
//! - [`StaffMember`] logins and [`Role`]s
//! - [`SalesReport`]: revenue, cost and profit over a date range
//!
//! Nothing here performs I/O. Amounts are plain `f64` rupees, matching the
//! receipts and backups the app has always produced.

mod business;
mod cart;
mod error;
mod product;
mod report;
mod sale;
mod staff;

pub use business::{
    BusinessDetails, BusinessSettings, BusinessType, DisplayLanguage, MIN_PASSWORD_LEN,
    OwnerSetup, ReceiptFontSize,
};
pub use cart::{Cart, CartItem, CartSummary, MAX_LINE_QUANTITY};
pub use error::ValidationError;
pub use product::{NewProduct, Product};
pub use report::{DateRange, SalesReport};
pub use sale::Sale;
pub use staff::{NewStaff, Role, SessionUser, StaffMember, StaffPermissions};
