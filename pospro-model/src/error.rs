use thiserror::Error;

/// A form or record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("recovery passcode must be exactly 4 digits")]
    InvalidPasscode,

    #[error("price must be greater than zero")]
    InvalidPrice,

    #[error("tax rate must be between 0 and 100")]
    InvalidTaxRate,

    #[error("quantity must be between 1 and {0}")]
    InvalidQuantity(u32),

    #[error("cart is empty")]
    EmptyCart,
}
