use crate::error::ValidationError;
use crate::product::NewProduct;
use pospro_types::BusinessId;
use serde::{Deserialize, Serialize};

/// Minimum owner/staff password length.
pub const MIN_PASSWORD_LEN: usize = 6;

const DEFAULT_RECEIPT_FOOTER: &str = "Thank you for your purchase!";

/// Kind of food business; selects the starter catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessType {
    FastFood,
    BbqRestaurant,
    Hotel,
}

impl BusinessType {
    /// Products preloaded when a business of this type is set up.
    #[must_use]
    pub fn sample_products(&self) -> Vec<NewProduct> {
        let rows: &[(&str, &str, f64, f64, &str)] = match self {
            Self::FastFood => &[
                ("Zinger Burger", "زنگر برگر", 450.0, 280.0, "Burgers"),
                ("Chicken Patty Burger", "چکن پیٹی برگر", 350.0, 220.0, "Burgers"),
                ("Cola", "کولا", 90.0, 50.0, "Drinks"),
            ],
            Self::BbqRestaurant => &[
                ("Chicken Tikka", "چکن تکہ", 450.0, 280.0, "BBQ"),
                ("Seekh Kebab (Chicken)", "سیخ کباب (چکن)", 180.0, 110.0, "BBQ"),
                ("Naan", "نان", 30.0, 15.0, "Breads"),
            ],
            Self::Hotel => &[
                ("Halwa Puri", "حلوہ پوری", 250.0, 150.0, "Breakfast"),
                ("Chicken Karahi (Full)", "چکن کڑاہی (فل)", 1600.0, 1000.0, "Main Course"),
                ("Tea", "چائے", 100.0, 50.0, "Drinks"),
            ],
        };
        rows.iter()
            .map(|&(name, urdu_name, price, purchase_price, category)| NewProduct {
                name: name.to_string(),
                urdu_name: urdu_name.to_string(),
                price,
                purchase_price,
                category: category.to_string(),
            })
            .collect()
    }
}

/// Language(s) shown on product tiles and receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLanguage {
    English,
    Urdu,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFontSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// The business record. One per installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    pub id: BusinessId,
    pub business_name: String,
    pub business_type: BusinessType,
    pub owner_name: String,
    pub email: String,
    pub mobile_number: String,
    /// Four-digit recovery passcode, kept in clear for owner recovery.
    pub passcode: String,
    pub display_language: DisplayLanguage,
    pub logo_url: String,
    pub receipt_footer: String,
    /// Percent, 0..=100.
    pub tax_rate: f64,
    pub receipt_font_size: ReceiptFontSize,
    #[serde(rename = "activated_license_key_hash", default)]
    pub activated_license_key_hash: Option<i32>,
}

impl BusinessDetails {
    /// Builds the initial record for a validated setup form.
    #[must_use]
    pub fn from_setup(id: BusinessId, setup: &OwnerSetup) -> Self {
        Self {
            id,
            business_name: setup.business_name.trim().to_string(),
            business_type: setup.business_type,
            owner_name: setup.owner_name.trim().to_string(),
            email: setup.normalized_email(),
            mobile_number: setup.mobile_number.trim().to_string(),
            passcode: setup.passcode.clone(),
            display_language: DisplayLanguage::default(),
            logo_url: String::new(),
            receipt_footer: DEFAULT_RECEIPT_FOOTER.to_string(),
            tax_rate: 0.0,
            receipt_font_size: ReceiptFontSize::default(),
            activated_license_key_hash: None,
        }
    }

    /// Applies the non-empty fields of a settings update.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTaxRate`] for a rate outside 0..=100.
    pub fn apply(&mut self, settings: &BusinessSettings) -> Result<(), ValidationError> {
        if let Some(rate) = settings.tax_rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(ValidationError::InvalidTaxRate);
            }
            self.tax_rate = rate;
        }
        if let Some(name) = &settings.business_name {
            self.business_name = name.clone();
        }
        if let Some(mobile) = &settings.mobile_number {
            self.mobile_number = mobile.clone();
        }
        if let Some(language) = settings.display_language {
            self.display_language = language;
        }
        if let Some(logo) = &settings.logo_url {
            self.logo_url = logo.clone();
        }
        if let Some(footer) = &settings.receipt_footer {
            self.receipt_footer = footer.clone();
        }
        if let Some(size) = settings.receipt_font_size {
            self.receipt_font_size = size;
        }
        Ok(())
    }
}

/// A partial update of the owner-editable business settings.
///
/// Has no license hash field; the activated hash only changes
/// through license activation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub business_name: Option<String>,
    pub mobile_number: Option<String>,
    pub display_language: Option<DisplayLanguage>,
    pub logo_url: Option<String>,
    pub receipt_footer: Option<String>,
    pub tax_rate: Option<f64>,
    pub receipt_font_size: Option<ReceiptFontSize>,
}

/// The first-run setup form.
#[derive(Debug, Clone)]
pub struct OwnerSetup {
    pub owner_name: String,
    pub email: String,
    pub business_name: String,
    pub business_type: BusinessType,
    pub mobile_number: String,
    pub password: String,
    pub confirm_password: String,
    pub passcode: String,
}

impl OwnerSetup {
    /// Checks the form the way the setup screen does.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (value, field) in [
            (&self.owner_name, "owner name"),
            (&self.email, "email"),
            (&self.business_name, "business name"),
            (&self.mobile_number, "mobile number"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Missing(field));
            }
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if self.passcode.len() != 4 || !self.passcode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPasscode);
        }
        Ok(())
    }

    /// Email as stored and matched at login.
    #[must_use]
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}
