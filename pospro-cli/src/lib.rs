//! Wiring behind the `pospro` command-line front end.
//!
//! [`App`] opens the installation's store and the device's pending-license
//! ledger and runs the flows that span both: setup, login with license
//! reconciliation, activation and the license gate.

use anyhow::{Context, Result, anyhow, bail, ensure};
use pospro_license::{
    Activation, Entitlements, FilePendingLedger, KeyHash, PendingLedger, Reconciliation,
    SetupNotice,
};
use pospro_model::{Cart, MAX_LINE_QUANTITY, OwnerSetup, Product, Sale, SessionUser};
use pospro_store::PosStore;
use pospro_types::{BusinessId, ProductId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default database location under the platform's local data directory.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pospro").join("pospro.db"))
}

/// A snapshot for `pospro status`.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub set_up: bool,
    pub licensed: bool,
    pub pending: Option<KeyHash>,
    pub user: Option<SessionUser>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub user: SessionUser,
    pub license: Reconciliation,
}

/// One installation: its store plus this device's pending ledger.
pub struct App {
    store: PosStore,
    ledger: FilePendingLedger,
}

impl App {
    /// Opens the store at `db` and the ledger at `ledger`.
    pub fn open(db: &Path, ledger: impl Into<PathBuf>) -> Result<Self> {
        let store = PosStore::open(db)
            .with_context(|| format!("Failed to open database at {}", db.display()))?;
        Ok(Self::new(store, FilePendingLedger::new(ledger)))
    }

    pub fn new(store: PosStore, ledger: FilePendingLedger) -> Self {
        Self { store, ledger }
    }

    pub fn store(&self) -> &PosStore {
        &self.store
    }

    pub fn ledger(&self) -> &FilePendingLedger {
        &self.ledger
    }

    pub fn entitlements(&self) -> Entitlements<&PosStore, &FilePendingLedger> {
        Entitlements::new(&self.store, &self.ledger)
    }

    pub fn status(&self) -> Result<Status> {
        Ok(Status {
            set_up: self.store.has_owner()?,
            licensed: self.entitlements().try_is_licensed()?,
            pending: self
                .ledger
                .peek()
                .context("Failed to read the pending license")?,
            user: self.store.current_user()?,
        })
    }

    /// The license gate: once an owner exists, the app only runs licensed.
    pub fn require_license(&self) -> Result<()> {
        if !self.store.has_owner()? {
            return Ok(());
        }
        let licensed = self
            .entitlements()
            .try_is_licensed()
            .context("Failed to check the license")?;
        ensure!(
            licensed,
            "This installation is not licensed. Run `pospro activate <KEY>` first."
        );
        Ok(())
    }

    /// The signed-in user.
    pub fn require_user(&self) -> Result<SessionUser> {
        self.store
            .current_user()?
            .ok_or_else(|| anyhow!("Nobody is signed in. Run `pospro login` first."))
    }

    /// The signed-in user, who must be allowed on the admin dashboard.
    pub fn require_admin(&self) -> Result<SessionUser> {
        let user = self.require_user()?;
        ensure!(
            user.can_access_admin(),
            "{} is not allowed to manage this business",
            user.name()
        );
        Ok(user)
    }

    /// Creates the owner and business, then checks for a license that was
    /// activated before setup.
    pub fn setup(&self, form: &OwnerSetup) -> Result<(BusinessId, SetupNotice)> {
        let business = self.store.setup_owner(form)?;
        let notice = self
            .entitlements()
            .complete_setup()
            .context("Failed to read the pending license")?;
        Ok((business, notice))
    }

    /// Signs in and applies any pending license to the owner's business.
    ///
    /// Returns `Ok(None)` for bad credentials.
    pub fn login(&self, credential: &str, password: &str) -> Result<Option<Login>> {
        let Some(user) = self.store.login(credential, password)? else {
            return Ok(None);
        };
        let license = self
            .entitlements()
            .reconcile_after_login()
            .context("Signed in, but the pending license could not be applied")?;
        Ok(Some(Login { user, license }))
    }

    /// Activates a key for the signed-in owner, or parks it until setup.
    pub fn activate(&self, key: &str) -> Result<Activation> {
        match self.entitlements().try_activate(key) {
            Ok(activation) => Ok(activation),
            Err(e) if e.is_invalid_key() => bail!("Invalid license key"),
            Err(e) => Err(e).context("License activation failed"),
        }
    }

    /// Finds a product by id or by case-insensitive name.
    pub fn find_product(&self, business: BusinessId, query: &str) -> Result<Product> {
        let query = query.trim();
        if let Ok(id) = query.parse::<ProductId>() {
            return Ok(self.store.get_product(id)?);
        }
        let lowered = query.to_lowercase();
        self.store
            .list_products(business)?
            .into_iter()
            .find(|p| p.name.to_lowercase() == lowered)
            .ok_or_else(|| anyhow!("No product named \"{query}\""))
    }

    /// Rings up `items` for the signed-in user and records the sale.
    pub fn sell(&self, items: &[(String, u32)], customer: Option<&str>) -> Result<Sale> {
        let user = self.require_user()?;
        let business = user.business_id();

        let mut cart = Cart::new();
        for (query, quantity) in items {
            let product = self.find_product(business, query)?;
            let name = product.name.clone();
            cart.add_quantity(product, *quantity)
                .with_context(|| format!("Cannot add {quantity} x {name}"))?;
        }
        debug!(lines = cart.items().len(), units = cart.unit_count(), "Cart built");

        let sale = self
            .store
            .checkout(business, &mut cart, user.name(), customer)?;
        info!(sale_id = %sale.id, total = sale.total, "Sale completed");
        Ok(sale)
    }
}

/// Parses a `NAME[:QTY]` sale argument. The quantity defaults to 1.
pub fn parse_item(arg: &str) -> Result<(String, u32)> {
    let (name, quantity) = match arg.rsplit_once(':') {
        Some((name, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .with_context(|| format!("Bad quantity in \"{arg}\""))?;
            (name, qty)
        }
        None => (arg, 1),
    };
    ensure!(!name.trim().is_empty(), "Missing product name in \"{arg}\"");
    ensure!(
        (1..=MAX_LINE_QUANTITY).contains(&quantity),
        "Quantity must be between 1 and {MAX_LINE_QUANTITY} in \"{arg}\""
    );
    Ok((name.trim().to_string(), quantity))
}
