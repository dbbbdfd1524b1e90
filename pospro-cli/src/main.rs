//! POS Pro command-line front end.
//!
//! Usage:
//!   pospro activate POSPRO-XXXXXXX
//!   pospro setup --owner-name "Ayesha Khan" --email ayesha@example.com ...
//!   pospro login ayesha@example.com --password ...
//!   pospro sell "Chicken Tikka:2" Naan --customer "Table 4"
//!
//! Data lives in one SQLite file per installation; a license activated
//! before setup waits in a small ledger file on this device.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pospro_cli::{App, Login, default_db_path, parse_item};
use pospro_license::{Activation, FilePendingLedger, Reconciliation, SetupNotice};
use pospro_model::{
    BusinessSettings, BusinessType, DateRange, NewProduct, NewStaff, OwnerSetup, SessionUser,
    StaffPermissions,
};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pospro")]
#[command(about = "POS Pro point of sale")]
struct Args {
    /// Database file
    #[arg(long, env = "POSPRO_DB", global = true)]
    db: Option<PathBuf>,

    /// Pending-license ledger file
    #[arg(long, env = "POSPRO_PENDING_LEDGER", global = true)]
    ledger: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// First-run setup of the owner and business
    Setup {
        #[arg(long)]
        owner_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        business_name: String,
        #[arg(long, value_enum)]
        business_type: Kind,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        /// Four-digit recovery passcode
        #[arg(long)]
        passcode: String,
    },
    /// Sign in with an owner email or staff username
    Login {
        credential: String,
        #[arg(long, env = "POSPRO_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Activate a license key
    Activate { key: String },
    /// Setup, license and session state
    Status,
    #[command(subcommand)]
    Products(ProductsCommand),
    #[command(subcommand)]
    Staff(StaffCommand),
    /// Change business settings
    Settings {
        #[arg(long)]
        business_name: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        /// Tax rate in percent
        #[arg(long)]
        tax_rate: Option<f64>,
        #[arg(long)]
        receipt_footer: Option<String>,
    },
    /// Ring up a sale: each item is NAME[:QTY] or a product id
    Sell {
        #[arg(required = true)]
        items: Vec<String>,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Sales totals over an inclusive day range
    Report {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Write a JSON backup
    Export { file: PathBuf },
    /// Restore a JSON backup
    Import { file: PathBuf },
    /// Delete products, staff and sales
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Look up the owner login by mobile number and passcode
    Recover {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        passcode: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProductsCommand {
    List {
        /// Filter by name, Urdu name or category
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Add {
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0.0)]
        purchase_price: f64,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        urdu_name: String,
    },
    /// Remove by id or name
    Remove { product: String },
}

#[derive(Subcommand, Debug)]
enum StaffCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        cnic: String,
        /// Allow access to the admin dashboard
        #[arg(long)]
        admin: bool,
    },
    /// Remove by username
    Remove { username: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    FastFood,
    BbqRestaurant,
    Hotel,
}

impl From<Kind> for BusinessType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::FastFood => BusinessType::FastFood,
            Kind::BbqRestaurant => BusinessType::BbqRestaurant,
            Kind::Hotel => BusinessType::Hotel,
        }
    }
}

impl Command {
    /// Commands that stay available on an unlicensed installation.
    fn bypasses_license_gate(&self) -> bool {
        matches!(
            self,
            Self::Setup { .. }
                | Self::Login { .. }
                | Self::Activate { .. }
                | Self::Status
                | Self::Recover { .. }
        )
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let db = match args.db {
        Some(path) => path,
        None => default_db_path().context("No local data directory; pass --db")?,
    };
    let ledger = match args.ledger {
        Some(path) => path,
        None => FilePendingLedger::default_path()
            .context("No local data directory; pass --ledger")?,
    };
    debug!(db = %db.display(), ledger = %ledger.display(), "Opening installation");
    let app = App::open(&db, ledger)?;

    if !args.command.bypasses_license_gate() {
        app.require_license()?;
    }
    run(&app, args.command)
}

fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Setup {
            owner_name,
            email,
            business_name,
            business_type,
            mobile,
            password,
            confirm_password,
            passcode,
        } => {
            let form = OwnerSetup {
                owner_name,
                email,
                business_name,
                business_type: business_type.into(),
                mobile_number: mobile,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                passcode,
            };
            let (_, notice) = app.setup(&form)?;
            println!("Setup complete. Sign in with `pospro login {}`.", form.normalized_email());
            if let SetupNotice::LoginRequired { .. } = notice {
                println!("Please log in to finalize your license activation.");
            }
        }
        Command::Login {
            credential,
            password,
        } => match app.login(&credential, &password)? {
            Some(Login { user, license }) => {
                println!("Signed in as {} ({:?}).", user.name(), user.role());
                match license {
                    Reconciliation::Applied { .. } => println!("License activated."),
                    Reconciliation::NoAccount => {
                        println!("A license is pending; the owner must sign in to apply it.");
                    }
                    Reconciliation::NothingPending => {}
                }
            }
            None => bail!("Invalid credentials"),
        },
        Command::Logout => {
            app.store().logout()?;
            println!("Signed out.");
        }
        Command::Whoami => match app.store().current_user()? {
            Some(user) => print_user(&user),
            None => println!("Nobody is signed in."),
        },
        Command::Activate { key } => match app.activate(&key)? {
            Activation::Applied { .. } => println!("License activated."),
            Activation::Deferred { .. } => println!(
                "License accepted. It will be applied when the owner signs in after setup."
            ),
        },
        Command::Status => {
            let status = app.status()?;
            println!("Set up:   {}", if status.set_up { "yes" } else { "no" });
            println!("Licensed: {}", if status.licensed { "yes" } else { "no" });
            if status.pending.is_some() {
                println!("Pending:  a license awaits the owner's login");
            }
            match &status.user {
                Some(user) => print_user(user),
                None => println!("Nobody is signed in."),
            }
        }
        Command::Products(cmd) => run_products(app, cmd)?,
        Command::Staff(cmd) => run_staff(app, cmd)?,
        Command::Settings {
            business_name,
            mobile,
            tax_rate,
            receipt_footer,
        } => {
            let user = app.require_admin()?;
            let details = app.store().update_business_settings(
                user.business_id(),
                &BusinessSettings {
                    business_name,
                    mobile_number: mobile,
                    tax_rate,
                    receipt_footer,
                    ..Default::default()
                },
            )?;
            println!(
                "{}: tax {}%, footer \"{}\"",
                details.business_name, details.tax_rate, details.receipt_footer
            );
        }
        Command::Sell { items, customer } => {
            let items = items
                .iter()
                .map(|arg| parse_item(arg))
                .collect::<Result<Vec<_>>>()?;
            let sale = app.sell(&items, customer.as_deref())?;
            for line in &sale.items {
                println!(
                    "{:>3} x {:<28} {:>10.2}",
                    line.quantity,
                    line.product.name,
                    line.line_total()
                );
            }
            println!("Subtotal {:>35.2}", sale.subtotal);
            println!("Tax      {:>35.2}", sale.tax_amount);
            println!("Total    {:>35.2}", sale.total);
        }
        Command::Report { from, to } => {
            let user = app.require_admin()?;
            let report = app
                .store()
                .sales_report(user.business_id(), DateRange { from, to })?;
            println!("Transactions: {}", report.transaction_count);
            println!("Revenue:      {:.2}", report.total_revenue);
            println!("Cost:         {:.2}", report.total_cost);
            println!("Profit:       {:.2}", report.total_profit);
        }
        Command::Export { file } => {
            let user = app.require_admin()?;
            let json = app.store().export_data(user.business_id())?;
            fs::write(&file, json)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("Backup written to {}.", file.display());
        }
        Command::Import { file } => {
            let user = app.require_admin()?;
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            app.store().import_data(user.business_id(), &json)?;
            println!("Backup restored. Staff accounts were not imported.");
        }
        Command::Reset { yes } => {
            let user = app.require_admin()?;
            if !yes {
                bail!("This deletes all products, staff and sales. Re-run with --yes.");
            }
            app.store().reset_application(user.business_id())?;
            println!("Application data reset.");
        }
        Command::Recover { mobile, passcode } => {
            match app.store().recover_owner(&mobile, &passcode)? {
                Some((name, email)) => println!("Owner: {name} <{email}>"),
                None => bail!("No owner matches that mobile number and passcode"),
            }
        }
    }
    Ok(())
}

fn run_products(app: &App, cmd: ProductsCommand) -> Result<()> {
    match cmd {
        ProductsCommand::List { search, category } => {
            let user = app.require_user()?;
            for p in app
                .store()
                .list_products(user.business_id())?
                .iter()
                .filter(|p| p.matches_search(search.as_deref().unwrap_or_default()))
                .filter(|p| p.in_category(category.as_deref()))
            {
                println!("{}  {:<28} {:>10.2}  {}", p.id, p.name, p.price, p.category);
            }
        }
        ProductsCommand::Add {
            name,
            price,
            purchase_price,
            category,
            urdu_name,
        } => {
            let user = app.require_admin()?;
            let product = app.store().add_product(
                user.business_id(),
                NewProduct {
                    name,
                    urdu_name,
                    price,
                    purchase_price,
                    category,
                },
            )?;
            println!("Added {} ({}).", product.name, product.id);
        }
        ProductsCommand::Remove { product } => {
            let user = app.require_admin()?;
            let product = app.find_product(user.business_id(), &product)?;
            app.store().delete_product(product.id)?;
            println!("Removed {}.", product.name);
        }
    }
    Ok(())
}

fn run_staff(app: &App, cmd: StaffCommand) -> Result<()> {
    let user = app.require_admin()?;
    let business = user.business_id();
    match cmd {
        StaffCommand::List => {
            for member in app.store().list_staff(business)? {
                let admin = if member.permissions.can_access_admin_dashboard {
                    " (admin)"
                } else {
                    ""
                };
                println!("{:<16} {}{admin}", member.username, member.name);
            }
        }
        StaffCommand::Add {
            name,
            username,
            password,
            contact,
            cnic,
            admin,
        } => {
            let member = app.store().add_staff(
                business,
                &NewStaff {
                    name,
                    username,
                    contact,
                    cnic,
                    permissions: StaffPermissions {
                        can_access_admin_dashboard: admin,
                    },
                    password,
                },
            )?;
            println!("Added {} ({}).", member.name, member.username);
        }
        StaffCommand::Remove { username } => {
            let member = app
                .store()
                .list_staff(business)?
                .into_iter()
                .find(|m| m.username == username)
                .ok_or_else(|| anyhow!("No staff member \"{username}\""))?;
            app.store().delete_staff(member.id)?;
            println!("Removed {}.", member.username);
        }
    }
    Ok(())
}

fn print_user(user: &SessionUser) {
    match user {
        SessionUser::Owner { name, email, .. } => println!("Owner {name} <{email}>"),
        SessionUser::Staff { name, username, .. } => println!("Staff {name} ({username})"),
    }
}
