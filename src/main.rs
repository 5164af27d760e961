//! `pos` command line front end.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use phone_shop_pos::config::{self, Config};
use phone_shop_pos::{
    CredentialProvider, EnvToken, PaymentAllocation, PosStore, Product, RegistrationStatus,
    ReportData, SaleJournal, SaleLineItem, SalePayload, Session, SheetsApi,
};

/// Phone shop point of sale backed by a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "pos")]
#[command(version, about, long_about = None)]
struct Args {
    /// Spreadsheet document id
    #[arg(long, env = "POS_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Spreadsheet API base URL
    #[arg(long, env = "POS_SHEETS_BASE_URL")]
    base_url: Option<String>,

    /// Sale journal file
    #[arg(long, env = "POS_JOURNAL_PATH")]
    journal: Option<PathBuf>,

    /// Email of the signed-in user (required for sales)
    #[arg(long, env = "POS_USER_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check access to the spreadsheet
    Check,
    /// List products
    Products,
    /// Register a generic product
    AddGeneric {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 1)]
        stock: i64,
    },
    /// Register a phone tracked by IMEI / serial number
    AddPhone {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        imei1: String,
        #[arg(long, default_value = "")]
        imei2: String,
        #[arg(long, default_value = "")]
        serial: String,
        /// Mark the phone as registered with the carrier
        #[arg(long, default_value_t = false)]
        registered: bool,
    },
    /// Edit a stored product; omitted fields keep their value
    EditProduct {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// Empty value clears the field
        #[arg(long)]
        imei1: Option<String>,
        #[arg(long)]
        imei2: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        registered: Option<bool>,
    },
    /// Register a brand
    AddBrand { name: String },
    /// Register a model of an existing brand
    AddModel {
        #[arg(long)]
        brand_id: i64,
        name: String,
    },
    /// Register a customer
    AddCustomer {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        dni: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Record a sale
    Sell {
        #[arg(long)]
        customer: i64,
        /// Line item as PRODUCT_ID:QUANTITY:PRICE (repeatable)
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<SaleLineItem>,
        /// Payment as METHOD:AMOUNT (repeatable)
        #[arg(long = "payment", value_parser = parse_payment)]
        payments: Vec<PaymentAllocation>,
    },
    /// Finish a partially recorded sale, or list unfinished ones
    Resume {
        sale_id: Option<String>,
    },
    /// Print the sales report
    Report {
        /// Also export the report as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn parse_item(value: &str) -> std::result::Result<SaleLineItem, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [product, quantity, price] = parts.as_slice() else {
        return Err(format!("expected PRODUCT_ID:QUANTITY:PRICE, got '{value}'"));
    };
    let product_id = product
        .trim()
        .parse()
        .map_err(|e| format!("invalid product id '{product}': {e}"))?;
    let quantity = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    let price = phone_shop_pos::rows::parse_decimal(price).map_err(|e| e.to_string())?;
    Ok(SaleLineItem::new(product_id, quantity, price))
}

fn parse_payment(value: &str) -> std::result::Result<PaymentAllocation, String> {
    let Some((method, amount)) = value.rsplit_once(':') else {
        return Err(format!("expected METHOD:AMOUNT, got '{value}'"));
    };
    let amount = phone_shop_pos::rows::parse_decimal(amount).map_err(|e| e.to_string())?;
    Ok(PaymentAllocation {
        method: method.trim().to_string(),
        amount,
    })
}

fn load_config(args: &Args) -> Result<Config> {
    let lookup = |name: &str| match name {
        config::SPREADSHEET_ID_VAR => args.spreadsheet_id.clone(),
        config::BASE_URL_VAR => args.base_url.clone(),
        config::JOURNAL_PATH_VAR => args
            .journal
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        other => std::env::var(other).ok(),
    };
    Config::from_lookup(lookup).context("Invalid configuration")
}

async fn open_session(
    store: &PosStore,
    provider: Arc<dyn CredentialProvider>,
    email: Option<&str>,
) -> Result<Session> {
    match email {
        Some(email) => store
            .login(provider, email)
            .await
            .with_context(|| format!("Failed to sign in as {email}")),
        None => Ok(Session::acquire(provider)),
    }
}

fn print_products(products: &[phone_shop_pos::StoredProduct]) {
    println!(
        "{:>5}  {:>14}  {:<10}  {:<28}  {:>10}  {:>6}  {:<16}",
        "Row", "ID", "Kind", "Name", "Price", "Stock", "IMEI 1"
    );
    for stored in products {
        let p = &stored.product;
        println!(
            "{:>5}  {:>14}  {:<10}  {:<28}  {:>10.2}  {:>6}  {:<16}",
            stored.row,
            p.id.map(|id| id.to_string()).unwrap_or_default(),
            p.kind.as_str(),
            p.name,
            p.price,
            p.stock,
            p.imei1.as_deref().unwrap_or(""),
        );
    }
}

fn print_report(report: &ReportData) {
    println!("Sales: {}  Total: {:.2}", report.sale_count, report.total_sales);
    println!("\nBy product:");
    for p in &report.sales_by_product {
        println!("  {:<30} {:>6} {:>12.2}", p.name, p.quantity, p.revenue);
    }
    println!("\nBy seller:");
    for s in &report.sales_by_seller {
        println!("  {:<30} {:>6} {:>12.2}", s.seller, s.sale_count, s.total);
    }
    println!("\nBy payment method:");
    for m in &report.sales_by_payment_method {
        println!("  {:<30} {:>19.2}", m.method, m.amount);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    log::info!("Spreadsheet: {}", config.spreadsheet_id);

    let api = SheetsApi::new(config.spreadsheet_id.clone()).with_base_url(&config.base_url);
    let journal = SaleJournal::open(&config.journal_path).context("Failed to open sale journal")?;
    let store = PosStore::with_journal(api, journal);
    let provider: Arc<dyn CredentialProvider> = Arc::new(EnvToken::new(config::ACCESS_TOKEN_VAR));
    let session = open_session(&store, provider, args.email.as_deref()).await?;

    match args.command {
        Command::Check => {
            if store.api().test_connection(&session).await? {
                println!("Spreadsheet {} is reachable", config.spreadsheet_id);
            } else {
                bail!("Spreadsheet {} is not reachable", config.spreadsheet_id);
            }
        }
        Command::Products => {
            let products = store.list_products(&session).await.context("Failed to list products")?;
            print_products(&products);
        }
        Command::AddGeneric {
            name,
            description,
            price,
            stock,
        } => {
            let product = Product::generic(&name, &description, price, stock);
            let created = store
                .create_product(&session, product)
                .await
                .context("Failed to create product")?;
            println!("Created '{}' with ID {:?}", created.name, created.id);
        }
        Command::AddPhone {
            brand,
            model,
            description,
            price,
            imei1,
            imei2,
            serial,
            registered,
        } => {
            let mut product = Product::serialized(&brand, &model, &description, price)
                .with_imei1(&imei1)
                .with_imei2(&imei2)
                .with_serial_number(&serial);
            if registered {
                product.registration_status = RegistrationStatus::Registered;
            }
            let created = store
                .create_product(&session, product)
                .await
                .context("Failed to create phone")?;
            println!("Created '{}' with ID {:?}", created.name, created.id);
        }
        Command::EditProduct {
            id,
            name,
            description,
            price,
            stock,
            brand,
            model,
            imei1,
            imei2,
            serial,
            registered,
        } => {
            let products = store.list_products(&session).await.context("Failed to list products")?;
            let Some(stored) = products.into_iter().find(|s| s.product.id == Some(id)) else {
                bail!("Product {id} not found");
            };
            let row = stored.row;
            let mut product = stored.product;
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(description) = description {
                product.description = description;
            }
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(stock) = stock {
                product.stock = stock;
            }
            if brand.is_some() {
                product.brand = brand;
            }
            if model.is_some() {
                product.model = model;
            }
            if let Some(imei) = imei1 {
                product = product.with_imei1(&imei);
            }
            if let Some(imei) = imei2 {
                product = product.with_imei2(&imei);
            }
            if let Some(serial) = serial {
                product = product.with_serial_number(&serial);
            }
            if let Some(registered) = registered {
                product.registration_status = if registered {
                    RegistrationStatus::Registered
                } else {
                    RegistrationStatus::Unregistered
                };
            }
            let updated = store
                .update_product(&session, product)
                .await
                .with_context(|| format!("Failed to update product {id}"))?;
            println!("Updated '{}' (row {row})", updated.name);
        }
        Command::AddBrand { name } => {
            let brand = store
                .create_brand(&session, &name)
                .await
                .context("Failed to create brand")?;
            println!("Created brand '{}' with ID {}", brand.name, brand.id);
        }
        Command::AddModel { brand_id, name } => {
            let model = store
                .create_model(&session, brand_id, &name)
                .await
                .context("Failed to create model")?;
            println!("Created model '{}' with ID {}", model.name, model.id);
        }
        Command::AddCustomer {
            name,
            address,
            dni,
            phone,
        } => {
            let customer = store
                .create_customer(&session, &name, &address, &dni, &phone)
                .await
                .context("Failed to create customer")?;
            println!("Created customer '{}' with ID {}", customer.full_name, customer.id);
        }
        Command::Sell {
            customer,
            items,
            payments,
        } => {
            let Some(seller) = session.user() else {
                bail!("Sign in with --email to record sales");
            };
            let total = items
                .iter()
                .map(|i| i.sale_price * i.quantity as f64)
                .sum();
            let payload = SalePayload {
                seller_id: seller.id,
                customer_id: customer,
                total,
                items,
                payments,
            };
            let receipt = store
                .record_sale(&session, payload)
                .await
                .context("Failed to record sale")?;
            println!("Recorded {} ({})", receipt.sale_id, receipt.timestamp);
            for update in &receipt.stock_updates {
                println!(
                    "  product {} (row {}): stock {}",
                    update.product_id, update.row, update.new_stock
                );
            }
        }
        Command::Resume { sale_id: None } => {
            let pending = store.journal().pending()?;
            if pending.is_empty() {
                println!("No unfinished sales");
            }
            for entry in pending {
                println!("{}  {}  done: {:?}", entry.sale_id, entry.timestamp, entry.completed);
            }
        }
        Command::Resume {
            sale_id: Some(sale_id),
        } => {
            let receipt = store
                .resume_sale(&session, &sale_id)
                .await
                .with_context(|| format!("Failed to resume {sale_id}"))?;
            println!("Sale {} fully recorded", receipt.sale_id);
        }
        Command::Report { csv } => {
            let (data, users) = tokio::try_join!(
                store.load_sales_data(&session),
                store.list_users(&session)
            )
            .context("Failed to load sales data")?;
            let report = ReportData::build(&data, &users);
            print_report(&report);
            if let Some(path) = csv {
                report.write_csv(&path)?;
                println!("\nReport exported to {}", path.display());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting phone shop POS");

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
