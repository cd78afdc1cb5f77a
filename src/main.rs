use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use retail_tracker::{
    config, db,
    entities::PaymentMethod,
    repositories::{NewPayment, NewProduct, NewReturn, NewSale, NewSeller},
    schema, Repositories,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = Arc::new(
        db::establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to database")?,
    );

    if cfg.auto_migrate || matches!(cli.command, Commands::Init) {
        db::run_migrations(&pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let repos = Repositories::new(pool.clone());

    match cli.command {
        Commands::Init => {
            db::check_connection(&pool)
                .await
                .context("database is not reachable")?;
            schema::verify_schema(&pool)
                .await
                .context("schema verification failed")?;
            if cli.json {
                print_json(&schema::TABLES)?;
            } else {
                println!("Schema ready: {}", schema::TABLES.join(", "));
            }
        }
        Commands::Products(command) => handle_products_command(&repos, command, cli.json).await?,
        Commands::Sellers(command) => handle_sellers_command(&repos, command, cli.json).await?,
        Commands::Sales(command) => handle_sales_command(&repos, command, cli.json).await?,
        Commands::Returns(command) => handle_returns_command(&repos, command, cli.json).await?,
        Commands::Payments(command) => handle_payments_command(&repos, command, cli.json).await?,
    }

    drop(repos);
    if let Ok(pool) = Arc::try_unwrap(pool) {
        db::close_pool(pool)
            .await
            .context("failed to close database pool")?;
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "retail-tracker",
    about = "Record and list products, sellers, sales, returns and payments",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the retail tables if they are missing
    Init,
    #[command(subcommand)]
    Products(ProductsCommands),
    #[command(subcommand)]
    Sellers(SellersCommands),
    #[command(subcommand)]
    Sales(SalesCommands),
    #[command(subcommand)]
    Returns(ReturnsCommands),
    #[command(subcommand)]
    Payments(PaymentsCommands),
}

#[derive(Args, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u64,
    #[arg(long = "page-size", default_value_t = 20)]
    page_size: u64,
}

#[derive(Subcommand)]
enum ProductsCommands {
    /// Add a product; stock falls back to 0 when omitted
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        stock: Option<i32>,
    },
    List(PageArgs),
    Show { id: i32 },
}

#[derive(Subcommand)]
enum SellersCommands {
    Add {
        #[arg(long)]
        name: String,
    },
    List(PageArgs),
}

#[derive(Subcommand)]
enum SalesCommands {
    Record {
        #[arg(long)]
        seller: i32,
        #[arg(long)]
        product: i32,
        #[arg(long)]
        quantity: i32,
        #[arg(long)]
        total: Decimal,
    },
    List {
        /// Only sales recorded by this seller
        #[arg(long)]
        seller: Option<i32>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum ReturnsCommands {
    Record {
        #[arg(long)]
        sale: i32,
        #[arg(long)]
        quantity: i32,
    },
    List {
        #[arg(long)]
        sale: i32,
    },
}

#[derive(Subcommand)]
enum PaymentsCommands {
    Record {
        #[arg(long)]
        seller: i32,
        #[arg(long)]
        amount: Decimal,
        /// cash or transfer
        #[arg(long)]
        method: PaymentMethod,
    },
    List {
        #[arg(long)]
        seller: i32,
    },
}

async fn handle_products_command(
    repos: &Repositories,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductsCommands::Add { name, price, stock } => {
            let product = repos
                .products
                .create(NewProduct { name, price, stock })
                .await
                .context("failed to add product")?;
            if json {
                print_json(&product)?;
            } else {
                println!(
                    "Product {} added: {} @ {} (stock {})",
                    product.id, product.name, product.price, product.stock
                );
            }
        }
        ProductsCommands::List(page) => {
            let (products, total) = repos
                .products
                .find_all(page.page, page.page_size)
                .await
                .context("failed to list products")?;
            if json {
                print_json(&products)?;
            } else {
                for product in &products {
                    println!(
                        "{:>6}  {:<30}  {:>10}  {:>6}",
                        product.id, product.name, product.price, product.stock
                    );
                }
                println!("{} of {} products", products.len(), total);
            }
        }
        ProductsCommands::Show { id } => {
            let product = repos
                .products
                .find_by_id(id)
                .await?
                .with_context(|| format!("product {} not found", id))?;
            if json {
                print_json(&product)?;
            } else {
                println!(
                    "Product {}: {} @ {} (stock {})",
                    product.id, product.name, product.price, product.stock
                );
            }
        }
    }
    Ok(())
}

async fn handle_sellers_command(
    repos: &Repositories,
    command: SellersCommands,
    json: bool,
) -> Result<()> {
    match command {
        SellersCommands::Add { name } => {
            let seller = repos
                .sellers
                .create(NewSeller { name })
                .await
                .context("failed to add seller")?;
            if json {
                print_json(&seller)?;
            } else {
                println!("Seller {} added: {}", seller.id, seller.name);
            }
        }
        SellersCommands::List(page) => {
            let (sellers, total) = repos
                .sellers
                .find_all(page.page, page.page_size)
                .await
                .context("failed to list sellers")?;
            if json {
                print_json(&sellers)?;
            } else {
                for seller in &sellers {
                    println!("{:>6}  {}", seller.id, seller.name);
                }
                println!("{} of {} sellers", sellers.len(), total);
            }
        }
    }
    Ok(())
}

async fn handle_sales_command(
    repos: &Repositories,
    command: SalesCommands,
    json: bool,
) -> Result<()> {
    match command {
        SalesCommands::Record {
            seller,
            product,
            quantity,
            total,
        } => {
            let sale = repos
                .sales
                .create(NewSale {
                    seller_id: seller,
                    product_id: product,
                    quantity,
                    total,
                    created_at: None,
                })
                .await
                .context("failed to record sale")?;
            if json {
                print_json(&sale)?;
            } else {
                println!(
                    "Sale {} recorded: seller {} sold {} x product {} for {}",
                    sale.id, sale.seller_id, sale.quantity, sale.product_id, sale.total
                );
            }
        }
        SalesCommands::List { seller, page } => {
            let (sales, total) = match seller {
                Some(seller_id) => {
                    repos
                        .sales
                        .find_by_seller_paginated(seller_id, page.page, page.page_size)
                        .await
                }
                None => repos.sales.find_all(page.page, page.page_size).await,
            }
            .context("failed to list sales")?;
            if json {
                print_json(&sales)?;
            } else {
                for sale in &sales {
                    println!(
                        "{:>6}  {}  seller {:>4}  product {:>4}  qty {:>4}  {:>10}",
                        sale.id,
                        sale.created_at.format("%Y-%m-%d %H:%M"),
                        sale.seller_id,
                        sale.product_id,
                        sale.quantity,
                        sale.total
                    );
                }
                println!("{} of {} sales", sales.len(), total);
            }
        }
    }
    Ok(())
}

async fn handle_returns_command(
    repos: &Repositories,
    command: ReturnsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ReturnsCommands::Record { sale, quantity } => {
            let sale_return = repos
                .returns
                .create(NewReturn {
                    sale_id: sale,
                    quantity,
                    created_at: None,
                })
                .await
                .context("failed to record return")?;
            if json {
                print_json(&sale_return)?;
            } else {
                println!(
                    "Return {} recorded: {} units against sale {}",
                    sale_return.id, sale_return.quantity, sale_return.sale_id
                );
            }
        }
        ReturnsCommands::List { sale } => {
            let returns = repos
                .returns
                .find_by_sale(sale)
                .await
                .context("failed to list returns")?;
            if json {
                print_json(&returns)?;
            } else {
                for sale_return in &returns {
                    println!(
                        "{:>6}  {}  qty {:>4}",
                        sale_return.id,
                        sale_return.created_at.format("%Y-%m-%d %H:%M"),
                        sale_return.quantity
                    );
                }
                println!("{} returns against sale {}", returns.len(), sale);
            }
        }
    }
    Ok(())
}

async fn handle_payments_command(
    repos: &Repositories,
    command: PaymentsCommands,
    json: bool,
) -> Result<()> {
    match command {
        PaymentsCommands::Record {
            seller,
            amount,
            method,
        } => {
            let payment = repos
                .payments
                .create(NewPayment {
                    seller_id: seller,
                    amount,
                    method,
                    created_at: None,
                })
                .await
                .context("failed to record payment")?;
            if json {
                print_json(&payment)?;
            } else {
                println!(
                    "Payment {} recorded: {} by {} for seller {}",
                    payment.id, payment.amount, payment.method, payment.seller_id
                );
            }
        }
        PaymentsCommands::List { seller } => {
            let payments = repos
                .payments
                .find_by_seller(seller)
                .await
                .context("failed to list payments")?;
            if json {
                print_json(&payments)?;
            } else {
                for payment in &payments {
                    println!(
                        "{:>6}  {}  {:<8}  {:>10}",
                        payment.id,
                        payment.created_at.format("%Y-%m-%d %H:%M"),
                        payment.method,
                        payment.amount
                    );
                }
                println!("{} payments for seller {}", payments.len(), seller);
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
