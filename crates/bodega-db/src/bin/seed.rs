//! # Seed Data Generator
//!
//! Populates the database with demo users and products for development.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p bodega-db --bin seed
//!
//! # Specify database path
//! cargo run -p bodega-db --bin seed -- --db ./data/bodega.db
//! ```
//!
//! ## Generated Data
//! - A small catalog of staples (rice, beans, oil, coffee, ...) with a
//!   couple of discounted items
//! - Three demo users: one in delivery range with credit, one out of
//!   range, one suspended

use chrono::{Duration, Utc};
use std::env;

use bodega_db::{Database, DbConfig};

/// Catalog entries: (name, description, price_cents, stock, discount_bps)
const PRODUCTS: &[(&str, &str, i64, i64, u32)] = &[
    ("Arroz 1kg", "Grano largo", 2_50, 80, 0),
    ("Frijoles negros 1kg", "Seleccionados", 3_20, 60, 0),
    ("Aceite vegetal 1L", "Girasol", 10_00, 30, 1000),
    ("Café molido 250g", "Tueste oscuro", 6_50, 40, 0),
    ("Azúcar 1kg", "Refino", 1_80, 100, 0),
    ("Leche en polvo 500g", "Entera", 8_00, 25, 500),
    ("Pasta de tomate 400g", "Concentrada", 2_10, 50, 0),
    ("Espaguetis 500g", "Sémola de trigo", 1_90, 70, 0),
    ("Pollo congelado 1kg", "Muslos", 12_00, 15, 0),
    ("Detergente 1kg", "En polvo", 4_50, 35, 2000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./bodega_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bodega Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bodega_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bodega Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip if already seeded
    if !db.products().list_active().await?.is_empty() {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");

    for (name, description, price_cents, stock, discount_bps) in PRODUCTS {
        db.products()
            .insert(name, Some(description), *price_cents, *stock, *discount_bps)
            .await?;
    }
    println!("  {} products inserted", PRODUCTS.len());

    println!();
    println!("Generating demo users...");

    // In range, with credit, logged in
    let maria = db
        .users()
        .insert(
            "maria",
            "+5351234567",
            "Calle 23 #456, Vedado",
            Some((23.1300, -82.3800)),
            true,
        )
        .await?;
    db.users().grant_credit(&maria.id, 50_00).await?;
    let token = db.sessions().create(&maria.id).await?;
    println!("  maria    (in range, 50.00 credit, session {})", token);

    // Out of delivery range
    db.users()
        .insert(
            "pedro",
            "+5357654321",
            "Carretera Central km 40",
            Some((22.8000, -82.0000)),
            false,
        )
        .await?;
    println!("  pedro    (out of range)");

    // Suspended for a week
    let luisa = db
        .users()
        .insert("luisa", "+5355550000", "Calle 10 #12", None, false)
        .await?;
    db.users()
        .suspend(&luisa.id, Some(Utc::now() + Duration::days(7)))
        .await?;
    println!("  luisa    (suspended 7 days)");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
