//! # Catalog Seeder
//!
//! Populates an empty catalog with the default standard bellows and,
//! optionally, creates the first admin account.
//!
//! ## Usage
//! ```bash
//! # Seed the development database
//! cargo run -p bellows-db --bin seed
//!
//! # Specify database path
//! cargo run -p bellows-db --bin seed -- --db ./data/bellows.db
//!
//! # Also create an admin account
//! BELLOWS_ADMIN_EMAIL=admin@example.com BELLOWS_ADMIN_PASSWORD=change-me \
//!     cargo run -p bellows-db --bin seed
//! ```

use bellows_db::catalog::default_catalog;
use bellows_db::{Database, DbConfig};
use chrono::Utc;
use std::env;

const ADMIN_EMAIL_VAR: &str = "BELLOWS_ADMIN_EMAIL";
const ADMIN_PASSWORD_VAR: &str = "BELLOWS_ADMIN_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bellows_dev.db");

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
                println!("Bellows Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bellows_dev.db)");
                println!("  -h, --help         Show this help message");
                println!();
                println!("Environment:");
                println!("  {ADMIN_EMAIL_VAR}     Admin account e-mail to create");
                println!("  {ADMIN_PASSWORD_VAR}  Password for that account");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bellows Catalog Seeder");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.parts().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} parts", existing);
        println!("  Skipping catalog seed to avoid duplicates.");
    } else {
        let summary = db.parts().import(&default_catalog(Utc::now())).await;
        println!(
            "✓ Imported {} parts ({} skipped)",
            summary.imported, summary.skipped
        );
    }

    match (env::var(ADMIN_EMAIL_VAR), env::var(ADMIN_PASSWORD_VAR)) {
        (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
            if db.admins().find_by_email(&email).await?.is_some() {
                println!("⚠ Admin {} already exists", email.trim());
            } else {
                db.admins().create(&email, &password).await?;
                println!("✓ Created admin {}", email.trim());
            }
        }
        _ => {
            println!("  No admin created ({ADMIN_EMAIL_VAR} / {ADMIN_PASSWORD_VAR} not set)");
        }
    }

    let search_results = db.parts().search("A240").await?;
    println!("  Search 'A240': {} results", search_results.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
