//! Bootstrap an administrator account from the command line.
//!
//! Usage: create_admin <email> <name> [password]
//!
//! Without a password argument a passphrase is generated and printed once.

use santa::auth::password::{generate_password, hash_password, is_valid_email};
use santa::config::AppConfig;
use santa::users::repo;

use std::str::FromStr;

use anyhow::{bail, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(email), Some(name)) = (args.next(), args.next()) else {
        eprintln!("Usage: create_admin <email> <name> [password]");
        std::process::exit(2);
    };
    let password = args.next().unwrap_or_else(generate_password);

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        bail!("invalid email address: {email}");
    }
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("name must not be empty");
    }

    let config = AppConfig::from_env()?;
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("connect to database")?;
    sqlx::migrate!("./migrations").run(&db).await?;

    if repo::find_by_email(&db, &email).await?.is_some() {
        bail!("a user with email {email} already exists");
    }

    let hash = hash_password(&password)?;
    let admin = repo::create(&db, &email, &name, &hash, true).await?;

    println!("Admin account created");
    println!("  id:       {}", admin.id);
    println!("  email:    {}", admin.email);
    println!("  password: {password}");
    println!("Store the password now; it is not shown again.");

    Ok(())
}
