use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::{Row, SqlitePool};

use yl_portal::auth::Role;
use yl_portal::i18n::{get_dictionary, negotiate, parse_accept_language, Locale, Translator};
use yl_portal::navigation::{sidebar, NavLink, ViewMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "yl-portal maintenance tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that every locale bundle declares the same keys
    CheckDictionaries,
    /// Show how an accept-language header is resolved
    Negotiate { header: String },
    /// Print the navigation a role sees
    Nav {
        #[arg(long, default_value = "user")]
        role: Role,
        #[arg(long, default_value = "en")]
        locale: Locale,
        /// Show the admin section (admins only)
        #[arg(long)]
        admin_view: bool,
    },
    /// Apply pending migrations to the local role table
    MigrateRun,
    /// Show migration status against the current database
    MigrateStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenvy::dotenv().is_err() {
        let crate_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::CheckDictionaries => check_dictionaries()?,
        Commands::Negotiate { header } => {
            for range in parse_accept_language(&header) {
                println!("{:<12} q={}", range.tag, range.quality);
            }
            println!("=> {}", negotiate(Some(&header)));
        }
        Commands::Nav { role, locale, admin_view } => {
            let requested = if admin_view { "admin" } else { "user" };
            let view = ViewMode::resolve(Some(requested), role);
            let bar = sidebar(role, view, &Translator::new(locale));

            println!("{}", bar.main.label);
            print_links(&bar.main.items, 1);
            if let Some(admin) = &bar.admin {
                println!("{}", admin.label);
                print_links(&admin.items, 1);
            }
            print_links(&bar.secondary, 0);
        }
        Commands::MigrateRun => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            migrator.run(&pool).await?;
            println!("Migrations applied");
        }
        Commands::MigrateStatus => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            print_status(&pool, &migrator).await?;
        }
    }

    Ok(())
}

fn check_dictionaries() -> anyhow::Result<()> {
    let reference = get_dictionary(Locale::En);
    let mut problems = 0;

    for locale in Locale::ALL {
        let dictionary = get_dictionary(locale);
        for key in reference.missing_in(dictionary) {
            println!("{locale}: missing {key}");
            problems += 1;
        }
        for key in dictionary.missing_in(reference) {
            println!("{locale}: unexpected {key}");
            problems += 1;
        }
    }

    if problems > 0 {
        anyhow::bail!("{problems} dictionary problem(s)");
    }
    println!("Dictionaries complete for {} locale(s)", Locale::ALL.len());
    Ok(())
}

fn print_links(links: &[NavLink], depth: usize) {
    for link in links {
        println!("{}{:<28} {}", "  ".repeat(depth), link.title, link.href);
        print_links(&link.children, depth + 1);
    }
}

async fn get_pool() -> anyhow::Result<SqlitePool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    yl_portal::db::connect(&database_url).await
}

async fn print_status(pool: &SqlitePool, migrator: &sqlx::migrate::Migrator) -> anyhow::Result<()> {
    let table: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'")
            .fetch_optional(pool)
            .await?;
    let applied_versions: HashSet<i64> = if table.is_some() {
        let rows = sqlx::query("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?;
        rows.iter().filter_map(|row| row.try_get::<i64, _>("version").ok()).collect()
    } else {
        HashSet::new()
    };

    println!("{:<8} {:<20} {}", "Status", "Version", "Name");
    for migration in migrator.iter() {
        let status = if applied_versions.contains(&migration.version) { "applied" } else { "pending" };
        let desc = migration.description.trim();
        let name = if desc.is_empty() { "unknown" } else { desc };
        println!("{:<8} {:<20} {}", status, migration.version, name);
    }

    Ok(())
}

async fn get_migrator() -> anyhow::Result<sqlx::migrate::Migrator> {
    // ./migrations when run from the repo root, else the crate-local folder
    let local = Path::new("./migrations");
    let migrator_path = if local.exists() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")
    };

    let display = migrator_path.display().to_string();
    sqlx::migrate::Migrator::new(migrator_path)
        .await
        .with_context(|| format!("failed to load migrations from {display}"))
}
