use std::env;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use indoc::printdoc;

use portfolio_rs::constants::*;
use portfolio_rs::seed;

#[derive(Debug, Parser)]
#[command(about = "Maintenance commands for the portfolio database")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing tables.
    Migrate,
    /// Seed the database with sample data.
    SeedData {
        /// Clear existing data before seeding.
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<(), anyhow::Error> {
    portfolio_rs::init_logging(DEFAULT_LOG_FILTER);
    let args = Args::parse();

    let dbfile = env::var(DATABASE_URL_VAR)
        .map_err(|e| anyhow!(format!("error reading env var {}: {:?}", DATABASE_URL_VAR, e)))?;
    let dbpool = portfolio_rs::new_migrated_pool(&dbfile, 1)?;
    let mut conn = dbpool.get()?;

    match args.command {
        Command::Migrate => println!("migrations applied to {}", dbfile),
        Command::SeedData { clear } => {
            if clear {
                println!("Clearing existing data before seeding...");
            }
            println!("Starting database seeding...");
            let data = seed::sample_data();
            let report = seed::run(&mut conn, &data, clear)?;
            for entry in &report.entries {
                println!("{}", entry);
            }
            printdoc! {"

                ✓ Database seeded successfully! ({created} created, {skipped} already present)
                You can now login to admin with:
                  Username: {username}
                  Password: {password}
                ",
                created = report.created(),
                skipped = report.skipped(),
                username = data.admin.username,
                password = data.admin.password,
            };
        }
    }

    Ok(())
}
