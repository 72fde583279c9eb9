use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use log::info;

use portfolio_rs::constants::*;
use portfolio_rs::routes;
use portfolio_rs::templates;
use portfolio_rs::SiteConfig;

#[derive(Debug, Parser)]
#[command(about = "Serves the portfolio site and its admin")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, env = CONFIG_PATH_VAR, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let config = SiteConfig::load(&args.config)?;
    portfolio_rs::init_logging(&config.log_filter);

    let dbpool = Arc::new(portfolio_rs::new_migrated_pool(
        &config.database_url,
        DEFAULT_POOL_SIZE,
    )?);
    info!("created dbpool from {:?}", config.database_url);

    let template_dir = Path::new(&config.template_dir);
    let templates = Arc::new(templates::Templates::from_dir(template_dir, &config.site)?);
    info!(
        "initialized template system with templates in {:?}",
        config.template_dir
    );

    let app = routes::build_router(
        dbpool,
        templates,
        &template_dir.join("static"),
        &config.admin,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("listening on {}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
