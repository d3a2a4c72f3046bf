use std::process::ExitCode;

use anyhow::Context;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use xkcd_vk_poster::{Config, Publisher};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // RUST_LOG overrides the level
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()?;

    match dotenvy::dotenv() {
        Ok(path) => log::debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("reading .env"),
    }

    let config = Config::from_env().context("loading configuration")?;
    let publisher = Publisher::new(config)?;
    let report = publisher.run().await.context("fetching comic")?;

    if report.is_posted() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
