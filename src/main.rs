//! Prints the time difference between Asia/Shanghai and America/New_York, then
//! between two zones read from standard input.

use anyhow::{Context, Result};
use std::io;
use tracing::debug;
use tzdiff::{logging, prompt, Config, TimeDifferenceCalculator};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();
    let config = Config::from_env()?;
    debug!(?config, "configuration loaded");

    let calculator = TimeDifferenceCalculator::new(config.database());

    println!("{}", calculator.difference("Asia/Shanghai", "America/New_York"));

    println!("\n\nEnter two regions to compute their time difference:");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let region1 = match prompt(&mut input, &mut output, "Region 1 (e.g. Asia/Shanghai): ")
        .context("Could not read standard input")?
    {
        Some(r) => r,
        None => return Ok(()),
    };
    let region2 = match prompt(&mut input, &mut output, "Region 2 (e.g. America/New_York): ")
        .context("Could not read standard input")?
    {
        Some(r) => r,
        None => return Ok(()),
    };

    println!("\n{}", calculator.difference(&region1, &region2));
    Ok(())
}
