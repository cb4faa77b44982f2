//! Prints the current time in a few regions.

use anyhow::Result;
use tzdiff::{logging, Config, TimeDifferenceCalculator};

const REGIONS: [(&str, &str); 3] = [
    ("Beijing time", "Asia/Shanghai"),
    ("New York time", "America/New_York"),
    ("London time", "Europe/London"),
];

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();
    let calculator = TimeDifferenceCalculator::new(Config::from_env()?.database());

    for (label, zone) in REGIONS {
        match calculator.resolve(zone) {
            Ok(time) => println!("{}: {}", label, time),
            Err(e) => println!("{}: {}", label, e),
        }
    }
    Ok(())
}
