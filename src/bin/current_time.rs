//! Prints the current local time.

use chrono::Local;
use tracing::debug;
use tzdiff::logging;

fn main() {
    logging::init();
    let now = Local::now();
    debug!(utc_offset = now.offset().local_minus_utc(), "local offset");
    println!("Current time: {}", now.format("%Y-%m-%d %H:%M:%S"));
}
