pub mod encryption;
pub mod errors;
pub mod numbers;
pub mod transform;
pub mod wait;

pub use errors::ScrapeError;
pub use numbers::{parse_count, parse_tick_value};
pub use transform::translate_y;
pub use wait::{wait_until, wait_until_stable, WaitOptions};
