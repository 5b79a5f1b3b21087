pub mod constants;
pub(crate) mod defaults;
pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sent with every Gemini request
pub fn user_agent() -> String {
    format!("{}/{} ({})", APP_NAME, VERSION, std::env::consts::OS)
}

/// `pychat-rs 0.0.1 (abc1234)`, the commit is only shown for builds that
/// were given `GIT_SHA`
pub fn version() -> String {
    match option_env!("GIT_SHA") {
        Some(sha) => format!("{} {} ({})", APP_NAME, VERSION, sha),
        None => format!("{} {}", APP_NAME, VERSION),
    }
}

/// Print start-up progress to stderr when `general.verbose` is set
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::config::Configuration::instance().general.verbose {
            eprintln!($($arg)*);
        }
    };
}

pub use crate::verbose;
