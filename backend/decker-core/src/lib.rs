pub mod config;
pub mod error;
pub mod port;
pub mod preview;
pub mod process;
pub mod readiness;
pub mod resolve;
pub mod supervisor;
pub mod ui;
pub mod view;

#[cfg(test)]
mod tests;

pub const DECKER_BINARY: &str = "decker";
pub const DEFAULT_SERVER_PORT: u16 = 8888;
pub const DECKER_SERVER_HOSTNAME: &str = "localhost";
pub const DECKER_SERVER_BASE_URL: &str =
    const_format::concatcp!("http://", DECKER_SERVER_HOSTNAME);
pub const DECKER_DOWNLOAD_URL: &str = "https://elearning.uni-wuerzburg.de/decker/";

/// Platform family; decides probe commands and unsupported one-shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}
