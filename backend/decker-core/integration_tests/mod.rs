mod config;
mod error;
mod helpers;
mod launcher;
mod port;
mod readiness;
mod resolve;
mod supervisor;
