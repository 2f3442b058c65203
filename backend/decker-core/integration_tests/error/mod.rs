mod config;
mod port;
mod spawn;
