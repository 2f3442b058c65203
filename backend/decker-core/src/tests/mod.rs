mod config;
mod invocation;
mod launcher;
mod preview;
mod probe;
mod supervisor;
mod view;
