mod cli;
mod console;
mod error;
mod one_shot;
