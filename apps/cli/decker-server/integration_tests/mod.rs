mod commands;
mod settings;
