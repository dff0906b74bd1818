use clap::Parser;

mod app;
mod chat;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;

use crate::app::Application;
use crate::chat::Dispatcher;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::DuochatError;

#[tokio::main]
async fn main() -> Result<(), DuochatError> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load()?;
    let dispatcher = Dispatcher::new(&config);
    let command_dispatcher = create_command_registry();

    let app = Application::new(args, config, dispatcher, command_dispatcher);
    app.run().await
}
