// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use clap::Parser;

mod chat;
mod cli;
mod commands;
mod config;
mod constants;
mod error;
mod formatting;
mod knowledge;
mod logging;
mod model;
mod repl;
mod storage;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The interactive chat owns the terminal, so its logs go to a file
    if matches!(cli.command, Commands::Chat { .. }) {
        logging::init_file_logging(cli.debug)?;
    } else {
        logging::init_console_logging(cli.debug);
    }

    let config = Config::load(cli.config.as_deref())?;

    if let Err(e) = commands::execute(&config, cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
