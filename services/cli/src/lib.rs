mod cli;
mod commands;
mod demo;
mod infra;
mod prompt;
mod render;

use daybook::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
