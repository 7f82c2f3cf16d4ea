pub mod cli;
pub mod compare;
pub mod formats;
pub mod model;
pub mod runtime;
pub mod ui;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
