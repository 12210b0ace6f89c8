use std::env;
use std::process::ExitCode;

use clap::Parser;

use presswork::build;
use presswork::cli::{Action, Cli};
use presswork::config::Config;
use presswork::logger;
use presswork::prompt::StdinPrompt;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::error(&format!("{}", err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_directory(&env::current_dir()?)?;
    match cli.action() {
        Action::BuildAll => build::build_all(&config)?,
        Action::BuildOne(slug) => build::build_one(&config, &slug)?,
        Action::DeleteOne(slug) => build::delete_one(&config, &slug)?,
        Action::DeleteInteractive => build::interactive_delete(&config, &mut StdinPrompt)?,
        Action::PromptAction => build::interactive(&config, &mut StdinPrompt)?,
    }
    Ok(())
}
