// validate-code entry point

use std::io;

use anyhow::Context;
use clap::Parser;
use ricecoder_validate_hook::cli::{execute, Cli, Commands, Invocation};
use ricecoder_validate_hook::handler::PROJECT_DIR_ENV;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Run);

    let hook_dir = cli
        .resolve_hook_dir()
        .context("Failed to resolve hook directory")?;
    let invocation = Invocation {
        config_path: cli.resolve_config_path(&hook_dir),
        hook_dir,
        project_dir_env: std::env::var(PROJECT_DIR_ENV).ok(),
        install_logging: true,
    };

    let stdin = io::stdin();
    let output = execute(&command, &invocation, stdin.lock()).await;

    match output {
        Ok(Some(text)) => println!("{}", text),
        Ok(None) => {}
        // The host treats a failed hook as an error, so hook mode always succeeds
        Err(e) if command == Commands::Run => {
            tracing::error!(error = %e, "Hook failed, allowing edit");
        }
        Err(e) => return Err(e).context("Command failed"),
    }

    Ok(())
}
