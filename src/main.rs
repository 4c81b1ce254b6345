use clap::Parser;
use color_eyre::Result;
use user_directory::{
    cli,
    config::Config,
    response::Envelope,
    server,
    user::{RegisteredUser, User},
};

use tracing::{debug, error, info};

fn show_example(example: cli::Examples) -> Result<()> {
    match example {
        cli::Examples::Config => {
            println!("{}", Config::example().serialize_pretty());
        }
        cli::Examples::Registered => {
            let example: Envelope<RegisteredUser> = Envelope::example_registered();
            println!("{}", serde_json::to_string_pretty(&example)?);
        }
        cli::Examples::Listed => {
            let example: Envelope<Vec<User>> = Envelope::example_listed();
            println!("{}", serde_json::to_string_pretty(&example)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();

    if let Some(cli::Commands::Examples(example)) = cli.command {
        return show_example(example);
    }

    let config = if let Some(config_path) = &cli.config {
        Config::new_from_path(config_path)?
    } else {
        Config::default()
    };

    server::prepare(&config).await?;

    match &cli.config {
        Some(config_path) => debug!(?config_path, "Config from path"),
        None => debug!("Default config"),
    }

    let port = cli.port.unwrap_or(config.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C, quitting")
        }
        result = server::run_on_port(config, port) => {
            error!("Server returned");
            result?;
            return Err(color_eyre::eyre::eyre!("Server stopped unexpectedly"));
        }
    }

    Ok(())
}
