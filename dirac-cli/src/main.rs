use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

use dirac_client::{ProcessorClient, ProcessorError};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{OutputFormat, Report};

/// Parse `--timeout` as a positive number of seconds.
fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| format!("timeout '{}' is out of range", raw))
}

#[derive(Parser)]
#[command(name = "dirac-cli")]
#[command(about = "CLI to interact with a Dirac Live Processor")]
#[command(version)]
struct Cli {
    /// Base URL for the Dirac Live Processor (e.g. http://localhost:8080)
    #[arg(long)]
    base_url: String,

    /// Request timeout in seconds (default: no timeout)
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve and display all slots
    GetSlots,

    /// Retrieve and display the active slot index
    GetActiveSlot,

    /// Set the active slot by index
    SetActiveSlot {
        /// The index of the slot to activate
        slot: u32,
    },

    /// Retrieve and display the filter state
    GetFilterState,

    /// Enable (true) or disable (false) filtering
    SetFilterState {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        status: bool,
    },

    /// Retrieve and display the speaker gain limits
    GetSpeakerLimits,

    /// Retrieve and display the current speaker gain
    GetSpeakerGain,

    /// Set the speaker gain in dB
    SetSpeakerGain {
        /// The speaker gain to set (e.g. -6.5)
        #[arg(allow_negative_numbers = true)]
        gain: f64,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::GetSlots => "get-slots",
            Commands::GetActiveSlot => "get-active-slot",
            Commands::SetActiveSlot { .. } => "set-active-slot",
            Commands::GetFilterState => "get-filter-state",
            Commands::SetFilterState { .. } => "set-filter-state",
            Commands::GetSpeakerLimits => "get-speaker-limits",
            Commands::GetSpeakerGain => "get-speaker-gain",
            Commands::SetSpeakerGain { .. } => "set-speaker-gain",
        }
    }
}

fn main() -> ExitCode {
    // stdout carries command output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let client = match cli.timeout {
        Some(timeout) => ProcessorClient::with_timeout(&cli.base_url, timeout)?,
        None => ProcessorClient::new(&cli.base_url)?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    tracing::debug!(command = cli.command.name(), base_url = client.base_url(), "running command");
    let report = runtime.block_on(dispatch(&client, cli.command))?;
    report.render(cli.format)
}

async fn dispatch(client: &ProcessorClient, command: Commands) -> dirac_client::Result<Report> {
    match command {
        Commands::GetSlots => commands::slots::get_slots(client).await,
        Commands::GetActiveSlot => commands::slots::get_active_slot(client).await,
        Commands::SetActiveSlot { slot } => commands::slots::set_active_slot(client, slot).await,
        Commands::GetFilterState => commands::filter::get_filter_state(client).await,
        Commands::SetFilterState { status } => {
            commands::filter::set_filter_state(client, status).await
        }
        Commands::GetSpeakerLimits => commands::speaker::get_speaker_limits(client).await,
        Commands::GetSpeakerGain => commands::speaker::get_speaker_gain(client).await,
        Commands::SetSpeakerGain { gain } => {
            commands::speaker::set_speaker_gain(client, gain).await
        }
    }
}

/// Failures talking to the processor get their own prefix; everything else
/// (bad base URL, runtime setup) is reported plainly.
fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ProcessorError>() {
        Some(e) if !e.is_configuration() => {
            format!("Error communicating with Dirac Live Processor: {}", e)
        }
        _ => format!("Error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_speaker_gain_accepts_negative() {
        let cli = Cli::try_parse_from([
            "dirac-cli",
            "--base-url",
            "http://localhost:8080",
            "set-speaker-gain",
            "-6.5",
        ])
        .unwrap();
        match cli.command {
            Commands::SetSpeakerGain { gain } => assert_eq!(gain, -6.5),
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_parse_set_filter_state_requires_true_or_false() {
        let parse = |value: &str| {
            Cli::try_parse_from([
                "dirac-cli",
                "--base-url",
                "http://localhost:8080",
                "set-filter-state",
                value,
            ])
        };

        assert!(matches!(
            parse("false").unwrap().command,
            Commands::SetFilterState { status: false }
        ));
        assert!(matches!(
            parse("true").unwrap().command,
            Commands::SetFilterState { status: true }
        ));
        assert!(parse("maybe").is_err());
    }

    #[test]
    fn test_parse_requires_base_url() {
        let result = Cli::try_parse_from(["dirac-cli", "get-slots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("2.5").unwrap(), Duration::from_millis(2500));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("-1").is_err());
        assert!(parse_timeout("soon").is_err());
        assert!(parse_timeout("1e300").is_err());
    }

    #[test]
    fn test_error_message_prefixes_processor_failures() {
        let config = anyhow::Error::from(ProcessorError::Configuration("bad url".to_string()));
        assert_eq!(error_message(&config), "Error: Invalid configuration: bad url");

        let other = anyhow::anyhow!("runtime exploded");
        assert_eq!(error_message(&other), "Error: runtime exploded");
    }
}
