use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::info;
use sampler_sim::config::DEFAULT_LISTEN_ADDRESS;
use sampler_sim::listener::report;
use sampler_sim::logging;
use sampler_sim::{Listener, ListenerConfig, StdResult, DEFAULT_PORT};
use tokio::signal;

#[derive(Parser, Debug)]
#[command(
    name = "sampler-listen",
    about = "Print the control messages a sampler would receive.",
    version
)]
struct Cli {
    #[arg(short = 'a', long, default_value = DEFAULT_LISTEN_ADDRESS, help = "Address to bind")]
    address: String,

    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT, help = "UDP port to bind")]
    port: u16,

    #[arg(short = 'n', long, default_value_t = 0, help = "Exit after this many messages, 0 runs until Ctrl-C")]
    count: u64,

    #[arg(long, value_name = "SECS", help = "Exit when no datagram arrives for this many seconds")]
    idle_timeout: Option<u64>,

    #[arg(long, help = "Print each message as a JSON line")]
    json: bool,

    #[arg(long, default_value = logging::DEFAULT_LEVEL, help = "Log level, RUST_LOG overrides it")]
    log_level: String,

    #[arg(long, help = "Write rotated log files to this directory")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            address: self.address.clone(),
            port: self.port,
            count: (self.count > 0).then_some(self.count),
            idle_timeout: self.idle_timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> StdResult<()> {
    let _logger = logging::init(&cli.log_level, cli.log_dir.as_deref(), "sampler-listen")?;
    let config = cli.listener_config();
    let mut listener = Listener::from_config(&config).await?;
    println!("listening on {}", listener.local_addr()?);

    let json = cli.json;
    let serve = listener.serve(config.count, config.idle_timeout, |peer, envelope| {
        println!("{}", report(peer, envelope, json)?);
        Ok(())
    });

    tokio::select! {
        decoded = serve => {
            info!("Decoded {} message(s)", decoded?);
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_forever_on_all_interfaces() {
        let cli = Cli::try_parse_from(["sampler-listen"]).unwrap();
        assert_eq!(cli.listener_config(), ListenerConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn count_and_idle_timeout() {
        let cli = Cli::try_parse_from([
            "sampler-listen",
            "-p",
            "60000",
            "-n",
            "2",
            "--idle-timeout",
            "5",
            "--json",
        ])
        .unwrap();
        let config = cli.listener_config();
        assert_eq!(config.port, 60000);
        assert_eq!(config.count, Some(2));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(5)));
        assert!(cli.json);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
