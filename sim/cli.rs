use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sampler_sim::logging;
use sampler_sim::{Emitter, EmitterConfig, Envelope, StdResult, DEFAULT_ADDRESS, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(
    name = "sampler-sim",
    about = "Simulate sampler clients by sending control messages over UDP.",
    version
)]
struct Cli {
    #[arg(long, global = true, default_value = logging::DEFAULT_LEVEL, help = "Log level, RUST_LOG overrides it")]
    log_level: String,

    #[arg(long, global = true, help = "Write rotated log files to this directory")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Send one message to a sampler")]
    Send(SendCommand),
}

#[derive(Args, Debug)]
struct SendCommand {
    #[command(flatten)]
    target: TargetArgs,

    #[command(subcommand)]
    message: MessageCommand,
}

#[derive(Args, Debug)]
struct TargetArgs {
    #[arg(short = 'a', long, global = true, default_value = DEFAULT_ADDRESS, help = "UDP address")]
    address: String,

    #[arg(short = 'p', long, global = true, default_value_t = DEFAULT_PORT, help = "UDP port")]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum MessageCommand {
    #[command(name = "playMessage", about = "Send a play message")]
    Play(PlayCommand),

    #[command(name = "cacheMessage", about = "Send a cache message")]
    Cache(CacheCommand),
}

#[derive(Args, Debug)]
struct PlayCommand {
    #[arg(short = 'f', long = "file", help = "The sample to play")]
    file: String,

    #[arg(short = 'c', long = "channel", default_value_t = 1, help = "The channel to play the sample on")]
    channel: u32,
}

#[derive(Args, Debug)]
struct CacheCommand {
    #[arg(short = 'f', long = "files", required = true, num_args = 1.., help = "The samples to cache, in order")]
    files: Vec<String>,
}

impl MessageCommand {
    fn into_envelope(self) -> Envelope {
        match self {
            MessageCommand::Play(cmd) => Envelope::play(cmd.file, cmd.channel),
            MessageCommand::Cache(cmd) => Envelope::cache(cmd.files),
        }
    }
}

impl From<TargetArgs> for EmitterConfig {
    fn from(target: TargetArgs) -> Self {
        EmitterConfig::new(target.address, target.port)
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
    let _logger = logging::init(&cli.log_level, cli.log_dir.as_deref(), "sampler-sim")?;
    match cli.command {
        Commands::Send(send_cmd) => handle_send_command(send_cmd).await,
    }
}

async fn handle_send_command(send_cmd: SendCommand) -> StdResult<()> {
    let emitter = Emitter::new(send_cmd.target.into());
    let config = emitter.config();
    println!("{}:{}", config.address, config.port);
    let delivery = emitter.emit(send_cmd.message.into_envelope()).await?;
    println!("sent {} bytes to {}", delivery.bytes, delivery.endpoint);
    Ok(())
}
