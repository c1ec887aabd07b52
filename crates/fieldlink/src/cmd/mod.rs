use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod all;
pub mod client;
pub mod get;
pub mod id;
pub mod msg;
pub mod ping;
pub mod serve;
pub mod set;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a node end of the link on a socket.
    Serve(ServeArgs),
    /// Alive check: send PING, print the response.
    Ping(LinkArgs),
    /// Read the node ID, or set it when NEW_ID is given.
    Id(IdArgs),
    /// Read specific parameters by tag name.
    Get(GetArgs),
    /// Write parameters as NAME=VALUE pairs.
    Set(SetArgs),
    /// Read every known tag.
    All(LinkArgs),
    /// Send a short text message.
    Msg(MsgArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Ping(args) => ping::run(args, format),
        Command::Id(args) => id::run(args, format),
        Command::Get(args) => get::run(args, format),
        Command::Set(args) => set::run(args, format),
        Command::All(args) => all::run(args, format),
        Command::Msg(args) => msg::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Settings file backing the node's persistent configuration.
    #[arg(long, value_name = "FILE", default_value = "fieldlink-settings.json")]
    pub settings: PathBuf,
    /// Tick interval in milliseconds for the link pump.
    #[arg(long, default_value = "5")]
    pub tick_ms: u64,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// New node ID; omit to read the current one.
    pub new_id: Option<String>,
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Tag names to read (e.g. sf freq_hz mode).
    #[arg(required = true)]
    pub tags: Vec<String>,
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Fields to write, as NAME=VALUE (e.g. sf=9 alias=ridge).
    #[arg(required = true)]
    pub fields: Vec<String>,
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct MsgArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Message text (up to 255 bytes).
    pub text: String,
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}
