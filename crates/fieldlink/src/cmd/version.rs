use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(_args: VersionArgs) -> CliResult<i32> {
    println!("fieldlink {}", env!("CARGO_PKG_VERSION"));
    Ok(SUCCESS)
}
