use std::time::Instant;

use fieldlink_proto::{FrameBuilder, FrameView, Verb};
use tracing::info;

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::LinkArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let mut client = LinkClient::connect(&args.path, timeout)?;

    let started = Instant::now();
    let response =
        client.exchange(|seq| FrameBuilder::new(Verb::Ping, seq).finish().to_vec())?;
    let elapsed = started.elapsed();

    let Some(view) = FrameView::parse(&response) else {
        return Ok(FAILURE);
    };
    info!(rtt_ms = elapsed.as_millis() as u64, "pong");
    print_response(&view, format);

    Ok(if response_ok(&view) { SUCCESS } else { FAILURE })
}
