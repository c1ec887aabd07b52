use fieldlink_proto::{FrameBuilder, FrameView, Tag, Verb};

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::GetArgs;
use crate::exit::{CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: GetArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    // Zero-length records ask the node to return those tags.
    let mut b = FrameBuilder::new(Verb::GetParam, 0);
    for name in &args.tags {
        let tag = Tag::from_name(name)
            .ok_or_else(|| CliError::new(USAGE, format!("unknown tag: {name}")))?;
        b.put(tag, b"")
            .map_err(|err| CliError::new(USAGE, format!("request too large: {err}")))?;
    }
    let mut frame = b.finish().to_vec();

    let mut client = LinkClient::connect(&args.path, timeout)?;
    let response = client.exchange(move |seq| {
        frame[2] = seq;
        frame
    })?;

    let Some(view) = FrameView::parse(&response) else {
        return Ok(FAILURE);
    };
    print_response(&view, format);

    Ok(if response_ok(&view) { SUCCESS } else { FAILURE })
}
