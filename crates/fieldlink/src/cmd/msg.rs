use fieldlink_proto::{FrameView, Verb};

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::MsgArgs;
use crate::exit::{CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: MsgArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let payload = args.text.as_bytes();
    if payload.len() > 255 {
        return Err(CliError::new(
            USAGE,
            format!("message too long ({} bytes, max 255)", payload.len()),
        ));
    }

    // MSG carries raw text after the header; the length byte counts
    // payload bytes, not TLV records.
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.push(Verb::Msg.code());
    frame.push(0); // flags
    frame.push(0); // seq patched at send time
    frame.push(payload.len() as u8);
    frame.extend_from_slice(payload);

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
