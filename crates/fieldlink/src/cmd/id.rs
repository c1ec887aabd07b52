use fieldlink_proto::{FrameBuilder, FrameView, Tag, Verb};

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::IdArgs;
use crate::exit::{CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: IdArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let mut client = LinkClient::connect(&args.path, timeout)?;

    // Seq is patched in at send time (header byte 2).
    let mut frame = match &args.new_id {
        None => FrameBuilder::new(Verb::GetId, 0).finish().to_vec(),
        Some(new_id) => {
            let mut b = FrameBuilder::new(Verb::SetId, 0);
            b.put_str(Tag::Id, new_id)
                .map_err(|err| CliError::new(USAGE, format!("invalid id: {err}")))?;
            b.finish().to_vec()
        }
    };

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
