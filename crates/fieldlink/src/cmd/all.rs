use fieldlink_proto::{FrameBuilder, FrameView, Verb};

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::LinkArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let mut client = LinkClient::connect(&args.path, timeout)?;

    let response =
        client.exchange(|seq| FrameBuilder::new(Verb::GetAll, seq).finish().to_vec())?;

    let Some(view) = FrameView::parse(&response) else {
        return Ok(FAILURE);
    };
    print_response(&view, format);

    Ok(if response_ok(&view) { SUCCESS } else { FAILURE })
}
