use fieldlink_proto::{FrameBuilder, FrameView, Tag, TagWidth, Verb};

use crate::cmd::client::{parse_duration, LinkClient};
use crate::cmd::SetArgs;
use crate::exit::{CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_response, response_ok, OutputFormat};

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let mut b = FrameBuilder::new(Verb::SetParam, 0);
    for field in &args.fields {
        let (tag, value) = parse_field(field)?;
        b.put(tag, &value)
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

/// Parse one `NAME=VALUE` field into its wire encoding.
fn parse_field(field: &str) -> CliResult<(Tag, Vec<u8>)> {
    let (name, value) = field
        .split_once('=')
        .ok_or_else(|| CliError::new(USAGE, format!("expected NAME=VALUE, got: {field}")))?;

    let tag = Tag::from_name(name)
        .ok_or_else(|| CliError::new(USAGE, format!("unknown tag: {name}")))?;
    if !tag.is_settable() {
        return Err(CliError::new(USAGE, format!("tag is read-only: {name}")));
    }

    let bytes = match tag.width() {
        TagWidth::Str { max } => {
            if value.len() > max {
                return Err(CliError::new(
                    USAGE,
                    format!("{name} too long ({} bytes, max {max})", value.len()),
                ));
            }
            value.as_bytes().to_vec()
        }
        TagWidth::U8 => vec![parse_number::<u8>(name, value)?],
        TagWidth::U16 => parse_number::<u16>(name, value)?.to_le_bytes().to_vec(),
        TagWidth::U32 => parse_number::<u32>(name, value)?.to_le_bytes().to_vec(),
        TagWidth::I8 => parse_number::<i8>(name, value)?.to_le_bytes().to_vec(),
        TagWidth::I16 => parse_number::<i16>(name, value)?.to_le_bytes().to_vec(),
    };
    Ok((tag, bytes))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> CliResult<T> {
    value
        .parse::<T>()
        .map_err(|_| CliError::new(USAGE, format!("invalid value for {name}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_and_numeric_fields() {
        let (tag, bytes) = parse_field("alias=ridge").unwrap();
        assert_eq!(tag, Tag::Alias);
        assert_eq!(bytes, b"ridge");

        let (tag, bytes) = parse_field("freq_hz=915000000").unwrap();
        assert_eq!(tag, Tag::FreqHz);
        assert_eq!(bytes, 915_000_000u32.to_le_bytes().to_vec());

        let (tag, bytes) = parse_field("tx_pwr_dbm=-3").unwrap();
        assert_eq!(tag, Tag::TxPwrDbm);
        assert_eq!(bytes, vec![0xFD]);
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(parse_field("sf").is_err());
        assert!(parse_field("bogus=1").is_err());
        assert!(parse_field("sf=fast").is_err());
        assert!(parse_field("rssi_dbm=-50").is_err(), "read-only tag");
        assert!(parse_field("id=N30").is_err(), "id has its own verb");
    }
}
