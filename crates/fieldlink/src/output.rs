use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fieldlink_proto::{read_le, FrameView, Tag, TagWidth, Verb};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Plain,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One decoded TLV field, rendered for display.
#[derive(Serialize)]
struct FieldOutput {
    tag: u8,
    name: String,
    value: serde_json::Value,
}

#[derive(Serialize)]
struct ResponseOutput {
    verb: String,
    seq: u8,
    fields: Vec<FieldOutput>,
}

/// Render a TLV value according to its declared width.
///
/// Unknown tags fall back to a hex dump so forward-compatible peers
/// still show something useful.
fn render_value(tag: Option<Tag>, value: &[u8]) -> serde_json::Value {
    match tag.map(Tag::width) {
        Some(TagWidth::Str { .. }) => {
            serde_json::Value::String(String::from_utf8_lossy(value).into_owned())
        }
        Some(TagWidth::U8) => read_le::<u8>(value)
            .map(|v| serde_json::Value::from(v as u64))
            .unwrap_or_else(|| hex_value(value)),
        Some(TagWidth::U16) => read_le::<u16>(value)
            .map(|v| serde_json::Value::from(v as u64))
            .unwrap_or_else(|| hex_value(value)),
        Some(TagWidth::U32) => read_le::<u32>(value)
            .map(|v| serde_json::Value::from(v as u64))
            .unwrap_or_else(|| hex_value(value)),
        Some(TagWidth::I8) => read_le::<i8>(value)
            .map(|v| serde_json::Value::from(v as i64))
            .unwrap_or_else(|| hex_value(value)),
        Some(TagWidth::I16) => read_le::<i16>(value)
            .map(|v| serde_json::Value::from(v as i64))
            .unwrap_or_else(|| hex_value(value)),
        None => hex_value(value),
    }
}

fn hex_value(value: &[u8]) -> serde_json::Value {
    let hex: String = value.iter().map(|b| format!("{b:02x}")).collect();
    serde_json::Value::String(format!("0x{hex}"))
}

fn decode_response(view: &FrameView<'_>) -> ResponseOutput {
    let verb = view
        .verb()
        .map(|v| v.name().to_string())
        .unwrap_or_else(|| format!("0x{:02x}", view.verb_raw()));

    let fields = view
        .iter()
        .map(|(raw_tag, value)| {
            let tag = Tag::from_u8(raw_tag);
            FieldOutput {
                tag: raw_tag,
                name: tag
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| format!("0x{raw_tag:02x}")),
                value: render_value(tag, value),
            }
        })
        .collect();

    ResponseOutput {
        verb,
        seq: view.seq(),
        fields,
    }
}

/// Print one decoded response frame.
pub fn print_response(view: &FrameView<'_>, format: OutputFormat) {
    let out = decode_response(view);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("{} (seq {})", out.verb, out.seq);
            if out.fields.is_empty() {
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["field", "value"]);
            for field in &out.fields {
                table.add_row(vec![field.name.clone(), render_cell(&field.value)]);
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            println!("{} seq={}", out.verb, out.seq);
            for field in &out.fields {
                println!("{}={}", field.name, render_cell(&field.value));
            }
        }
    }
}

/// Report whether the peer answered RESP_OK.
pub fn response_ok(view: &FrameView<'_>) -> bool {
    view.verb() == Some(Verb::RespOk)
}

fn render_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
