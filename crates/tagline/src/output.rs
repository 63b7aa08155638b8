use std::io::Write;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tagline_codec::Value;

use crate::exit::{CliError, CliResult};

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The value itself: text followed by a newline, blobs verbatim.
    #[default]
    Raw,
    Json,
    Table,
}

#[derive(Serialize)]
struct ValueOutput<'a> {
    label: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    value: String,
}

/// Echo a value read from a record to stdout.
pub fn print_value(label: &str, value: &Value, format: OutputFormat) -> CliResult<()> {
    let mut out = std::io::stdout().lock();
    write_value(&mut out, label, value, format)
        .and_then(|()| out.flush())
        .map_err(|err| CliError::io("failed writing value", err))
}

fn write_value<W: Write>(
    out: &mut W,
    label: &str,
    value: &Value,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Raw => match value {
            Value::Blob(data) => out.write_all(data),
            Value::String(data) => {
                out.write_all(data)?;
                out.write_all(b"\n")
            }
            other => writeln!(out, "{}", other.to_text()),
        },
        OutputFormat::Json => {
            let record = ValueOutput {
                label,
                kind: value.kind().name(),
                size: value.as_bytes().map(<[u8]>::len),
                value: value.to_text(),
            };
            let json = serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string());
            writeln!(out, "{json}")
        }
        OutputFormat::Table => {
            let size = value
                .as_bytes()
                .map(|data| data.len().to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LABEL", "TYPE", "SIZE", "VALUE"])
                .add_row(vec![
                    label.to_string(),
                    value.kind().name().to_string(),
                    size,
                    value.to_text(),
                ]);
            writeln!(out, "{table}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: &Value, format: OutputFormat) -> Vec<u8> {
        let mut out = Vec::new();
        write_value(&mut out, "field", value, format).unwrap();
        out
    }

    #[test]
    fn raw_output() {
        assert_eq!(render(&Value::Unsigned(42), OutputFormat::Raw), b"42\n");
        assert_eq!(render(&Value::string("John"), OutputFormat::Raw), b"John\n");
        assert_eq!(
            render(&Value::blob(vec![0u8, 1, 2]), OutputFormat::Raw),
            [0u8, 1, 2]
        );
    }

    #[test]
    fn json_output() {
        let out = render(&Value::string("John"), OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["label"], "field");
        assert_eq!(json["type"], "string");
        assert_eq!(json["size"], 4);
        assert_eq!(json["value"], "John");

        let out = render(&Value::Unsigned(7), OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(json.get("size").is_none());
    }

    #[test]
    fn table_output_has_header_and_value() {
        let out = render(&Value::Unsigned(42), OutputFormat::Table);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("LABEL"));
        assert!(text.contains("unsigned"));
        assert!(text.contains("42"));
    }
}
