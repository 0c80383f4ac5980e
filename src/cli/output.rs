//! Rendering of API records for the terminal.

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;
use std::io::Write;

use super::commands::OutputFormat;

const RULE_WIDTH: usize = 80;

pub fn print_list(items: &[Value], format: OutputFormat) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_list(&mut out, items, format)
}

pub fn print_single(record: &Value, format: OutputFormat) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_single(&mut out, record, format)
}

pub fn write_list(out: &mut impl Write, items: &[Value], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(items)?)?,
        OutputFormat::Quiet => {
            for item in items {
                if let Some(id) = record_id(item) {
                    writeln!(out, "{}", id)?;
                }
            }
        }
        OutputFormat::Table => write_table(out, items)?,
    }
    Ok(())
}

/// Single records have no table layout; anything but quiet is pretty JSON.
pub fn write_single(out: &mut impl Write, record: &Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Quiet => {
            if let Some(id) = record_id(record) {
                writeln!(out, "{}", id)?;
            }
        }
        OutputFormat::Json | OutputFormat::Table => {
            writeln!(out, "{}", serde_json::to_string_pretty(record)?)?
        }
    }
    Ok(())
}

fn write_table(out: &mut impl Write, items: &[Value]) -> Result<()> {
    let Some(first) = items.first() else {
        writeln!(out, "No data")?;
        return Ok(());
    };

    let keys: Vec<&String> = match first.as_object() {
        Some(map) => map.keys().collect(),
        None => Vec::new(),
    };

    if keys.is_empty() {
        for item in items {
            writeln!(out, "{}", format_value(item))?;
        }
        return Ok(());
    }

    let header = keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join("\t");
    writeln!(out, "{}", header.bold())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for item in items {
        let row: Vec<String> = keys
            .iter()
            .map(|k| format_value(item.get(k.as_str()).unwrap_or(&Value::Null)))
            .collect();
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// `id` if present, else `uuid`.
pub fn record_id(record: &Value) -> Option<String> {
    record
        .get("id")
        .filter(|v| !v.is_null())
        .or_else(|| record.get("uuid").filter(|v| !v.is_null()))
        .map(format_value)
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_list(items: &[Value], format: OutputFormat) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write_list(&mut buf, items, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_single(record: &Value, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_single(&mut buf, record, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let items = vec![
            json!({"id": 1, "name": "Web", "tags": ["a"]}),
            json!({"id": 2, "name": null, "tags": []}),
        ];
        let out = render_list(&items, OutputFormat::Table);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "id\tname\ttags");
        assert_eq!(lines[1], "-".repeat(80));
        assert_eq!(lines[2], "1\tWeb\t[\"a\"]");
        assert_eq!(lines[3], "2\t\t[]");
    }

    #[test]
    fn test_table_empty() {
        assert_eq!(render_list(&[], OutputFormat::Table), "No data\n");
    }

    #[test]
    fn test_quiet_prefers_id_then_uuid() {
        let items = vec![json!({"id": 8, "uuid": "u8"}), json!({"uuid": "u9"})];
        assert_eq!(render_list(&items, OutputFormat::Quiet), "8\nu9\n");
    }

    #[test]
    fn test_json_list_is_pretty_array() {
        let out = render_list(&[json!({"id": 1})], OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"id": 1}]));
        assert!(out.contains("\n  "));
    }

    #[test]
    fn test_single_formats() {
        let record = json!({"uuid": "abc", "name": "Core"});
        assert_eq!(render_single(&record, OutputFormat::Quiet), "abc\n");

        let out = render_single(&record, OutputFormat::Table);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, record);
    }
}
