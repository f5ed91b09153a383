use std::io::Cursor;

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

/// Singularize array field names for XML child elements.
fn singular(field: &str) -> &str {
    match field {
        "set_specs" => "set_spec",
        _ => field,
    }
}

fn write_text<W: std::io::Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Recursively write a serde_json::Value as XML elements. Nulls are omitted.
fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &serde_json::Value,
) -> Result<(), quick_xml::Error> {
    match value {
        serde_json::Value::Null => {}
        serde_json::Value::Bool(b) => write_text(writer, tag, if *b { "true" } else { "false" })?,
        serde_json::Value::Number(n) => write_text(writer, tag, &n.to_string())?,
        serde_json::Value::String(s) => write_text(writer, tag, s)?,
        serde_json::Value::Array(arr) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            let child_tag = singular(tag);
            for item in arr {
                write_value(writer, child_tag, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, val) in map {
                write_value(writer, key, val)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }
    Ok(())
}

/// Serialize a slice of records into an XML document: `<{item_tag}s>` wrapping
/// one `<{item_tag}>` per record.
pub fn items_to_xml<T: Serialize>(item_tag: &str, items: &[T]) -> Result<String> {
    let root_tag = format!("{}s", item_tag);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    if items.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(root_tag.as_str())))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(root_tag.as_str())))?;
        for item in items {
            let val = serde_json::to_value(item)?;
            write_value(&mut writer, item_tag, &val)?;
        }
        writer.write_event(Event::End(BytesEnd::new(root_tag.as_str())))?;
    }

    let buf = writer.into_inner().into_inner();
    Ok(String::from_utf8(buf)?)
}
