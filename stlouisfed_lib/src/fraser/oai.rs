//! OAI-PMH response parsing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// Error code OAI-PMH uses for an empty result set.
pub const NO_RECORDS_MATCH: &str = "noRecordsMatch";

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct OaiHeader {
    pub identifier: String,
    pub datestamp: String,
    pub set_specs: Vec<String>,
    /// The repository reports the record as withdrawn.
    pub deleted: bool,
}

/// A harvested record. `metadata` is the raw MODS XML, absent for deleted records.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct OaiRecord {
    pub header: OaiHeader,
    pub metadata: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct OaiSet {
    pub spec: String,
    pub name: String,
    /// Raw XML of `setDescription`, when present.
    pub description: Option<String>,
}

/// `<error code="...">message</error>`.
#[derive(Clone, Debug, PartialEq)]
pub struct OaiError {
    pub code: String,
    pub message: String,
}

/// Everything one response page can carry. Which lists are filled depends
/// on the verb.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OaiResponse {
    pub error: Option<OaiError>,
    pub records: Vec<OaiRecord>,
    /// Headers listed on their own (`ListIdentifiers`).
    pub headers: Vec<OaiHeader>,
    pub sets: Vec<OaiSet>,
    /// `None` or empty marks the last page.
    pub resumption_token: Option<String>,
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parses one OAI-PMH response document.
pub fn parse(xml: &str) -> Result<OaiResponse, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = OaiResponse::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut header: Option<OaiHeader> = None;
    let mut record: Option<OaiRecord> = None;
    let mut set: Option<OaiSet> = None;
    let mut error_code: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let name = local_name(&e);
                match name.as_str() {
                    "metadata" if record.is_some() => {
                        let raw = reader.read_text(e.name()).map_err(|e| e.to_string())?;
                        if let Some(record) = record.as_mut() {
                            record.metadata = Some(raw.trim().to_string());
                        }
                        continue;
                    }
                    "setDescription" if set.is_some() => {
                        let raw = reader.read_text(e.name()).map_err(|e| e.to_string())?;
                        if let Some(set) = set.as_mut() {
                            set.description = Some(raw.trim().to_string());
                        }
                        continue;
                    }
                    "record" => record = Some(OaiRecord::default()),
                    "header" => {
                        header = Some(OaiHeader {
                            deleted: attribute(&e, b"status")?.as_deref() == Some("deleted"),
                            ..Default::default()
                        })
                    }
                    "set" => set = Some(OaiSet::default()),
                    "error" => error_code = attribute(&e, b"code")?,
                    _ => {}
                }
                path.push(name);
                text.clear();
            }
            Event::Empty(e) => match local_name(&e).as_str() {
                "error" => {
                    out.error = Some(OaiError {
                        code: attribute(&e, b"code")?.unwrap_or_default(),
                        message: String::new(),
                    })
                }
                "header" => {
                    let empty = OaiHeader {
                        deleted: attribute(&e, b"status")?.as_deref() == Some("deleted"),
                        ..Default::default()
                    };
                    match record.as_mut() {
                        Some(record) => record.header = empty,
                        None => out.headers.push(empty),
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| e.to_string())?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(_) => {
                let Some(name) = path.pop() else {
                    return Err("unbalanced end tag".to_string());
                };
                let value = text.trim().to_string();
                match name.as_str() {
                    "identifier" => {
                        if let Some(header) = header.as_mut() {
                            header.identifier = value;
                        }
                    }
                    "datestamp" => {
                        if let Some(header) = header.as_mut() {
                            header.datestamp = value;
                        }
                    }
                    "setSpec" => {
                        if let Some(header) = header.as_mut() {
                            header.set_specs.push(value);
                        } else if let Some(set) = set.as_mut() {
                            set.spec = value;
                        }
                    }
                    "setName" => {
                        if let Some(set) = set.as_mut() {
                            set.name = value;
                        }
                    }
                    "header" => {
                        if let Some(done) = header.take() {
                            match record.as_mut() {
                                Some(record) => record.header = done,
                                None => out.headers.push(done),
                            }
                        }
                    }
                    "record" => {
                        if let Some(done) = record.take() {
                            out.records.push(done);
                        }
                    }
                    "set" => {
                        if let Some(done) = set.take() {
                            out.sets.push(done);
                        }
                    }
                    "resumptionToken" => {
                        out.resumption_token = (!value.is_empty()).then_some(value);
                    }
                    "error" => {
                        out.error = Some(OaiError {
                            code: error_code.take().unwrap_or_default(),
                            message: value,
                        });
                    }
                    _ => {}
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
