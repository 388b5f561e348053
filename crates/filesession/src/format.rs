//! Session file format.
//!
//! JSONL, one file per domain:
//! - Line 1: `{"_type":"header","version":1,"domain":"test","persisted_at":"...","count":1}`
//! - Line 2+: `{"id":"abc","expiration":1700000000000,"attributes":{"spring":{"type":"string","value":"boot"}}}`
//!
//! `count` is checked on decode so a truncated file is reported rather than
//! silently loaded short.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::DeserializationContext;
use crate::types::{AttributeValue, SessionMap, SessionRecord};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_TYPE: &str = "header";

/// Header written as the first line of each session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHeader {
    #[serde(rename = "_type")]
    record_type: String,
    pub version: u32,
    pub domain: String,
    pub persisted_at: DateTime<Utc>,
    pub count: usize,
}

#[derive(Serialize)]
struct SessionLineRef<'a> {
    id: &'a str,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expiration: DateTime<Utc>,
    attributes: &'a BTreeMap<String, AttributeValue>,
}

#[derive(Deserialize)]
struct SessionLine {
    id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expiration: DateTime<Utc>,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

/// Why a session file could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("file is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("missing header line")]
    MissingHeader,

    #[error("invalid header: {0}")]
    InvalidHeader(#[source] serde_json::Error),

    #[error("unexpected header type {0:?}")]
    UnexpectedHeaderType(String),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error("malformed session on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate session id {0:?}")]
    DuplicateId(String),

    #[error("header declares {expected} sessions but file holds {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("unresolved type {type_name:?} for attribute {key:?} of session {session:?}")]
    UnresolvedType {
        session: String,
        key: String,
        type_name: String,
    },
}

/// A fully decoded session file, before expiration filtering.
#[derive(Debug)]
pub struct Decoded {
    pub header: FileHeader,
    pub sessions: SessionMap,
}

/// Write `sessions` in session-file format.
///
/// Sessions are written sorted by id so identical maps give identical files.
pub fn encode<W: Write>(
    writer: &mut W,
    domain: &str,
    sessions: &SessionMap,
    persisted_at: DateTime<Utc>,
) -> std::io::Result<()> {
    let header = FileHeader {
        record_type: HEADER_TYPE.to_string(),
        version: FORMAT_VERSION,
        domain: domain.to_string(),
        persisted_at,
        count: sessions.len(),
    };
    writeln!(writer, "{}", to_json(&header)?)?;

    let mut ids: Vec<&String> = sessions.keys().collect();
    ids.sort();

    for id in ids {
        let record = &sessions[id];
        let line = SessionLineRef {
            id,
            expiration: record.expiration(),
            attributes: record.attributes(),
        };
        writeln!(writer, "{}", to_json(&line)?)?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> std::io::Result<String> {
    serde_json::to_string(value).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Decode a session file, resolving every attribute type through `context`.
pub fn decode(
    bytes: &[u8],
    context: &dyn DeserializationContext,
) -> Result<Decoded, DecodeError> {
    let text = std::str::from_utf8(bytes)?;
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, first) = lines.next().ok_or(DecodeError::MissingHeader)?;
    let header: FileHeader = serde_json::from_str(first).map_err(DecodeError::InvalidHeader)?;
    if header.record_type != HEADER_TYPE {
        return Err(DecodeError::UnexpectedHeaderType(header.record_type));
    }
    if header.version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(header.version));
    }

    let mut sessions = HashMap::with_capacity(header.count.min(1024));
    for (index, line) in lines {
        let parsed: SessionLine =
            serde_json::from_str(line).map_err(|source| DecodeError::MalformedLine {
                line: index + 1,
                source,
            })?;

        let mut attributes = parsed.attributes;
        for (key, value) in attributes.iter_mut() {
            let resolved = context.resolve_type(value.type_name()).ok_or_else(|| {
                DecodeError::UnresolvedType {
                    session: parsed.id.clone(),
                    key: key.clone(),
                    type_name: value.type_name().to_string(),
                }
            })?;
            if resolved != value.type_name() {
                value.set_type_name(resolved);
            }
        }

        let record = SessionRecord::with_attributes(parsed.expiration, attributes);
        if sessions.insert(parsed.id.clone(), record).is_some() {
            return Err(DecodeError::DuplicateId(parsed.id));
        }
    }

    if sessions.len() != header.count {
        return Err(DecodeError::CountMismatch {
            expected: header.count,
            found: sessions.len(),
        });
    }

    Ok(Decoded { header, sessions })
}
