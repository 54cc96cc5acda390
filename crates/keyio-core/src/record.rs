//! Generated records and the document emitter

use crate::template::Metadata;
use crate::Result;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::io::Write;

/// A string a decoder must accept, with the bytes it must decode to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    /// Encoded string
    pub encoded: String,
    /// Expected decoded bytes (output prefix + payload + output suffix)
    pub payload: Vec<u8>,
    /// Template metadata
    pub metadata: Metadata,
}

/// Serialized as `[encoded, payload_hex, metadata]`
impl Serialize for ValidRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.encoded)?;
        tuple.serialize_element(&hex::encode(&self.payload))?;
        tuple.serialize_element(&self.metadata)?;
        tuple.end()
    }
}

/// A string a decoder must reject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    /// Encoded string
    pub encoded: String,
}

/// Serialized as `[encoded]`
impl Serialize for InvalidRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(1)?;
        tuple.serialize_element(&self.encoded)?;
        tuple.end()
    }
}

/// Document layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    /// Four-space indentation, one element per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Write records as a JSON array followed by a newline
pub fn emit<T: Serialize, W: Write>(records: &[T], mut writer: W, style: Style) -> Result<()> {
    match style {
        Style::Pretty => {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
            records.serialize(&mut ser)?;
        }
        Style::Compact => serde_json::to_writer(&mut writer, records)?,
    }
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Emitted {} records", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyio_params::Chain;

    fn sample() -> ValidRecord {
        ValidRecord {
            encoded: "LKDxGDJq5fF4FohAB8zJH24mDDNHDNtqsE".to_string(),
            payload: vec![0x76, 0xa9, 0x14, 0x88, 0xac],
            metadata: Metadata::address(Chain::Main),
        }
    }

    #[test]
    fn test_valid_record_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"["LKDxGDJq5fF4FohAB8zJH24mDDNHDNtqsE","76a91488ac",{"chain":"main","isPrivkey":false}]"#
        );
    }

    #[test]
    fn test_invalid_record_shape() {
        let record = InvalidRecord {
            encoded: "x".to_string(),
        };
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"["x"]"#);
    }

    #[test]
    fn test_emit_compact() {
        let records = vec![
            InvalidRecord {
                encoded: String::new(),
            },
            InvalidRecord {
                encoded: "x".to_string(),
            },
        ];
        let mut out = Vec::new();
        emit(&records, &mut out, Style::Compact).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[[\"\"],[\"x\"]]\n");
    }

    #[test]
    fn test_emit_pretty_indent() {
        let mut out = Vec::new();
        emit(&[sample()], &mut out, Style::Pretty).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("[\n    [\n        \"LKDx"));
        assert!(text.contains("\n            \"chain\": \"main\",\n"));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_emit_empty() {
        let mut out = Vec::new();
        emit::<ValidRecord, _>(&[], &mut out, Style::Pretty).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }
}
