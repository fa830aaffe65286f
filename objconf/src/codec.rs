//! Type-directed encoding of settings values.
//!
//! Any type implementing serde's `Serialize` / `Deserialize` can be written to
//! and read back from a text stream without per-type code. Two encodings are
//! available, chosen the same way a config file picks its format: by
//! extension.
//!
//! Decoding is strict. Records reject unknown fields and require every
//! non-optional field, so a document written for a different type surfaces as
//! [`CodecError::Malformed`] instead of being silently patched. An `Option`
//! field that is missing decodes as `None`; TOML has no null, so that is how
//! an absent value is written.
//!
//! Floats survive a round trip bit for bit in both encodings.

use std::{
    fmt,
    io::{Read, Write},
    path::Path,
    str::FromStr,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{CodecError, UnknownFormat};

/// Concrete textual encoding of a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// TOML document; the root value must be a record.
    ///
    /// TOML integers are signed 64-bit, so a `u64` above `i64::MAX` is
    /// rejected with [`CodecError::UnsupportedShape`].
    #[default]
    Toml,
    /// Pretty-printed JSON document.
    Json,
}

impl Format {
    /// File extension written for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    /// Map a file extension to a format.
    pub fn from_extension(ext: &str) -> Result<Self, UnknownFormat> {
        match ext {
            "toml" | "tml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }

    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, UnknownFormat> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(&s.to_ascii_lowercase())
    }
}

/// Encode `value` into a string.
pub fn encode<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<String, CodecError> {
    match format {
        Format::Toml => {
            toml::to_string_pretty(value).map_err(|e| CodecError::UnsupportedShape(e.to_string()))
        }
        Format::Json => {
            let mut s = serde_json::to_string_pretty(value)
                .map_err(|e| CodecError::UnsupportedShape(e.to_string()))?;
            s.push('\n');
            Ok(s)
        }
    }
}

/// Decode a document.
///
/// Returns `Ok(None)` when the document holds no value: blank text in either
/// format, or a JSON `null`.
pub fn decode<T: DeserializeOwned>(text: &str, format: Format) -> Result<Option<T>, CodecError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    match format {
        Format::Toml => toml::from_str::<T>(text)
            .map(Some)
            .map_err(|e| CodecError::Malformed(e.to_string())),
        Format::Json => serde_json::from_str::<Option<T>>(text)
            .map_err(|e| CodecError::Malformed(e.to_string())),
    }
}

/// Write `value` to `destination`.
///
/// The whole document is encoded before the first byte is written, so a
/// shape error never leaves a partial file behind. A write error can.
pub fn serialize<T, W>(value: &T, format: Format, mut destination: W) -> Result<(), CodecError>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let text = encode(value, format)?;
    destination.write_all(text.as_bytes())?;
    destination.flush()?;
    Ok(())
}

/// Read a value from `source`, treating an empty document as absent.
pub fn deserialize_optional<T, R>(mut source: R, format: Format) -> Result<Option<T>, CodecError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut text = String::new();
    source
        .read_to_string(&mut text)
        .map_err(CodecError::from_read)?;
    decode(&text, format)
}

/// Read a value from `source`. An empty document is malformed here.
pub fn deserialize<T, R>(source: R, format: Format) -> Result<T, CodecError>
where
    T: DeserializeOwned,
    R: Read,
{
    deserialize_optional(source, format)?
        .ok_or_else(|| CodecError::Malformed("document holds no value".to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::NamedContainer;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    enum Mode {
        Fast,
        Careful,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Step {
        name: String,
        mode: Mode,
        wait: Duration,
        limits: Vec<f64>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Plan {
        name: String,
        enabled: bool,
        retries: u32,
        note: Option<String>,
        steps: NamedContainer<Step>,
    }

    fn sample() -> Plan {
        Plan {
            name: "Warm up".to_string(),
            enabled: true,
            retries: 3,
            note: None,
            steps: NamedContainer::with_items(
                "Steps",
                [
                    Step {
                        name: "purge".to_string(),
                        mode: Mode::Careful,
                        wait: Duration::from_millis(1500),
                        limits: vec![0.5, 10.0, 2.25],
                    },
                    Step {
                        name: "hold".to_string(),
                        mode: Mode::Fast,
                        wait: Duration::from_secs(240),
                        limits: vec![],
                    },
                ],
            ),
        }
    }

    #[test]
    fn test_round_trip_both_formats() {
        for format in [Format::Toml, Format::Json] {
            let plan = sample();
            let mut buf = Vec::new();
            serialize(&plan, format, &mut buf).unwrap();
            let back: Plan = deserialize(buf.as_slice(), format).unwrap();
            assert_eq!(back, plan, "format {format}");
            assert_eq!(back.steps.name(), "Steps");
            assert_eq!(back.steps[0].name, "purge");
            assert_eq!(back.steps[1].name, "hold");
        }
    }

    #[test]
    fn test_extra_field_is_malformed() {
        let text = r#"{"name": "x", "enabled": true, "retries": 1, "steps": {"name": "s", "items": []}, "colour": 3}"#;
        let err = decode::<Plan>(text, Format::Json).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let text = "name = \"x\"\nenabled = true\n";
        let err = decode::<Plan>(text, Format::Toml).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_mismatched_type_is_malformed() {
        let text = "name = \"x\"\nenabled = \"yes\"\nretries = 1\n[steps]\nname = \"s\"\nitems = []\n";
        let err = decode::<Plan>(text, Format::Toml).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_blank_and_null_are_absent() {
        assert!(decode::<Plan>("  \n", Format::Toml).unwrap().is_none());
        assert!(decode::<Plan>("null", Format::Json).unwrap().is_none());
        let err = deserialize::<Plan, _>("".as_bytes(), Format::Json).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_toml_rejects_bare_sequence() {
        let err = encode(&vec![1, 2, 3], Format::Toml).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedShape(_)), "{err}");
    }

    #[test]
    fn test_toml_rejects_u64_above_i64_max() {
        #[derive(Serialize)]
        struct Counter {
            total: u64,
        }

        let err = encode(&Counter { total: u64::MAX }, Format::Toml).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedShape(_)), "{err}");
        let text = encode(&Counter { total: i64::MAX as u64 }, Format::Toml).unwrap();
        assert_eq!(text.trim(), format!("total = {}", i64::MAX));
    }

    #[test]
    fn test_floats_are_exact() {
        let limits = vec![
            983.0571047624649,
            989.9951327998887,
            0.1 + 0.2,
            2.0 / 3.0,
            -47.123456789012345,
        ];
        for format in [Format::Toml, Format::Json] {
            let mut step = sample().steps[0].clone();
            step.limits = limits.clone();
            let text = encode(&step, format).unwrap();
            let back: Step = decode(&text, format).unwrap().unwrap();
            let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&back.limits), bits(&limits), "{format}");
        }
    }

    #[test]
    fn test_missing_option_is_none() {
        let text = r#"{"name": "p", "enabled": false, "retries": 0, "steps": {"name": "S", "items": []}}"#;
        let plan = decode::<Plan>(text, Format::Json).unwrap().unwrap();
        assert_eq!(plan.note, None);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = &[0x6e, 0x61, 0xff, 0xfe];
        let err = deserialize::<Plan, _>(bytes, Format::Toml).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("tml").unwrap(), Format::Toml);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!(
            Format::from_path(Path::new("a/b.xml")).unwrap_err(),
            UnknownFormat("xml".to_string())
        );
    }
}
