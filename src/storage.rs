//! Icon storage decoding
//!
//! A schematic document keeps embedded raster images in a separate
//! compound-document stream made of length-prefixed records:
//!
//! ```text
//! header: u16 len, u8 padding(=0), u8 type(=0), bytes[len]        (NUL-terminated text)
//! bitmap: u16 len, u8 padding(=0), u8 type(=1), u8 magic(=208),
//!         u8 name_len, bytes[name_len], u32 image_len, bytes[image_len]
//! ```
//!
//! Records are read until fewer than two bytes (one length prefix) remain.

use base64::Engine;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{RecordField, StorageError, Warning};
use crate::log;
use crate::stream::RecordStream;

/// Text every valid header record contains
pub const HEADER_MARKER: &str = "|HEADER=Icon storage";

const HEADER_RECORD_TYPE: u8 = 0;
const BITMAP_RECORD_TYPE: u8 = 1;
const BITMAP_MAGIC: u8 = 208;

#[derive(Parser)]
#[grammar = "storage.pest"]
struct PropertyParser;

/// How unexpected fixed bytes (padding, record type, magic) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Record a [`Warning::FieldMismatch`] and keep decoding with the value as read
    #[default]
    Permissive,
    /// Fail with [`StorageError::FieldMismatch`]
    Strict,
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub strictness: Strictness,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
        }
    }
}

/// The decoded header record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderRecord {
    /// Header text with the NUL terminator removed
    pub text: String,
    /// `KEY=VALUE` pairs in the order they appear
    pub properties: Vec<(String, String)>,
}

impl HeaderRecord {
    /// Case-insensitive property lookup
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// One embedded image
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub filename: String,
    pub data: Vec<u8>,
    /// Offset of the record within the stream
    pub offset: usize,
}

impl Bitmap {
    /// MIME type sniffed from the image's leading bytes
    pub fn mime_type(&self) -> &'static str {
        match self.data.as_slice() {
            [b'B', b'M', ..] => "image/bmp",
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [0xFF, 0xD8, ..] => "image/jpeg",
            [b'G', b'I', b'F', b'8', ..] => "image/gif",
            _ => "application/octet-stream",
        }
    }

    /// `data:` URI suitable for an SVG `<image href>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// Result of decoding an icon storage stream
#[derive(Debug, Clone, Default)]
pub struct IconStorage {
    pub header: HeaderRecord,
    bitmaps: Vec<Bitmap>,
    /// Non-fatal problems found while decoding
    pub warnings: Vec<Warning>,
}

impl IconStorage {
    /// Look up a bitmap by file name
    pub fn get(&self, filename: &str) -> Option<&Bitmap> {
        self.bitmaps.iter().find(|b| b.filename == filename)
    }

    /// Bitmaps in the order their names were first encountered
    pub fn iter(&self) -> impl Iterator<Item = &Bitmap> {
        self.bitmaps.iter()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.bitmaps.iter().map(|b| b.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Add a bitmap. A bitmap with the same file name is replaced in place.
    pub fn insert(&mut self, bitmap: Bitmap) {
        if let Some(existing) = self
            .bitmaps
            .iter_mut()
            .find(|b| b.filename == bitmap.filename)
        {
            log::debug!(filename = %bitmap.filename, "duplicate bitmap name, replacing");
            *existing = bitmap;
        } else {
            self.bitmaps.push(bitmap);
        }
    }
}

/// Walks an icon storage stream and collects its bitmaps
#[derive(Debug, Clone, Default)]
pub struct IconStorageDecoder {
    options: DecodeOptions,
}

impl IconStorageDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decode every record in `stream`.
    ///
    /// Structural failures (bad header marker, truncated record) abort the
    /// whole decode; no partial result is returned.
    pub fn decode(&self, stream: &mut RecordStream<'_>) -> Result<IconStorage, StorageError> {
        let mut storage = IconStorage::default();
        storage.header = self.read_header(stream, &mut storage.warnings)?;

        while stream.remaining() >= 2 {
            let bitmap = self.read_bitmap(stream, &mut storage.warnings)?;
            log::debug!(
                filename = %bitmap.filename,
                size = bitmap.data.len(),
                position = stream.position(),
                "decoded bitmap"
            );
            storage.insert(bitmap);
        }

        Ok(storage)
    }

    fn read_header(
        &self,
        stream: &mut RecordStream<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Result<HeaderRecord, StorageError> {
        let payload_length = stream.read_u16_le()? as usize;
        self.expect_byte(stream, RecordField::Padding, 0, warnings)?;
        self.expect_byte(stream, RecordField::RecordType, HEADER_RECORD_TYPE, warnings)?;
        let payload = stream.read(payload_length)?;

        let text_bytes = payload.split_last().map_or(payload, |(_, rest)| rest);
        let text = String::from_utf8_lossy(text_bytes).into_owned();
        if !text.contains(HEADER_MARKER) {
            return Err(StorageError::BadHeader { header: text });
        }

        let properties = parse_properties(&text);
        Ok(HeaderRecord { text, properties })
    }

    fn read_bitmap(
        &self,
        stream: &mut RecordStream<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Result<Bitmap, StorageError> {
        let offset = stream.position();
        let _payload_length = stream.read_u16_le()?;
        self.expect_byte(stream, RecordField::Padding, 0, warnings)?;
        self.expect_byte(stream, RecordField::RecordType, BITMAP_RECORD_TYPE, warnings)?;
        self.expect_byte(stream, RecordField::Magic, BITMAP_MAGIC, warnings)?;

        let name_length = stream.read_u8()? as usize;
        let filename = String::from_utf8_lossy(stream.read(name_length)?).into_owned();
        let image_length = stream.read_u32_le()? as usize;
        let data = stream.read(image_length)?.to_vec();

        Ok(Bitmap {
            filename,
            data,
            offset,
        })
    }

    /// Read one byte and compare it against the expected constant
    fn expect_byte(
        &self,
        stream: &mut RecordStream<'_>,
        field: RecordField,
        expected: u8,
        warnings: &mut Vec<Warning>,
    ) -> Result<u8, StorageError> {
        let offset = stream.position();
        let found = stream.read_u8()?;
        if found != expected {
            match self.options.strictness {
                Strictness::Strict => {
                    return Err(StorageError::FieldMismatch {
                        field,
                        offset,
                        expected,
                        found,
                    });
                }
                Strictness::Permissive => {
                    log::warn!(%field, offset, expected, found, "unexpected record byte");
                    warnings.push(Warning::FieldMismatch {
                        field,
                        offset,
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(found)
    }
}

/// Decode an icon storage stream with default (permissive) options
pub fn decode_icon_storage(data: &[u8]) -> Result<IconStorage, StorageError> {
    IconStorageDecoder::default().decode(&mut RecordStream::new(data))
}

/// Split a `|KEY=VALUE|KEY=VALUE` list. Malformed lists yield no properties.
fn parse_properties(text: &str) -> Vec<(String, String)> {
    let pairs = match PropertyParser::parse(Rule::properties, text) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::debug!(error = %e, "header property list did not parse");
            return Vec::new();
        }
    };

    pairs
        .flatten()
        .filter(|pair| pair.as_rule() == Rule::property)
        .filter_map(|pair| {
            let mut inner = pair.into_inner();
            let key = inner.next()?.as_str().to_string();
            let value = inner.next().map(|v| v.as_str().to_string()).unwrap_or_default();
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a header record around `text` (a NUL terminator is appended)
    pub(crate) fn header_record(text: &str) -> Vec<u8> {
        let mut payload = text.as_bytes().to_vec();
        payload.push(0);
        let mut out = (payload.len() as u16).to_le_bytes().to_vec();
        out.extend_from_slice(&[0, HEADER_RECORD_TYPE]);
        out.extend_from_slice(&payload);
        out
    }

    /// Build a bitmap record
    pub(crate) fn bitmap_record(name: &str, image: &[u8]) -> Vec<u8> {
        let payload_len = 1 + 1 + name.len() + 4 + image.len();
        let mut out = (payload_len as u16).to_le_bytes().to_vec();
        out.extend_from_slice(&[0, BITMAP_RECORD_TYPE, BITMAP_MAGIC, name.len() as u8]);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&(image.len() as u32).to_le_bytes());
        out.extend_from_slice(image);
        out
    }

    fn valid_header() -> Vec<u8> {
        header_record("|HEADER=Icon storage|WEIGHT=2")
    }

    #[test]
    fn decodes_bitmaps_in_order() {
        let mut data = valid_header();
        data.extend(bitmap_record("a.bmp", b"BMaaaa"));
        data.extend(bitmap_record("b.png", &[0x89, b'P', b'N', b'G', 1, 2]));

        let storage = decode_icon_storage(&data).unwrap();
        assert_eq!(storage.filenames().collect::<Vec<_>>(), ["a.bmp", "b.png"]);
        assert_eq!(storage.get("a.bmp").unwrap().data, b"BMaaaa");
        assert_eq!(storage.get("b.png").unwrap().mime_type(), "image/png");
        assert!(storage.warnings.is_empty());
    }

    #[test]
    fn header_properties_are_parsed() {
        let storage = decode_icon_storage(&valid_header()).unwrap();
        assert_eq!(storage.header.text, "|HEADER=Icon storage|WEIGHT=2");
        assert_eq!(storage.header.property("header"), Some("Icon storage"));
        assert_eq!(storage.header.property("WEIGHT"), Some("2"));
        assert!(storage.is_empty());
    }

    #[test]
    fn malformed_property_list_is_not_fatal() {
        let data = header_record("junk|HEADER=Icon storage|NOEQUALS");
        let storage = decode_icon_storage(&data).unwrap();
        assert!(storage.header.properties.is_empty());
    }

    #[test]
    fn missing_marker_is_a_format_error() {
        let mut data = header_record("|HEADER=Something else");
        data.extend(bitmap_record("a.bmp", b"BM"));
        let err = decode_icon_storage(&data).unwrap_err();
        assert!(matches!(err, StorageError::BadHeader { .. }));
    }

    #[test]
    fn marker_split_by_terminator_is_rejected() {
        // Without a terminator the last marker byte is the one that gets stripped
        let text = HEADER_MARKER.as_bytes();
        let mut data = (text.len() as u16).to_le_bytes().to_vec();
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(text);
        assert!(matches!(
            decode_icon_storage(&data),
            Err(StorageError::BadHeader { .. })
        ));
    }

    #[test]
    fn truncated_image_is_an_error() {
        let mut data = valid_header();
        let mut record = bitmap_record("a.bmp", b"BMxxxxxxxx");
        record.truncate(record.len() - 3);
        data.extend(record);
        let err = decode_icon_storage(&data).unwrap_err();
        assert!(matches!(err, StorageError::Truncated { needed: 10, available: 7, .. }));
    }

    #[test]
    fn truncated_header_is_an_error() {
        let mut data = valid_header();
        data.truncate(6);
        assert!(matches!(
            decode_icon_storage(&data),
            Err(StorageError::Truncated { .. })
        ));
    }

    #[test]
    fn single_trailing_byte_ends_the_loop() {
        let mut data = valid_header();
        data.extend(bitmap_record("a.bmp", b"BM"));
        data.push(0xFF);
        let storage = decode_icon_storage(&data).unwrap();
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn wrong_magic_is_a_warning_when_permissive() {
        let mut data = valid_header();
        let offset = data.len();
        let mut record = bitmap_record("a.bmp", b"BM");
        record[4] = 207;
        data.extend(record);

        let storage = decode_icon_storage(&data).unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(
            storage.warnings,
            vec![Warning::FieldMismatch {
                field: RecordField::Magic,
                offset: offset + 4,
                expected: 208,
                found: 207,
            }]
        );
    }

    #[test]
    fn wrong_padding_fails_when_strict() {
        let mut data = valid_header();
        let mut record = bitmap_record("a.bmp", b"BM");
        record[2] = 1;
        data.extend(record);

        let decoder = IconStorageDecoder::new(DecodeOptions::strict());
        let err = decoder.decode(&mut RecordStream::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            StorageError::FieldMismatch {
                field: RecordField::Padding,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn wrong_header_type_is_collected() {
        let mut data = valid_header();
        data[3] = 1;
        let storage = decode_icon_storage(&data).unwrap();
        assert!(matches!(
            storage.warnings.as_slice(),
            [Warning::FieldMismatch {
                field: RecordField::RecordType,
                offset: 3,
                ..
            }]
        ));
    }

    #[test]
    fn duplicate_names_keep_the_last_image() {
        let mut data = valid_header();
        data.extend(bitmap_record("a.bmp", b"first"));
        data.extend(bitmap_record("b.bmp", b"other"));
        data.extend(bitmap_record("a.bmp", b"second"));
        let storage = decode_icon_storage(&data).unwrap();
        assert_eq!(storage.filenames().collect::<Vec<_>>(), ["a.bmp", "b.bmp"]);
        assert_eq!(storage.get("a.bmp").unwrap().data, b"second");
    }

    #[test]
    fn data_uri_uses_sniffed_mime_type() {
        let bitmap = Bitmap {
            filename: "x.bmp".into(),
            data: b"BM".to_vec(),
            offset: 0,
        };
        assert_eq!(bitmap.to_data_uri(), "data:image/bmp;base64,Qk0=");
    }
}
