//! Reading and writing the reference raster as a NumPy `.npy` file.
//!
//! Only what the reference asset needs is supported: two-dimensional arrays
//! of plain numeric dtypes, in either memory order. Writing always produces
//! a version 1.0, little-endian `f8`, C-order file.

use std::path::Path;

use tracing::debug;

use jotter_core::ReferenceField;

use crate::error::RenderError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const HEADER_ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dtype {
    Bool,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    F4,
    F8,
}

impl Dtype {
    fn parse(code: &str) -> Option<Self> {
        Some(match code {
            "b1" => Self::Bool,
            "i1" => Self::I1,
            "u1" => Self::U1,
            "i2" => Self::I2,
            "u2" => Self::U2,
            "i4" => Self::I4,
            "u4" => Self::U4,
            "i8" => Self::I8,
            "u8" => Self::U8,
            "f4" => Self::F4,
            "f8" => Self::F8,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        match self {
            Self::Bool | Self::I1 | Self::U1 => 1,
            Self::I2 | Self::U2 => 2,
            Self::I4 | Self::U4 | Self::F4 => 4,
            Self::I8 | Self::U8 | Self::F8 => 8,
        }
    }

    fn decode(self, bytes: &[u8], big_endian: bool) -> f64 {
        macro_rules! num {
            ($t:ty, $n:literal) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(bytes);
                if big_endian {
                    <$t>::from_be_bytes(raw)
                } else {
                    <$t>::from_le_bytes(raw)
                }
            }};
        }
        match self {
            Self::Bool => f64::from(u8::from(bytes[0] != 0)),
            Self::I1 => f64::from(bytes[0] as i8),
            Self::U1 => f64::from(bytes[0]),
            Self::I2 => f64::from(num!(i16, 2)),
            Self::U2 => f64::from(num!(u16, 2)),
            Self::I4 => f64::from(num!(i32, 4)),
            Self::U4 => f64::from(num!(u32, 4)),
            Self::I8 => num!(i64, 8) as f64,
            Self::U8 => num!(u64, 8) as f64,
            Self::F4 => f64::from(num!(f32, 4)),
            Self::F8 => num!(f64, 8),
        }
    }
}

struct Header {
    dtype: Dtype,
    big_endian: bool,
    fortran_order: bool,
    rows: usize,
    cols: usize,
}

/// Load a reference raster from a `.npy` file.
pub fn read_npy(path: &Path) -> crate::Result<ReferenceField> {
    let bytes = std::fs::read(path)?;
    let field = parse_npy(&bytes)?;
    debug!(
        width = field.width(),
        height = field.height(),
        "Loaded reference field from {}",
        path.display()
    );
    Ok(field)
}

/// Decode `.npy` bytes into a reference raster. Row 0 of the array is the
/// top row of the raster.
pub fn parse_npy(bytes: &[u8]) -> crate::Result<ReferenceField> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(npy_error("missing \\x93NUMPY magic"));
    }
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            let len = bytes
                .get(8..12)
                .ok_or_else(|| npy_error("truncated header length"))?;
            (u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize, 12)
        }
        v => return Err(npy_error(format!("unsupported format version {v}"))),
    };
    let data_start = header_start + header_len;
    let header_bytes = bytes
        .get(header_start..data_start)
        .ok_or_else(|| npy_error("truncated header"))?;
    let header_text =
        std::str::from_utf8(header_bytes).map_err(|_| npy_error("header is not UTF-8"))?;
    let header = parse_header(header_text)?;

    let count = header
        .rows
        .checked_mul(header.cols)
        .ok_or_else(|| npy_error("shape overflows"))?;
    let size = header.dtype.size();
    let byte_len = count
        .checked_mul(size)
        .ok_or_else(|| npy_error("shape overflows"))?;
    let payload = &bytes[data_start..];
    if payload.len() < byte_len {
        return Err(npy_error(format!(
            "expected {byte_len} data bytes, found {}",
            payload.len()
        )));
    }

    let raw: Vec<f64> = payload[..byte_len]
        .chunks_exact(size)
        .map(|chunk| header.dtype.decode(chunk, header.big_endian))
        .collect();
    let values = if header.fortran_order {
        let mut c_order = vec![0.0; count];
        for (i, v) in raw.into_iter().enumerate() {
            let (col, row) = (i / header.rows, i % header.rows);
            c_order[row * header.cols + col] = v;
        }
        c_order
    } else {
        raw
    };

    let width = u32::try_from(header.cols).map_err(|_| npy_error("too many columns"))?;
    let height = u32::try_from(header.rows).map_err(|_| npy_error("too many rows"))?;
    Ok(ReferenceField::new(width, height, values)?)
}

/// Encode a raster as a version 1.0 `<f8` C-order `.npy` file.
pub fn encode_npy(field: &ReferenceField) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        field.height(),
        field.width()
    );
    // magic (6) + version (2) + length (2) + header + '\n' is a multiple of 64.
    let unpadded = 10 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(10 + header.len() + field.values().len() * 8);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for v in field.values() {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Write a raster to `path` as `.npy`.
pub fn write_npy(field: &ReferenceField, path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encode_npy(field))?;
    debug!("Wrote reference field to {}", path.display());
    Ok(())
}

fn parse_header(text: &str) -> crate::Result<Header> {
    let descr = dict_value(text, "descr")?
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| npy_error("descr is not a string"))?;
    let (big_endian, code) = match descr.as_bytes().first() {
        Some(b'<' | b'|' | b'=') => (false, &descr[1..]),
        Some(b'>') => (true, &descr[1..]),
        _ => (false, descr),
    };
    let dtype = Dtype::parse(code).ok_or_else(|| npy_error(format!("unsupported dtype {descr:?}")))?;

    let order = dict_value(text, "fortran_order")?;
    let fortran_order = if order.starts_with("True") {
        true
    } else if order.starts_with("False") {
        false
    } else {
        return Err(npy_error("fortran_order is not a bool"));
    };

    let shape_text = dict_value(text, "shape")?
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| npy_error("shape is not a tuple"))?;
    let dims = shape_text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| npy_error(format!("bad shape ({shape_text})")))?;
    let [rows, cols] = dims[..] else {
        return Err(npy_error(format!(
            "expected a 2-D array, got {}-D",
            dims.len()
        )));
    };

    Ok(Header {
        dtype,
        big_endian,
        fortran_order,
        rows,
        cols,
    })
}

/// The text following `'key':` in the header dict.
fn dict_value<'a>(text: &'a str, key: &str) -> crate::Result<&'a str> {
    let quoted = format!("'{key}'");
    let at = text
        .find(&quoted)
        .ok_or_else(|| npy_error(format!("header has no {quoted}")))?;
    let rest = text[at + quoted.len()..].trim_start();
    rest.strip_prefix(':')
        .map(str::trim_start)
        .ok_or_else(|| npy_error(format!("{quoted} has no value")))
}

fn npy_error(msg: impl Into<String>) -> RenderError {
    RenderError::Npy(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_npy(descr: &str, fortran: bool, shape: &str, data: &[u8]) -> Vec<u8> {
        let header = format!(
            "{{'descr': '{descr}', 'fortran_order': {}, 'shape': {shape}, }}\n",
            if fortran { "True" } else { "False" }
        );
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(header.len() as u16).to_le_bytes());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn encoded_header_is_aligned() {
        let field = ReferenceField::new(1000, 800, vec![0.0; 800_000]).unwrap();
        let bytes = encode_npy(&field);
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % HEADER_ALIGN, 0);
        assert_eq!(bytes[10 + header_len - 1], b'\n');
        assert_eq!(bytes.len(), 10 + header_len + 800_000 * 8);
    }

    #[test]
    fn written_file_reads_back() {
        let field = ReferenceField::new(3, 2, vec![0.5, 1.0, 2.0, -3.0, 4.25, 100.0]).unwrap();
        let parsed = parse_npy(&encode_npy(&field)).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn reads_unsigned_bytes() {
        let bytes = raw_npy("|u1", false, "(2, 2)", &[0, 7, 255, 1]);
        let field = parse_npy(&bytes).unwrap();
        assert_eq!(field.values(), &[0.0, 7.0, 255.0, 1.0]);
    }

    #[test]
    fn reads_big_endian_ints() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-2i32).to_be_bytes());
        data.extend_from_slice(&9i32.to_be_bytes());
        let field = parse_npy(&raw_npy(">i4", false, "(1, 2)", &data)).unwrap();
        assert_eq!(field.values(), &[-2.0, 9.0]);
    }

    #[test]
    fn fortran_order_is_transposed() {
        // Column-major [[1, 2, 3], [4, 5, 6]] is stored as 1 4 2 5 3 6.
        let data: Vec<u8> = [1u8, 4, 2, 5, 3, 6].to_vec();
        let field = parse_npy(&raw_npy("|u1", true, "(2, 3)", &data)).unwrap();
        assert_eq!(field.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!((field.width(), field.height()), (3, 2));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_npy(b"not an npy file").is_err());
        assert!(parse_npy(&raw_npy("<c16", false, "(1, 1)", &[0; 16])).is_err());
        assert!(parse_npy(&raw_npy("<f8", false, "(4,)", &[0; 32])).is_err());
        assert!(parse_npy(&raw_npy("<f8", false, "(2, 2)", &[0; 16])).is_err());
    }

    #[test]
    fn oversized_shape_is_an_error() {
        let bytes = raw_npy("<f8", false, "(2305843009213693952, 1)", &[0; 16]);
        assert!(matches!(parse_npy(&bytes), Err(RenderError::Npy(_))));
        let bytes = raw_npy("<f8", true, "(2305843009213693952, 1)", &[0; 16]);
        assert!(matches!(parse_npy(&bytes), Err(RenderError::Npy(_))));
    }

    #[test]
    fn file_round_trip() {
        let dir = std::env::temp_dir().join("jotter_test_npy");
        let path = dir.join("reference.npy");
        let field = ReferenceField::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        write_npy(&field, &path).unwrap();
        assert_eq!(read_npy(&path).unwrap(), field);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
