//! Response body decoding by `Content-Encoding`.

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use std::io::{self, Read};

/// Declared body encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
    /// Anything else. Decoded as identity with a warning.
    Unsupported(String),
}

impl ContentEncoding {
    /// Parse the `Content-Encoding` header value. Absent, empty, `none` and `identity`
    /// all mean no compression.
    pub fn from_header(value: Option<&str>) -> Self {
        let value = value.map(|v| v.trim().to_ascii_lowercase()).unwrap_or_default();
        match value.as_str() {
            "" | "none" | "identity" => ContentEncoding::Identity,
            "gzip" | "x-gzip" => ContentEncoding::Gzip,
            "deflate" => ContentEncoding::Deflate,
            "br" => ContentEncoding::Brotli,
            _ => ContentEncoding::Unsupported(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Deflate => "deflate",
            ContentEncoding::Brotli => "br",
            ContentEncoding::Unsupported(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value sent as `Accept-Encoding` on every call.
pub const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Decode `raw` according to `encoding`.
///
/// Unsupported encodings fall through as identity. This silently yields garbage if the
/// server ever starts using a new compression scheme, so the fallback is logged.
pub fn decode_body(encoding: &ContentEncoding, raw: &[u8], url: &str) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len());
    match encoding {
        ContentEncoding::Identity => out.extend_from_slice(raw),
        ContentEncoding::Gzip => {
            MultiGzDecoder::new(raw).read_to_end(&mut out)?;
        }
        ContentEncoding::Deflate => {
            // HTTP "deflate" should be zlib-wrapped, but raw deflate streams are common.
            if looks_like_zlib(raw) {
                ZlibDecoder::new(raw).read_to_end(&mut out)?;
            } else {
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
            }
        }
        ContentEncoding::Brotli => {
            brotli::Decompressor::new(raw, 4096).read_to_end(&mut out)?;
        }
        ContentEncoding::Unsupported(name) => {
            tracing::warn!(
                encoding = name.as_str(),
                url,
                "unsupported Content-Encoding, treating body as identity"
            );
            out.extend_from_slice(raw);
        }
    }
    Ok(out)
}

// RFC 1950 header: CM = 8, and (CMF * 256 + FLG) is a multiple of 31.
fn looks_like_zlib(raw: &[u8]) -> bool {
    match raw {
        [cmf, flg, ..] => cmf & 0x0f == 8 && (u16::from(*cmf) * 256 + u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}
