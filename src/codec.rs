use compression_codecs::{EncodeV2, gzip::GzipEncoder};
use compression_core::Level;

/// The `Content-Encoding` value written when compression is active.
pub const GZIP: &str = "gzip";

/// Creates a new gzip encoder at the given level.
pub(crate) fn encoder(level: Level) -> Box<dyn EncodeV2 + Send> {
    Box::new(GzipEncoder::new(level.into()))
}

/// How the `Accept-Encoding` request header is matched against `gzip`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AcceptEncodingMatch {
    /// Parse the header as a comma-separated list of codings with optional
    /// quality values (e.g., "br, gzip;q=0.8, *;q=0.1").
    #[default]
    Tokens,
    /// Accept whenever the raw header value contains `gzip`.
    Substring,
}

impl AcceptEncodingMatch {
    /// Returns whether the header value allows a gzip-encoded response.
    pub fn accepts_gzip(self, header: &str) -> bool {
        match self {
            AcceptEncodingMatch::Tokens => accepts_gzip_token(header),
            AcceptEncodingMatch::Substring => header.contains(GZIP),
        }
    }
}

fn accepts_gzip_token(header: &str) -> bool {
    let mut gzip: Option<f32> = None;
    let mut wildcard: Option<f32> = None;

    for part in header.split(',') {
        let (encoding, quality) = parse_encoding_with_quality(part.trim());

        if encoding.eq_ignore_ascii_case("gzip") || encoding.eq_ignore_ascii_case("x-gzip") {
            // An explicit entry beats the wildcard, the highest weight wins
            gzip = Some(gzip.map_or(quality, |q| q.max(quality)));
        } else if encoding == "*" {
            wildcard = Some(quality);
        }
    }

    gzip.or(wildcard).is_some_and(|q| q > 0.0)
}

/// Parses an encoding entry like "gzip" or "br;q=0.8" into (encoding, quality).
fn parse_encoding_with_quality(s: &str) -> (&str, f32) {
    let mut parts = s.split(';');
    let encoding = parts.next().unwrap_or("").trim();

    let quality = parts
        .find_map(|param| {
            let param = param.trim();
            param
                .strip_prefix("q=")
                .or_else(|| param.strip_prefix("Q="))
                .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
        })
        .unwrap_or(1.0);

    (encoding, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(header: &str) -> bool {
        AcceptEncodingMatch::Tokens.accepts_gzip(header)
    }

    #[test]
    fn test_tokens_simple() {
        assert!(tokens("gzip"));
        assert!(tokens("GZIP"));
        assert!(tokens("x-gzip"));
        assert!(tokens("gzip, deflate, br"));
        assert!(tokens("br;q=1.0, gzip;q=0.5"));
    }

    #[test]
    fn test_tokens_unsupported() {
        assert!(!tokens(""));
        assert!(!tokens("identity"));
        assert!(!tokens("deflate, br"));
        assert!(!tokens("gzipfoo"));
        assert!(!tokens("\"gzip\""));
    }

    #[test]
    fn test_tokens_quality_zero() {
        assert!(!tokens("gzip;q=0"));
        assert!(!tokens("gzip;q=0.0, br"));
        assert!(!tokens("gzip; q=0"));
    }

    #[test]
    fn test_tokens_wildcard() {
        assert!(tokens("*"));
        assert!(tokens("br, *;q=0.1"));
        assert!(!tokens("*;q=0"));
        // Explicit refusal is not overridden by the wildcard
        assert!(!tokens("gzip;q=0, *"));
        assert!(tokens("*;q=0, gzip"));
    }

    #[test]
    fn test_tokens_extra_params() {
        assert!(tokens("gzip;level=1;q=0.5"));
        assert!(!tokens("gzip;level=1;q=0"));
    }

    #[test]
    fn test_substring() {
        let m = AcceptEncodingMatch::Substring;
        assert!(m.accepts_gzip("gzip"));
        assert!(m.accepts_gzip("deflate, gzip"));
        // Known looseness of raw substring matching
        assert!(m.accepts_gzip("gzipfoo"));
        assert!(m.accepts_gzip("gzip;q=0"));
        assert!(!m.accepts_gzip("GZIP"));
        assert!(!m.accepts_gzip("br"));
    }

    #[test]
    fn test_parse_encoding_with_quality() {
        assert_eq!(parse_encoding_with_quality("gzip"), ("gzip", 1.0));
        assert_eq!(parse_encoding_with_quality("br;q=0.8"), ("br", 0.8));
        assert_eq!(parse_encoding_with_quality("gzip ; Q=0.5"), ("gzip", 0.5));
        assert_eq!(parse_encoding_with_quality("gzip;q=bogus"), ("gzip", 0.0));
    }
}
