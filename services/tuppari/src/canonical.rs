//! Canonicalization of tuppari requests.
//!
//! Everything here must be byte exact: the server rebuilds the same strings
//! and compares hashes, any difference in ordering, casing or encoding breaks
//! the signature silently.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use tuppari_core::hash::hex_sha256;
use tuppari_core::{Error, Result};

/// The parts of a request that take part in signing.
#[derive(Debug, Clone, Copy)]
pub struct RequestDescriptor<'a> {
    /// HTTP method, used verbatim.
    pub method: &'a str,
    /// Absolute path of the request.
    pub path: Option<&'a str>,
    /// Raw query string without the leading `?`.
    pub query: Option<&'a str>,
    /// Headers as `(name, value)` pairs, names are case-insensitive.
    pub headers: &'a [(&'a str, &'a str)],
    /// Serialized body exactly as it will be sent, empty for no body.
    pub body: &'a [u8],
}

/// Build the canonical uri of given path.
///
/// - empty or absent path becomes `/`
/// - a missing leading `/` is added
///
/// The path is never decoded nor normalized.
pub fn canonical_uri(path: Option<&str>) -> String {
    match path {
        None | Some("") => "/".to_string(),
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{p}"),
    }
}

/// Build the canonical query string.
///
/// Pairs are split on the first `=`, decoded, grouped by key and sorted by
/// key. Values of the same key keep their input order. Values are encoded
/// again with form encoding while keys stay decoded:
///
/// ```text
/// c=d&a=b&c=e => a=b&c=d&c=e
/// ```
pub fn canonical_query_string(query: Option<&str>) -> Result<String> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Ok(String::new());
    };

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in query.split('&').filter(|v| !v.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        params.entry(form_decode(k)?).or_default().push(form_decode(v)?);
    }

    let mut s = String::with_capacity(query.len());
    for (k, values) in &params {
        for v in values {
            if !s.is_empty() {
                s.push('&');
            }
            s.push_str(k);
            s.push('=');
            s.extend(form_urlencoded::byte_serialize(v.as_bytes()));
        }
    }

    Ok(s)
}

/// Build canonical headers.
///
/// 1. Convert all header names to lowercase and strip leading and trailing
///    space and control chars from the values
/// 2. Sort the headers by lowercase name
/// 3. Join `name:value` lines with `\n`
pub fn canonical_headers(headers: &[(&str, &str)]) -> Result<String> {
    Ok(sorted_headers(headers)?
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Build signed headers: the sorted lowercase header names joined with `;`.
pub fn signed_header_names(headers: &[(&str, &str)]) -> Result<String> {
    Ok(sorted_headers(headers)?
        .into_iter()
        .map(|(k, _)| k)
        .collect::<Vec<_>>()
        .join(";"))
}

/// Serialize the body into the text that will be hashed and sent.
///
/// No body serializes into an empty string. Objects keep the field order of
/// the given value.
pub fn serialize_body(body: Option<&Value>) -> Result<String> {
    match body {
        None => Ok(String::new()),
        Some(v) => serde_json::to_string(v)
            .map_err(|e| Error::unexpected("failed to serialize request body").with_source(e)),
    }
}

/// Hex encoded SHA256 of the serialized body.
///
/// If the body is absent, the empty string is hashed.
pub fn body_hash(body: Option<&Value>) -> Result<String> {
    Ok(hex_sha256(serialize_body(body)?.as_bytes()))
}

/// Build the canonical request.
///
/// ```text
/// HTTPRequestMethod + '\n' +
/// CanonicalURI + '\n' +
/// CanonicalQueryString + '\n' +
/// CanonicalHeaders + '\n' +
/// SignedHeaders + '\n' +
/// HexEncode(Hash(body))
/// ```
///
/// Empty fields keep their line.
pub fn canonical_request(req: &RequestDescriptor<'_>) -> Result<String> {
    let headers = sorted_headers(req.headers)?;

    let fields = [
        req.method.to_string(),
        canonical_uri(req.path),
        canonical_query_string(req.query)?,
        headers
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join("\n"),
        headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";"),
        hex_sha256(req.body),
    ];

    Ok(fields.join("\n"))
}

/// Lowercase names, trim values (chars `<= ' '`) and sort by name.
///
/// Names that collide after lowercasing are rejected: the canonical form
/// can't tell which value the server should expect.
fn sorted_headers<'a>(headers: &[(&str, &'a str)]) -> Result<Vec<(String, &'a str)>> {
    let mut sorted = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim_matches(|c: char| c <= ' ')))
        .collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(dup) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::invalid_argument(format!(
            "header {} is given more than once",
            dup[0].0
        )));
    }

    Ok(sorted)
}

/// Decode a form encoded query component.
///
/// `+` is a space and `%XX` is a byte, the decoded bytes must be valid UTF-8.
fn form_decode(s: &str) -> Result<String> {
    let bs = s.as_bytes();
    let mut idx = 0;
    while idx < bs.len() {
        if bs[idx] != b'%' {
            idx += 1;
            continue;
        }

        let valid = bs
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(Error::encoding(format!(
                "malformed percent-encoding in query component: {s}"
            )));
        }
        idx += 3;
    }

    let s = s.replace('+', " ");
    let decoded = percent_decode_str(&s).decode_utf8().map_err(|e| {
        Error::encoding(format!("query component is not valid utf-8: {s}")).with_source(e)
    })?;

    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;
    use tuppari_core::ErrorKind;

    #[test_case(None, "/"; "absent")]
    #[test_case(Some(""), "/"; "empty")]
    #[test_case(Some("/"), "/"; "root")]
    #[test_case(Some("path"), "/path"; "relative")]
    #[test_case(Some("/path"), "/path"; "absolute")]
    #[test_case(Some("/a%20b/../c"), "/a%20b/../c"; "kept as is")]
    fn test_canonical_uri(input: Option<&str>, expected: &str) {
        assert_eq!(expected, canonical_uri(input));
    }

    #[test]
    fn test_canonical_uri_is_idempotent() {
        let once = canonical_uri(Some("path"));
        assert_eq!(once, canonical_uri(Some(&once)));
    }

    #[test_case(None, ""; "absent")]
    #[test_case(Some(""), ""; "empty")]
    #[test_case(Some("a=b"), "a=b"; "single")]
    #[test_case(Some("a=b&c=d"), "a=b&c=d"; "sorted")]
    #[test_case(Some("c=d&a=b"), "a=b&c=d"; "unsorted")]
    #[test_case(Some("c=d&a=b&c=e"), "a=b&c=d&c=e"; "repeated key keeps input order")]
    #[test_case(Some("c=e&a=b&c=d"), "a=b&c=e&c=d"; "repeated key is not sorted by value")]
    #[test_case(Some("a"), "a="; "missing value")]
    #[test_case(Some("a=b=c"), "a=b%3Dc"; "split on first equal sign")]
    #[test_case(Some("msg=hello+world"), "msg=hello+world"; "plus is space")]
    #[test_case(Some("msg=hello%20world"), "msg=hello+world"; "percent space")]
    #[test_case(Some("msg=a%2Bb%2Fc"), "msg=a%2Bb%2Fc"; "reserved chars encoded again")]
    #[test_case(Some("msg=%E3%81%82"), "msg=%E3%81%82"; "utf8 value")]
    #[test_case(Some("msg=*-._~"), "msg=*-._%7E"; "form encoding set")]
    #[test_case(Some("a%20b=1"), "a b=1"; "key stays decoded")]
    #[test_case(Some("b=1&&a=2&"), "a=2&b=1"; "empty pairs skipped")]
    #[test_case(Some("B=1&a=2"), "B=1&a=2"; "keys sorted by byte order")]
    fn test_canonical_query_string(input: Option<&str>, expected: &str) {
        assert_eq!(expected, canonical_query_string(input).expect("must be valid"));
    }

    #[test_case("a=%zz"; "invalid hex")]
    #[test_case("a=%2"; "truncated escape")]
    #[test_case("a%=b"; "invalid key")]
    #[test_case("a=%FF"; "invalid utf8")]
    fn test_canonical_query_string_encoding_error(input: &str) {
        let err = canonical_query_string(Some(input)).unwrap_err();
        assert_eq!(ErrorKind::EncodingError, err.kind());
    }

    #[test]
    fn test_canonical_headers_with_empty_headers() -> Result<()> {
        assert_eq!("", canonical_headers(&[])?);
        assert_eq!("", signed_header_names(&[])?);
        Ok(())
    }

    #[test]
    fn test_canonical_headers() -> Result<()> {
        let headers = [
            ("Host", "http://localhost"),
            ("Content-Type", " application/json "),
        ];

        assert_eq!(
            "content-type:application/json\nhost:http://localhost",
            canonical_headers(&headers)?
        );
        assert_eq!("content-type;host", signed_header_names(&headers)?);
        Ok(())
    }

    #[test]
    fn test_canonical_headers_sorted_by_lowercase_name() -> Result<()> {
        // "X-b" sorts before "a" by raw bytes but after it once lowercased.
        let headers = [("X-b", "2"), ("a", "1")];

        assert_eq!("a:1\nx-b:2", canonical_headers(&headers)?);
        assert_eq!("a;x-b", signed_header_names(&headers)?);
        Ok(())
    }

    #[test]
    fn test_canonical_headers_trims_ascii_only() -> Result<()> {
        let headers = [("a", "\u{a0}x\u{3000}"), ("b", "\u{1}y\t"), ("c", "\n z \r")];

        assert_eq!(
            "a:\u{a0}x\u{3000}\nb:y\nc:z",
            canonical_headers(&headers)?
        );
        Ok(())
    }

    #[test]
    fn test_canonical_headers_rejects_duplicated_names() {
        let headers = [("Host", "a"), ("host", "b")];

        let err = canonical_headers(&headers).unwrap_err();
        assert_eq!(ErrorKind::InvalidArgument, err.kind());
        let err = signed_header_names(&headers).unwrap_err();
        assert_eq!(ErrorKind::InvalidArgument, err.kind());
    }

    #[test]
    fn test_body_hash_with_none() -> Result<()> {
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            body_hash(None)?,
            "if body is empty, use the empty string"
        );
        Ok(())
    }

    #[test]
    fn test_body_hash() -> Result<()> {
        let body = json!({"a": "b", "c": "d"});

        assert_eq!(r#"{"a":"b","c":"d"}"#, serialize_body(Some(&body))?);
        assert_eq!(
            "b85c7da93e8790518898c280e15e3f1af5d46bf4aaa4407690f0f0a3b0316478",
            body_hash(Some(&body))?
        );
        Ok(())
    }

    #[test]
    fn test_body_keeps_field_order() -> Result<()> {
        let body = json!({"c": "d", "a": "b"});

        assert_eq!(r#"{"c":"d","a":"b"}"#, serialize_body(Some(&body))?);
        Ok(())
    }

    #[test]
    fn test_canonical_request() -> Result<()> {
        let body = serialize_body(Some(&json!({"applicationName": "example1"})))?;
        let req = RequestDescriptor {
            method: "POST",
            path: Some("/test"),
            query: Some("b=v2&a=v1"),
            headers: &[
                ("Host", "api.tuppari.com"),
                ("Content-type", "application/json"),
                ("X-Tuppari-Operation", "CreateApplication"),
            ],
            body: body.as_bytes(),
        };

        assert_eq!(
            "POST\n\
             /test\n\
             a=v1&b=v2\n\
             content-type:application/json\n\
             host:api.tuppari.com\n\
             x-tuppari-operation:CreateApplication\n\
             content-type;host;x-tuppari-operation\n\
             8f2d5fe4a93000d3546e578d265fc936806f6ef6dc6f7ee87715e1a5c514c168",
            canonical_request(&req)?
        );
        Ok(())
    }

    #[test]
    fn test_canonical_request_keeps_empty_lines() -> Result<()> {
        let req = RequestDescriptor {
            method: "GET",
            path: None,
            query: None,
            headers: &[],
            body: b"",
        };

        let creq = canonical_request(&req)?;
        assert_eq!(
            "GET\n/\n\n\n\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            creq
        );
        assert_eq!(6, creq.split('\n').count());
        Ok(())
    }
}
