//! Canonical mapping between a [`Request`] and an origin-form URL.
//!
//! Path segments, query names and query values are percent-decoded on the
//! way in and re-encoded on the way out; query order is preserved.

use crate::request::{MethodSlot, Request};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=');

pub fn request_from_url(
    method: Option<&str>,
    target: &str,
    headers: Vec<(String, String)>,
    body: impl Into<Vec<u8>>,
) -> Request {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };

    // only leading/trailing empty segments are dropped; a doubled slash
    // keeps its internal empty segment
    let path = path.trim_matches('/');
    let path = if path.is_empty() {
        Vec::new()
    } else {
        path.split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
            .collect()
    };

    let query = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, value),
                // a missing value decodes to the empty string
                None => (pair, ""),
            };
            (decode_query_component(name), decode_query_component(value))
        })
        .collect();

    Request {
        method: match method {
            Some(m) => MethodSlot::Explicit(m.to_ascii_uppercase()),
            None => MethodSlot::Default,
        },
        path,
        query,
        headers,
        body: body.into(),
    }
}

// `+` means space in query data; replacing it first keeps an encoded
// `%2B` intact as a literal plus.
fn decode_query_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

pub fn request_to_url(req: &Request) -> String {
    let mut url = String::new();
    for segment in &req.path {
        url.push('/');
        url.extend(utf8_percent_encode(segment, SEGMENT));
    }
    if url.is_empty() {
        url.push('/');
    }
    for (index, (name, value)) in req.query.iter().enumerate() {
        url.push(if index == 0 { '?' } else { '&' });
        url.extend(utf8_percent_encode(name, QUERY));
        url.push('=');
        url.extend(utf8_percent_encode(value, QUERY));
    }
    url
}
