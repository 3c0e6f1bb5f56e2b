//! Redacted request/response dumps for debug mode.
//!
//! Dumps are plain HTTP/1.1-style text. Before a dump leaves this module
//! every literal occurrence of the credential is replaced with
//! [`REDACTION_MARKER`], anywhere in the text: header lines, query strings,
//! and bodies an echo service might reflect back.
//!
//! ```rust
//! use together_sdk::dump::{redact, REDACTION_MARKER};
//!
//! let text = "Authorization: Bearer s3cret\n\n{\"echo\":\"s3cret\"}";
//! let clean = redact(text, "s3cret");
//! assert!(!clean.contains("s3cret"));
//! assert_eq!(clean.matches(REDACTION_MARKER).count(), 2);
//! ```

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode, Version};
use std::borrow::Cow;
use tracing::info;

/// Replacement text for redacted secrets.
pub const REDACTION_MARKER: &str = "[redacted]";

/// Tracing target that debug dumps are emitted on.
pub const DUMP_TARGET: &str = "together_sdk::dump";

/// Replace every occurrence of `secret` in `text` with [`REDACTION_MARKER`].
///
/// An empty secret leaves the text untouched.
pub fn redact<'a>(text: &'a str, secret: &str) -> Cow<'a, str> {
    if secret.is_empty() || !text.contains(secret) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace(secret, REDACTION_MARKER))
}

/// Render an outbound request: request line, host, headers, blank line, body.
pub fn render_request(request: &Request) -> String {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!(
        "{} {} {}\n",
        request.method(),
        target,
        version_label(request.version())
    );
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => {
                out.push_str(&format!("Host: {host}:{port}\n"));
            }
            None => {
                out.push_str(&format!("Host: {host}\n"));
            }
        }
    }
    write_headers(&mut out, request.headers());
    out.push('\n');

    if let Some(body) = request.body().and_then(reqwest::Body::as_bytes) {
        out.push_str(&String::from_utf8_lossy(body));
    }
    out
}

/// Render a received response: status line, headers, blank line, body.
pub fn render_response(
    version: Version,
    status: StatusCode,
    headers: &HeaderMap,
    body: &Bytes,
) -> String {
    let mut out = format!("{} {}\n", version_label(version), status);
    write_headers(&mut out, headers);
    out.push('\n');
    out.push_str(&String::from_utf8_lossy(body));
    out
}

/// Redact `dump` and write it to the diagnostic log.
pub(crate) fn emit(direction: &'static str, dump: &str, secret: &str) {
    let clean = redact(dump, secret);
    info!(target: DUMP_TARGET, direction = direction, "\n{}", clean);
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\n", name, String::from_utf8_lossy(value.as_bytes())));
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}
