//! Header composition for outbound requests.
//!
//! Order matters: defaults, then per-call headers, then the bearer
//! credential (never overridable), then the user agent, then a JSON content
//! type if the caller did not pick one.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

/// Copy every header in `source` onto `target`.
///
/// A name present in both ends up with exactly the values from `source`.
pub fn overlay(target: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        target.remove(name);
        for value in source.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Build the `Authorization` value for `api_key`.
pub fn bearer(api_key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| Error::configuration("API key contains invalid header characters"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Compose the full header set for one request.
pub fn compose(
    defaults: &HeaderMap,
    extra: Option<&HeaderMap>,
    api_key: &str,
    user_agent: Option<&str>,
) -> Result<HeaderMap> {
    let mut headers = defaults.clone();
    if let Some(extra) = extra {
        overlay(&mut headers, extra);
    }

    headers.insert(AUTHORIZATION, bearer(api_key)?);

    if let Some(agent) = user_agent.filter(|agent| !agent.is_empty()) {
        let value = HeaderValue::from_str(agent)
            .map_err(|e| Error::configuration(format!("Invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}
