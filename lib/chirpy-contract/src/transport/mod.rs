//! The transport adapter: one HTTP call in, one [`UniformResponse`] out.
//!
//! [`fetch`] knows nothing about schemas or expected statuses. A 4xx or 5xx
//! answer is a perfectly valid [`UniformResponse`]; only the absence of a
//! response is an error.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use tracing::{Instrument, debug, info, info_span};
use url::Url;

use crate::ChirpyError;

mod multipart;
pub use self::multipart::Multipart;

mod options;
pub use self::options::{ParamValue, RequestOptions};

mod response;
pub use self::response::UniformResponse;

/// Issues one call with `handle` and normalizes the response.
///
/// Defined `params` are appended to the query string of `url`, the JSON or
/// multipart body is attached, and the body of the response is parsed as JSON.
/// Every call emits one `info` event carrying the method, the resolved URL and
/// the serialized request body, inside a `request` span. Body fields marked
/// with [`RequestOptions::with_sensitive_field`] are redacted in that event only.
///
/// # Errors
///
/// - [`ChirpyError::ConflictingBody`] if `options` carries both a JSON and a
///   multipart body, nothing is sent in that case,
/// - [`ChirpyError::Transport`] if no response is received,
/// - header or serialization errors while building the request.
pub async fn fetch(
    handle: &reqwest::Client,
    mut url: Url,
    options: RequestOptions,
) -> Result<UniformResponse, ChirpyError> {
    if options.data.is_some() && options.multipart.is_some() {
        return Err(ChirpyError::ConflictingBody);
    }

    let defined = options
        .defined_params()
        .map(|(name, value)| (name.to_owned(), value.to_string()))
        .collect::<Vec<_>>();
    if !defined.is_empty() {
        url.query_pairs_mut().extend_pairs(defined);
    }

    let mut header_map = header_map(&options.headers)?;
    let body_label = options.logged_body()?;

    let RequestOptions {
        method,
        data,
        multipart,
        ..
    } = options;
    let mut request = handle.request(method.clone(), url.clone());
    if let Some(data) = data {
        if !header_map.contains_key(CONTENT_TYPE) {
            header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        request = request.body(serde_json::to_string(&data)?);
    } else if let Some(form) = multipart {
        request = request.multipart(form.into_form()?);
    }
    let request = request.headers(header_map);

    let span = info_span!("request", %method, %url);
    async move {
        info!(%method, %url, body = %body_label, "sending request");
        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        debug!(%status, length = text.len(), "response received");

        Ok(UniformResponse::new(status, &headers, &text))
    }
    .instrument(span)
    .await
}

/// Builds the header map sent on the wire, `Authorization` flagged as sensitive.
fn header_map(headers: &IndexMap<String, String>) -> Result<HeaderMap, ChirpyError> {
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let mut value = HeaderValue::from_str(value)?;
        if name == AUTHORIZATION {
            value.set_sensitive(true);
        }
        header_map.insert(name, value);
    }
    Ok(header_map)
}
