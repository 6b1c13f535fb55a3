//! Outbound request descriptor and its builder.
//!
//! An [`HttpRequest`] is fully resolved: path placeholders substituted, query
//! appended, auth header set. The dispatcher treats it as an opaque value.

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

/// Media types the SDK sends and accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    ApplicationJson,
    ApplicationForm,
    OctetStream,
    TextPlain,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationJson => "application/json",
            Self::ApplicationForm => "application/x-www-form-urlencoded",
            Self::OctetStream => "application/octet-stream",
            Self::TextPlain => "text/plain",
        }
    }
}

/// Errors raised while building a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// A `{name}` placeholder had no matching path parameter.
    #[error("unresolved path parameter in '{0}'")]
    UnresolvedPathParam(String),

    /// The resolved URL is not valid.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value contains forbidden characters.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// The body could not be serialized.
    #[error("body serialization failed: {0}")]
    Body(#[from] serde_json::Error),
}

/// An immutable, fully-resolved outbound call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns a copy carrying one more header. Used by the dispatcher to tag
    /// calls; the original descriptor stays untouched.
    #[must_use]
    pub(crate) fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Splits the descriptor into its parts, for transports.
    pub fn into_parts(self) -> (Method, Url, HeaderMap, Option<Vec<u8>>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builds an [`HttpRequest`] from a URL template such as
/// `https://host/lobby/v1/admin/party/namespaces/{namespace}/parties/{partyId}`.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    template: String,
    path_params: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    content_type: Option<MediaType>,
    accept: Option<MediaType>,
}

impl HttpRequestBuilder {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: None,
            content_type: None,
            accept: None,
        }
    }

    pub fn get(template: impl Into<String>) -> Self {
        Self::new(Method::GET, template)
    }

    pub fn post(template: impl Into<String>) -> Self {
        Self::new(Method::POST, template)
    }

    pub fn put(template: impl Into<String>) -> Self {
        Self::new(Method::PUT, template)
    }

    pub fn patch(template: impl Into<String>) -> Self {
        Self::new(Method::PATCH, template)
    }

    pub fn delete(template: impl Into<String>) -> Self {
        Self::new(Method::DELETE, template)
    }

    /// Substitutes `{name}` in the template with the percent-encoded `value`.
    #[must_use]
    pub fn with_path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        self.query_params.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_bearer_auth(self, token: &str) -> Self {
        let value = format!("Bearer {token}");
        self.with_header(AUTHORIZATION.as_str(), &value)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as JSON and sets the JSON content type.
    pub fn with_json_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, RequestError> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self
            .with_body(bytes)
            .with_content_type(MediaType::ApplicationJson))
    }

    #[must_use]
    pub fn with_content_type(mut self, media_type: MediaType) -> Self {
        self.content_type = Some(media_type);
        self
    }

    #[must_use]
    pub fn accepts(mut self, media_type: MediaType) -> Self {
        self.accept = Some(media_type);
        self
    }

    /// Resolves the template and produces the immutable descriptor.
    pub fn build(self) -> Result<HttpRequest, RequestError> {
        let mut resolved = self.template;
        for (name, value) in &self.path_params {
            let placeholder = format!("{{{name}}}");
            resolved = resolved.replace(&placeholder, &encode_path_segment(value));
        }
        if resolved.contains('{') || resolved.contains('}') {
            return Err(RequestError::UnresolvedPathParam(resolved));
        }

        let mut url = Url::parse(&resolved)?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }
        if let Some(media_type) = self.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(media_type.as_str()));
        }
        if let Some(media_type) = self.accept {
            headers.insert(ACCEPT, HeaderValue::from_static(media_type.as_str()));
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
        })
    }
}

/// Percent-encodes a value for use as a single path segment.
fn encode_path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_and_encodes_path_params() {
        let req = HttpRequestBuilder::get("https://example.com/lobby/{namespace}/parties/{partyId}")
            .with_path_param("namespace", "game")
            .with_path_param("partyId", "a b/c")
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://example.com/lobby/game/parties/a%20b%2Fc"
        );
        assert_eq!(*req.method(), Method::GET);
        assert!(req.body().is_none());
    }

    #[test]
    fn unresolved_placeholder_is_rejected() {
        let err = HttpRequestBuilder::get("https://example.com/{namespace}/x/{missing}")
            .with_path_param("namespace", "game")
            .build()
            .unwrap_err();
        assert!(matches!(err, RequestError::UnresolvedPathParam(_)));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = HttpRequestBuilder::get("not a url").build().unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }

    #[test]
    fn headers_auth_and_media_types() {
        let req = HttpRequestBuilder::put("https://example.com/x")
            .with_bearer_auth("tok")
            .with_content_type(MediaType::ApplicationJson)
            .accepts(MediaType::ApplicationJson)
            .with_body(b"{}".to_vec())
            .build()
            .unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer tok");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.headers()[ACCEPT], "application/json");
        assert_eq!(req.body(), Some(&b"{}"[..]));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let err = HttpRequestBuilder::get("https://example.com/x")
            .with_bearer_auth("line\nbreak")
            .build()
            .unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader(_)));
    }

    #[test]
    fn query_params_are_appended() {
        let req = HttpRequestBuilder::get("https://example.com/x")
            .with_query_param("limit", "10")
            .with_query_param("q", "a&b")
            .build()
            .unwrap();
        assert_eq!(req.url().query(), Some("limit=10&q=a%26b"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = HttpRequestBuilder::post("https://example.com/x")
            .with_json_body(&serde_json::json!({"a": 1}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.body(), Some(&br#"{"a":1}"#[..]));
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
    }
}
