//! Host request model
//!
//! The slice of an inbound web request this layer consumes, plus the
//! per-request derived state the classifier and dispatchers attach. One
//! request is handled at a time; nothing here outlives it.

use bytes::Bytes;
use std::any::Any;
use std::collections::HashMap;

use crate::codec::MethodCall;
use crate::traversal::TraversalOutcome;
use crate::value::Value;

/// Request headers with case-insensitive name lookup.
#[derive(Debug, Default)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// State derived from a request while it is being handled.
#[derive(Default)]
pub struct RequestState {
    /// The decoded call, attached by classification.
    pub rpc: Option<MethodCall>,
    /// Whether classification recognized the request as XML-RPC.
    pub xmlrpc: bool,
    /// Renderer forced by the classifier in omnipresent mode; outranks
    /// any renderer the matched view configured.
    pub override_renderer: Option<&'static str>,
    /// Handler instance recorded by factory-shaped views, for
    /// inspection after the call.
    pub view_instance: Option<Box<dyn Any + Send>>,
    /// Traversal outcome merged in by the traversal dispatcher before a
    /// resolved view runs.
    pub traversal: Option<TraversalOutcome>,
}

/// An inbound web request as seen by this layer.
///
/// Built by the host glue (or directly in tests) with the chained
/// `with_*` setters:
///
/// ```
/// use xmlrpckit_core::request::Request;
///
/// let request = Request::post("text/xml", &b"<methodCall/>"[..])
///     .with_param("verbose", "1")
///     .with_header("X-Trace", "abc");
/// assert_eq!(request.method(), "POST");
/// assert!(request.headers().contains("x-trace"));
/// ```
pub struct Request {
    method: String,
    content_type: String,
    content_length: u64,
    headers: Headers,
    body: Bytes,
    params: HashMap<String, String>,
    matchdict: Option<HashMap<String, String>>,
    pub state: RequestState,
}

impl Request {
    /// A POST request carrying `body`; the declared content length
    /// defaults to the actual body length.
    pub fn post(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            method: "POST".to_string(),
            content_type: content_type.into(),
            content_length: body.len() as u64,
            headers: Headers::default(),
            body,
            params: HashMap::new(),
            matchdict: None,
            state: RequestState::default(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overrides the declared content length (which may lie about the
    /// actual body).
    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = content_length;
        self
    }

    /// Adds a query/form parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a route-match variable.
    pub fn with_match_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.matchdict
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Query/form parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Route-match variables, if the request matched a route.
    pub fn matchdict(&self) -> Option<&HashMap<String, String>> {
        self.matchdict.as_ref()
    }

    /// The decoded call, once classification has run.
    pub fn rpc(&self) -> Option<&MethodCall> {
        self.state.rpc.as_ref()
    }

    /// Positional XML-RPC parameters; empty when unclassified.
    pub fn rpc_params(&self) -> &[Value] {
        self.state
            .rpc
            .as_ref()
            .map(|call| call.params.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_case_insensitive() {
        let request = Request::post("text/xml", &b""[..]).with_header("SOAPAction", "\"urn:op\"");
        assert!(request.headers().contains("soapaction"));
        assert!(request.headers().contains("SoapAction"));
        assert_eq!(request.headers().get("SOAPACTION"), Some("\"urn:op\""));
        assert!(!request.headers().contains("x-other"));
    }

    #[test]
    fn test_content_length_defaults_to_body_len() {
        let request = Request::post("text/xml", &b"12345"[..]);
        assert_eq!(request.content_length(), 5);
        let request = request.with_content_length(1 << 30);
        assert_eq!(request.content_length(), 1 << 30);
        assert_eq!(request.body().len(), 5);
    }

    #[test]
    fn test_rpc_params_empty_before_classification() {
        let request = Request::post("text/xml", &b""[..]);
        assert!(request.rpc().is_none());
        assert!(request.rpc_params().is_empty());
        assert!(!request.state.xmlrpc);
    }

    #[test]
    fn test_match_params_accumulate() {
        let request = Request::post("text/xml", &b""[..])
            .with_match_param("zone", "eu")
            .with_match_param("id", "7");
        let matchdict = request.matchdict().unwrap();
        assert_eq!(matchdict.get("zone").map(String::as_str), Some("eu"));
        assert_eq!(matchdict.get("id").map(String::as_str), Some("7"));
    }
}
