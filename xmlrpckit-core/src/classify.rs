//! Request classification
//!
//! Decides whether an inbound request is an XML-RPC call and, when it
//! is, decodes the body and attaches the call to the request. SOAP
//! clients (which also POST `text/xml`) and consumers that opt out via
//! header share the endpoint untouched.

use tracing::debug;
use xmlrpckit_config::Mode;

use crate::codec::{CodecError, parse_request};
use crate::registry::RENDERER_NAME;
use crate::request::Request;

/// Content type an XML-RPC request must carry, exactly.
pub const XMLRPC_CONTENT_TYPE: &str = "text/xml";

/// Present on SOAP 1.1 requests; such requests are never classified.
const SOAP_ACTION_HEADER: &str = "soapaction";

/// Explicit opt-out header honored for `text/xml` POSTs.
const AVOID_HEADER: &str = "x-pyramid-avoid-xmlrpc";

/// The classification predicate: `POST`, content type exactly
/// `text/xml`, no `soapaction` header, no opt-out header. Header names
/// match case-insensitively.
pub fn is_xmlrpc_request(request: &Request) -> bool {
    request.content_type() == XMLRPC_CONTENT_TYPE
        && request.method() == "POST"
        && !request.headers().contains(SOAP_ACTION_HEADER)
        && !request.headers().contains(AVOID_HEADER)
}

/// Classifies a new request.
///
/// When the predicate holds, decodes the body, attaches the call and the
/// XML-RPC flag to the request, and — in omnipresent mode — forces the
/// XML-RPC renderer regardless of what the matched view configured.
/// Returns whether the request was classified; a predicate miss leaves
/// the request untouched.
pub fn classify(request: &mut Request, mode: Mode) -> Result<bool, CodecError> {
    if !is_xmlrpc_request(request) {
        return Ok(false);
    }

    let call = parse_request(request.body(), request.content_length())?;
    debug!(
        "classified XML-RPC request: method {}, {} params",
        call.method,
        call.params.len()
    );
    request.state.rpc = Some(call);
    request.state.xmlrpc = true;
    if mode == Mode::Omnipresent {
        request.state.override_renderer = Some(RENDERER_NAME);
    }
    Ok(true)
}
