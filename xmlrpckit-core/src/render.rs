//! Response marshalling

use bytes::Bytes;

use crate::codec::{encode_fault, encode_response};
use crate::view::Reply;

/// Content type of every marshalled response.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// A finished XML-RPC response.
///
/// Faults ride in the body of a success-status document; the marshaller
/// never produces an error status.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub body: Bytes,
    pub content_type: &'static str,
    pub content_length: usize,
    pub status: u16,
}

/// Marshal a handler outcome into a finished response.
pub fn render(reply: &Reply) -> RpcResponse {
    let body = match reply {
        Reply::Value(value) => encode_response(value),
        Reply::Fault(fault) => encode_fault(fault),
    };
    RpcResponse {
        content_length: body.len(),
        body,
        content_type: XML_CONTENT_TYPE,
        status: 200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Fault, Value};

    #[test]
    fn test_render_value() {
        let response = render(&Reply::Value(Value::Int(3)));
        assert_eq!(response.content_type, "text/xml");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_length, response.body.len());
        let text = std::str::from_utf8(&response.body).unwrap();
        assert!(text.contains("<methodResponse>"));
        assert!(text.contains("<int>3</int>"));
    }

    #[test]
    fn test_render_fault_keeps_success_status() {
        let response = render(&Reply::Fault(Fault::new(7, "boom")));
        assert_eq!(response.status, 200);
        let text = std::str::from_utf8(&response.body).unwrap();
        assert!(text.contains("<fault>"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let reply = Reply::Value(Value::Array(vec![
            Value::String("a".to_string()),
            Value::Double(1.5),
        ]));
        let first = render(&reply);
        let second = render(&reply);
        assert_eq!(first.body, second.body);
        assert_eq!(first, second);
    }
}
