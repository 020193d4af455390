//! XML-RPC wire codec
//!
//! Parses `<methodCall>` request documents into a method name and a
//! positional parameter list, and produces request, response and fault
//! documents. Parsing is bounded by a declared-length guard so oversized
//! bodies are rejected before the parser runs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::NaiveDateTime;
use quick_xml::escape::escape;
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use tracing::debug;

use crate::value::{Fault, Value};

/// Largest declared body size accepted, in bytes (8 MiB).
///
/// Checked against the request's declared content length before the body
/// is parsed, so an oversized request is rejected without paying for the
/// parse.
pub const MAX_BODY_BYTES: u64 = 1 << 23;

/// Wire format of `<dateTime.iso8601>` values.
const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// A decoded XML-RPC call: the method name and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<Value>,
}

#[derive(Debug)]
pub enum CodecError {
    /// Declared content length exceeds [`MAX_BODY_BYTES`].
    PayloadTooLarge(u64),
    /// The body is not a well-formed XML-RPC request document.
    MalformedPayload(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::PayloadTooLarge(len) => {
                write!(f, "Body too large ({} bytes)", len)
            }
            CodecError::MalformedPayload(reason) => {
                write!(f, "Malformed XML-RPC payload: {}", reason)
            }
        }
    }
}

impl std::error::Error for CodecError {}

fn malformed(reason: impl Into<String>) -> CodecError {
    CodecError::MalformedPayload(reason.into())
}

/// Deserialize the body of an XML-RPC request document.
///
/// `content_length` is the length the request *declared*, which is what
/// the size guard checks; `body` is the materialized body.
///
/// # Examples
///
/// ```
/// use xmlrpckit_core::codec::parse_request;
///
/// let body = br#"<?xml version="1.0"?>
/// <methodCall>
///   <methodName>examples.getStateName</methodName>
///   <params>
///     <param><value><i4>40</i4></value></param>
///   </params>
/// </methodCall>"#;
///
/// let call = parse_request(body, body.len() as u64).unwrap();
/// assert_eq!(call.method, "examples.getStateName");
/// assert_eq!(call.params.len(), 1);
/// ```
pub fn parse_request(body: &[u8], content_length: u64) -> Result<MethodCall, CodecError> {
    if content_length > MAX_BODY_BYTES {
        return Err(CodecError::PayloadTooLarge(content_length));
    }

    let text = std::str::from_utf8(body).map_err(|_| malformed("body is not valid UTF-8"))?;
    let doc = Document::parse(text).map_err(|e| {
        debug!("XML parse failure: {}", e);
        malformed(format!("invalid XML: {}", e))
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "methodCall" {
        return Err(malformed(format!(
            "expected <methodCall> root, found <{}>",
            root.tag_name().name()
        )));
    }

    let method = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "methodName")
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed("missing <methodName>"))?
        .to_string();

    let mut params = Vec::new();
    if let Some(params_node) = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "params")
    {
        for param in params_node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "param")
        {
            let value_node = param
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "value")
                .ok_or_else(|| malformed("<param> without <value>"))?;
            params.push(parse_value(value_node)?);
        }
    }

    Ok(MethodCall { method, params })
}

fn parse_value(node: Node<'_, '_>) -> Result<Value, CodecError> {
    let typed = node.children().find(|n| n.is_element());
    let Some(typed) = typed else {
        // An untyped <value> is a string.
        return Ok(Value::String(node.text().unwrap_or("").to_string()));
    };

    let text = typed.text().unwrap_or("");
    match typed.tag_name().name() {
        "int" | "i4" => text
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| malformed(format!("invalid integer: {:?}", text))),
        "boolean" => match text.trim() {
            "0" => Ok(Value::Bool(false)),
            "1" => Ok(Value::Bool(true)),
            other => Err(malformed(format!("invalid boolean: {:?}", other))),
        },
        "double" => text
            .trim()
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| malformed(format!("invalid double: {:?}", text))),
        "string" => Ok(Value::String(text.to_string())),
        "dateTime.iso8601" => NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|_| malformed(format!("invalid dateTime.iso8601: {:?}", text))),
        "base64" => {
            // The wire format allows whitespace inside the payload.
            let compact: String = text.split_whitespace().collect();
            BASE64
                .decode(compact.as_bytes())
                .map(Value::Base64)
                .map_err(|_| malformed("invalid base64 payload"))
        }
        "array" => {
            let data = typed
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "data")
                .ok_or_else(|| malformed("<array> without <data>"))?;
            let mut items = Vec::new();
            for value in data
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "value")
            {
                items.push(parse_value(value)?);
            }
            Ok(Value::Array(items))
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "member")
            {
                let name = member
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "name")
                    .and_then(|n| n.text())
                    .ok_or_else(|| malformed("<member> without <name>"))?;
                let value = member
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "value")
                    .ok_or_else(|| malformed("<member> without <value>"))?;
                members.insert(name.to_string(), parse_value(value)?);
            }
            Ok(Value::Struct(members))
        }
        other => Err(malformed(format!("unknown value type <{}>", other))),
    }
}

/// Encode a method call document, the counterpart of [`parse_request`].
pub fn encode_request(method: &str, params: &[Value]) -> Bytes {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>");
    out.push_str("<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        push_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    Bytes::from(out)
}

/// Encode a normal method response wrapping a single value.
pub fn encode_response(value: &Value) -> Bytes {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>");
    out.push_str("<methodResponse><params><param>");
    push_value(&mut out, value);
    out.push_str("</param></params></methodResponse>");
    Bytes::from(out)
}

/// Encode a fault response.
pub fn encode_fault(fault: &Fault) -> Bytes {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>");
    out.push_str("<methodResponse><fault><value><struct>");
    out.push_str("<member><name>faultCode</name><value><int>");
    out.push_str(&fault.code.to_string());
    out.push_str("</int></value></member>");
    out.push_str("<member><name>faultString</name><value><string>");
    out.push_str(&escape(&fault.message));
    out.push_str("</string></value></member>");
    out.push_str("</struct></value></fault></methodResponse>");
    Bytes::from(out)
}

fn push_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            out.push_str("<int>");
            out.push_str(&n.to_string());
            out.push_str("</int>");
        }
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push(if *b { '1' } else { '0' });
            out.push_str("</boolean>");
        }
        Value::Double(f) => {
            out.push_str("<double>");
            out.push_str(&f.to_string());
            out.push_str("</double>");
        }
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s));
            out.push_str("</string>");
        }
        Value::DateTime(dt) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&dt.format(DATETIME_FORMAT).to_string());
            out.push_str("</dateTime.iso8601>");
        }
        Value::Base64(data) => {
            out.push_str("<base64>");
            out.push_str(&BASE64.encode(data));
            out.push_str("</base64>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                push_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name));
                out.push_str("</name>");
                push_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}
