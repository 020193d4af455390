//! XML-RPC request dispatch for traversal-based web applications.
//!
//! The pipeline: [`classify::classify`] recognizes and decodes an
//! inbound request, a view resolved either explicitly (via
//! [`registry::ViewRegistry`]) or through object-graph traversal
//! ([`traversal::TraversalDispatcher`]) runs with arguments reconciled
//! by [`mapply::mapply`], and [`render::render`] marshals the outcome
//! into a response document.

pub mod classify;
pub mod codec;
pub mod mapply;
pub mod registry;
pub mod render;
pub mod request;
pub mod traversal;
pub mod value;
pub mod view;

pub use classify::{XMLRPC_CONTENT_TYPE, classify, is_xmlrpc_request};
pub use codec::{CodecError, MAX_BODY_BYTES, MethodCall, encode_fault, encode_request,
    encode_response, parse_request};
pub use mapply::{MapplyError, Signature, SignatureError, mapply};
pub use registry::{RENDERER_NAME, RegisteredView, ViewKind, ViewRegistry, XmlRpcPlugin};
pub use render::{RpcResponse, XML_CONTENT_TYPE, render};
pub use request::{Headers, Request, RequestState};
pub use traversal::{
    PermissionChecker, Resource, TraversalDispatcher, TraversalOutcome, Traverser, ViewResolver,
};
pub use value::{Fault, Value};
pub use view::{
    DispatchError, FromRequest, Method, MethodTable, Methods, RegistrationError, Reply, ViewFn,
    ViewResult, keyword_args, wrap_factory, wrap_fn, wrap_instance,
};
