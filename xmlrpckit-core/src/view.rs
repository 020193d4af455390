//! View adapters
//!
//! Wraps registered handlers so that, when invoked with a resolved
//! resource and a classified request, the call's positional parameters
//! are reconciled against the handler's signature before the handler
//! body runs. Handler shape is fixed at registration time: a plain
//! function, a per-request factory type with a named-method table, or a
//! pre-built handler object with such a table.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::mapply::{MapplyError, Signature, mapply};
use crate::request::Request;
use crate::traversal::Resource;
use crate::value::{Fault, Value};

/// Success outcome of a handler: a value or an application-level fault.
/// Both are marshalled into response documents; only errors abort the
/// request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Value(Value),
    Fault(Fault),
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Value(value)
    }
}

impl From<Fault> for Reply {
    fn from(fault: Fault) -> Self {
        Reply::Fault(fault)
    }
}

#[derive(Debug)]
pub enum DispatchError {
    /// Parameter reconciliation failed.
    Arguments(MapplyError),
    /// A permission check failed; never converted into a fault.
    Forbidden(String),
    /// No view resolves for the method name.
    NotFound(String),
    /// The dispatcher ran on a request that was never classified.
    NotClassified,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Arguments(e) => write!(f, "{}", e),
            DispatchError::Forbidden(reason) => write!(f, "forbidden: {}", reason),
            DispatchError::NotFound(method) => write!(f, "no view for method {}", method),
            DispatchError::NotClassified => {
                write!(f, "request was not classified as XML-RPC")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Arguments(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MapplyError> for DispatchError {
    fn from(e: MapplyError) -> Self {
        DispatchError::Arguments(e)
    }
}

pub type ViewResult = Result<Reply, DispatchError>;

/// A view in the host framework's calling convention: resolved resource
/// plus request.
pub type ViewFn = Arc<dyn Fn(&Arc<dyn Resource>, &mut Request) -> ViewResult + Send + Sync>;

/// Keyword parameters for reconciliation: query/form parameters unioned
/// with route-match variables, route-match winning on conflict.
pub fn keyword_args(request: &Request) -> HashMap<String, Value> {
    let mut keywords: HashMap<String, Value> = request
        .params()
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    if let Some(matchdict) = request.matchdict() {
        for (name, value) in matchdict {
            keywords.insert(name.clone(), Value::String(value.clone()));
        }
    }
    keywords
}

/// Wraps a plain function handler.
///
/// The positional parameters reconciled against `signature` are exactly
/// the call's parameters; the request reaches the handler as its leading
/// argument, out of band of reconciliation.
pub fn wrap_fn<F>(signature: Signature, target: F) -> ViewFn
where
    F: Fn(&mut Request, Vec<Value>) -> ViewResult + Send + Sync + 'static,
{
    Arc::new(move |_context, request| {
        let keywords = keyword_args(request);
        let args = mapply(&signature, request.rpc_params(), &keywords)?;
        target(request, args)
    })
}

/// A named method on a handler type, with its registration-time
/// signature.
pub struct Method<T> {
    pub signature: Signature,
    pub call: fn(&T, Vec<Value>) -> ViewResult,
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            call: self.call,
        }
    }
}

/// The methods a handler type exposes, keyed by attribute name, with an
/// optional default entry used when no attribute is configured.
pub struct MethodTable<T> {
    entries: HashMap<String, Method<T>>,
    default: Option<Method<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default: None,
        }
    }

    /// Sets the entry invoked when no attribute name is configured.
    pub fn with_default(mut self, signature: Signature, call: fn(&T, Vec<Value>) -> ViewResult) -> Self {
        self.default = Some(Method { signature, call });
        self
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        call: fn(&T, Vec<Value>) -> ViewResult,
    ) -> Self {
        self.entries.insert(name.into(), Method { signature, call });
        self
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler types constructed from the request, one instance per call.
pub trait FromRequest {
    fn from_request(request: &Request) -> Self;
}

/// Handler types that expose a method table.
pub trait Methods: Sized {
    fn methods() -> MethodTable<Self>;
}

#[derive(Debug)]
pub enum RegistrationError {
    /// The configured attribute names no method in the handler's table.
    UnknownMethod(String),
    /// No attribute was configured and the handler's table has no
    /// default entry.
    NoDefaultMethod,
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::UnknownMethod(attr) => {
                write!(f, "handler has no method named {}", attr)
            }
            RegistrationError::NoDefaultMethod => {
                write!(f, "handler has no default method and no attr was configured")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

fn select_method<T>(
    mut table: MethodTable<T>,
    attr: Option<&str>,
) -> Result<Method<T>, RegistrationError> {
    match attr {
        Some(name) => table
            .entries
            .remove(name)
            .ok_or_else(|| RegistrationError::UnknownMethod(name.to_string())),
        None => table.default.ok_or(RegistrationError::NoDefaultMethod),
    }
}

/// Wraps a factory-shaped handler: `T` is built from the request, the
/// method chosen by `attr` (or the table's default entry) runs with the
/// reconciled arguments only, and the instance is recorded on the
/// request's derived-state bag after the call.
///
/// An unknown `attr` fails here, at registration, not on the first
/// request.
pub fn wrap_factory<T>(attr: Option<&str>) -> Result<ViewFn, RegistrationError>
where
    T: FromRequest + Methods + Any + Send + Sync,
{
    let method = select_method(T::methods(), attr)?;
    Ok(Arc::new(move |_context, request| {
        let keywords = keyword_args(request);
        let args = mapply(&method.signature, request.rpc_params(), &keywords)?;
        let instance = T::from_request(request);
        let outcome = (method.call)(&instance, args);
        request.state.view_instance = Some(Box::new(instance));
        outcome
    }))
}

/// Wraps a pre-built handler object: like [`wrap_factory`] but without
/// per-request construction or instance recording.
pub fn wrap_instance<T>(target: Arc<T>, attr: Option<&str>) -> Result<ViewFn, RegistrationError>
where
    T: Methods + Send + Sync + 'static,
{
    let method = select_method(T::methods(), attr)?;
    Ok(Arc::new(move |_context, request| {
        let keywords = keyword_args(request);
        let args = mapply(&method.signature, request.rpc_params(), &keywords)?;
        (method.call)(&target, args)
    }))
}
