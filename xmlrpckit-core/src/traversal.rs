//! Traversal dispatch
//!
//! Resolves a dotted method name against the host's object graph: the
//! name becomes a traversal path, the host's traverser yields a context
//! resource and a trailing view name, and the host's view resolution
//! finds the handler. `__call__` addresses the context's default view;
//! `__repr__` is a permission-gated introspection escape hatch.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::registry::{RegisteredView, ViewKind};
use crate::request::Request;
use crate::value::Value;
use crate::view::{DispatchError, Reply, ViewResult};

/// Node in the host's traversable object graph.
///
/// The graph itself belongs to the host; this layer only needs a textual
/// form for introspection and a downcast hook for handlers that know the
/// concrete node type.
pub trait Resource: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// What traversal produced for one request.
#[derive(Debug, Clone)]
pub struct TraversalOutcome {
    /// Deepest resolved node.
    pub context: Arc<dyn Resource>,
    /// Final segment that did not resolve to a node; names the view.
    pub view_name: String,
    /// Path segments consumed reaching `context`.
    pub consumed: Vec<String>,
}

/// Host capability: walk the object graph from a root along a
/// `/`-joined path.
pub trait Traverser: Send + Sync {
    fn traverse(&self, root: &Arc<dyn Resource>, path: &str) -> TraversalOutcome;
}

/// Host capability: find a view registered under `view_name` for the
/// request/context pair.
pub trait ViewResolver: Send + Sync {
    fn resolve(
        &self,
        request: &Request,
        context: &Arc<dyn Resource>,
        view_name: &str,
    ) -> Option<RegisteredView>;
}

/// Host capability: authorization check for a permission name on a
/// resource.
pub trait PermissionChecker: Send + Sync {
    fn has_permission(
        &self,
        request: &Request,
        context: &Arc<dyn Resource>,
        permission: &str,
    ) -> bool;
}

/// The catch-all view body for omnipresent mode.
pub struct TraversalDispatcher {
    traverser: Arc<dyn Traverser>,
    resolver: Arc<dyn ViewResolver>,
    permissions: Arc<dyn PermissionChecker>,
    repr_permission: String,
}

impl TraversalDispatcher {
    pub fn new(
        traverser: Arc<dyn Traverser>,
        resolver: Arc<dyn ViewResolver>,
        permissions: Arc<dyn PermissionChecker>,
        repr_permission: impl Into<String>,
    ) -> Self {
        Self {
            traverser,
            resolver,
            permissions,
            repr_permission: repr_permission.into(),
        }
    }

    /// Resolves and invokes the view addressed by the request's method
    /// name, traversing from `context`.
    pub fn dispatch(&self, context: &Arc<dyn Resource>, request: &mut Request) -> ViewResult {
        let method = match request.rpc() {
            Some(call) => call.method.clone(),
            None => return Err(DispatchError::NotClassified),
        };

        let path = method.split('.').collect::<Vec<_>>().join("/");
        let outcome = self.traverser.traverse(context, &path);
        let mut view_name = outcome.view_name.clone();
        debug!(
            "traversed {} segments for {}, view name {:?}",
            outcome.consumed.len(),
            method,
            view_name
        );

        // "__call__" addresses the default view of the resolved node.
        if view_name == "__call__" {
            view_name.clear();
        }

        let view = if view_name == "__repr__" {
            Some(self.repr_view())
        } else {
            self.resolver
                .resolve(request, &outcome.context, &view_name)
                // Resolving back into this dispatcher would re-enter it
                // forever; treat that as unresolved.
                .filter(|view| view.kind != ViewKind::TraversalDispatcher)
        };

        let Some(view) = view else {
            debug!("no view for {}", method);
            return Err(DispatchError::NotFound(method));
        };

        let target = Arc::clone(&outcome.context);
        request.state.traversal = Some(outcome);
        (view.call)(&target, request)
    }

    /// Synthetic view exposing the context's textual form, gated behind
    /// the configured permission.
    fn repr_view(&self) -> RegisteredView {
        let permissions = Arc::clone(&self.permissions);
        let permission = self.repr_permission.clone();
        RegisteredView {
            kind: ViewKind::Handler,
            call: Arc::new(move |context, request| {
                if permissions.has_permission(request, context, &permission) {
                    Ok(Reply::Value(Value::String(format!("{:?}", context))))
                } else {
                    Err(DispatchError::Forbidden(format!(
                        "no {:?} permission on context",
                        permission
                    )))
                }
            }),
        }
    }
}
