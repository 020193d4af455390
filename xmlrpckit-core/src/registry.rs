//! View registry and plugin surface
//!
//! What the host wires in: a renderer name, a new-request subscriber,
//! explicit view registration for limited mode, and the traversal
//! catch-all for omnipresent mode.

use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

use xmlrpckit_config::Settings;

use crate::classify::classify;
use crate::codec::CodecError;
use crate::mapply::Signature;
use crate::render::{RpcResponse, render};
use crate::request::Request;
use crate::traversal::{
    PermissionChecker, Resource, TraversalDispatcher, Traverser, ViewResolver,
};
use crate::view::{
    FromRequest, Methods, RegistrationError, Reply, ViewFn, ViewResult, wrap_factory, wrap_fn,
    wrap_instance,
};
use crate::value::Value;

/// Renderer name the host associates with XML-RPC views.
pub const RENDERER_NAME: &str = "xmlrpc";

/// Distinguishes ordinary handlers from the traversal catch-all, so
/// resolution can refuse to re-enter the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Handler,
    TraversalDispatcher,
}

/// A view as stored in (and returned from) resolution.
#[derive(Clone)]
pub struct RegisteredView {
    pub kind: ViewKind,
    pub call: ViewFn,
}

/// Explicitly registered XML-RPC views, keyed by view name.
///
/// Populated at configuration time, read concurrently per request.
#[derive(Default)]
pub struct ViewRegistry {
    views: DashMap<String, RegisteredView>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, view: RegisteredView) {
        self.views.insert(name.into(), view);
    }

    pub fn get(&self, name: &str) -> Option<RegisteredView> {
        self.views.get(name).map(|view| view.clone())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewResolver for ViewRegistry {
    fn resolve(
        &self,
        _request: &Request,
        _context: &Arc<dyn Resource>,
        view_name: &str,
    ) -> Option<RegisteredView> {
        self.get(view_name)
    }
}

/// The XML-RPC layer as the host installs it.
///
/// In limited mode only views registered here are exposed; omnipresent
/// mode additionally installs [`XmlRpcPlugin::traversal_view`] as a
/// catch-all and forces the renderer on every classified request.
pub struct XmlRpcPlugin {
    settings: Settings,
    views: Arc<ViewRegistry>,
}

impl XmlRpcPlugin {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            views: Arc::new(ViewRegistry::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn views(&self) -> Arc<ViewRegistry> {
        Arc::clone(&self.views)
    }

    /// New-request subscriber for the host's request lifecycle.
    pub fn on_new_request(&self, request: &mut Request) -> Result<bool, CodecError> {
        classify(request, self.settings.mode)
    }

    /// The renderer registered under [`RENDERER_NAME`].
    pub fn render(&self, reply: &Reply) -> RpcResponse {
        render(reply)
    }

    /// Registers a plain function handler under `name`.
    pub fn add_view<F>(&self, name: impl Into<String>, signature: Signature, target: F)
    where
        F: Fn(&mut Request, Vec<Value>) -> ViewResult + Send + Sync + 'static,
    {
        self.views.register(
            name,
            RegisteredView {
                kind: ViewKind::Handler,
                call: wrap_fn(signature, target),
            },
        );
    }

    /// Registers a factory-shaped handler under `name`.
    pub fn add_factory_view<T>(
        &self,
        name: impl Into<String>,
        attr: Option<&str>,
    ) -> Result<(), RegistrationError>
    where
        T: FromRequest + Methods + Any + Send + Sync,
    {
        let call = wrap_factory::<T>(attr)?;
        self.views.register(
            name,
            RegisteredView {
                kind: ViewKind::Handler,
                call,
            },
        );
        Ok(())
    }

    /// Registers a pre-built handler object under `name`.
    pub fn add_instance_view<T>(
        &self,
        name: impl Into<String>,
        target: Arc<T>,
        attr: Option<&str>,
    ) -> Result<(), RegistrationError>
    where
        T: Methods + Send + Sync + 'static,
    {
        let call = wrap_instance(target, attr)?;
        self.views.register(
            name,
            RegisteredView {
                kind: ViewKind::Handler,
                call,
            },
        );
        Ok(())
    }

    /// Builds the omnipresent-mode catch-all view, carrying the
    /// dispatcher tag that the recursion guard checks during
    /// resolution.
    pub fn traversal_view(
        &self,
        traverser: Arc<dyn Traverser>,
        resolver: Arc<dyn ViewResolver>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> RegisteredView {
        let dispatcher = TraversalDispatcher::new(
            traverser,
            resolver,
            permissions,
            self.settings.repr_permission.clone(),
        );
        RegisteredView {
            kind: ViewKind::TraversalDispatcher,
            call: Arc::new(move |context, request| dispatcher.dispatch(context, request)),
        }
    }
}
