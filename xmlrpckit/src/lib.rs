//! Facade over the xmlrpckit crates.
//!
//! ```
//! use xmlrpckit::config::Settings;
//! use xmlrpckit::{Reply, Request, Signature, Value, XmlRpcPlugin, encode_request};
//!
//! let plugin = XmlRpcPlugin::new(Settings::default());
//! plugin.add_view(
//!     "say",
//!     Signature::new(["what"], vec![]).unwrap(),
//!     |_request, args| Ok(Reply::Value(args[0].clone())),
//! );
//!
//! let body = encode_request("say", &[Value::String("hello".to_string())]);
//! let mut request = Request::post("text/xml", body);
//! assert!(plugin.on_new_request(&mut request).unwrap());
//! assert_eq!(request.rpc().unwrap().method, "say");
//!
//! let response = plugin.render(&Reply::Value(Value::String("hello".to_string())));
//! assert_eq!(response.content_type, "text/xml");
//! ```

pub use xmlrpckit_config as config;
pub use xmlrpckit_core::*;
