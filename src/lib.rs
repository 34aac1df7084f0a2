//! docserve - embeddable static file server
//!
//! Serves a directory over plain HTTP to clients on the local network. A host
//! application starts and stops the server through [`server::FileServer`].

pub mod config;
pub mod http;
pub mod net;
pub mod resolver;
pub mod server;
