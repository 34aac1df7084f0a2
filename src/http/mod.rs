//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one GET request per connection,
//! headers ignored, every response closes the connection.
//!
//! # Architecture
//!
//! - **`reader`**: reads the request line and drains the header block
//! - **`parser`**: splits a request line into method and path
//! - **`request`**: the parsed request
//! - **`response`**: status codes and the response value
//! - **`writer`**: serializes a response and streams file bodies
//! - **`mime`**: MIME type detection based on file extensions
//! - **`connection`**: ties the above together for one client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line + headers
//!        └──────┬──────┘
//!               │ nothing sent ─────────────┐
//!               │ malformed → 400 ───────┐  │
//!               ▼                        │  │
//!        ┌──────────────────┐            │  │
//!        │   Processing     │ ← GET / 405│  │
//!        └──────┬───────────┘            │  │
//!               ▼                        │  │
//!        ┌──────────────────┐            │  │
//!        │    Writing       │ ◄──────────┘  │
//!        └──────┬───────────┘               │
//!               ▼                           │
//!        ┌──────────────────┐               │
//!        │     Closed       │ ◄─────────────┘
//!        └──────────────────┘
//! ```
//!
//! # Wire format
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 42\r\n
//! Connection: close\r\n
//! Access-Control-Allow-Origin: *\r\n
//! \r\n
//! <42 bytes>
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
