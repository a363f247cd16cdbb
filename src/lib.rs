//! # folio
//!
//! A personal portfolio site served straight from hyper.
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/`, `/projects`, `/certifications`, `/experience` | 200 HTML |
//! | GET | `/health` | 200 `{"status":"OK"}` |
//! | POST | `/contact` | JSON ack (200/400) or 302 to `/` with a flash |
//! | any | unmatched | 404 HTML |
//!
//! Pages render static content compiled into the binary. The contact form
//! only logs what it receives.
//!
//! ## The HTTP layer
//!
//! The site sits on a small framework living in this crate: radix-tree
//! routing via [`matchit`], hyper for the wire, tokio for I/O, and graceful
//! shutdown on SIGTERM / Ctrl-C. TLS, rate limiting and body-size limits are
//! left to the reverse proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio::{Server, Settings, Site};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), folio::Error> {
//!     let settings = Settings::load()?;
//!     let server = Server::bind(&settings.listen_addr()).await?;
//!     let site = Arc::new(Site::new(settings)?);
//!     server.serve(site.router()).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod templates;

pub mod contact;
pub mod content;
pub mod flash;
pub mod health;
pub mod logging;
pub mod settings;
pub mod site;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Failure, Router};
pub use server::Server;
pub use settings::Settings;
pub use site::{Page, Site};
pub use status::Status;
