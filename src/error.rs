//! Unified error type.

use thiserror::Error;

/// The error type returned by folio's fallible operations.
///
/// Application-level outcomes (400, 404, 405) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: loading settings, binding a port, registering or
/// rendering a template, decoding a request body.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),

    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("template `{name}` failed to register: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("render: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("flash signing key rejected")]
    Signing,

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
