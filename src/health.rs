//! Liveness probe for load balancers.
//!
//! ```rust,no_run
//! use folio::{health, Method, Router};
//!
//! let app = Router::new().on(Method::Get, "/health", health::liveness);
//! ```

use serde::Serialize;

use crate::{Json, Request};

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// Always returns `200 OK` with `{"status":"OK"}`. If the process can answer
/// HTTP at all it is alive, so this handler has no dependencies.
pub async fn liveness(_req: Request) -> Json<impl Serialize> {
    Json(Health { status: "OK" })
}
