//! Contact form submissions.
//!
//! `POST /contact` accepts either a JSON object or a URL-encoded form with
//! `name`, `email` and `message`. The reply follows the request:
//!
//! | Body | Valid | Invalid |
//! |---|---|---|
//! | JSON | 200 `{"ok":true}` | 400 `{"ok":false,"error":"Missing required fields"}` |
//! | form | 302 → `/`, success flash | 302 → `/`, warning flash |
//!
//! Submissions are only logged. Nothing is stored or sent anywhere.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::Error;
use crate::flash::{Flash, FlashSigner};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const THANKS: &str = "Thanks for reaching out! I'll get back to you soon.";
pub const FILL_ALL_FIELDS: &str = "Please fill out all fields.";

const FIELDS: [&str; 3] = ["name", "email", "message"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    /// Builds a submission when every field is present and non-empty.
    fn from_fields(mut get: impl FnMut(&str) -> Option<String>) -> Option<Self> {
        let [name, email, message] = FIELDS.map(|field| get(field).filter(|v| !v.is_empty()));
        Some(Self { name: name?, email: email?, message: message? })
    }

    /// Reads the fields from a JSON object body. Anything other than an
    /// object with string values counts as missing fields.
    pub fn from_json(req: &Request) -> Option<Self> {
        let body: Value = match req.json() {
            Ok(body) => body,
            Err(e) => {
                debug!("contact body is not valid json: {e}");
                return None;
            }
        };
        let object = body.as_object()?;
        Self::from_fields(|field| object.get(field).and_then(Value::as_str).map(str::to_owned))
    }

    /// Reads the fields from a URL-encoded form body.
    pub fn from_form(req: &Request) -> Option<Self> {
        let mut form = req.form();
        Self::from_fields(|field| form.remove(field))
    }
}

/// Handles one submission. Errors only come from signing the flash cookie.
pub fn submit(signer: &FlashSigner, req: &Request) -> Result<Response, Error> {
    if req.is_json() {
        return Ok(match Submission::from_json(req) {
            Some(submission) => {
                record(&submission);
                Json(json!({ "ok": true })).into_response()
            }
            None => (Status::BadRequest, Json(json!({ "ok": false, "error": MISSING_FIELDS })))
                .into_response(),
        });
    }

    let flash = match Submission::from_form(req) {
        Some(submission) => {
            record(&submission);
            Flash::success(THANKS)
        }
        None => Flash::warning(FILL_ALL_FIELDS),
    };
    redirect_home(signer, req, flash)
}

fn record(submission: &Submission) {
    info!(
        name = %submission.name,
        email = %submission.email,
        message = %submission.message,
        "contact submission received"
    );
}

/// Redirects to `/`, queueing `flash` after any messages not yet shown.
fn redirect_home(signer: &FlashSigner, req: &Request, flash: Flash) -> Result<Response, Error> {
    let mut flashes = signer.pending(req).unwrap_or_default();
    flashes.push(flash);
    Ok(Response::redirect("/").with_header("set-cookie", signer.set_cookie(&flashes)?))
}
