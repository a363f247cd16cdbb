//! The portfolio site: shared state plus the route table.
//!
//! A [`Site`] is built once at startup and shared behind an `Arc` by every
//! route closure. Nothing in it is written after construction.

use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::error;

use crate::contact;
use crate::content::{Content, SharedContext};
use crate::error::Error;
use crate::flash::{Flash, FlashSigner};
use crate::handler::Handler;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Failure, Router};
use crate::settings::Settings;
use crate::status::Status;
use crate::templates;

/// The pages rendered from static content.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Page {
    Home,
    Projects,
    Certifications,
    Experience,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Projects, Page::Certifications, Page::Experience];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home           => "/",
            Self::Projects       => "/projects",
            Self::Certifications => "/certifications",
            Self::Experience     => "/experience",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Home           => "index",
            Self::Projects       => "projects",
            Self::Certifications => "certifications",
            Self::Experience     => "experience",
        }
    }

    /// Name the layout uses to highlight the active nav link.
    fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            other      => other.template(),
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Home           => "Home",
            Self::Projects       => "Projects",
            Self::Certifications => "Certifications",
            Self::Experience     => "Experience",
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    #[serde(flatten)]
    shared: SharedContext,
    page: &'static str,
    title: &'static str,
    messages: &'a [Flash],
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

pub struct Site {
    settings: Settings,
    content: Content,
    templates: Handlebars<'static>,
    flashes: FlashSigner,
}

impl Site {
    /// A site serving the built-in content.
    pub fn new(settings: Settings) -> Result<Self, Error> {
        Self::with_content(settings, Content::builtin())
    }

    pub fn with_content(settings: Settings, content: Content) -> Result<Self, Error> {
        Ok(Self {
            flashes: FlashSigner::new(&settings.secret_key),
            templates: templates::registry()?,
            settings,
            content,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The full route table, including the 404 fallback and the 500 recover hook.
    pub fn router(self: Arc<Self>) -> Router {
        let mut router = Router::new();
        for page in Page::ALL {
            router = router.on(Method::Get, page.path(), self.route(move |site, req| site.page(page, &req)));
        }

        let recover = Arc::clone(&self);
        router
            .on(Method::Get, "/health", health::liveness)
            .on(Method::Post, "/contact", self.route(|site, req| contact::submit(&site.flashes, &req)))
            .fallback(self.route(|site, req| Ok(site.not_found(&req))))
            .recover(move |failure: &Failure| recover.panicked(failure))
    }

    /// Wraps `f` into a handler that owns a clone of the site and turns an
    /// `Err` into the 500 page.
    fn route<F>(self: &Arc<Self>, f: F) -> impl Handler + use<F>
    where
        F: Fn(&Site, Request) -> Result<Response, Error> + Copy + Send + Sync + 'static,
    {
        let site = Arc::clone(self);
        move |req: Request| {
            let site = Arc::clone(&site);
            async move {
                let method = req.method();
                let path = req.path().to_owned();
                f(&*site, req).unwrap_or_else(|e| site.failed(method, &path, &e))
            }
        }
    }

    /// Renders one of the content pages, showing and clearing any flashes.
    pub fn page(&self, page: Page, req: &Request) -> Result<Response, Error> {
        let pending = self.flashes.pending(req);
        let body = self.render(page.template(), page.slug(), page.title(), pending.as_deref(), None)?;

        let res = Response::html(body);
        Ok(match pending {
            Some(_) => res.with_header("set-cookie", FlashSigner::clear_cookie()),
            None => res,
        })
    }

    /// The 404 page. Falls through to the 500 page if it cannot render.
    pub fn not_found(&self, req: &Request) -> Response {
        match self.render("404", "error", "Not found", None, Some(req.path())) {
            Ok(body) => Response::builder().status(Status::NotFound).html(body),
            Err(e) => self.failed(req.method(), req.path(), &e),
        }
    }

    fn failed(&self, method: Method, path: &str, err: &Error) -> Response {
        error!(%method, path, error = ?err, "request failed: {err}");
        self.error_page()
    }

    fn panicked(&self, failure: &Failure) -> Response {
        error!(method = %failure.method, path = %failure.path, "handler panicked: {}", failure.message);
        self.error_page()
    }

    /// The generic 500 page, or plain text if even that cannot render.
    fn error_page(&self) -> Response {
        match self.render("500", "error", "Server error", None, None) {
            Ok(body) => Response::builder().status(Status::InternalServerError).html(body),
            Err(e) => {
                error!(error = ?e, "error page failed to render");
                Response::builder()
                    .status(Status::InternalServerError)
                    .text("Internal Server Error")
            }
        }
    }

    fn render(
        &self,
        template: &str,
        page: &'static str,
        title: &'static str,
        messages: Option<&[Flash]>,
        path: Option<&str>,
    ) -> Result<String, Error> {
        let ctx = PageContext {
            shared: self.content.shared_context(),
            page,
            title,
            messages: messages.unwrap_or_default(),
            path,
        };
        Ok(self.templates.render(template, &ctx)?)
    }
}
