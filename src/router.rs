//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Unmatched paths go to the
//! fallback handler, paths registered under another method answer 405, and a
//! handler that panics is turned into the recover response.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::error;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// What the recover hook learns about a handler that panicked.
#[derive(Debug, Clone)]
pub struct Failure {
    pub method: Method,
    pub path: String,
    pub message: String,
}

type RecoverFn = Arc<dyn Fn(&Failure) -> Response + Send + Sync + 'static>;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: Option<BoxedHandler>,
    recover: Option<RecoverFn>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallback: None, recover: None }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust,no_run
    /// # use folio::{Method, Request, Response, Router};
    /// # async fn home(_: Request) -> Response { Response::html("") }
    /// # async fn contact(_: Request) -> Response { Response::redirect("/") }
    /// Router::new()
    ///     .on(Method::Get,  "/",        home)
    ///     .on(Method::Post, "/contact", contact);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Handler for requests no route matches. Defaults to a bare 404.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// Builds the response for a handler that panicked. Defaults to a bare 500.
    pub fn recover(mut self, f: impl Fn(&Failure) -> Response + Send + Sync + 'static) -> Self {
        self.recover = Some(Arc::new(f));
        self
    }

    /// Routes one request and produces one response.
    pub async fn handle(&self, mut req: Request) -> Response {
        let path = req.path.clone();

        if let Some((handler, params)) = self.lookup(req.method, &path) {
            req.params = params;
            return self.run(handler, req).await;
        }

        // HEAD is served by the GET route with the body stripped.
        if req.method == Method::Head {
            if let Some((handler, params)) = self.lookup(Method::Get, &path) {
                req.params = params;
                let mut res = self.run(handler, req).await;
                res.body.clear();
                return res;
            }
        }

        let allowed = self.allowed_methods(&path);
        if !allowed.is_empty() {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            return Response::builder()
                .status(Status::MethodNotAllowed)
                .header("allow", &allow)
                .no_body();
        }

        match &self.fallback {
            Some(handler) => self.run(Arc::clone(handler), req).await,
            None => Response::status(Status::NotFound),
        }
    }

    /// Runs the handler on its own task so a panic surfaces as a `JoinError`.
    async fn run(&self, handler: BoxedHandler, req: Request) -> Response {
        let method = req.method;
        let path = req.path.clone();

        match tokio::spawn(handler.call(req)).await {
            Ok(res) => res,
            Err(e) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    "handler task cancelled".to_owned()
                };
                let failure = Failure { method, path, message };
                match &self.recover {
                    Some(recover) => recover(&failure),
                    None => {
                        error!(method = %failure.method, path = %failure.path, "handler panicked: {}", failure.message);
                        Response::status(Status::InternalServerError)
                    }
                }
            }
        }
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Every method with a route for `path`, sorted, HEAD implied by GET.
    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        if methods.contains(&Method::Get) && !methods.contains(&Method::Head) {
            methods.push(Method::Head);
        }
        methods.sort();
        methods
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(_) => "non-string panic payload".to_owned(),
        },
    }
}
