use std::sync::Arc;

use tracing::{span, Level};

use crate::{
    config::Config,
    request::Request,
    resource::{Fallback, MethodNotAllowed, MethodNotSupported, NotFound},
    response::Response,
    router::{RouteNotFound, RouteTable},
    transport::Transport,
};

/// Resolves requests against a route table and runs the matching resource.
pub struct Dispatcher {
    routes: RouteTable,
    not_found: Arc<dyn Fallback>,
    method_not_allowed: Arc<dyn Fallback>,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, config: &Config) -> Self {
        Self {
            routes,
            not_found: config
                .not_found
                .clone()
                .unwrap_or_else(|| Arc::new(NotFound)),
            method_not_allowed: config
                .method_not_allowed
                .clone()
                .unwrap_or_else(|| Arc::new(MethodNotAllowed)),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Runs the resource for `r`.
    ///
    /// Unmatched paths and unsupported methods are answered by the
    /// fallbacks. A resource operation that yields no response and a resource
    /// that fails to load are errors.
    pub fn handle(&self, r: &Request) -> anyhow::Result<Response> {
        let span = span!(
            Level::INFO,
            "req",
            method = r.get_http_method(),
            uri = r.get_request_target()
        );
        let _guard = span.enter();

        let m = match self.routes.find(r.get_base_uri(), r.get_canonical_uri()) {
            Ok(m) => m,
            Err(RouteNotFound { .. }) => return Ok(self.not_found.respond(r)),
        };
        let resource = self.routes.load(m.route)?;

        match resource.exec(r, m.params) {
            Ok(w) => Ok(w),
            Err(err) => {
                let Some(not_supported) = err.downcast_ref::<MethodNotSupported>() else {
                    return Err(err);
                };
                let mut w = self.method_not_allowed.respond(r);
                if w.get_header("Allow").is_none() {
                    w.add_allow_header(not_supported.allowed.iter().map(String::as_str));
                }
                Ok(w)
            }
        }
    }

    /// Handles `r` and hands the finalized response to `transport`.
    pub fn serve(&self, r: &Request, transport: &mut impl Transport) -> anyhow::Result<()> {
        self.handle(r)?.send(r, transport)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        config::Config,
        request::Request,
        resource::{Fallback, Handler, Input, InvalidHandlerResult, Operation, Resource},
        response::Response,
        router::{LoadFailed, Registration, RouteTable},
        status_code_registry::ReasonPhrase,
        transport::{HttpWriter, Sent},
    };

    use super::Dispatcher;

    fn widgets() -> Arc<Handler> {
        Arc::new(
            Handler::new("Widget")
                .operation(Operation::new(
                    "GET",
                    [Input::request("request"), Input::named("id")],
                    |args| {
                        let r = args.request()?;
                        let id = args.value("id")?;
                        let mut w = Response::for_location(r, &format!("/widgets/{}.json", id));
                        w.set_body(format!("{{\"id\":{}}}", id), "application/json");
                        w.add_etag(&format!("widget-{}", id));
                        Some(w)
                    },
                ))
                .operation(Operation::new("DELETE", [Input::named("id")], |_| {
                    let mut w = Response::new();
                    w.set_reason_phrase(ReasonPhrase::NoContent);
                    Some(w)
                })),
        )
    }

    fn dispatcher(config: &Config) -> Dispatcher {
        let mut routes = RouteTable::from_config(config);
        routes
            .register(Registration::new("/widgets/:id", "Widget").resource(widgets()))
            .unwrap();
        routes
            .register(
                Registration::new("/widgets/special", "Special")
                    .priority(-1)
                    .resource(Arc::new(Handler::new("Special").operation(Operation::new(
                        "GET",
                        [],
                        |_| {
                            let mut w = Response::new();
                            w.set_body_str("special");
                            Some(w)
                        },
                    )))),
            )
            .unwrap();
        Dispatcher::new(routes, config)
    }

    fn serve(d: &Dispatcher, config: Config) -> Sent {
        let r = Request::new(&config);
        let mut sent: Vec<Sent> = vec![];
        d.serve(&r, &mut sent).unwrap();
        sent.pop().unwrap()
    }

    fn header<'a>(sent: &'a Sent, name: &str) -> Option<&'a str> {
        sent.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_dispatch_by_name() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().uri("/widgets/7"));

        assert_eq!(sent.status_code, 200);
        assert_eq!(sent.body, b"{\"id\":7}");
        assert_eq!(header(&sent, "X-Resource"), Some("Widget"));
        assert_eq!(header(&sent, "Etag"), Some("\"widget-7\""));
        assert_eq!(header(&sent, "Content-Location"), Some("/widgets/7.json"));
        assert_eq!(header(&sent, "Vary"), Some("Accept Accept-Language"));
        assert_eq!(header(&sent, "Content-Length"), Some("8"));
    }

    #[test]
    fn test_serve_http() {
        let d = dispatcher(&Config::new());
        let r = Request::new(&Config::new().method("DELETE").uri("/widgets/7"));
        let mut writer = HttpWriter::new(Vec::<u8>::new());
        d.serve(&r, &mut writer).unwrap();

        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "HTTP/1.1 204 No Content\r\nX-Resource: Widget\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_dispatch_suffix_is_not_part_of_match() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().uri("/widgets/7.json"));
        assert_eq!(sent.body, b"{\"id\":7}");
        assert!(header(&sent, "Content-Location").is_none());
    }

    #[test]
    fn test_dispatch_priority() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().uri("/widgets/special"));
        assert_eq!(sent.body, b"special");
        assert_eq!(header(&sent, "X-Resource"), Some("Special"));
    }

    #[test]
    fn test_dispatch_head() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().method("HEAD").uri("/widgets/7"));
        assert_eq!(sent.status_code, 200);
        assert!(sent.body.is_empty());
        assert_eq!(header(&sent, "Content-Length"), Some("8"));
    }

    #[test]
    fn test_dispatch_not_found() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().uri("/gadgets/1"));
        assert_eq!(sent.status_code, 404);
        assert_eq!(sent.reason_phrase, Some(ReasonPhrase::NotFound));
        assert_eq!(
            sent.body,
            b"Nothing was found for the resource \"/gadgets/1\".".to_vec()
        );
    }

    #[test]
    fn test_dispatch_method_not_allowed() {
        let d = dispatcher(&Config::new());
        let sent = serve(&d, Config::new().method("PUT").uri("/widgets/7"));
        assert_eq!(sent.status_code, 405);
        assert_eq!(header(&sent, "Allow"), Some("GET, DELETE"));
        assert!(header(&sent, "X-Resource").is_none());
    }

    #[test]
    fn test_dispatch_custom_fallbacks() {
        struct Gone;

        impl Fallback for Gone {
            fn respond(&self, _: &Request) -> Response {
                let mut w = Response::new();
                w.set_reason_phrase(ReasonPhrase::Gone);
                w
            }
        }

        let config = Config::new()
            .not_found(Gone)
            .method_not_allowed(|r: &Request| {
                let mut w = Response::new();
                w.set_reason_phrase(ReasonPhrase::MethodNotAllowed);
                w.set_body_str(&format!("no {} here", r.get_http_method()));
                w
            });
        let d = dispatcher(&config);

        let sent = serve(&d, config.clone().uri("/nothing"));
        assert_eq!(sent.status_code, 410);

        for method in ["PUT", "POST"] {
            let sent = serve(&d, config.clone().method(method).uri("/widgets/7"));
            assert_eq!(sent.status_code, 405);
            assert_eq!(sent.body, format!("no {} here", method).into_bytes());
            assert_eq!(header(&sent, "Allow"), Some("GET, DELETE"));
        }
    }

    #[test]
    fn test_dispatch_fallback_set_allow() {
        let config = Config::new().method_not_allowed(|_: &Request| {
            let mut w = Response::new();
            w.set_reason_phrase(ReasonPhrase::MethodNotAllowed);
            w.add_allow_header(["GET"]);
            w
        });
        let d = dispatcher(&config);

        let sent = serve(&d, config.clone().method("PATCH").uri("/widgets/7"));
        assert_eq!(sent.status_code, 405);
        assert_eq!(header(&sent, "Allow"), Some("GET"));
    }

    #[test]
    fn test_dispatch_gzip() {
        let d = dispatcher(&Config::new());
        let sent = serve(
            &d,
            Config::new().uri("/widgets/7").accept_encoding("gzip"),
        );
        assert_eq!(header(&sent, "Content-Encoding"), Some("gzip"));
        assert_eq!(
            header(&sent, "Content-Length"),
            Some(sent.body.len().to_string().as_str())
        );
    }

    #[test]
    fn test_dispatch_invalid_handler_result() {
        let mut routes = RouteTable::new();
        routes
            .register(Registration::new("/broken", "Broken").resource(Arc::new(
                Handler::new("Broken").operation(Operation::new("GET", [], |_| None)),
            )))
            .unwrap();
        let d = Dispatcher::new(routes, &Config::new());

        let err = d
            .handle(&Request::new(&Config::new().uri("/broken")))
            .unwrap_err();
        err.downcast_ref::<InvalidHandlerResult>().unwrap();
    }

    #[test]
    fn test_dispatch_lazy_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let load = move |key: &str| -> anyhow::Result<Arc<dyn Resource>> {
            counter.fetch_add(1, Ordering::SeqCst);
            match key {
                "Widget" => Ok(widgets()),
                _ => anyhow::bail!("unknown resource {}", key),
            }
        };
        let mut routes = RouteTable::new().loader(load);
        routes
            .register(Registration::new("/widgets/:id", "Widget"))
            .unwrap();
        routes
            .register(Registration::new("/missing", "Missing"))
            .unwrap();
        let d = Dispatcher::new(routes, &Config::new());

        for id in ["1", "2", "3"] {
            let w = d
                .handle(&Request::new(&Config::new().uri(format!("/widgets/{}", id))))
                .unwrap();
            assert_eq!(w.get_header("X-Resource"), Some("Widget"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = d
            .handle(&Request::new(&Config::new().uri("/missing")))
            .unwrap_err();
        err.downcast_ref::<LoadFailed>().unwrap();
    }

    #[test]
    fn test_dispatch_mount_and_base_uri() {
        let config = Config::new().mount("shop", "/shop").base_uri("/api");
        let mut routes = RouteTable::from_config(&config);
        routes
            .register(
                Registration::new("/widgets/:id", "Widget")
                    .namespace("shop::catalog")
                    .resource(widgets()),
            )
            .unwrap();
        let d = Dispatcher::new(routes, &config);
        assert!(d.routes().get("/shop/widgets/:id").is_some());

        let sent = serve(&d, config.clone().uri("/api/shop/widgets/3"));
        assert_eq!(sent.status_code, 200);

        let sent = serve(&d, config.clone().uri("/shop/widgets/3"));
        assert_eq!(sent.status_code, 404);
    }
}
