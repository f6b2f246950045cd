//! Shared fixtures for integration tests: a small fragment tree and a
//! server spawner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use weft::fragment::{Action, Component, Headers, Loader, ParamDecl, ViewContext};
use weft::render::Renderable;
use weft::resolve::Break;
use weft::routing::Route;
use weft::{
    Fragment, FragmentChain, FragmentModule, HttpServer, PathPattern, RequestContext, RouteTable,
    ServerConfig, Shutdown,
};

pub struct DocumentShell;

impl Component for DocumentShell {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        _data: Option<&Value>,
        children: Renderable,
    ) -> Renderable {
        Renderable::sequence(vec![
            "<html><body>".into(),
            children,
            "</body></html>".into(),
        ])
    }
}

pub struct ShellHeaders;

impl Headers for ShellHeaders {
    fn headers(
        &self,
        _ctx: &RequestContext,
        _data: Option<&Value>,
    ) -> Vec<(HeaderName, HeaderValue)> {
        vec![(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("shell=1"),
        )]
    }
}

pub struct UsersLayout;

impl Component for UsersLayout {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        _data: Option<&Value>,
        children: Renderable,
    ) -> Renderable {
        Renderable::sequence(vec![
            "<section data-layout=\"users\">".into(),
            children,
            "</section>".into(),
        ])
    }
}

pub struct LayoutHeaders;

impl Headers for LayoutHeaders {
    fn headers(
        &self,
        _ctx: &RequestContext,
        _data: Option<&Value>,
    ) -> Vec<(HeaderName, HeaderValue)> {
        vec![(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("layout=1"),
        )]
    }
}

pub struct UserLoader;

#[async_trait]
impl Loader for UserLoader {
    async fn load(&self, ctx: &RequestContext) -> Result<Value, Break> {
        let id = ctx.param("id").unwrap_or("none");
        Ok(json!({ "id": id }))
    }
}

pub struct UserDetail;

impl Component for UserDetail {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        data: Option<&Value>,
        _children: Renderable,
    ) -> Renderable {
        let id = data
            .and_then(|d| d.get("id"))
            .and_then(Value::as_str)
            .unwrap_or("none");
        Renderable::text(format!("<article>user {id}</article>"))
    }
}

pub struct InfoLoader;

#[async_trait]
impl Loader for InfoLoader {
    async fn load(&self, _ctx: &RequestContext) -> Result<Value, Break> {
        Ok(json!({ "service": "weft", "ok": true }))
    }
}

pub struct SubmitAction;

#[async_trait]
impl Action for SubmitAction {
    async fn run(&self, ctx: &RequestContext) -> Result<Value, Break> {
        Ok(json!({ "received": ctx.body().len() }))
    }
}

pub struct LoginRedirect;

#[async_trait]
impl Loader for LoginRedirect {
    async fn load(&self, _ctx: &RequestContext) -> Result<Value, Break> {
        Err(Break::redirect(StatusCode::SEE_OTHER, "/login"))
    }
}

/// Declares three deferred subtrees resolving after 30ms, 10ms, 20ms.
pub struct FeedPage;

impl Component for FeedPage {
    fn render(
        &self,
        view: &ViewContext<'_>,
        _data: Option<&Value>,
        _children: Renderable,
    ) -> Renderable {
        let mut parts = vec![Renderable::text("<main>")];
        for (label, ms) in [("slow", 30u64), ("fast", 10), ("mid", 20)] {
            parts.push(view.suspense.defer(
                Renderable::text(format!("<p>waiting:{label}</p>")),
                async move {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(Renderable::text(format!("<p>done:{label}</p>")))
                },
            ));
        }
        parts.push(Renderable::text("</main>"));
        Renderable::sequence(parts)
    }
}

/// The route table every integration test serves.
pub fn build_table() -> RouteTable {
    let document = Arc::new(Fragment::document(
        "root",
        FragmentModule::new()
            .with_component(DocumentShell)
            .with_headers(ShellHeaders),
    ));
    let users_layout = Arc::new(Fragment::new(
        "users-layout",
        FragmentModule::new()
            .with_component(UsersLayout)
            .with_headers(LayoutHeaders),
    ));
    let user_detail = Arc::new(
        Fragment::new(
            "user-detail",
            FragmentModule::new()
                .with_loader(UserLoader)
                .with_component(UserDetail),
        )
        .with_params(vec![ParamDecl::required("id")]),
    );
    let api_info = Arc::new(Fragment::new(
        "api-info",
        FragmentModule::new().with_loader(InfoLoader),
    ));
    let submit = Arc::new(Fragment::new(
        "submit",
        FragmentModule::new().with_action(SubmitAction),
    ));
    let gated = Arc::new(Fragment::new(
        "gated",
        FragmentModule::new()
            .with_loader(LoginRedirect)
            .with_component(UserDetail),
    ));
    let feed = Arc::new(Fragment::new(
        "feed",
        FragmentModule::new().with_component(FeedPage),
    ));

    let chain = |fragments: Vec<Arc<Fragment>>| Arc::new(FragmentChain::new(fragments).unwrap());
    let route = |template: &str, c: Arc<FragmentChain>| {
        Route::new(PathPattern::parse(template).unwrap(), c)
    };

    RouteTable::new(vec![
        route(
            "/users/:id",
            chain(vec![document.clone(), users_layout.clone(), user_detail]),
        ),
        route("/api/info", chain(vec![document.clone(), api_info])),
        route("/submit", chain(vec![document.clone(), submit])),
        route("/gated", chain(vec![document.clone(), gated])),
        route("/feed", chain(vec![document, feed])),
    ])
}

/// Spawn a server on `addr` and return the shutdown coordinator keeping
/// it alive.
pub async fn spawn_server(addr: SocketAddr) -> Shutdown {
    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, build_table());
    let listener = TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// A client that never follows redirects and never picks up a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
