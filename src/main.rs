//! Demo server: a small fragment tree served by the weft engine.
//!
//! Wires a document shell, a home page, and a users section (layout plus
//! detail leaf) into a route table and serves them. The user detail page
//! defers its activity feed behind a suspense boundary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use weft::config::load_config;
use weft::fragment::{Component, Loader, ParamDecl, ViewContext};
use weft::observability::{logging, metrics};
use weft::render::Renderable;
use weft::resolve::Break;
use weft::routing::Route;
use weft::{
    Fragment, FragmentChain, FragmentModule, HttpServer, PathPattern, RequestContext, RouteTable,
    ServerConfig, Shutdown,
};

#[derive(Parser)]
#[command(name = "weft", about = "Streaming fragment router demo server")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config.
    #[arg(long)]
    bind: Option<String>,
}

struct DocumentShell;

impl Component for DocumentShell {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        _data: Option<&Value>,
        children: Renderable,
    ) -> Renderable {
        Renderable::sequence(vec![
            "<html><head><title>weft demo</title></head><body>".into(),
            children,
            "</body></html>".into(),
        ])
    }
}

struct UsersLayout;

impl Component for UsersLayout {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        _data: Option<&Value>,
        children: Renderable,
    ) -> Renderable {
        Renderable::sequence(vec![
            "<nav><a href=\"/\">home</a></nav><section data-layout=\"users\">".into(),
            children,
            "</section>".into(),
        ])
    }
}

struct UserLoader;

#[async_trait]
impl Loader for UserLoader {
    async fn load(&self, ctx: &RequestContext) -> Result<Value, Break> {
        let id = ctx.param("id").unwrap_or("anonymous");
        Ok(json!({ "id": id, "name": format!("user-{id}") }))
    }
}

struct UserDetail;

impl Component for UserDetail {
    fn render(
        &self,
        view: &ViewContext<'_>,
        data: Option<&Value>,
        _children: Renderable,
    ) -> Renderable {
        let name = data
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let feed = view.suspense.defer(
            Renderable::text("<p>loading activity…</p>"),
            async move {
                tokio::time::sleep(Duration::from_millis(150)).await;
                Ok(Renderable::text("<ul><li>signed in</li><li>updated profile</li></ul>"))
            },
        );
        Renderable::sequence(vec![
            Renderable::text(format!("<article><h1>{name}</h1>")),
            feed,
            "</article>".into(),
        ])
    }
}

struct HomePage;

impl Component for HomePage {
    fn render(
        &self,
        _view: &ViewContext<'_>,
        _data: Option<&Value>,
        _children: Renderable,
    ) -> Renderable {
        Renderable::text("<h1>weft</h1><p>try <a href=\"/users/42\">/users/42</a></p>")
    }
}

fn demo_table() -> RouteTable {
    let document = Arc::new(Fragment::document(
        "root",
        FragmentModule::new().with_component(DocumentShell),
    ));
    let home = Arc::new(Fragment::new(
        "home",
        FragmentModule::new().with_component(HomePage),
    ));
    let users_layout = Arc::new(Fragment::new(
        "users-layout",
        FragmentModule::new().with_component(UsersLayout),
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

    let routes = vec![
        Route::new(
            PathPattern::parse("/").expect("static pattern"),
            Arc::new(FragmentChain::new(vec![document.clone(), home]).expect("static chain")),
        ),
        Route::new(
            PathPattern::parse("/users/:id").expect("static pattern"),
            Arc::new(
                FragmentChain::new(vec![document, users_layout, user_detail])
                    .expect("static chain"),
            ),
        ),
    ];
    RouteTable::new(routes)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init_logging("weft=debug,tower_http=debug");
    tracing::info!("weft v0.1.0 starting");

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let table = demo_table();
    tracing::info!(routes = table.len(), "Route table built");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
