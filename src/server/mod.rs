//! Development server with live preview
//!
//! Serves the generated site and renders the home page dynamically so the
//! `category` query parameter can be previewed without regenerating. Each
//! render is a pure recomputation from the in-memory snapshot.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        RawQuery, State, WebSocketUpgrade,
    },
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::trace::TraceLayer;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::generator::Generator;
use crate::taxonomy::{count_categories, CategoryCounts, SelectedCategory};
use crate::Devlog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// In-memory view of the loaded site, refreshed on rebuild
struct SiteSnapshot {
    posts: Vec<Post>,
    counts: CategoryCounts,
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    generator: Generator,
    snapshot: RwLock<SiteSnapshot>,
}

impl ServerState {
    fn inject_live_reload(&self, html: String) -> String {
        if self.live_reload {
            html.replace("</body>", LIVE_RELOAD_SCRIPT)
        } else {
            html
        }
    }
}

/// Start the development server
pub async fn start(devlog: &Devlog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let loader = ContentLoader::new(devlog);
    let posts = loader.load_posts()?;
    let counts = count_categories(&posts);

    let state = Arc::new(ServerState {
        public_dir: devlog.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
        generator: Generator::new(devlog)?,
        snapshot: RwLock::new(SiteSnapshot { posts, counts }),
    });

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let devlog = devlog.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_loop(devlog, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Render the home page for the requested category selection
///
/// The raw query string is resolved into a `SelectedCategory` here, at the
/// boundary; absent, empty and repeated parameters collapse to one value.
async fn home_handler(
    State(state): State<Arc<ServerState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let selected = SelectedCategory::from_query(query.as_deref().unwrap_or(""));

    let snapshot = state.snapshot.read().await;
    match state
        .generator
        .render_home_page(&snapshot.posts, &snapshot.counts, &selected, 1)
    {
        Ok(html) => Html(state.inject_live_reload(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render home page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Upgrade the live reload websocket
async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
    ws: WebSocketUpgrade,
) -> Response {
    let rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut rx: broadcast::Receiver<()>) {
    while rx.recv().await.is_ok() {
        if socket
            .send(Message::Text("reload".to_string()))
            .await
            .is_err()
        {
            break;
        }
    }
}

/// Serve generated files, injecting the live reload script into HTML
async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    let mut file_path = state.public_dir.join(path);
    if path.is_empty() || path.ends_with('/') {
        file_path = file_path.join("index.html");
    } else if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    match tokio::fs::read(&file_path).await {
        Ok(bytes) => {
            let content_type = content_type_for(&file_path);
            if content_type == "text/html" {
                let html = String::from_utf8_lossy(&bytes).into_owned();
                Html(state.inject_live_reload(html)).into_response()
            } else {
                ([(axum::http::header::CONTENT_TYPE, content_type)], bytes).into_response()
            }
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Content type from file extension
fn content_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Watch sources, regenerate and refresh the snapshot, then notify clients
fn watch_loop(devlog: Devlog, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(300), move |res: DebounceEventResult| {
        if let Ok(events) = res {
            let _ = tx.send(events);
        }
    })?;

    debouncer
        .watcher()
        .watch(&devlog.source_dir, RecursiveMode::Recursive)?;

    let config_path = devlog.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    while rx.recv().is_ok() {
        tracing::info!("File changed, regenerating...");
        if let Err(e) = crate::commands::generate::run_with_options(&devlog, true) {
            tracing::error!("Generation failed: {}", e);
            continue;
        }

        let loader = ContentLoader::new(&devlog);
        match loader.load_posts() {
            Ok(posts) => {
                let counts = count_categories(&posts);
                let mut snapshot = state.snapshot.blocking_write();
                *snapshot = SiteSnapshot { posts, counts };
            }
            Err(e) => {
                tracing::warn!("Failed to reload posts: {}", e);
            }
        }

        let _ = state.reload_tx.send(());
    }

    Ok(())
}

/// Open the site in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let command = "open";
    #[cfg(target_os = "linux")]
    let command = "xdg-open";
    #[cfg(target_os = "windows")]
    let command = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let command = "xdg-open";

    std::process::Command::new(command).arg(url).spawn()?;
    Ok(())
}
