mod http;
mod routes;
mod site;
mod users;

use std::env;
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tracing_subscriber::EnvFilter;

use crate::http::HttpResponse;
use crate::routes::App;
use crate::users::UserStore;

const DEFAULT_PORT: u16 = 3000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let site_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("site"));
    let users_path = site_root.join("users.json");

    let app = Arc::new(App::new(site_root.clone(), UserStore::new(users_path)));

    let listener = match TcpListener::bind(("0.0.0.0", port)) {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, port, "failed to bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!(port, root = %site_root.display(), "serving");

    for connection in listener.incoming() {
        match connection {
            Ok(stream) => {
                let app = Arc::clone(&app);
                thread::spawn(move || serve_connection(app, stream));
            }
            Err(error) => tracing::warn!(%error, "failed to accept connection"),
        }
    }
}

fn serve_connection(app: Arc<App>, mut stream: TcpStream) {
    let Some(parsed) = http::read_request(&mut stream) else {
        return;
    };

    let response = match parsed {
        Ok(request) => {
            tracing::debug!(method = %request.method, path = %request.path, "request");
            app.handle(&request)
        }
        Err(reason) => {
            tracing::debug!(reason, "malformed request");
            HttpResponse::new(400).with_body("text/plain", reason)
        }
    };
    http::write_response(&mut stream, &response);
}
