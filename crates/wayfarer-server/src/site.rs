//! Static file serving from a site root.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::http::HttpResponse;

const NOT_FOUND_PAGE: &str = "<h1>404 - File Not Found</h1>";

const MIME_TYPES: [(&str, &str); 13] = [
    ("html", "text/html"),
    ("js", "application/javascript"),
    ("css", "text/css"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
];

fn mime_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(|extension| {
            let extension = extension.to_lowercase();
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == extension)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or("application/octet-stream")
}

/// Maps a request path to a file under `root`. Paths that escape the root
/// (parent-dir components, absolute segments) resolve to nothing.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = if request_path == "/" {
        "index.html"
    } else {
        request_path.trim_start_matches('/')
    };

    let relative = Path::new(trimmed);
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    Some(root.join(relative))
}

pub fn serve(root: &Path, request_path: &str) -> HttpResponse {
    let Some(file_path) = resolve(root, request_path) else {
        tracing::warn!(path = request_path, "rejecting path outside site root");
        return not_found();
    };

    match fs::read(&file_path) {
        Ok(content) => HttpResponse::new(200).with_body(mime_type(&file_path), content),
        Err(_) => not_found(),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::new(404).with_body("text/html", NOT_FOUND_PAGE)
}
