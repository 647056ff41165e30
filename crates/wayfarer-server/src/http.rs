//! Blocking HTTP/1.1 request parsing and response writing over any
//! `Read + Write` stream.
//!
//! Deliberately small surface: one request per connection, no keep-alive,
//! chunked transfer encoding rejected, POST requires Content-Length. Header
//! section is capped at 32 KiB and bodies at 1 MiB regardless of what the
//! Content-Length header claims.

use std::io::{Read, Write};

const MAX_HEADER_BYTES: usize = 32 * 1024;
const MAX_BODY_BYTES: usize = 1024 * 1024;
const READ_CHUNK: usize = 4096;

#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The request path without its query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or("/")
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.headers
            .push(("Content-Type".to_owned(), content_type.to_owned()));
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Reads and parses one request. `None` means the peer closed the connection
/// before sending anything; `Some(Err)` is a malformed request the caller
/// should answer with a 400.
pub fn read_request(stream: &mut impl Read) -> Option<Result<HttpRequest, String>> {
    let mut buffer: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let header_end = loop {
        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Some(Err("header section too large".to_owned()));
        }
        match stream.read(&mut chunk) {
            Ok(0) => {
                if buffer.is_empty() {
                    return None;
                }
                return Some(Err("connection closed mid-request".to_owned()));
            }
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
            Err(error) => {
                if buffer.is_empty() {
                    return None;
                }
                return Some(Err(format!("read failed: {error}")));
            }
        }
    };

    let mut header_storage = [httparse::EMPTY_HEADER; 64];
    let mut parsed = httparse::Request::new(&mut header_storage);
    match parsed.parse(&buffer[..header_end]) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => return Some(Err("incomplete request head".to_owned())),
        Err(error) => return Some(Err(format!("malformed request: {error}"))),
    }

    let method = parsed.method.unwrap_or("").to_owned();
    let path = parsed.path.unwrap_or("/").to_owned();

    let mut headers = Vec::with_capacity(parsed.headers.len());
    let mut content_length: Option<usize> = None;
    for header in parsed.headers.iter() {
        let value = String::from_utf8_lossy(header.value).into_owned();
        if header.name.eq_ignore_ascii_case("Content-Length") {
            content_length = value.trim().parse().ok();
        }
        if header.name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_lowercase().contains("chunked")
        {
            return Some(Err("chunked transfer encoding is not supported".to_owned()));
        }
        headers.push((header.name.to_owned(), value));
    }

    let body = if matches!(method.as_str(), "POST" | "PUT" | "PATCH") {
        let Some(length) = content_length else {
            return Some(Err(format!("{method} requires Content-Length")));
        };
        if length > MAX_BODY_BYTES {
            return Some(Err("request body too large".to_owned()));
        }
        match read_body(stream, &buffer[header_end..], length) {
            Ok(body) => body,
            Err(error) => return Some(Err(error)),
        }
    } else {
        Vec::new()
    };

    Some(Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    }))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|position| position + 4)
}

fn read_body(stream: &mut impl Read, already_read: &[u8], length: usize) -> Result<Vec<u8>, String> {
    let mut body = Vec::with_capacity(length);
    body.extend_from_slice(&already_read[..already_read.len().min(length)]);

    while body.len() < length {
        let mut chunk = [0u8; READ_CHUNK];
        let wanted = (length - body.len()).min(READ_CHUNK);
        match stream.read(&mut chunk[..wanted]) {
            Ok(0) => return Err("connection closed mid-body".to_owned()),
            Ok(read) => body.extend_from_slice(&chunk[..read]),
            Err(error) => return Err(format!("body read failed: {error}")),
        }
    }
    Ok(body)
}

/// Writes `response` with Content-Length and Connection: close. Write errors
/// are ignored, the peer may already be gone.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason_phrase(response.status)
    );
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str("Connection: close\r\n");
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    if !response.body.is_empty() {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}
