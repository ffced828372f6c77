//! Plain-data HTTP requests and responses exchanged with the todo service.
//!
//! `TodoClient::build_*` fills an `HttpRequest` for `GET /api/todos`,
//! `POST /api/todos` with a JSON `{"title"}` body, or `GET /health`. The
//! caller sends it however it likes (the integration test uses `ureq`) and
//! hands the status and body back as an `HttpResponse` for `parse_*`.
//! Header names are lowercase; only `content-type` is ever set.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request ready to send. `path` is absolute, including the base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The parts of a response the parsers read. `headers` may be left empty.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
