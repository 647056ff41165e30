//! Request routing: the JSON auth endpoints plus static file fallback.
//!
//! Every response carries the permissive CORS headers the demo site expects,
//! and API bodies are always `{success, message, ...}` JSON.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::{HttpRequest, HttpResponse};
use crate::site;
use crate::users::{AuthOutcome, RegisterRequest, UserStore};

pub struct App {
    site_root: PathBuf,
    users: UserStore,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    user_id: String,
    #[serde(flatten)]
    updates: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    user_id: String,
    old_password: String,
    new_password: String,
}

impl App {
    pub fn new(site_root: impl Into<PathBuf>, users: UserStore) -> Self {
        Self {
            site_root: site_root.into(),
            users,
        }
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let response = self.route(request);
        with_cors(response)
    }

    fn route(&self, request: &HttpRequest) -> HttpResponse {
        if request.method == "OPTIONS" {
            return HttpResponse::new(204);
        }

        match (request.method.as_str(), request.route()) {
            ("POST", "/api/register") => self.api(request, |body: RegisterRequest| {
                self.users.register(&body)
            }),
            ("POST", "/api/login") => self.api(request, |body: LoginRequest| {
                self.users.login(&body.email, &body.password)
            }),
            ("POST", "/api/update-profile") => self.api(request, |body: UpdateProfileRequest| {
                self.users.update_profile(&body.user_id, &body.updates)
            }),
            ("POST", "/api/change-password") => self.api(request, |body: ChangePasswordRequest| {
                self.users
                    .change_password(&body.user_id, &body.old_password, &body.new_password)
            }),
            ("GET", path) => site::serve(&self.site_root, path),
            (method, path) => {
                tracing::debug!(method, path, "no route matched");
                HttpResponse::new(405).with_body("text/plain", "method not allowed")
            }
        }
    }

    fn api<B: for<'de> Deserialize<'de>>(
        &self,
        request: &HttpRequest,
        operation: impl FnOnce(B) -> AuthOutcome,
    ) -> HttpResponse {
        let body: B = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(%error, path = %request.path, "rejecting malformed api body");
                return json_response(
                    400,
                    &AuthOutcome {
                        success: false,
                        message: "Invalid request".to_owned(),
                        user: None,
                    },
                );
            }
        };
        json_response(200, &operation(body))
    }
}

fn json_response(status: u16, outcome: &AuthOutcome) -> HttpResponse {
    let body = serde_json::to_vec(outcome).unwrap_or_else(|_| {
        br#"{"success":false,"message":"Internal error"}"#.to_vec()
    });
    HttpResponse::new(status).with_body("application/json", body)
}

fn with_cors(response: HttpResponse) -> HttpResponse {
    response
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .with_header("Access-Control-Allow-Headers", "Content-Type")
}
