//! Edge-function deployment shape.
//!
//! Serverless hosts hand over one `http::Request` at a time and expect one
//! `http::Response` back, with no router or middleware stack of their own.
//! `EdgeApp::fetch` does the path dispatch, CORS decoration and panic
//! isolation itself and defers all optimize logic to `OptimizeService`.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode};
use bytes::Bytes;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::error;

use crate::config::Config;
use crate::cors;
use crate::errors::AppError;
use crate::llm_client::CompletionProvider;
use crate::optimize::{OptimizeService, OptimizeSettings};
use crate::routes::{diagnostics::diagnostic_body, panic_message};

#[derive(Clone)]
pub struct EdgeApp {
    optimizer: OptimizeService,
    base_path: String,
}

impl EdgeApp {
    pub fn new(optimizer: OptimizeService, base_path: impl Into<String>) -> Self {
        Self {
            optimizer,
            base_path: base_path.into(),
        }
    }

    pub fn from_config(config: &Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self::new(
            OptimizeService::new(provider, OptimizeSettings::from(config)),
            config.base_path.clone(),
        )
    }

    /// Entry point for the host. Never panics: a panic while serving is
    /// turned into the 500 envelope. Dropping the returned future aborts
    /// the request, including any outbound call in flight.
    pub async fn fetch(&self, request: Request<Bytes>) -> Response<Bytes> {
        let app = self.clone();
        let mut task = AbortOnDrop(tokio::spawn(async move { app.dispatch(request).await }));
        match (&mut task.0).await {
            Ok(response) => response,
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    panic_message(join_error.into_panic().as_ref())
                } else {
                    join_error.to_string()
                };
                error!("Edge request aborted: {message}");
                error_response(&AppError::Internal(anyhow::anyhow!(
                    "handler panicked: {message}"
                )))
            }
        }
    }

    async fn dispatch(&self, request: Request<Bytes>) -> Response<Bytes> {
        if request.method() == Method::OPTIONS {
            return with_cors(Response::new(Bytes::new()), StatusCode::NO_CONTENT);
        }

        let path = request.uri().path();

        if path == self.endpoint("optimize") {
            if request.method() != Method::POST {
                return text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            }
            return match self.optimizer.handle(request.body()).await {
                Ok(response) => json_response(StatusCode::OK, &response),
                Err(e) => error_response(&e),
            };
        }

        if path == self.endpoint("test") {
            if request.method() != Method::GET && request.method() != Method::HEAD {
                return text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            }
            return json_response(StatusCode::OK, &diagnostic_body());
        }

        text_response(StatusCode::NOT_FOUND, "Not Found")
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_path)
    }
}

/// Aborts the serving task when the caller stops waiting for it.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn with_cors(mut response: Response<Bytes>, status: StatusCode) -> Response<Bytes> {
    *response.status_mut() = status;
    cors::apply_headers(response.headers_mut());
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Bytes> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(Bytes::from(bytes));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    with_cors(response, status)
}

fn text_response(status: StatusCode, text: &'static str) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(text.as_bytes()));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    with_cors(response, status)
}

fn error_response(err: &AppError) -> Response<Bytes> {
    json_response(err.status(), &err.body())
}
