use crate::{client_utils::ApiResponse, InkPilotsError, InkPilotsResult};
use opentelemetry::trace::Status;
use reqwest::{Method, Url};
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct RequestSpan {
    span: Span,
    start_time: Instant,
    status: Option<u16>,
    request_id: Option<String>,
}

impl RequestSpan {
    pub fn new(method: &Method, route: &str, url: &Url) -> Self {
        let span = info_span!("inkpilots.request");
        span.set_attribute("http.request.method", method.to_string());
        span.set_attribute("url.template", route.to_string());
        if let Some(host) = url.host_str() {
            span.set_attribute("server.address", host.to_string());
        }

        Self {
            span,
            start_time: Instant::now(),
            status: None,
            request_id: None,
        }
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span.clone()).await
    }

    pub fn on_response<R>(&mut self, response: &ApiResponse<R>) {
        self.status = Some(response.status);
        self.request_id.clone_from(&response.request_id);
    }

    pub fn on_error(&mut self, error: &InkPilotsError) {
        let error_type = match error {
            InkPilotsError::Api(api_error) => {
                // status 0 means no response arrived
                if api_error.status != 0 {
                    self.status = Some(api_error.status);
                }
                self.request_id.clone_from(&api_error.request_id);
                api_error.code.as_str()
            }
            InkPilotsError::Transport(_) => "transport",
            InkPilotsError::InvalidResponse(_) => "invalid_response",
            InkPilotsError::InvalidInput(_) => "invalid_input",
            InkPilotsError::MissingApiKey => "missing_api_key",
        };
        self.span.set_attribute("error.type", error_type);
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    fn on_end(&mut self) {
        if let Some(status) = self.status {
            self.span
                .set_attribute("http.response.status_code", i64::from(status));
        }
        if let Some(request_id) = self.request_id.take() {
            self.span.set_attribute("inkpilots.request_id", request_id);
        }
        self.span.set_attribute(
            "http.client.request.duration",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for RequestSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run one API exchange inside an `inkpilots.request` span.
pub async fn trace_request<T, F, Fut>(
    method: &Method,
    route: &str,
    url: &Url,
    f: F,
) -> InkPilotsResult<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = InkPilotsResult<ApiResponse<T>>>,
{
    let mut span = RequestSpan::new(method, route, url);
    let result = span.instrument_future(f()).await;

    match result {
        Ok(response) => {
            span.on_response(&response);
            Ok(response.data)
        }
        Err(error) => {
            span.on_error(&error);
            Err(error)
        }
    }
}
