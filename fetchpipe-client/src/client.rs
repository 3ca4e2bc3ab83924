//! The HTTP client.
//!
//! [`HttpClient`] merges per-call config over its defaults and runs the
//! request interceptors, the dispatcher and the response interceptors as
//! one sequential chain.

use std::sync::Arc;

use serde::Serialize;

use fetchpipe_core::{PassportStore, RequestPack};

use crate::ClientError;
use crate::builder::ClientBuilder;
use crate::config::{Method, RequestConfig, merge_config};
use crate::dispatch::dispatch;
use crate::interceptor::Interceptors;
use crate::payload::Payload;
use crate::response::ResponseEnvelope;
use crate::transport::Transport;

#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

/// HTTP client with an interceptor pipeline.
///
/// Clones share the transport, the defaults and the interceptor
/// registries.
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::{HttpClient, Interceptor, RequestConfig};
///
/// let client = HttpClient::builder()
///     .base_url("http://localhost:3000")
///     .build()?;
///
/// client.interceptors().request.use_interceptor(Interceptor::new(
///     |config: RequestConfig| async move { config.try_header("x-app", "demo") },
/// ));
///
/// let response = client.get("/users/1").await?;
/// println!("{} {:?}", response.status, response.data);
/// ```
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    defaults: Arc<RequestConfig>,
    interceptors: Arc<Interceptors>,
    passport_store: Arc<dyn PassportStore>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("defaults", &self.defaults)
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(
        transport: Arc<dyn Transport>,
        defaults: RequestConfig,
        passport_store: Arc<dyn PassportStore>,
    ) -> Self {
        Self {
            transport,
            defaults: Arc::new(defaults),
            interceptors: Arc::new(Interceptors::default()),
            passport_store,
        }
    }

    /// The defaults every call is merged over.
    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// The request and response interceptor registries.
    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    /// Run one request through the pipeline.
    ///
    /// `config` is merged over the client defaults. The interceptors that
    /// are registered when this call starts are the ones that run.
    ///
    /// Each stage receives the outcome of the one before: a value goes to
    /// the fulfilled handler, an error to the rejected handler. Dispatch
    /// only runs when the request interceptors produced a config.
    pub async fn request(&self, config: RequestConfig) -> Result<ResponseEnvelope, ClientError> {
        let merged = merge_config(&self.defaults, &config);

        #[cfg(feature = "tracing")]
        let span = info_span!(
            "http.request",
            http.method = %merged.method.unwrap_or_default(),
            http.url = %merged.resolved_url(),
            otel.kind = "client",
        );

        let chain = self.run_chain(merged);

        #[cfg(feature = "tracing")]
        let chain = chain.instrument(span);

        chain.await
    }

    async fn run_chain(&self, config: RequestConfig) -> Result<ResponseEnvelope, ClientError> {
        let request_stage = self.interceptors.request.snapshot();
        let response_stage = self.interceptors.response.snapshot();

        let mut state = Ok(config);
        for interceptor in &request_stage {
            state = interceptor.run(state).await;
        }

        let mut state = match state {
            Ok(config) => dispatch(self.transport.as_ref(), config).await,
            Err(err) => Err(err),
        };

        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &state {
                tracing::debug!(error = %err, "dispatch stage failed");
            }
        }

        for interceptor in &response_stage {
            state = interceptor.run(state).await;
        }
        state
    }

    /// `GET url`.
    pub async fn get(&self, url: impl Into<String>) -> Result<ResponseEnvelope, ClientError> {
        self.request(RequestConfig::new().url(url).method(Method::Get)).await
    }

    /// `POST url` with `data` as the body.
    pub async fn post(
        &self,
        url: impl Into<String>,
        data: impl Into<Payload>,
    ) -> Result<ResponseEnvelope, ClientError> {
        self.request(RequestConfig::new().url(url).method(Method::Post).data(data))
            .await
    }

    /// Wrap `resource` in a [`RequestPack`] and `POST` it to `url`.
    ///
    /// The passport comes from the client's passport store.
    pub async fn send_pack<T>(
        &self,
        url: impl Into<String>,
        resource: Option<&T>,
    ) -> Result<ResponseEnvelope, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let pack = RequestPack::from_store(self.passport_store.as_ref(), resource)?;
        self.post(url, Payload::Json(pack.to_value()?)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResponseType, library_defaults};
    use crate::interceptor::Interceptor;
    use crate::transport::FnTransport;
    use axum::Router;
    use axum::routing::{get, post};
    use bytes::Bytes;
    use fetchpipe_core::MemoryStore;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Log = Arc<Mutex<Vec<String>>>;

    fn client_with(transport: impl Transport) -> HttpClient {
        ClientBuilder::with_defaults(library_defaults())
            .transport(transport)
            .build()
            .unwrap()
    }

    fn json_transport(log: Log, body: &'static str) -> impl Transport {
        FnTransport::new(move |request: http::Request<Bytes>| {
            log.lock().unwrap().push(format!("dispatch {}", request.uri()));
            async move { Ok(http::Response::new(Bytes::from_static(body.as_bytes()))) }
        })
    }

    fn log_request(log: &Log, tag: &'static str) -> Interceptor<RequestConfig> {
        let log = log.clone();
        Interceptor::new(move |config: RequestConfig| {
            log.lock().unwrap().push(tag.to_string());
            async move { Ok(config) }
        })
    }

    fn log_response(log: &Log, tag: &'static str) -> Interceptor<ResponseEnvelope> {
        let log = log.clone();
        Interceptor::new(move |response: ResponseEnvelope| {
            log.lock().unwrap().push(tag.to_string());
            async move { Ok(response) }
        })
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_stage_order() {
        let log: Log = Arc::default();
        let client = client_with(json_transport(log.clone(), r#"{"ok":true}"#));

        client.interceptors().request.use_interceptor(log_request(&log, "r1"));
        client.interceptors().request.use_interceptor(log_request(&log, "r2"));
        client.interceptors().response.use_interceptor(log_response(&log, "s1"));
        client.interceptors().response.use_interceptor(log_response(&log, "s2"));

        let response = client.get("http://svc/x").await.unwrap();

        assert_eq!(response.data, Payload::Json(json!({"ok": true})));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["r1", "r2", "dispatch http://svc/x", "s1", "s2"]
        );
    }

    #[tokio::test]
    async fn test_request_interceptor_modifies_config() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let client = client_with(FnTransport::new(move |request: http::Request<Bytes>| {
            *recorder.lock().unwrap() = request.headers().get("x-auth").cloned();
            async { Ok(http::Response::new(Bytes::from_static(b"{}"))) }
        }));

        client.interceptors().request.use_interceptor(Interceptor::new(
            |config: RequestConfig| async move { config.try_header("x-auth", "token") },
        ));

        client.get("http://svc/x").await.unwrap();
        assert_eq!(seen.lock().unwrap().as_ref().unwrap(), "token");
    }

    #[tokio::test]
    async fn test_transport_failure_reaches_rejected_handlers_only() {
        let fulfilled_calls = Arc::new(AtomicUsize::new(0));
        let client = client_with(FnTransport::new(|_| async {
            Err(ClientError::Transport("connection refused".into()))
        }));

        let calls = fulfilled_calls.clone();
        client.interceptors().response.use_interceptor(Interceptor::new(
            move |response: ResponseEnvelope| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(response) }
            },
        ));

        let err = client.get("http://svc/x").await.unwrap_err();
        assert_eq!(err, ClientError::Transport("connection refused".into()));
        assert_eq!(fulfilled_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_request_interceptor_skips_dispatch() {
        let log: Log = Arc::default();
        let client = client_with(json_transport(log.clone(), "{}"));

        client.interceptors().request.use_interceptor(Interceptor::new(
            |_config: RequestConfig| async move { Err(ClientError::rejected("not signed in")) },
        ));

        let err = client.get("http://svc/x").await.unwrap_err();
        assert_eq!(err, ClientError::rejected("not signed in"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fulfilled_error_goes_to_next_rejected_handler() {
        let log: Log = Arc::default();
        let client = client_with(json_transport(log.clone(), "{}"));

        client.interceptors().request.use_interceptor(Interceptor::new(
            |_config: RequestConfig| async move { Err(ClientError::rejected("first")) },
        ));
        // Recovers with a fresh config, so dispatch runs
        client.interceptors().request.use_interceptor(Interceptor::rejected(
            |_err: ClientError| async move {
                Ok(library_defaults().url("http://svc/recovered"))
            },
        ));

        client.get("http://svc/x").await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["dispatch http://svc/recovered"]);
    }

    #[tokio::test]
    async fn test_response_rejected_handler_recovers() {
        let client = client_with(FnTransport::new(|_| async {
            Err(ClientError::Transport("down".into()))
        }));

        client.interceptors().response.use_interceptor(Interceptor::rejected(
            |err: ClientError| async move {
                let mut fallback = crate::response::tests::envelope(503, Payload::Empty);
                fallback.status_text = err.to_string();
                Ok(fallback)
            },
        ));

        let response = client.get("http://svc/x").await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "transport error: down");
    }

    #[tokio::test]
    async fn test_ejected_interceptor_does_not_run() {
        let log: Log = Arc::default();
        let client = client_with(json_transport(log.clone(), "{}"));

        let handle = client.interceptors().request.use_interceptor(log_request(&log, "r1"));
        client.interceptors().request.use_interceptor(log_request(&log, "r2"));
        client.interceptors().request.eject(handle);

        client.get("http://svc/x").await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["r2", "dispatch http://svc/x"]);
    }

    #[tokio::test]
    async fn test_registration_mid_flight_affects_later_calls_only() {
        let log: Log = Arc::default();
        let client = client_with(json_transport(log.clone(), "{}"));

        let registrar = client.clone();
        let late_log = log.clone();
        client.interceptors().request.use_interceptor(Interceptor::new(
            move |config: RequestConfig| {
                registrar
                    .interceptors()
                    .response
                    .use_interceptor(log_response(&late_log, "late"));
                async move { Ok(config) }
            },
        ));

        client.get("http://svc/1").await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["dispatch http://svc/1"]);

        log.lock().unwrap().clear();
        client.get("http://svc/2").await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["dispatch http://svc/2", "late"]);
    }

    #[tokio::test]
    async fn test_defaults_are_merged_per_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let transport = FnTransport::new(move |request: http::Request<Bytes>| {
            recorder.lock().unwrap().push(request.uri().to_string());
            async { Ok(http::Response::new(Bytes::from_static(b"{}"))) }
        });
        let client = ClientBuilder::with_defaults(library_defaults())
            .base_url("http://svc/api")
            .transport(transport)
            .build()
            .unwrap();

        client.get("/a").await.unwrap();
        client
            .request(RequestConfig::new().url("/b").base_url("http://other"))
            .await
            .unwrap();
        client.get("/c").await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["http://svc/api/a", "http://other/b", "http://svc/api/c"]
        );
        assert_eq!(client.defaults().base_url.as_deref(), Some("http://svc/api"));
    }

    #[tokio::test]
    async fn test_end_to_end_against_axum() {
        let app = Router::new()
            .route("/hello", get(|| async { axum::Json(json!({"x": 1})) }))
            .route(
                "/echo",
                post(|axum::Json(body): axum::Json<Value>| async move { axum::Json(body) }),
            )
            .route("/fail", get(|| async { (http::StatusCode::INTERNAL_SERVER_ERROR, "{}") }));
        let base = serve(app).await;

        let client = ClientBuilder::with_defaults(library_defaults())
            .base_url(base)
            .try_header("content-type", "application/json")
            .unwrap()
            .build()
            .unwrap();

        let response = client.get("/hello").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.json::<Value>().unwrap(), json!({"x": 1}));

        let response = client.post("/echo", json!({"n": 5})).await.unwrap();
        assert_eq!(response.data, Payload::Json(json!({"n": 5})));

        let response = client.get("/fail").await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.data, Payload::Json(json!({})));

        let response = client
            .request(RequestConfig::new().url("/hello").response_type(ResponseType::Text))
            .await
            .unwrap();
        assert_eq!(response.data, Payload::from(r#"{"x":1}"#));
    }

    #[tokio::test]
    async fn test_send_pack_wire_shape() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let transport = FnTransport::new(move |request: http::Request<Bytes>| {
            *recorder.lock().unwrap() = Some(request.into_body());
            async { Ok(http::Response::new(Bytes::from_static(b"{}"))) }
        });
        let client = ClientBuilder::with_defaults(library_defaults())
            .transport(transport)
            .passport_store(MemoryStore::with_passport("tok-1"))
            .build()
            .unwrap();

        client.send_pack("http://svc/rpc", Some(&json!({"id": 7}))).await.unwrap();

        let body = seen.lock().unwrap().take().unwrap();
        let wire: Value = serde_json::from_slice(&body).unwrap();
        let object = wire.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(wire["passport"], "tok-1");
        assert_eq!(wire["resource"], r#"{"id":7}"#);
        assert_eq!(wire["sign"], "");
        assert_eq!(wire["other"], Value::Null);
        assert!(wire["session"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn test_send_pack_without_passport_or_resource() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let transport = FnTransport::new(move |request: http::Request<Bytes>| {
            *recorder.lock().unwrap() = Some(request.into_body());
            async { Ok(http::Response::new(Bytes::from_static(b"{}"))) }
        });
        let client = client_with(transport);

        client.send_pack::<Value>("http://svc/rpc", None).await.unwrap();

        let body = seen.lock().unwrap().take().unwrap();
        let wire: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(wire["passport"], Value::Null);
        assert_eq!(wire["resource"], "");
    }
}
