use crate::config::Config;
use crate::errors::{StockchatError, StockchatResult};
use crate::models::Product;
use chrono::{DateTime, Local};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Reply shown when the backend answers without a `response` field.
pub const FALLBACK_REPLY: &str =
    "Sorry, I didn't understand that. Could you please rephrase?";

const SESSION_ID_RANDOM_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// HTTP client for the inventory assistant backend. Owns the chat session id:
/// generated lazily on the first send, replaced by whatever id the backend
/// returns, cleared on `reset_session`. Constructed explicitly and injected
/// wherever it is needed; there is no global instance.
#[derive(Debug)]
pub struct ChatApi {
    transport: ChatTransport,
    session_id: Option<String>,
}

/// The stateless half of the client: everything a request needs and nothing
/// a request mutates. Cheap to clone (`reqwest::Client` is an `Arc`), so
/// callers clone one out of a shared `ChatApi` and run the HTTP call without
/// holding any lock. Only the held session id stays behind on `ChatApi`.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
}

/// A successful chat turn as seen by the session layer, with all backend
/// omissions already defaulted.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub products: Vec<Product>,
    pub session_id: String,
    pub timestamp: DateTime<Local>,
}

/// A chat reply as it came off the wire, before fallbacks are applied and
/// before session-id adoption; opaque outside this module.
#[derive(Debug, Default, Deserialize)]
pub struct RawReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    products: Option<Vec<Product>>,
    #[serde(default, rename = "sessionId")]
    session_id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl ChatApi {
    pub fn new(config: &Config) -> Self {
        Self::with_timeouts(
            &config.api_base_url,
            config.request_timeout(),
            config.health_timeout(),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        request_timeout: Duration,
        health_timeout: Duration,
    ) -> Self {
        Self {
            transport: ChatTransport {
                client: Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                request_timeout,
                health_timeout,
            },
            session_id: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn transport(&self) -> ChatTransport {
        self.transport.clone()
    }

    /// Resolves the `userId` for a send before the request goes out: a
    /// caller-supplied session id wins over the held one, and with neither a
    /// fresh id is generated. The resolved id is always held, so a
    /// `reset_session` between here and `adopt_reply` is observable as the
    /// hold going empty.
    pub fn prepare_session_id(&mut self, session_id: Option<&str>) -> String {
        let resolved = session_id
            .map(str::to_string)
            .or_else(|| self.session_id.clone())
            .unwrap_or_else(generate_session_id);
        self.session_id = Some(resolved.clone());
        resolved
    }

    /// Folds a completed request back into the client: the backend's session
    /// id (if any) replaces the held one, and the raw payload gets its
    /// documented fallbacks. An empty hold means the session was reset while
    /// the request was in flight, and the stale id must not be readopted.
    pub fn adopt_reply(&mut self, raw: RawReply, user_id: String) -> ChatReply {
        if self.session_id.is_some() {
            if let Some(id) = &raw.session_id {
                self.session_id = Some(id.clone());
            }
        }

        let timestamp = raw
            .timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Local))
            .unwrap_or_else(Local::now);

        ChatReply {
            response: raw.response.unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            products: raw.products.unwrap_or_default(),
            session_id: self.session_id.clone().unwrap_or(user_id),
            timestamp,
        }
    }

    /// One whole send against this client. Shared callers split this into
    /// `prepare_session_id` / `ChatTransport::post_message` / `adopt_reply`
    /// so the request itself runs outside any lock.
    pub async fn send_message(
        &mut self,
        message: &str,
        session_id: Option<&str>,
    ) -> StockchatResult<ChatReply> {
        let user_id = self.prepare_session_id(session_id);
        let raw = self.transport.post_message(message, &user_id).await?;
        Ok(self.adopt_reply(raw, user_id))
    }

    pub async fn check_health(&self) -> bool {
        self.transport.check_health().await
    }

    pub async fn fetch_inventory(&self) -> StockchatResult<Vec<Product>> {
        self.transport.fetch_inventory().await
    }

    pub fn reset_session(&mut self) {
        self.session_id = None;
    }
}

impl ChatTransport {
    /// Issues the chat POST. Pure transport: no session state is read or
    /// written here.
    pub async fn post_message(&self, message: &str, user_id: &str) -> StockchatResult<RawReply> {
        let body = json!({
            "userId": user_id,
            "message": message.trim(),
        });

        log::info!("POST /inventory (session {})", user_id);

        let response = self
            .client
            .post(format!("{}/inventory", self.base_url))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("chat request failed with HTTP {}", status);
            return Err(StockchatError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| StockchatError::Unknown(format!("Failed to parse reply: {}", e)))
    }

    /// Probes the backend health endpoint. Degrades to `false` on any
    /// failure; never returns an error.
    pub async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("health check failed: {}", e);
                false
            }
        }
    }

    /// Fetches the full product list for the dashboard. The backend returns
    /// a bare JSON array, not an envelope.
    pub async fn fetch_inventory(&self) -> StockchatResult<Vec<Product>> {
        let response = self
            .client
            .get(format!("{}/inventory", self.base_url))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockchatError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| StockchatError::Unknown(format!("Failed to parse inventory: {}", e)))
    }
}

/// `session_<epoch-millis>_<random base-36>`. Uniqueness is probabilistic,
/// matching what the backend expects for correlation ids.
pub fn generate_session_id() -> String {
    let millis = Local::now().timestamp_millis();
    let mut rng = rand::rng();
    let random: String = (0..SESSION_ID_RANDOM_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{}_{}", millis, random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_api(base_url: &str) -> ChatApi {
        ChatApi::with_timeouts(
            base_url,
            Duration::from_millis(500),
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_generate_session_id_format() {
        let id = generate_session_id();
        assert!(id.starts_with("session_"));
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), SESSION_ID_RANDOM_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_send_message_adopts_server_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "We have 3 laptops in stock",
                "sessionId": "server-session-42",
            })))
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        let reply = api.send_message("any laptops?", None).await.unwrap();

        assert_eq!(reply.response, "We have 3 laptops in stock");
        assert!(reply.products.is_empty());
        assert_eq!(api.session_id(), Some("server-session-42"));
        assert_eq!(reply.session_id, "server-session-42");
    }

    #[tokio::test]
    async fn test_send_message_generates_session_id_lazily() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "ok"})),
            )
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        assert_eq!(api.session_id(), None);
        api.send_message("hello", None).await.unwrap();
        let held = api.session_id().unwrap().to_string();
        assert!(held.starts_with("session_"));

        // The held id survives a second send that the server does not answer
        // with its own id.
        api.send_message("again", None).await.unwrap();
        assert_eq!(api.session_id(), Some(held.as_str()));
    }

    #[tokio::test]
    async fn test_send_message_trims_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .and(body_partial_json(serde_json::json!({"message": "hello"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "hi"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        api.send_message("  hello  ", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_message_falls_back_when_response_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        let reply = api.send_message("hm", None).await.unwrap();
        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_send_message_maps_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        let err = api.send_message("hello", None).await.unwrap_err();
        assert!(matches!(err, StockchatError::Http { status: 503 }));
    }

    #[tokio::test]
    async fn test_send_message_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "slow"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        let err = api.send_message("hello", None).await.unwrap_err();
        assert!(matches!(err, StockchatError::Timeout));
    }

    #[tokio::test]
    async fn test_send_message_network_failure() {
        // Nothing listens here.
        let mut api = test_api("http://127.0.0.1:9");
        let err = api.send_message("hello", None).await.unwrap_err();
        assert!(matches!(
            err,
            StockchatError::NetworkUnavailable | StockchatError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_check_health_true_on_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(test_api(&server.uri()).check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_false_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!test_api(&server.uri()).check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_false_when_unreachable() {
        assert!(!test_api("http://127.0.0.1:9").check_health().await);
    }

    #[tokio::test]
    async fn test_reset_session_clears_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "ok"})),
            )
            .mount(&server)
            .await;

        let mut api = test_api(&server.uri());
        api.send_message("hello", None).await.unwrap();
        assert!(api.session_id().is_some());
        api.reset_session();
        assert_eq!(api.session_id(), None);
    }

    #[test]
    fn test_adopt_skips_ids_from_before_a_reset() {
        let mut api = test_api("http://127.0.0.1:9");
        let user_id = api.prepare_session_id(None);
        assert_eq!(api.session_id(), Some(user_id.as_str()));

        // The session is reset while the request is in flight; the reply's
        // id belongs to the old conversation and must not be readopted.
        api.reset_session();
        let raw: RawReply = serde_json::from_value(serde_json::json!({
            "response": "late",
            "sessionId": "stale-7",
        }))
        .unwrap();
        api.adopt_reply(raw, user_id);
        assert_eq!(api.session_id(), None);
    }

    #[tokio::test]
    async fn test_fetch_inventory_parses_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "X1 Laptop", "brand": "Lenovo", "stock": 5, "category": "Laptops"},
                {"name": "M2 Mouse", "brand": "Logitech", "stock": 0, "category": "Accessories"},
            ])))
            .mount(&server)
            .await;

        let products = test_api(&server.uri()).fetch_inventory().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].quantity, Some(5));
        assert_eq!(products[1].category.as_deref(), Some("Accessories"));
    }

    #[tokio::test]
    async fn test_fetch_inventory_maps_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = test_api(&server.uri()).fetch_inventory().await.unwrap_err();
        assert!(matches!(err, StockchatError::Http { status: 404 }));
    }
}
