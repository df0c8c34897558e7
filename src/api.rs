//! HTTP service wrappers for the LumiBank backend

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::RemoteEnvelope;

/// Backend calls made by the registration and password-reset pages
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Submit the accumulated registration fields together with the PIN
    async fn register(&self, payload: Map<String, Value>) -> Result<RemoteEnvelope, ApiError>;

    /// Ask the backend to email a one-time code
    async fn send_otp(&self, email: &str) -> Result<RemoteEnvelope, ApiError>;

    /// Submit the reset-flow fields together with the new password
    async fn change_password(&self, payload: Map<String, Value>)
        -> Result<RemoteEnvelope, ApiError>;
}

/// reqwest-backed [`AuthApi`]
pub struct HttpAuthApi {
    client: Client,
    register_url: Url,
    send_otp_url: Url,
    change_password_url: Url,
}

/// Join `path` onto the configured base and parse the result
fn endpoint_url(config: &Config, path: &str) -> Result<Url, ApiError> {
    let url = config.endpoint(path);
    Url::parse(&url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
}

impl HttpAuthApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(&config.http.user_agent);
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            register_url: endpoint_url(config, &config.api.register_path)?,
            send_otp_url: endpoint_url(config, &config.api.send_otp_path)?,
            change_password_url: endpoint_url(config, &config.api.change_password_path)?,
        })
    }

    async fn post_envelope<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<RemoteEnvelope, ApiError> {
        debug!("POST {}", url);

        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let envelope: RemoteEnvelope = serde_json::from_str(&text)?;
            info!("POST {} -> {} (success={})", url, status, envelope.success);
            return Ok(envelope);
        }

        warn!("POST {} -> {}", url, status);

        // Error statuses that still carry the envelope are explicit failures
        if let Ok(mut envelope) = serde_json::from_str::<RemoteEnvelope>(&text) {
            envelope.success = false;
            return Ok(envelope);
        }

        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "An error occurred".to_string());

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, payload: Map<String, Value>) -> Result<RemoteEnvelope, ApiError> {
        info!("Submitting registration ({} fields)", payload.len());
        self.post_envelope(&self.register_url, &payload).await
    }

    async fn send_otp(&self, email: &str) -> Result<RemoteEnvelope, ApiError> {
        info!("Requesting password reset code for {}", email);
        self.post_envelope(&self.send_otp_url, &json!({ "email": email })).await
    }

    async fn change_password(
        &self,
        payload: Map<String, Value>,
    ) -> Result<RemoteEnvelope, ApiError> {
        info!("Submitting new password");
        self.post_envelope(&self.change_password_url, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config_for(server: &Server) -> Config {
        let mut config = Config::default();
        config.api.base_url = server.url();
        config
    }

    #[tokio::test]
    async fn test_send_otp_posts_email() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/forget-password/send")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "email": "budi@lumibank.id" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"message":"OTP terkirim"}"#)
            .create_async()
            .await;

        let api = HttpAuthApi::new(&config_for(&server)).unwrap();
        let envelope = api.send_otp("budi@lumibank.id").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("OTP terkirim"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_sends_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/register")
            .match_body(Matcher::Json(json!({ "name": "Budi", "pin": "1234" })))
            .with_status(201)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let api = HttpAuthApi::new(&config_for(&server)).unwrap();
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!("Budi"));
        payload.insert("pin".to_string(), json!("1234"));

        let envelope = api.register(payload).await.unwrap();
        assert_eq!(envelope, RemoteEnvelope::ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_with_envelope_is_explicit_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/forget-password/change-password")
            .with_status(400)
            .with_body(r#"{"success":true,"message":"OTP tidak valid"}"#)
            .create_async()
            .await;

        let api = HttpAuthApi::new(&config_for(&server)).unwrap();
        let envelope = api.change_password(Map::new()).await.unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("OTP tidak valid"));
    }

    #[tokio::test]
    async fn test_error_status_without_envelope() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/forget-password/send")
            .with_status(404)
            .with_body(r#"{"message":"Email tidak terdaftar"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/auth/register")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let api = HttpAuthApi::new(&config_for(&server)).unwrap();

        match api.send_otp("budi@lumibank.id").await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Email tidak terdaftar");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        match api.register(Map::new()).await {
            Err(err @ ApiError::Status { .. }) => {
                assert_eq!(err.user_message(), "An error occurred");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_status_with_garbage_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/register")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let api = HttpAuthApi::new(&config_for(&server)).unwrap();
        assert!(matches!(api.register(Map::new()).await, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let mut config = Config::default();
        config.api.base_url = "http://exa mple.com".to_string();
        assert!(matches!(HttpAuthApi::new(&config), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_every_endpoint_is_parsed() {
        let config = Config::default();
        let api = HttpAuthApi::new(&config).unwrap();
        assert_eq!(api.register_url.path(), "/api/auth/register");
        assert_eq!(api.send_otp_url.path(), "/api/forget-password/send");
        assert_eq!(api.change_password_url.path(), "/api/forget-password/change-password");

        let mut config = Config::default();
        config.api.base_url = "http://localhost:99999".to_string();
        for path in [
            &config.api.register_path,
            &config.api.send_otp_path,
            &config.api.change_password_path,
        ] {
            match endpoint_url(&config, path) {
                Err(ApiError::InvalidUrl(message)) => assert!(message.contains(path.as_str())),
                other => panic!("expected an invalid url for {}, got {:?}", path, other),
            }
        }
    }
}
