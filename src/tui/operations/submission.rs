//! Runs remote calls off the UI loop and hands results back to it

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::AuthApi;
use crate::errors::ApiError;
use crate::models::{RemoteEnvelope, Route};

/// Backend call a page wants made
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Register(Map<String, Value>),
    SendOtp { email: String },
    ChangePassword(Map<String, Value>),
}

impl ApiCall {
    pub async fn execute(self, api: &dyn AuthApi) -> Result<RemoteEnvelope, ApiError> {
        match self {
            ApiCall::Register(payload) => api.register(payload).await,
            ApiCall::SendOtp { email } => api.send_otp(&email).await,
            ApiCall::ChangePassword(payload) => api.change_password(payload).await,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ApiCall::Register(_) => "register",
            ApiCall::SendOtp { .. } => "send-otp",
            ApiCall::ChangePassword(_) => "change-password",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub request_id: Uuid,
    pub call: ApiCall,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub request_id: Uuid,
    pub result: Result<RemoteEnvelope, ApiError>,
}

struct InFlight {
    request_id: Uuid,
    route: Route,
    handle: JoinHandle<()>,
}

/// At most one request in flight, owned by the route that started it
pub struct SubmissionRunner {
    api: Arc<dyn AuthApi>,
    tx: UnboundedSender<SubmitOutcome>,
    rx: UnboundedReceiver<SubmitOutcome>,
    in_flight: Option<InFlight>,
}

impl SubmissionRunner {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            tx,
            rx,
            in_flight: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start `request` for `route`; refused while another request is running
    pub fn spawn(&mut self, route: Route, request: SubmitRequest) -> bool {
        if let Some(current) = &self.in_flight {
            warn!(
                "Ignoring {} request {}: {} is still in flight",
                request.call.name(),
                request.request_id,
                current.request_id
            );
            return false;
        }

        info!(
            "Starting {} request {} for {}",
            request.call.name(),
            request.request_id,
            route.path()
        );

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let request_id = request.request_id;
        let handle = tokio::spawn(async move {
            let result = request.call.execute(api.as_ref()).await;
            // receiver gone means the app is shutting down
            let _ = tx.send(SubmitOutcome { request_id, result });
        });

        self.in_flight = Some(InFlight {
            request_id,
            route,
            handle,
        });
        true
    }

    /// Abort the request in flight, if any
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            info!(
                "Cancelling request {} for {}",
                in_flight.request_id,
                in_flight.route.path()
            );
            in_flight.handle.abort();
        }
    }

    fn accept(&mut self, outcome: SubmitOutcome) -> Option<(Route, SubmitOutcome)> {
        match &self.in_flight {
            Some(current) if current.request_id == outcome.request_id => {
                let route = current.route;
                self.in_flight = None;
                Some((route, outcome))
            }
            _ => {
                debug!("Discarding stale result for request {}", outcome.request_id);
                None
            }
        }
    }

    /// Next finished request without blocking
    pub fn try_recv(&mut self) -> Option<(Route, SubmitOutcome)> {
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }

    /// Wait for the request in flight to finish
    pub async fn recv(&mut self) -> Option<(Route, SubmitOutcome)> {
        while self.in_flight.is_some() {
            let outcome = self.rx.recv().await?;
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// In-process [`AuthApi`] that records calls and replies with a fixed envelope
    pub(crate) struct FakeApi {
        pub reply: Option<RemoteEnvelope>,
        pub calls: Mutex<Vec<ApiCall>>,
        pub gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        pub fn replying(envelope: RemoteEnvelope) -> Self {
            Self {
                reply: Some(envelope),
                calls: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        pub fn gated(envelope: RemoteEnvelope, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::replying(envelope)
            }
        }

        async fn answer(&self, call: ApiCall) -> Result<RemoteEnvelope, ApiError> {
            self.calls.lock().unwrap().push(call);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.reply.clone() {
                Some(envelope) => Ok(envelope),
                None => Err(ApiError::Status {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeApi {
        async fn register(&self, payload: Map<String, Value>) -> Result<RemoteEnvelope, ApiError> {
            self.answer(ApiCall::Register(payload)).await
        }

        async fn send_otp(&self, email: &str) -> Result<RemoteEnvelope, ApiError> {
            self.answer(ApiCall::SendOtp { email: email.to_string() }).await
        }

        async fn change_password(
            &self,
            payload: Map<String, Value>,
        ) -> Result<RemoteEnvelope, ApiError> {
            self.answer(ApiCall::ChangePassword(payload)).await
        }
    }

    fn send_otp_request() -> SubmitRequest {
        SubmitRequest {
            request_id: Uuid::new_v4(),
            call: ApiCall::SendOtp {
                email: "budi@lumibank.id".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_runner_delivers_outcome_to_route() {
        let api = Arc::new(FakeApi::replying(RemoteEnvelope::ok()));
        let mut runner = SubmissionRunner::new(api.clone());
        let request = send_otp_request();
        let id = request.request_id;

        assert!(runner.spawn(Route::ForgotPassword, request));
        let (route, outcome) = runner.recv().await.unwrap();

        assert_eq!(route, Route::ForgotPassword);
        assert_eq!(outcome.request_id, id);
        assert_eq!(outcome.result.unwrap(), RemoteEnvelope::ok());
        assert!(!runner.is_in_flight());
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_runner_refuses_second_request_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::gated(RemoteEnvelope::ok(), gate.clone()));
        let mut runner = SubmissionRunner::new(api.clone());

        assert!(runner.spawn(Route::ForgotPassword, send_otp_request()));
        assert!(!runner.spawn(Route::ForgotPassword, send_otp_request()));

        gate.notify_one();
        assert!(runner.recv().await.is_some());
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_request_never_reports() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::gated(RemoteEnvelope::ok(), gate.clone()));
        let mut runner = SubmissionRunner::new(api);

        assert!(runner.spawn(Route::NewPassword, send_otp_request()));
        tokio::task::yield_now().await;
        runner.cancel();
        gate.notify_one();
        tokio::task::yield_now().await;

        assert!(!runner.is_in_flight());
        assert!(runner.try_recv().is_none());
        assert!(runner.recv().await.is_none());
    }
}
