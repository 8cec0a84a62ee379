//! Client code for mailodds.
//!
//! This crate provides the validation API client, the allow/block decision
//! engine, form integrations, and the batch and scheduled validation runners
//! shared by the server.

pub mod api;
pub mod bulk;
pub mod decision;
pub mod forms;
pub mod schedule;

pub use api::{
    ApiRequest, ApiResponse, ClientConfig, ClientError, HttpTransport, Transport, ValidateOptions, ValidationClient,
    sanitize_batch, sanitize_email,
};
pub use bulk::{BulkRunner, BulkSummary, FailedPage, PageReport};
pub use decision::{BlockReason, Decision, EmailGuard, decide, decide_result};
pub use forms::{Candidate, FormAdapter, FormGate};
pub use schedule::ScheduledValidationJob;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use mailodds_core::{CacheDb, StatsStore};

    use crate::api::{ApiRequest, ApiResponse, ClientConfig, ClientError, Transport, ValidationClient};

    #[derive(Default)]
    struct StubState {
        requests: Vec<ApiRequest>,
        replies: VecDeque<Result<ApiResponse, ClientError>>,
    }

    /// Records requests and answers from a queue of canned replies.
    #[derive(Clone, Default)]
    pub struct StubTransport {
        state: Arc<Mutex<StubState>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, status: u16, body: serde_json::Value) {
            let body = Bytes::from(serde_json::to_vec(&body).unwrap());
            self.state.lock().unwrap().replies.push_back(Ok(ApiResponse { status, body }));
        }

        pub fn fail(&self, err: ClientError) {
            self.state.lock().unwrap().replies.push_back(Err(err));
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn post(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            state
                .replies
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Network("no stubbed reply".to_string())))
        }
    }

    /// Client over `transport` backed by a fresh in-memory database.
    pub async fn client_with(transport: &StubTransport, api_key: &str) -> (ValidationClient, CacheDb) {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = ClientConfig { api_key: api_key.to_string(), ..Default::default() };
        let client = ValidationClient::new(
            config,
            Arc::new(transport.clone()),
            Arc::new(db.clone()),
            StatsStore::new(Arc::new(db.clone())),
        );
        (client, db)
    }

    pub fn valid_body(email: &str) -> serde_json::Value {
        serde_json::json!({
            "email": email,
            "status": "valid",
            "action": "accept",
            "free_provider": false,
            "disposable": false,
            "role_account": false,
            "mx_found": true,
            "depth": "enhanced",
            "processed_at": "2026-10-16T08:30:00Z"
        })
    }
}
