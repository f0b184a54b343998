use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;

use super::Transport;

type FailureFn = Box<dyn Fn() -> TransportError + Send + Sync>;

enum Reply {
    Body(String),
    Fail(FailureFn),
}

/// A mock transport for testing. Records every request body and answers
/// with a canned response body or a canned transport failure.
pub struct MockTransport {
    reply: Reply,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn replying(body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Body(body.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make_err: impl Fn() -> TransportError + Send + Sync + 'static) -> Self {
        Self {
            reply: Reply::Fail(Box::new(make_err)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }

    /// The most recent request, parsed back into JSON.
    pub fn last_request(&self) -> Option<serde_json::Value> {
        let requests = self.requests.lock().expect("mock lock poisoned");
        requests
            .last()
            .map(|body| serde_json::from_str(body).expect("recorded request must be JSON"))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: String) -> Result<String, TransportError> {
        self.requests.lock().expect("mock lock poisoned").push(body);
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Fail(make_err) => Err(make_err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requests_even_when_failing() {
        let transport = MockTransport::failing(|| TransportError::Status { status: 401 });
        let err = transport
            .send(r#"{"method":"getinfo","params":[]}"#.to_owned())
            .await
            .expect_err("must fail");
        assert!(matches!(err, TransportError::Status { status: 401 }));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            transport.last_request().expect("recorded")["method"],
            "getinfo"
        );
    }
}
