// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use bytes::Bytes;
use http::StatusCode;
use log::{debug, warn};
use objsign_core::{HttpSend, Result, SignableBody, Signer, SigningContextBuilder, SigningScheme};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound of a single backoff.
pub const MAX_BACKOFF: Duration = Duration::from_secs(u32::MAX as u64);

/// RetryPolicy decides when and how long to wait before resending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt, `0` disables retrying.
    pub max_retries: u32,
    /// Upper bound of the first backoff, doubled for every retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Server errors and throttling are worth another try.
    pub fn should_retry(&self, status: StatusCode) -> bool {
        status.as_u16() >= 500 || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Longest wait before retry number `attempt` (starting at `0`).
    ///
    /// Capped at [`MAX_BACKOFF`] so the jittered wait always fits a `Duration`.
    pub fn max_backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }

    /// Full jitter backoff: uniformly random in `[0, max_backoff(attempt))`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.max_backoff(attempt)
            .mul_f64(rand::thread_rng().gen::<f64>())
    }
}

/// Client signs and sends requests, retrying on server errors.
///
/// Every attempt is signed again, so retried requests never carry a stale
/// signing time.
#[derive(Debug)]
pub struct Client<S: SigningScheme> {
    signer: Signer<S>,
    http: Arc<dyn HttpSend>,
    retry: RetryPolicy,
}

impl<S: SigningScheme> Clone for Client<S> {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            http: self.http.clone(),
            retry: self.retry,
        }
    }
}

impl<S: SigningScheme> Client<S> {
    /// Create a new client with the default [`RetryPolicy`].
    pub fn new(signer: Signer<S>, http: impl HttpSend) -> Self {
        Self {
            signer,
            http: Arc::new(http),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the signer of this client.
    pub fn signer(&self) -> &Signer<S> {
        &self.signer
    }

    /// Sign and send `req`.
    ///
    /// `ctx` is built again for every attempt. Leave its datetime unset to
    /// sign each attempt with the current time.
    ///
    /// Responses are returned as they are, including error statuses: the last
    /// response is returned once retries are exhausted. Signing and transport
    /// failures are returned as errors right away.
    pub async fn send(
        &self,
        req: &http::Request<SignableBody>,
        ctx: &SigningContextBuilder,
    ) -> Result<http::Response<Bytes>> {
        let mut attempt = 0;
        loop {
            let signing_ctx = ctx.clone().build()?;
            let signed = self.signer.sign(req, &signing_ctx)?.into_http_bytes()?;

            let resp = self.http.http_send(signed).await?;
            let status = resp.status();
            if attempt >= self.retry.max_retries || !self.retry.should_retry(status) {
                debug!(
                    "{} {} got {status} after {} attempts",
                    req.method(),
                    req.uri(),
                    attempt + 1
                );
                return Ok(resp);
            }

            let backoff = self.retry.backoff(attempt);
            warn!(
                "{} {} got {status}, retrying in {backoff:?} ({}/{})",
                req.method(),
                req.uri(),
                attempt + 1,
                self.retry.max_retries
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use objsign_core::{Credential, Error, ErrorKind, SigningContext};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct PathScheme {
        signed: AtomicUsize,
    }

    impl SigningScheme for PathScheme {
        type Canonical = String;

        fn name(&self) -> &'static str {
            "path"
        }

        fn canonicalize(
            &self,
            req: &mut objsign_core::SigningRequest,
            _: &SigningContext,
        ) -> Result<String> {
            self.signed.fetch_add(1, Ordering::SeqCst);
            Ok(req.path.clone())
        }

        fn build_string_to_sign(&self, canonical: &String, _: &SigningContext) -> Result<String> {
            Ok(canonical.clone())
        }

        fn derive_key(
            &self,
            _: &String,
            ctx: &SigningContext,
            _: &dyn objsign_core::SigningKeyCache,
        ) -> Result<Vec<u8>> {
            Ok(ctx.credential().secret_access_key.as_bytes().to_vec())
        }

        fn compute_signature(&self, key: &[u8], string_to_sign: &str) -> Result<String> {
            objsign_core::hash::hex_hmac_sha256(key, string_to_sign.as_bytes())
        }

        fn format_signature_output(
            &self,
            req: &mut objsign_core::SigningRequest,
            _: &String,
            _: &SigningContext,
            signature: &str,
        ) -> Result<()> {
            req.header_insert(http::header::AUTHORIZATION, signature, true)
        }
    }

    /// Replies with the queued statuses, then with the last one forever.
    #[derive(Debug)]
    struct MockHttpSend {
        statuses: Mutex<VecDeque<u16>>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl MockHttpSend {
        fn new(statuses: &[u16]) -> (Self, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    statuses: Mutex::new(statuses.iter().copied().collect()),
                    seen: seen.clone(),
                },
                seen,
            )
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            let auth = req
                .headers()
                .get(http::header::AUTHORIZATION)
                .ok_or_else(|| Error::unexpected("request is not signed"))?;
            self.seen.lock().unwrap().push(auth.to_str()?.to_string());

            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front().unwrap()
            } else {
                *statuses.front().unwrap()
            };
            Ok(http::Response::builder()
                .status(status)
                .body(Bytes::from_static(b"body"))
                .unwrap())
        }
    }

    #[derive(Debug)]
    struct BrokenHttpSend;

    #[async_trait]
    impl HttpSend for BrokenHttpSend {
        async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Err(Error::unexpected("connection reset"))
        }
    }

    fn request() -> http::Request<SignableBody> {
        http::Request::get("https://example.com/key")
            .body(SignableBody::Empty)
            .unwrap()
    }

    fn ctx() -> SigningContextBuilder {
        SigningContext::builder().credential(Credential::new("ak", "sk"))
    }

    fn client(statuses: &[u16]) -> (Client<PathScheme>, Arc<Mutex<Vec<String>>>) {
        let _ = env_logger::builder().is_test(true).try_init();

        let (http, seen) = MockHttpSend::new(statuses);
        (Client::new(Signer::new(PathScheme::default()), http), seen)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let (client, seen) = client(&[503, 429, 200]);

        let resp = client.send(&request(), &ctx()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        let (client, seen) = client(&[404, 200]);

        let resp = client.send(&request(), &ctx()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_response_when_exhausted() {
        let (client, seen) = client(&[500]);
        let client = client.with_retry_policy(RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
        });

        let resp = client.send(&request(), &ctx()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_attempt_is_signed_again() {
        let (client, seen) = client(&[503, 503, 200]);

        client.send(&request(), &ctx()).await.unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(client.signer().scheme().signed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_error_is_returned() {
        let client = Client::new(Signer::new(PathScheme::default()), BrokenHttpSend);

        let err = client.send(&request(), &ctx()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn test_invalid_context_is_not_sent() {
        let (client, seen) = client(&[200]);

        let err = client
            .send(&request(), &SigningContext::builder())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 10);
        assert_eq!(policy.initial_backoff, Duration::from_millis(50));

        assert!(policy.should_retry(StatusCode::SERVICE_UNAVAILABLE));
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(!policy.should_retry(StatusCode::FORBIDDEN));
        assert!(!policy.should_retry(StatusCode::OK));

        assert_eq!(policy.max_backoff(0), Duration::from_millis(50));
        assert_eq!(policy.max_backoff(3), Duration::from_millis(400));
        for attempt in 0..10 {
            assert!(policy.backoff(attempt) <= policy.max_backoff(attempt));
        }
    }

    #[test]
    fn test_backoff_is_capped_for_many_retries() {
        let policy = RetryPolicy {
            max_retries: u32::MAX,
            initial_backoff: Duration::from_secs(1),
        };

        for attempt in [39, 64, 1000, u32::MAX] {
            assert_eq!(policy.max_backoff(attempt), MAX_BACKOFF);
            assert!(policy.backoff(attempt) <= MAX_BACKOFF);
        }
    }
}
