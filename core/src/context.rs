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

use crate::time::{now, DateTime};
use crate::utils::{redact_secret, Redact};
use crate::{Error, Result};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Credential that holds the access key pair and an optional session token.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session (security) token issued by STS.
    pub session_token: Option<String>,
}

impl Credential {
    /// Create a new credential from an access key pair.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: None,
        }
    }

    /// Attach a session token.
    pub fn with_session_token(mut self, token: &str) -> Self {
        self.session_token = Some(token.to_string());
        self
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query, the signature stays valid for the given duration.
    Query(Duration),
}

/// SigningContext carries everything a scheme needs besides the request.
///
/// It's immutable once built and should be constructed fresh for every
/// request, the only way to get one is [`SigningContextBuilder::build`].
#[derive(Clone)]
pub struct SigningContext {
    credential: Credential,
    service: String,
    region: String,
    datetime: DateTime,
    method: SigningMethod,
    all_headers: bool,
    single_encode: bool,
    append_session_token: bool,
}

impl Debug for SigningContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("credential", &self.credential)
            .field("service", &self.service)
            .field("region", &self.region)
            .field("datetime", &self.datetime)
            .field("method", &self.method)
            .field("all_headers", &self.all_headers)
            .field("single_encode", &self.single_encode)
            .field("append_session_token", &self.append_session_token)
            .finish()
    }
}

impl SigningContext {
    /// Start building a new signing context.
    pub fn builder() -> SigningContextBuilder {
        SigningContextBuilder::default()
    }

    /// Credential used to sign.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Service name, empty if the scheme should infer it.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region name, empty if the scheme should infer it.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Signing time.
    pub fn datetime(&self) -> DateTime {
        self.datetime
    }

    /// Where the signature goes.
    pub fn method(&self) -> SigningMethod {
        self.method
    }

    /// Returns true if the signature goes into the query string.
    pub fn is_query(&self) -> bool {
        matches!(self.method, SigningMethod::Query(_))
    }

    /// Sign every header instead of skipping the unsignable ones.
    pub fn all_headers(&self) -> bool {
        self.all_headers
    }

    /// Encode the path only once (non-S3 SigV4 services only).
    pub fn single_encode(&self) -> bool {
        self.single_encode
    }

    /// Append the session token after signing instead of signing it.
    pub fn append_session_token(&self) -> bool {
        self.append_session_token
    }

    /// Mask the session token wherever it appears in `text`.
    ///
    /// The token is signed like any other header or query value, so anything
    /// derived from the request must pass through here before it is logged.
    pub fn redact(&self, text: &str) -> String {
        match &self.credential.session_token {
            Some(token) => redact_secret(text, token),
            None => text.to_string(),
        }
    }
}

/// Builder for [`SigningContext`].
///
/// | field | default |
/// |---|---|
/// | `service` | empty, scheme infers it |
/// | `region` | empty, scheme infers it |
/// | `datetime` | current time |
/// | `method` | [`SigningMethod::Header`] |
/// | `all_headers` | `false` |
/// | `single_encode` | `false` |
/// | `append_session_token` | `false` |
#[derive(Default, Clone)]
pub struct SigningContextBuilder {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    service: Option<String>,
    region: Option<String>,
    datetime: Option<DateTime>,
    method: Option<SigningMethod>,
    all_headers: bool,
    single_encode: bool,
    append_session_token: bool,
}

impl Debug for SigningContextBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContextBuilder")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("service", &self.service)
            .field("region", &self.region)
            .field("datetime", &self.datetime)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl SigningContextBuilder {
    /// Set the full credential.
    pub fn credential(mut self, cred: Credential) -> Self {
        self.access_key_id = Some(cred.access_key_id);
        self.secret_access_key = Some(cred.secret_access_key);
        self.session_token = cred.session_token;
        self
    }

    /// Set access key id.
    pub fn access_key_id(mut self, v: &str) -> Self {
        self.access_key_id = Some(v.to_string());
        self
    }

    /// Set secret access key.
    pub fn secret_access_key(mut self, v: &str) -> Self {
        self.secret_access_key = Some(v.to_string());
        self
    }

    /// Set session token.
    pub fn session_token(mut self, v: &str) -> Self {
        self.session_token = Some(v.to_string());
        self
    }

    /// Set service, like `s3`.
    pub fn service(mut self, v: &str) -> Self {
        self.service = Some(v.to_string());
        self
    }

    /// Set region, like `us-east-1`.
    pub fn region(mut self, v: &str) -> Self {
        self.region = Some(v.to_string());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or replaying a signature.
    pub fn datetime(mut self, v: DateTime) -> Self {
        self.datetime = Some(v);
        self
    }

    /// Sign with headers (the default).
    pub fn sign_header(mut self) -> Self {
        self.method = Some(SigningMethod::Header);
        self
    }

    /// Sign with query, producing a presigned url valid for `expires_in`.
    pub fn sign_query(mut self, expires_in: Duration) -> Self {
        self.method = Some(SigningMethod::Query(expires_in));
        self
    }

    /// Sign every header present on the request.
    pub fn all_headers(mut self, v: bool) -> Self {
        self.all_headers = v;
        self
    }

    /// Encode the path only once.
    pub fn single_encode(mut self, v: bool) -> Self {
        self.single_encode = v;
        self
    }

    /// Append the session token after signing instead of signing it.
    pub fn append_session_token(mut self, v: bool) -> Self {
        self.append_session_token = v;
        self
    }

    /// Validate and build the signing context.
    pub fn build(self) -> Result<SigningContext> {
        let access_key_id = self
            .access_key_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("access_key_id is required"))?;
        let secret_access_key = self
            .secret_access_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("secret_access_key is required"))?;

        let method = self.method.unwrap_or(SigningMethod::Header);
        if method == SigningMethod::Query(Duration::ZERO) {
            return Err(Error::config_invalid(
                "query signing requires a non-zero expiration",
            ));
        }

        Ok(SigningContext {
            credential: Credential {
                access_key_id,
                secret_access_key,
                session_token: self.session_token.filter(|v| !v.is_empty()),
            },
            service: self.service.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            datetime: self.datetime.unwrap_or_else(now),
            method,
            all_headers: self.all_headers,
            single_encode: self.single_encode,
            append_session_token: self.append_session_token,
        })
    }
}
