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

use crate::canonical::{canonicalize, CanonicalRequest};
use crate::constants::*;
use http::header::{AUTHORIZATION, DATE};
use http::HeaderName;
use objsign_core::hash::base64_hmac_sha1;
use objsign_core::time::format_http_date;
use objsign_core::{
    Error, Result, SigningContext, SigningKeyCache, SigningMethod, SigningRequest, SigningScheme,
};

/// RequestSigner for Aliyun OSS signature.
///
/// OSS V1 signs with HMAC-SHA1 keyed by the secret itself, there is no
/// derived key to cache.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    bucket: String,
}

impl RequestSigner {
    /// Create a new signer for Aliyun OSS bucket.
    ///
    /// Use an empty bucket for service level requests like `ListBuckets`.
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
        }
    }

    /// Bucket this signer signs for.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl SigningScheme for RequestSigner {
    type Canonical = CanonicalRequest;

    fn name(&self) -> &'static str {
        "aliyun-oss"
    }

    fn canonicalize(
        &self,
        req: &mut SigningRequest,
        ctx: &SigningContext,
    ) -> Result<CanonicalRequest> {
        let cred = ctx.credential();
        let signing_time = ctx.datetime();

        let date = match ctx.method() {
            SigningMethod::Header => {
                let date = format_http_date(signing_time);
                req.header_insert(DATE, &date, false)?;
                if let Some(token) = &cred.session_token {
                    req.header_insert(HeaderName::from_static(X_OSS_SECURITY_TOKEN), token, true)?;
                }
                date
            }
            SigningMethod::Query(expires_in) => {
                let expires_in = chrono::TimeDelta::from_std(expires_in).map_err(|e| {
                    Error::config_invalid(format!("invalid expiration duration {expires_in:?}"))
                        .with_source(e)
                })?;
                if let Some(token) = &cred.session_token {
                    req.query_set(SECURITY_TOKEN_QUERY, token.as_str());
                }
                let expires_at = signing_time.checked_add_signed(expires_in).ok_or_else(|| {
                    Error::config_invalid(format!("expiration duration {expires_in} overflows"))
                })?;
                expires_at.timestamp().to_string()
            }
        };

        canonicalize(req, &self.bucket, date)
    }

    fn build_string_to_sign(
        &self,
        canonical: &CanonicalRequest,
        _: &SigningContext,
    ) -> Result<String> {
        Ok(canonical.to_string_to_sign())
    }

    fn derive_key(
        &self,
        _: &CanonicalRequest,
        ctx: &SigningContext,
        _: &dyn SigningKeyCache,
    ) -> Result<Vec<u8>> {
        Ok(ctx.credential().secret_access_key.as_bytes().to_vec())
    }

    fn compute_signature(&self, key: &[u8], string_to_sign: &str) -> Result<String> {
        base64_hmac_sha1(key, string_to_sign.as_bytes())
    }

    fn format_signature_output(
        &self,
        req: &mut SigningRequest,
        canonical: &CanonicalRequest,
        ctx: &SigningContext,
        signature: &str,
    ) -> Result<()> {
        let cred = ctx.credential();

        if ctx.is_query() {
            req.query_push(OSS_ACCESS_KEY_ID_QUERY, cred.access_key_id.as_str());
            req.query_push(EXPIRES_QUERY, canonical.date.as_str());
            req.query_push(SIGNATURE_QUERY, signature);
            return Ok(());
        }

        let authorization = format!("OSS {}:{signature}", cred.access_key_id);
        req.header_insert(AUTHORIZATION, &authorization, true)
    }
}
