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

use crate::canonical::{
    canonicalize_headers, canonicalize_path, canonicalize_query, payload_hash, CanonicalRequest,
    CredentialScope,
};
use crate::constants::*;
use crate::infer::infer_service_region;
use crate::key::derive_signing_key_cached;
use http::header;
use http::HeaderName;
use log::{debug, log_enabled, Level};
use objsign_core::hash::{hex_hmac_sha256, hex_sha256};
use objsign_core::time::{format_date, format_iso8601};
use objsign_core::{
    Error, Result, SigningContext, SigningKeyCache, SigningMethod, SigningRequest, SigningScheme,
};
use std::fmt::Write;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Service and region come from the [`SigningContext`]. Empty values are
/// inferred from the request host, see [`infer_service_region`].
#[derive(Debug, Clone)]
pub struct RequestSigner {
    default_region: String,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
        }
    }
}

impl RequestSigner {
    /// Create a new SigV4 signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Region used when neither the context nor the host tells one.
    ///
    /// Default to `us-east-1`.
    pub fn with_default_region(mut self, region: &str) -> Self {
        self.default_region = region.to_string();
        self
    }

    fn resolve_scope(
        &self,
        req: &SigningRequest,
        ctx: &SigningContext,
    ) -> Result<(String, String)> {
        let mut service = ctx.service().to_string();
        let mut region = ctx.region().to_string();

        if service.is_empty() || region.is_empty() {
            let (guessed_service, guessed_region) =
                infer_service_region(req.host(), &req.path, &req.headers);
            debug!(
                "inferred service {guessed_service:?} and region {guessed_region:?} from host {}",
                req.host()
            );
            if service.is_empty() {
                service = guessed_service;
            }
            if region.is_empty() {
                region = guessed_region;
            }
        }

        if service.is_empty() {
            return Err(Error::config_invalid(format!(
                "service can't be inferred from host {}, please set it explicitly",
                req.host()
            )));
        }
        if region.is_empty() {
            region = self.default_region.clone();
        }

        Ok((service, region))
    }
}

/// Canonical form of a SigV4 request.
#[derive(Debug, Clone)]
pub struct Canonical {
    /// The canonical request.
    pub request: CanonicalRequest,
    /// Scope of the signing key.
    pub scope: CredentialScope,
    /// Signing time like `20150830T123600Z`.
    pub datetime: String,
    /// The session token is added after signing instead of being signed.
    pub append_session_token: bool,
}

impl SigningScheme for RequestSigner {
    type Canonical = Canonical;

    fn name(&self) -> &'static str {
        "aws-v4"
    }

    fn canonicalize(&self, req: &mut SigningRequest, ctx: &SigningContext) -> Result<Canonical> {
        let (service, region) = self.resolve_scope(req, ctx)?;
        let cred = ctx.credential();
        let now = ctx.datetime();
        let datetime = format_iso8601(now);
        let scope = CredentialScope {
            date: format_date(now),
            region,
            service,
        };
        let is_s3 = scope.service == "s3";

        let append_session_token =
            ctx.append_session_token() || scope.service == "iotdevicegateway";
        let signed_token = cred
            .session_token
            .as_deref()
            .filter(|_| !append_session_token);

        // Fields that take part in the signature.
        match ctx.method() {
            SigningMethod::Header => {
                if is_s3 && !req.headers.contains_key(X_AMZ_CONTENT_SHA_256) {
                    req.header_insert(
                        HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
                        UNSIGNED_PAYLOAD,
                        false,
                    )?;
                }
                req.header_insert(HeaderName::from_static(X_AMZ_DATE), &datetime, false)?;
                if let Some(token) = signed_token {
                    req.header_insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), token, true)?;
                }
            }
            SigningMethod::Query(_) => {
                req.query_set(X_AMZ_DATE_QUERY, datetime.as_str());
                if let Some(token) = signed_token {
                    req.query_set(X_AMZ_SECURITY_TOKEN_QUERY, token);
                }
            }
        }

        let authority = req
            .authority
            .as_str()
            .rsplit('@')
            .next()
            .unwrap_or_default()
            .to_string();
        let (canonical_headers, signed_headers) =
            canonicalize_headers(&req.headers, &authority, ctx.all_headers())?;

        if let SigningMethod::Query(expires_in) = ctx.method() {
            if !req.query_has(X_AMZ_EXPIRES_QUERY) {
                let secs = expires_in.as_secs();
                if secs == 0 || secs > MAX_PRESIGN_EXPIRES_SECS {
                    return Err(Error::config_invalid(format!(
                        "presigned url must expire within 1 to {MAX_PRESIGN_EXPIRES_SECS} seconds, got {expires_in:?}"
                    )));
                }
                req.query_set(X_AMZ_EXPIRES_QUERY, secs.to_string());
            }
            req.query_set(X_AMZ_ALGORITHM_QUERY, ALGORITHM);
            req.query_set(
                X_AMZ_CREDENTIAL_QUERY,
                format!("{}/{scope}", cred.access_key_id),
            );
            req.query_set(X_AMZ_SIGNED_HEADERS_QUERY, signed_headers.as_str());
        }

        let request = CanonicalRequest {
            method: req.method.as_str().to_string(),
            encoded_path: canonicalize_path(&req.path, &scope.service, ctx.single_encode()),
            encoded_query: canonicalize_query(&req.query, is_s3),
            canonical_headers,
            signed_headers,
            payload_hash: payload_hash(&req.headers, &req.body, is_s3 && ctx.is_query())?,
        };

        Ok(Canonical {
            request,
            scope,
            datetime,
            append_session_token,
        })
    }

    /// StringToSign:
    ///
    /// ```shell
    /// AWS4-HMAC-SHA256
    /// 20220313T072004Z
    /// 20220313/<region>/<service>/aws4_request
    /// <hashed_canonical_request>
    /// ```
    fn build_string_to_sign(&self, canonical: &Canonical, ctx: &SigningContext) -> Result<String> {
        let creq = canonical.request.to_canonical_string();
        if log_enabled!(Level::Debug) {
            debug!("calculated canonical request: {}", ctx.redact(&creq));
        }

        let mut f = String::with_capacity(128);
        writeln!(f, "{ALGORITHM}")?;
        writeln!(f, "{}", canonical.datetime)?;
        writeln!(f, "{}", canonical.scope)?;
        write!(f, "{}", hex_sha256(creq.as_bytes()))?;
        Ok(f)
    }

    fn derive_key(
        &self,
        canonical: &Canonical,
        ctx: &SigningContext,
        cache: &dyn SigningKeyCache,
    ) -> Result<Vec<u8>> {
        let key = derive_signing_key_cached(
            cache,
            &ctx.credential().secret_access_key,
            &canonical.scope.date,
            &canonical.scope.region,
            &canonical.scope.service,
        )?;
        Ok(key.to_vec())
    }

    fn compute_signature(&self, key: &[u8], string_to_sign: &str) -> Result<String> {
        hex_hmac_sha256(key, string_to_sign.as_bytes())
    }

    fn format_signature_output(
        &self,
        req: &mut SigningRequest,
        canonical: &Canonical,
        ctx: &SigningContext,
        signature: &str,
    ) -> Result<()> {
        let cred = ctx.credential();
        let appended_token = cred
            .session_token
            .as_deref()
            .filter(|_| canonical.append_session_token);

        if ctx.is_query() {
            req.query_push(X_AMZ_SIGNATURE_QUERY, signature);
            if let Some(token) = appended_token {
                req.query_push(X_AMZ_SECURITY_TOKEN_QUERY, token);
            }
            return Ok(());
        }

        let authorization = format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id, canonical.scope, canonical.request.signed_headers
        );
        req.header_insert(header::AUTHORIZATION, &authorization, true)?;
        if let Some(token) = appended_token {
            req.header_insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), token, true)?;
        }
        Ok(())
    }
}
