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

//! Signing key derivation.
//!
//! - [Derive a signing key](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#derive-signing-key)

use crate::constants::SCOPE_TERMINATOR;
use log::debug;
use objsign_core::hash::hmac_sha256;
use objsign_core::{Error, Result, SigningKeyCache, SigningKeyCacheKey};
use std::sync::Arc;

/// Derive the SigV4 signing key for the given scope.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::config_invalid("secret access key is empty"));
    }

    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
    // Sign region
    let sign_region = hmac_sha256(&sign_date, region.as_bytes())?;
    // Sign service
    let sign_service = hmac_sha256(&sign_region, service.as_bytes())?;
    // Sign request
    hmac_sha256(&sign_service, SCOPE_TERMINATOR.as_bytes())
}

/// Same as [`derive_signing_key`] but looks the key up in `cache` first.
pub fn derive_signing_key_cached(
    cache: &dyn SigningKeyCache,
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Arc<[u8]>> {
    let key = SigningKeyCacheKey::new(secret, date, region, service);
    if let Some(v) = cache.get(&key) {
        return Ok(v);
    }

    debug!("signing key for {date}/{region}/{service} is not cached, deriving");
    let derived = derive_signing_key(secret, date, region, service)?;
    Ok(cache.insert(key, derived))
}
