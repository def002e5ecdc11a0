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

//! Hash related utils.
//!
//! AWS SigV4 is built on SHA-256 while the legacy Aliyun OSS scheme uses
//! SHA-1, so the primitives here take a [`HashAlgorithm`] instead of being
//! hard wired to one digest.

use crate::{Error, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;

/// Hash algorithm used by a signing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-1, used by Aliyun OSS V1.
    Sha1,
    /// SHA-256, used by AWS SigV4.
    Sha256,
}

/// Digest `content` with the given algorithm.
pub fn digest(alg: HashAlgorithm, content: &[u8]) -> Vec<u8> {
    match alg {
        HashAlgorithm::Sha1 => Sha1::digest(content).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(content).to_vec(),
    }
}

/// HMAC `content` with `key` using the given algorithm.
///
/// Returns a [`crate::ErrorKind::Crypto`] error for an empty key: HMAC
/// itself accepts it, but an empty key always means the secret is missing.
pub fn hmac(alg: HashAlgorithm, key: &[u8], content: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::crypto("hmac key must not be empty"));
    }

    let bs = match alg {
        HashAlgorithm::Sha1 => {
            let mut h = Hmac::<Sha1>::new_from_slice(key)
                .map_err(|e| Error::crypto("invalid hmac-sha1 key").with_source(e))?;
            h.update(content);
            h.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha256 => {
            let mut h = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|e| Error::crypto("invalid hmac-sha256 key").with_source(e))?;
            h.update(content);
            h.finalize().into_bytes().to_vec()
        }
    };

    Ok(bs)
}

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode
pub fn base64_decode(content: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::unexpected("base64 decode failed").with_source(e))
}

/// Hex encoded SHA1 hash.
pub fn hex_sha1(content: &[u8]) -> String {
    hex::encode(Sha1::digest(content).as_slice())
}

/// Hex encoded SHA256 hash.
///
/// Use this function instead of `hex::encode(sha256(content))` can reduce
/// extra copy.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}

/// HMAC with SHA256 hash.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> Result<Vec<u8>> {
    hmac(HashAlgorithm::Sha256, key, content)
}

/// Hex encoded HMAC with SHA256 hash.
pub fn hex_hmac_sha256(key: &[u8], content: &[u8]) -> Result<String> {
    hmac(HashAlgorithm::Sha256, key, content).map(hex::encode)
}

/// Base64 encoded HMAC with SHA1 hash.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> Result<String> {
    hmac(HashAlgorithm::Sha1, key, content).map(|bs| base64_encode(&bs))
}
