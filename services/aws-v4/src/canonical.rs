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

//! Canonical request construction for SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::*;
use http::header;
use http::HeaderMap;
use objsign_core::hash::hex_sha256;
use objsign_core::utils::collapse_whitespace;
use objsign_core::{Error, Result, SignableBody};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// CanonicalRequest is the normalized form of a request that gets hashed
/// into the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Upper-cased HTTP method.
    pub method: String,
    /// Encoded path.
    pub encoded_path: String,
    /// Sorted and encoded query string.
    pub encoded_query: String,
    /// `name:value` lines joined by `\n`, without the trailing newline.
    pub canonical_headers: String,
    /// Header names joined by `;`.
    pub signed_headers: String,
    /// Hex encoded payload hash or `UNSIGNED-PAYLOAD`.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Render the canonical request string.
    ///
    /// ```shell
    /// GET
    /// /
    /// a=1&b=2
    /// host:example.com
    /// x-amz-date:20150830T123600Z
    ///
    /// host;x-amz-date
    /// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
    /// ```
    pub fn to_canonical_string(&self) -> String {
        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);
        f.push_str(&self.method);
        f.push('\n');
        f.push_str(&self.encoded_path);
        f.push('\n');
        f.push_str(&self.encoded_query);
        f.push('\n');
        f.push_str(&self.canonical_headers);
        f.push_str("\n\n");
        f.push_str(&self.signed_headers);
        f.push('\n');
        f.push_str(&self.payload_hash);
        f
    }
}

/// CredentialScope binds a signing key to a date, region and service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    /// Date stamp like `20150830`.
    pub date: String,
    /// Region like `us-east-1`.
    pub region: String,
    /// Service like `s3`.
    pub service: String,
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{SCOPE_TERMINATOR}",
            self.date, self.region, self.service
        )
    }
}

/// Encode the raw url path.
///
/// S3 signs the decoded path encoded exactly once. Every other service
/// collapses duplicated slashes and encodes the already encoded path again,
/// unless `single_encode` is set.
pub fn canonicalize_path(path: &str, service: &str, single_encode: bool) -> String {
    if service == "s3" {
        let plus_as_space = path.replace('+', " ");
        let decoded = percent_decode_str(&plus_as_space)
            .decode_utf8()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| path.to_string());
        return utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string();
    }

    let mut collapsed = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }

    if single_encode {
        utf8_percent_encode(&collapsed, &RFC3986_EXTRA_SET).to_string()
    } else {
        utf8_percent_encode(&collapsed, &AWS_URI_ENCODE_SET).to_string()
    }
}

/// Build the canonical query string from decoded pairs.
///
/// Empty keys are dropped. With `first_key_only` (S3) only the first
/// occurrence of every key is kept.
pub fn canonicalize_query(query: &[(String, String)], first_key_only: bool) -> String {
    let mut seen = HashSet::new();
    let mut pairs = query
        .iter()
        .filter(|(k, _)| !k.is_empty())
        .filter(|(k, _)| !first_key_only || seen.insert(k.as_str()))
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();

    // Sort by encoded key first, then encoded value.
    pairs.sort();

    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build canonical headers and the signed headers list.
///
/// `host` is always signed: taken from the request headers if present,
/// otherwise from `authority`.
pub fn canonicalize_headers(
    headers: &HeaderMap,
    authority: &str,
    all_headers: bool,
) -> Result<(String, String)> {
    let mut names = headers
        .keys()
        .map(|k| k.as_str())
        .filter(|k| all_headers || !UNSIGNABLE_HEADERS.contains(*k))
        .chain(std::iter::once("host"))
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();

    let mut lines = Vec::with_capacity(names.len());
    for name in names.iter() {
        let value = if *name == "host" && !headers.contains_key(header::HOST) {
            authority.to_string()
        } else {
            let values = headers
                .get_all(*name)
                .iter()
                .map(|v| {
                    v.to_str().map(collapse_whitespace).map_err(|e| {
                        Error::request_invalid(format!("header {name} is not valid to sign"))
                            .with_source(e)
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            values.join(",")
        };
        lines.push(format!("{name}:{value}"));
    }

    Ok((lines.join("\n"), names.join(";")))
}

/// Resolve the payload hash.
///
/// An explicit `x-amz-content-sha256` header always wins, `unsigned` makes
/// the payload `UNSIGNED-PAYLOAD`, otherwise the body is hashed.
pub fn payload_hash(headers: &HeaderMap, body: &SignableBody, unsigned: bool) -> Result<String> {
    if let Some(v) = headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(v.to_str()?.to_string());
    }
    if unsigned {
        return Ok(UNSIGNED_PAYLOAD.to_string());
    }

    match body.as_bytes() {
        Some(bs) => Ok(hex_sha256(bs)),
        None => Err(Error::request_invalid(
            "body must be a string or bytes, unless you include the x-amz-content-sha256 header",
        )),
    }
}
