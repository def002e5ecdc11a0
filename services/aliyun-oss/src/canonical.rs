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

//! Canonical form of an OSS V1 request.
//!
//! - [Include signatures in the Authorization header](https://www.alibabacloud.com/help/en/oss/developer-reference/include-signatures-in-the-authorization-header)

use crate::constants::{CONTENT_MD5, SUB_RESOURCES, X_OSS_PREFIX};
use http::header::CONTENT_TYPE;
use objsign_core::{Result, SigningRequest};

/// Everything that goes into the OSS V1 string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Upper-cased HTTP method.
    pub method: String,
    /// `Content-MD5` header, empty if absent.
    pub content_md5: String,
    /// `Content-Type` header, empty if absent.
    pub content_type: String,
    /// http date for header signing, epoch seconds of expiry for query signing.
    pub date: String,
    /// `x-oss-*` headers as sorted `name:value` lines joined by `\n`.
    pub canonical_headers: String,
    /// `/<bucket><path>` plus sub-resources.
    pub resource: String,
}

impl CanonicalRequest {
    /// Render the string to sign.
    ///
    /// ```shell
    /// GET
    /// <content-md5>
    /// <content-type>
    /// Wed, 01 Jan 2025 00:00:00 GMT
    /// x-oss-meta-a:1
    /// /bucket/key.txt?acl
    /// ```
    ///
    /// The headers line is left out entirely when there are no `x-oss-*` headers.
    pub fn to_string_to_sign(&self) -> String {
        let mut s = String::with_capacity(128);
        s.push_str(&self.method);
        s.push('\n');
        s.push_str(&self.content_md5);
        s.push('\n');
        s.push_str(&self.content_type);
        s.push('\n');
        s.push_str(&self.date);
        s.push('\n');
        if !self.canonical_headers.is_empty() {
            s.push_str(&self.canonical_headers);
            s.push('\n');
        }
        s.push_str(&self.resource);
        s
    }
}

/// Collect `x-oss-*` headers sorted by name.
pub fn canonicalize_headers(req: &SigningRequest) -> Result<String> {
    let headers = req.header_to_vec_with_prefix(X_OSS_PREFIX)?;
    Ok(SigningRequest::header_to_string(headers, ":", "\n"))
}

/// Build the canonicalized resource.
///
/// The path is used exactly as it appears in the url. Only query pairs that
/// are OSS sub-resources take part, sorted by key.
pub fn canonicalize_resource(req: &SigningRequest, bucket: &str) -> String {
    let mut sub_resources = req
        .query
        .iter()
        .filter(|(k, _)| SUB_RESOURCES.contains(k.as_str()))
        .collect::<Vec<_>>();
    sub_resources.sort_by(|a, b| a.0.cmp(&b.0));

    let mut resource = if bucket.is_empty() {
        req.path.clone()
    } else {
        format!("/{bucket}{}", req.path)
    };

    for (idx, (k, v)) in sub_resources.into_iter().enumerate() {
        resource.push(if idx == 0 { '?' } else { '&' });
        resource.push_str(k);
        if !v.is_empty() {
            resource.push('=');
            resource.push_str(v);
        }
    }

    resource
}

/// Build the canonical request, `date` is the already formatted date or expiry.
pub fn canonicalize(req: &SigningRequest, bucket: &str, date: String) -> Result<CanonicalRequest> {
    Ok(CanonicalRequest {
        method: req.method.as_str().to_string(),
        content_md5: req.header_get(CONTENT_MD5).unwrap_or_default().to_string(),
        content_type: req
            .header_get(CONTENT_TYPE.as_str())
            .unwrap_or_default()
            .to_string(),
        date,
        canonical_headers: canonicalize_headers(req)?,
        resource: canonicalize_resource(req, bucket),
    })
}
