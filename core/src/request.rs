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

use crate::{Error, Result};
use bytes::Bytes;
use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use std::borrow::Cow;
use std::str::FromStr;

/// AsciiSet for RFC 3986 query encoding.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Body of a request to sign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SignableBody {
    /// No body, hashed as the empty string.
    #[default]
    Empty,
    /// In-memory body that can be hashed.
    Bytes(Bytes),
    /// Body that will be streamed later and can't be hashed by the signer.
    ///
    /// Signing a streaming body requires the caller to provide the payload
    /// hash explicitly (for example `x-amz-content-sha256: UNSIGNED-PAYLOAD`).
    Streaming,
}

impl SignableBody {
    /// Bytes to hash, `None` for [`SignableBody::Streaming`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SignableBody::Empty => Some(&[]),
            SignableBody::Bytes(bs) => Some(bs),
            SignableBody::Streaming => None,
        }
    }
}

impl From<&'static str> for SignableBody {
    fn from(value: &'static str) -> Self {
        if value.is_empty() {
            SignableBody::Empty
        } else {
            SignableBody::Bytes(Bytes::from_static(value.as_bytes()))
        }
    }
}

impl From<String> for SignableBody {
    fn from(value: String) -> Self {
        Bytes::from(value).into()
    }
}

impl From<Vec<u8>> for SignableBody {
    fn from(value: Vec<u8>) -> Self {
        Bytes::from(value).into()
    }
}

impl From<Bytes> for SignableBody {
    fn from(value: Bytes) -> Self {
        if value.is_empty() {
            SignableBody::Empty
        } else {
            SignableBody::Bytes(value)
        }
    }
}

/// Working copy of a request while it's being signed.
///
/// The query is stored decoded, schemes push plain values into it and the
/// encoding happens once in [`SigningRequest::finish`].
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, kept exactly as it appears in the url.
    pub path: String,
    /// HTTP query parameters, decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// HTTP body.
    pub body: SignableBody,
}

impl SigningRequest {
    /// Build a signing request from a copy of the input request.
    ///
    /// The url must be absolute and the method one of the standard verbs.
    pub fn build(req: &http::Request<SignableBody>) -> Result<Self> {
        if !is_standard_method(req.method()) {
            return Err(Error::request_invalid(format!(
                "method {} is not supported for signing",
                req.method()
            )));
        }

        let uri = req.uri().clone().into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        let path = match paq.path() {
            "" => "/".to_string(),
            v => v.to_string(),
        };

        Ok(SigningRequest {
            method: req.method().clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path,
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: req.headers().clone(),
            body: req.body().clone(),
        })
    }

    /// Host without port, used for service inference.
    pub fn host(&self) -> &str {
        self.authority.host()
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Cow<str> {
        percent_encoding::percent_decode_str(&self.path).decode_utf8_lossy()
    }

    /// Check if query contains the given key.
    #[inline]
    pub fn query_has(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }

    /// Set a query pair, replacing every existing pair with the same key.
    pub fn query_set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.query[idx].1 = value;
                let mut seen = false;
                self.query.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.query.push((key.to_string(), value)),
        }
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Get header value as str, `None` if absent or not valid visible ascii.
    pub fn header_get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Insert a header, marking it sensitive if requested.
    pub fn header_insert(&mut self, name: HeaderName, value: &str, sensitive: bool) -> Result<()> {
        let mut value = HeaderValue::from_str(value)?;
        value.set_sensitive(sensitive);
        self.headers.insert(name, value);
        Ok(())
    }

    /// Get header names with given prefix, lowercased, paired with their values.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(prefix))
            .map(|(k, v)| Ok((k.as_str().to_lowercase(), v.to_str()?.to_string())))
            .collect()
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (idx, (k, v)) in headers.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }

    /// Turn the working copy into the final signed request.
    pub fn finish(self) -> Result<SignedRequest> {
        let mut paq = self.path;
        if !self.query.is_empty() {
            paq.push('?');
            for (i, (k, v)) in self.query.iter().enumerate() {
                if i > 0 {
                    paq.push('&');
                }

                paq.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
                if !v.is_empty() {
                    paq.push('=');
                    paq.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
                }
            }
        }

        let uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?;

        Ok(SignedRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body,
        })
    }
}

fn is_standard_method(method: &Method) -> bool {
    [
        Method::GET,
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
        Method::PATCH,
    ]
    .contains(method)
}

/// SignedRequest is the output of signing, ready for dispatch.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Url, with signature material in the query for presigned requests.
    pub uri: Uri,
    /// Headers, with `Authorization` set for header signing.
    pub headers: HeaderMap,
    /// Body, untouched.
    pub body: SignableBody,
}

impl SignedRequest {
    /// Convert into [`http::Request`].
    pub fn into_http(self) -> http::Request<SignableBody> {
        let mut req = http::Request::new(self.body);
        *req.method_mut() = self.method;
        *req.uri_mut() = self.uri;
        *req.headers_mut() = self.headers;
        req
    }

    /// Convert into a [`http::Request`] carrying an in-memory body.
    ///
    /// Fails for streaming bodies since their content is owned by the caller.
    pub fn into_http_bytes(self) -> Result<http::Request<Bytes>> {
        let body = match &self.body {
            SignableBody::Empty => Bytes::new(),
            SignableBody::Bytes(bs) => bs.clone(),
            SignableBody::Streaming => {
                return Err(Error::request_invalid(
                    "streaming body can't be converted into bytes",
                ))
            }
        };

        let (parts, _) = self.into_http().into_parts();
        Ok(http::Request::from_parts(parts, body))
    }
}
