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

mod presigned;
mod standard;

use chrono::{TimeZone, Utc};
use http::{Method, Request};
use objsign_aws_v4::RequestSigner;
use objsign_core::{Credential, SignableBody, SignedRequest, Signer, SigningContextBuilder};

pub const ACCESS_KEY: &str = "AKIDEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// Initialize test environment
pub fn init_signing_test() -> Signer<RequestSigner> {
    let _ = env_logger::builder().is_test(true).try_init();

    Signer::new(RequestSigner::new())
}

/// Context pinned to the date used by the AWS SigV4 test suite.
pub fn suite_context() -> SigningContextBuilder {
    objsign_core::SigningContext::builder()
        .credential(Credential::new(ACCESS_KEY, SECRET_KEY))
        .service("service")
        .region("us-east-1")
        .datetime(Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap())
}

pub fn request(method: Method, uri: &str, body: impl Into<SignableBody>) -> Request<SignableBody> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub fn signature_of(signed: &SignedRequest) -> String {
    let auth = signed
        .headers
        .get(http::header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    match auth.rsplit_once("Signature=") {
        Some((_, sig)) => sig.to_string(),
        None => signed
            .uri
            .query()
            .unwrap_or_default()
            .split('&')
            .find_map(|kv| kv.strip_prefix("X-Amz-Signature="))
            .unwrap_or_default()
            .to_string(),
    }
}
