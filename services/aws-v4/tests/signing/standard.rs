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

use super::{init_signing_test, request, signature_of, suite_context};
use anyhow::Result;
use http::{HeaderValue, Method};
use objsign_core::{ErrorKind, SignableBody};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case(Method::GET, "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"; "get vanilla")]
#[test_case(Method::POST, "5da7c1a2acd57cee7505fc6676e4e544621c30862966e37dddb68e92efbe5d6b"; "post vanilla")]
fn test_vanilla(method: Method, expected: &str) -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().build()?;

    let signed = signer.sign(&request(method, "https://example.amazonaws.com/", ""), &ctx)?;

    assert_eq!(signature_of(&signed), expected);
    Ok(())
}

#[test]
fn test_query_order_does_not_matter() -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().build()?;

    let a = signer.sign(
        &request(Method::GET, "https://example.amazonaws.com/?Param2=value2&Param1=value1", ""),
        &ctx,
    )?;
    let b = signer.sign(
        &request(Method::GET, "https://example.amazonaws.com/?Param1=value1&Param2=value2", ""),
        &ctx,
    )?;

    assert_eq!(signature_of(&a), signature_of(&b));
    assert_eq!(a.uri.query(), Some("Param2=value2&Param1=value1"));
    Ok(())
}

#[test]
fn test_header_whitespace_is_collapsed() -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().build()?;

    let mut a = request(Method::GET, "https://example.amazonaws.com/", "");
    a.headers_mut()
        .insert("my-header1", HeaderValue::from_static("  value1   value2 "));
    let mut b = request(Method::GET, "https://example.amazonaws.com/", "");
    b.headers_mut()
        .insert("my-header1", HeaderValue::from_static("value1 value2"));

    assert_eq!(
        signature_of(&signer.sign(&a, &ctx)?),
        signature_of(&signer.sign(&b, &ctx)?)
    );
    Ok(())
}

#[test]
fn test_unsignable_headers_are_skipped() -> Result<()> {
    let signer = init_signing_test();

    let plain = request(Method::PUT, "https://example.amazonaws.com/", "hello");
    let mut noisy = plain.clone();
    noisy
        .headers_mut()
        .insert(http::header::USER_AGENT, HeaderValue::from_static("objsign"));
    noisy
        .headers_mut()
        .insert(http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

    let ctx = suite_context().build()?;
    assert_eq!(
        signature_of(&signer.sign(&plain, &ctx)?),
        signature_of(&signer.sign(&noisy, &ctx)?)
    );

    let ctx = suite_context().all_headers(true).build()?;
    let signed = signer.sign(&noisy, &ctx)?;
    let auth = signed.headers[http::header::AUTHORIZATION].to_str()?;
    assert!(auth.contains("SignedHeaders=content-type;host;user-agent;x-amz-date,"));
    Ok(())
}

#[test]
fn test_body_changes_signature() -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().build()?;

    let a = signer.sign(&request(Method::POST, "https://example.amazonaws.com/", "a=1"), &ctx)?;
    let b = signer.sign(&request(Method::POST, "https://example.amazonaws.com/", "a=2"), &ctx)?;

    assert_ne!(signature_of(&a), signature_of(&b));
    assert_eq!(a.body, SignableBody::from("a=1"));
    Ok(())
}

#[test]
fn test_streaming_body_requires_payload_hash() -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().build()?;

    let mut req = request(Method::PUT, "https://example.amazonaws.com/upload", "");
    *req.body_mut() = SignableBody::Streaming;

    let err = signer.sign(&req, &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    Ok(())
}

#[test]
fn test_s3_path_is_encoded_once() -> Result<()> {
    let signer = init_signing_test();
    let ctx = suite_context().service("s3").build()?;

    // `%20` and `+` are both a space for s3, so both urls sign the same key.
    let a = signer.sign(
        &request(Method::GET, "https://bucket.s3.amazonaws.com/my%20file.txt", ""),
        &ctx,
    )?;
    let b = signer.sign(
        &request(Method::GET, "https://bucket.s3.amazonaws.com/my+file.txt", ""),
        &ctx,
    )?;

    assert_eq!(signature_of(&a), signature_of(&b));
    assert_eq!(a.uri.path(), "/my%20file.txt");
    Ok(())
}
