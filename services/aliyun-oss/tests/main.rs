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

use anyhow::Result;
use chrono::{TimeZone, Utc};
use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use http::Method;
use objsign_aliyun_oss::{Config, RequestSigner};
use objsign_core::hash::base64_hmac_sha1;
use objsign_core::{SignableBody, Signer, StaticEnv};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config() -> Config {
    Config::default().from_env(&StaticEnv::from_pairs([
        ("ALIBABA_CLOUD_ACCESS_KEY_ID", "testak"),
        ("ALIBABA_CLOUD_ACCESS_KEY_SECRET", "testsecret"),
        ("OSS_BUCKET_NAME", "bucket"),
        ("OSS_REGION", "oss-cn-hangzhou"),
    ]))
}

/// Rebuild the string to sign on the receiving side and check the signature.
#[test_case(Method::GET, "/key.txt", "", "/bucket/key.txt"; "get object")]
#[test_case(Method::PUT, "/dir/key.txt", "text/plain", "/bucket/dir/key.txt"; "put object")]
#[test_case(Method::GET, "/key.txt?acl&foo=bar", "", "/bucket/key.txt?acl"; "get acl")]
#[test_case(Method::DELETE, "/key.txt?versionId=v1", "", "/bucket/key.txt?versionId=v1"; "delete version")]
fn test_signature_round_trip(
    method: Method,
    path: &str,
    content_type: &str,
    resource: &str,
) -> Result<()> {
    init();

    let cfg = config();
    let endpoint = cfg.endpoint().unwrap_or_default();
    let ctx = cfg
        .context_builder()
        .datetime(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        .build()?;

    let mut builder = http::Request::builder()
        .method(method.clone())
        .uri(format!("{endpoint}{path}"))
        .header("x-oss-meta-author", "objsign");
    if !content_type.is_empty() {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let req = builder.body(SignableBody::from("hello"))?;

    let signer = Signer::new(RequestSigner::new("bucket"));
    let signed = signer.sign(&req, &ctx)?;

    let date = signed.headers[DATE].to_str()?;
    assert_eq!(date, "Wed, 01 Jan 2025 00:00:00 GMT");

    let string_to_sign = format!(
        "{}\n\n{content_type}\n{date}\nx-oss-meta-author:objsign\n{resource}",
        method.as_str()
    );
    let expected = base64_hmac_sha1(b"testsecret", string_to_sign.as_bytes())?;
    assert_eq!(
        signed.headers[AUTHORIZATION].to_str()?,
        format!("OSS testak:{expected}")
    );
    Ok(())
}

#[test]
fn test_wrong_secret_does_not_verify() -> Result<()> {
    init();

    let ctx = config()
        .context_builder()
        .datetime(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        .build()?;
    let req = http::Request::get("https://bucket.oss-cn-hangzhou.aliyuncs.com/key.txt")
        .body(SignableBody::Empty)?;
    let signed = Signer::new(RequestSigner::new("bucket")).sign(&req, &ctx)?;

    let forged = base64_hmac_sha1(
        b"othersecret",
        b"GET\n\n\nWed, 01 Jan 2025 00:00:00 GMT\n/bucket/key.txt",
    )?;
    assert_ne!(
        signed.headers[AUTHORIZATION].to_str()?,
        format!("OSS testak:{forged}")
    );
    Ok(())
}
