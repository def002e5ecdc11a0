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

mod signing;

use http::HeaderMap;
use objsign_aws_v4::infer_service_region;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("https://mybucket.oss-cn-hangzhou.aliyuncs.com/a.txt", "s3", "oss-cn-hangzhou"; "aliyun")]
#[test_case("https://acct.r2.cloudflarestorage.com/bucket/a.txt", "s3", "auto"; "r2")]
#[test_case("https://s3.us-west-2.amazonaws.com/bucket/a.txt", "s3", "us-west-2"; "s3 path style")]
#[test_case("https://bucket.s3.eu-central-1.backblazeb2.com/a.txt", "s3", "eu-central-1"; "backblaze")]
#[test_case("https://lambda.ap-southeast-2.amazonaws.com/", "lambda", "ap-southeast-2"; "regional service")]
#[test_case("https://localhost:9000/bucket", "", ""; "unknown")]
fn test_infer_from_url(url: &str, service: &str, region: &str) {
    let uri: http::Uri = url.parse().unwrap();
    let (guessed_service, guessed_region) =
        infer_service_region(uri.host().unwrap(), uri.path(), &HeaderMap::new());

    assert_eq!(guessed_service, service);
    assert_eq!(guessed_region, region);
}
