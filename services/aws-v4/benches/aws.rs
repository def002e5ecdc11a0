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

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use objsign_aws_v4::RequestSigner as AwsV4RequestSigner;
use objsign_core::{Credential, NoopKeyCache, SignableBody, Signer, SigningContext};
use std::sync::Arc;
use std::time::Duration;

criterion_group!(benches, bench);
criterion_main!(benches);

fn request() -> http::Request<SignableBody> {
    http::Request::get("http://127.0.0.1:9000/hello?list-type=2&prefix=a/b")
        .body(SignableBody::Empty)
        .expect("request must be valid")
}

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("aws_v4");

    let header_ctx = SigningContext::builder()
        .credential(Credential::new("access_key_id", "secret_access_key"))
        .service("s3")
        .region("test")
        .build()
        .expect("context must be valid");
    let query_ctx = SigningContext::builder()
        .credential(Credential::new("access_key_id", "secret_access_key"))
        .service("s3")
        .region("test")
        .sign_query(Duration::from_secs(3600))
        .build()
        .expect("context must be valid");

    group.bench_function("header", |b| {
        let s = Signer::new(AwsV4RequestSigner::new());
        let req = request();

        b.iter(|| s.sign(&req, &header_ctx).expect("must success"))
    });

    group.bench_function("header_without_key_cache", |b| {
        let s = Signer::new(AwsV4RequestSigner::new()).with_cache(Arc::new(NoopKeyCache));
        let req = request();

        b.iter(|| s.sign(&req, &header_ctx).expect("must success"))
    });

    group.bench_function("query", |b| {
        let s = Signer::new(AwsV4RequestSigner::new());
        let req = request();

        b.iter(|| s.sign(&req, &query_ctx).expect("must success"))
    });

    group.finish()
}
