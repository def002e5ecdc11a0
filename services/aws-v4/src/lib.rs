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

//! AWS SigV4 signing for objsign.
//!
//! Signs requests for AWS services and S3 compatible storage (Aliyun OSS
//! S3 endpoint, Cloudflare R2, Backblaze B2) with headers or presigned urls.
//!
//! ## Example
//!
//! ```no_run
//! use objsign_aws_v4::{Config, RequestSigner};
//! use objsign_core::{OsEnv, SignableBody, Signer};
//!
//! # fn main() -> objsign_core::Result<()> {
//! let config = Config::default().from_env(&OsEnv);
//! let ctx = config.context_builder().service("s3").build()?;
//!
//! let req = http::Request::get("https://examplebucket.s3.us-west-2.amazonaws.com/test.txt")
//!     .body(SignableBody::Empty)
//!     .expect("request must be valid");
//!
//! let signer = Signer::new(RequestSigner::new());
//! let signed = signer.sign(&req, &ctx)?;
//! println!("{:?}", signed.headers);
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::DEFAULT_REGION;
pub use constants::UNSIGNED_PAYLOAD;

mod canonical;
pub use canonical::canonicalize_path;
pub use canonical::canonicalize_query;
pub use canonical::CanonicalRequest;
pub use canonical::CredentialScope;

mod config;
pub use config::Config;

mod infer;
pub use infer::infer_service_region;

mod key;
pub use key::derive_signing_key;
pub use key::derive_signing_key_cached;

mod sign_request;
pub use sign_request::Canonical;
pub use sign_request::RequestSigner;
