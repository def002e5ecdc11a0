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

//! Aliyun OSS V1 signing for objsign.
//!
//! ```no_run
//! use objsign_aliyun_oss::{Config, RequestSigner};
//! use objsign_core::{OsEnv, SignableBody, Signer};
//!
//! # fn main() -> objsign_core::Result<()> {
//! let config = Config::default().from_env(&OsEnv);
//! let endpoint = config.endpoint().expect("OSS_BUCKET_NAME and OSS_REGION must be set");
//! let bucket = config.bucket.clone().unwrap_or_default();
//!
//! let req = http::Request::get(format!("{endpoint}/hello.txt"))
//!     .body(SignableBody::Empty)
//!     .expect("request must be valid");
//!
//! let signer = Signer::new(RequestSigner::new(&bucket));
//! let signed = signer.sign(&req, &config.context_builder().build()?)?;
//! println!("{:?}", signed.headers);
//! # Ok(())
//! # }
//! ```

mod constants;

mod canonical;
pub use canonical::CanonicalRequest;

mod config;
pub use config::Config;

mod sign_request;
pub use sign_request::RequestSigner;
