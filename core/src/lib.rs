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

//! Core components for signing object storage requests.
//!
//! This crate provides the foundational types and traits shared by every
//! signing scheme in the objsign workspace.
//!
//! ## Overview
//!
//! - **SigningContext**: credential, scope and signing time for one request,
//!   validated when built.
//! - **SigningScheme**: the capability a scheme implements (canonicalize,
//!   derive key, build string to sign, format the signature).
//! - **Signer**: drives a scheme over a request and returns a signed copy.
//! - **SigningKeyCache**: explicit cache for derived keys, in-memory or no-op.
//!
//! ## Example
//!
//! ```
//! use objsign_core::hash::hex_hmac_sha256;
//! use objsign_core::{
//!     Credential, Result, SignableBody, Signer, SigningContext, SigningKeyCache,
//!     SigningRequest, SigningScheme,
//! };
//!
//! #[derive(Debug)]
//! struct PathScheme;
//!
//! impl SigningScheme for PathScheme {
//!     type Canonical = String;
//!
//!     fn name(&self) -> &'static str {
//!         "path"
//!     }
//!
//!     fn canonicalize(&self, req: &mut SigningRequest, _: &SigningContext) -> Result<String> {
//!         Ok(req.path.clone())
//!     }
//!
//!     fn build_string_to_sign(&self, canonical: &String, _: &SigningContext) -> Result<String> {
//!         Ok(canonical.clone())
//!     }
//!
//!     fn derive_key(
//!         &self,
//!         _: &String,
//!         ctx: &SigningContext,
//!         _: &dyn SigningKeyCache,
//!     ) -> Result<Vec<u8>> {
//!         Ok(ctx.credential().secret_access_key.as_bytes().to_vec())
//!     }
//!
//!     fn compute_signature(&self, key: &[u8], string_to_sign: &str) -> Result<String> {
//!         hex_hmac_sha256(key, string_to_sign.as_bytes())
//!     }
//!
//!     fn format_signature_output(
//!         &self,
//!         req: &mut SigningRequest,
//!         _: &String,
//!         _: &SigningContext,
//!         signature: &str,
//!     ) -> Result<()> {
//!         req.query_push("sig", signature);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let ctx = SigningContext::builder()
//!     .credential(Credential::new("ak", "sk"))
//!     .build()?;
//! let req = http::Request::builder()
//!     .uri("https://example.com/hello")
//!     .body(SignableBody::Empty)
//!     .expect("request must be valid");
//!
//! let signed = Signer::new(PathScheme).sign(&req, &ctx)?;
//! assert!(signed.uri.query().unwrap().starts_with("sig="));
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod cache;
pub use cache::{InMemoryKeyCache, NoopKeyCache, SigningKeyCache, SigningKeyCacheKey};
mod context;
pub use context::{Credential, SigningContext, SigningContextBuilder, SigningMethod};
mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod http_send;
pub use http_send::HttpSend;

mod api;
pub use api::SigningScheme;
mod request;
pub use request::{SignableBody, SignedRequest, SigningRequest, QUERY_ENCODE_SET};
mod signer;
pub use signer::Signer;
