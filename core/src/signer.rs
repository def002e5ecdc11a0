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

use crate::{
    InMemoryKeyCache, Result, SignableBody, SignedRequest, SigningContext, SigningKeyCache,
    SigningRequest, SigningScheme,
};
use log::{debug, log_enabled, Level};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It's cheap to clone, clones share the same key cache.
#[derive(Debug)]
pub struct Signer<S: SigningScheme> {
    scheme: Arc<S>,
    cache: Arc<dyn SigningKeyCache>,
}

impl<S: SigningScheme> Clone for Signer<S> {
    fn clone(&self) -> Self {
        Self {
            scheme: self.scheme.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<S: SigningScheme> Signer<S> {
    /// Create a new signer with an in-memory key cache.
    pub fn new(scheme: S) -> Self {
        Self {
            scheme: Arc::new(scheme),
            cache: Arc::new(InMemoryKeyCache::new()),
        }
    }

    /// Replace the key cache.
    pub fn with_cache(mut self, cache: Arc<dyn SigningKeyCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Get the scheme of this signer.
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Signing request.
    ///
    /// The input request is left untouched, the signed copy is returned.
    pub fn sign(
        &self,
        req: &http::Request<SignableBody>,
        ctx: &SigningContext,
    ) -> Result<SignedRequest> {
        let mut signing_req = SigningRequest::build(req)?;

        let canonical = self.scheme.canonicalize(&mut signing_req, ctx)?;
        if log_enabled!(Level::Debug) {
            let canonical = ctx.redact(&format!("{canonical:?}"));
            debug!("{} canonical request: {canonical}", self.scheme.name());
        }

        let string_to_sign = self.scheme.build_string_to_sign(&canonical, ctx)?;
        if log_enabled!(Level::Debug) {
            let string_to_sign = ctx.redact(&string_to_sign);
            debug!("{} string to sign: {string_to_sign:?}", self.scheme.name());
        }

        let key = self
            .scheme
            .derive_key(&canonical, ctx, self.cache.as_ref())?;
        let signature = self.scheme.compute_signature(&key, &string_to_sign)?;

        self.scheme
            .format_signature_output(&mut signing_req, &canonical, ctx, &signature)?;
        signing_req.finish()
    }
}
