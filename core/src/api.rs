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

use crate::{Result, SigningContext, SigningKeyCache, SigningRequest};
use std::fmt::Debug;

/// SigningScheme is the trait used by [`crate::Signer`] to sign a request.
///
/// The signer drives every scheme through the same steps:
///
/// 1. [`canonicalize`](SigningScheme::canonicalize) adds the scheme's own
///    headers or query pairs to the working request and returns its
///    canonical form.
/// 2. [`build_string_to_sign`](SigningScheme::build_string_to_sign) turns
///    the canonical form into the string to sign.
/// 3. [`derive_key`](SigningScheme::derive_key) returns the key to sign with.
/// 4. [`compute_signature`](SigningScheme::compute_signature) signs the
///    string with the key.
/// 5. [`format_signature_output`](SigningScheme::format_signature_output)
///    writes the signature into headers or query.
pub trait SigningScheme: Debug + Send + Sync + 'static {
    /// Canonical form produced by this scheme.
    type Canonical: Debug;

    /// Name of this scheme, used in logs.
    fn name(&self) -> &'static str;

    /// Prepare the request and build its canonical form.
    fn canonicalize(
        &self,
        req: &mut SigningRequest,
        ctx: &SigningContext,
    ) -> Result<Self::Canonical>;

    /// Build the string to sign.
    fn build_string_to_sign(
        &self,
        canonical: &Self::Canonical,
        ctx: &SigningContext,
    ) -> Result<String>;

    /// Derive the key used to sign the string.
    ///
    /// Schemes that derive keys through a chain of HMACs should memoize them
    /// in `cache`. A cache miss must never change the result.
    fn derive_key(
        &self,
        canonical: &Self::Canonical,
        ctx: &SigningContext,
        cache: &dyn SigningKeyCache,
    ) -> Result<Vec<u8>>;

    /// Sign `string_to_sign` with `key` and encode the signature.
    fn compute_signature(&self, key: &[u8], string_to_sign: &str) -> Result<String>;

    /// Write the signature into the request.
    fn format_signature_output(
        &self,
        req: &mut SigningRequest,
        canonical: &Self::Canonical,
        ctx: &SigningContext,
        signature: &str,
    ) -> Result<()>;
}
