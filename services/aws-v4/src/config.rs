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

use crate::constants::*;
use objsign_core::{Env, SigningContextBuilder};

/// Config for aws services.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(Debug))]
pub struct Config {
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `service` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - otherwise inferred from the request host while signing
    pub service: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
}

impl Config {
    /// Load config from env, values already set are kept.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        let envs = env.vars();

        if let Some(v) = envs.get(AWS_REGION).or_else(|| envs.get(AWS_DEFAULT_REGION)) {
            self.region.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(AWS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(AWS_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(AWS_SESSION_TOKEN) {
            self.session_token.get_or_insert(v.clone());
        }

        self
    }

    /// Start a [`SigningContextBuilder`] pre-filled with this config.
    ///
    /// Missing credentials are reported when the builder is built.
    pub fn context_builder(&self) -> SigningContextBuilder {
        let mut builder = objsign_core::SigningContext::builder();
        if let Some(v) = &self.access_key_id {
            builder = builder.access_key_id(v);
        }
        if let Some(v) = &self.secret_access_key {
            builder = builder.secret_access_key(v);
        }
        if let Some(v) = &self.session_token {
            builder = builder.session_token(v);
        }
        if let Some(v) = &self.service {
            builder = builder.service(v);
        }
        if let Some(v) = &self.region {
            builder = builder.region(v);
        }
        builder
    }
}
