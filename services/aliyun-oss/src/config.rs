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

use super::constants::*;
use objsign_core::{Env, SigningContext, SigningContextBuilder};

/// Config carries all the configuration for Aliyun OSS.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(Debug))]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `security_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_SECURITY_TOKEN`]
    pub security_token: Option<String>,
    /// `bucket` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`OSS_BUCKET_NAME`]
    pub bucket: Option<String>,
    /// `region` like `oss-cn-hangzhou` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`OSS_REGION`]
    pub region: Option<String>,
}

impl Config {
    /// Load config from env, values already set are kept.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        let envs = env.vars();

        if let Some(v) = envs.get(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(ALIBABA_CLOUD_SECURITY_TOKEN) {
            self.security_token.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(OSS_BUCKET_NAME) {
            self.bucket.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(OSS_REGION) {
            self.region.get_or_insert(v.clone());
        }

        self
    }

    /// Virtual hosted endpoint of the bucket: `https://<bucket>.<region>.aliyuncs.com`.
    pub fn endpoint(&self) -> Option<String> {
        match (self.bucket.as_deref(), self.region.as_deref()) {
            (Some(bucket), Some(region)) if !bucket.is_empty() && !region.is_empty() => {
                Some(format!("https://{bucket}.{region}.aliyuncs.com"))
            }
            _ => None,
        }
    }

    /// Start a [`SigningContextBuilder`] pre-filled with this config.
    ///
    /// The region is set as well, so the same context can sign through the
    /// S3 compatible endpoint with SigV4.
    pub fn context_builder(&self) -> SigningContextBuilder {
        let mut builder = SigningContext::builder();
        if let Some(v) = &self.access_key_id {
            builder = builder.access_key_id(v);
        }
        if let Some(v) = &self.access_key_secret {
            builder = builder.secret_access_key(v);
        }
        if let Some(v) = &self.security_token {
            builder = builder.session_token(v);
        }
        if let Some(v) = &self.region {
            builder = builder.region(v);
        }
        builder
    }
}
