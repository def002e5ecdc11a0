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

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use objsign_core::*;

mod client;
pub use client::{Client, RetryPolicy, MAX_BACKOFF};

#[cfg(feature = "default-client")]
pub use objsign_http_send_reqwest::ReqwestHttpSend;

#[cfg(feature = "aliyun")]
pub mod aliyun {
    pub use objsign_aliyun_oss::*;
}
#[cfg(feature = "aliyun")]
pub use objsign_aliyun_oss::RequestSigner as AliyunOssRequestSigner;

#[cfg(feature = "aws")]
pub mod aws {
    pub use objsign_aws_v4::*;
}
#[cfg(feature = "aws")]
pub use objsign_aws_v4::RequestSigner as AwsV4RequestSigner;
