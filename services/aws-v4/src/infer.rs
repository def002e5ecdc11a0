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

//! Guess service and region from the request url.

use crate::constants::X_AMZ_TARGET;
use http::HeaderMap;

/// Infer `(service, region)` for a request to `host`.
///
/// Understands AWS endpoints plus the S3 compatible endpoints of Aliyun
/// OSS, Cloudflare R2 and Backblaze B2. Both values are empty if the host
/// is not recognised; the region may be empty on its own.
pub fn infer_service_region(host: &str, path: &str, headers: &HeaderMap) -> (String, String) {
    let host = host.to_ascii_lowercase();

    if let Some(prefix) = host.strip_suffix(".aliyuncs.com") {
        return match prefix.split('.').collect::<Vec<_>>().as_slice() {
            [bucket, region] if !bucket.is_empty() && !region.is_empty() => {
                ("s3".to_string(), region.to_string())
            }
            _ => ("s3".to_string(), "oss-cn-hangzhou".to_string()),
        };
    }

    if host.ends_with(".r2.cloudflarestorage.com") {
        return ("s3".to_string(), "auto".to_string());
    }

    if let Some(prefix) = host.strip_suffix(".backblazeb2.com") {
        let labels = prefix.split('.').collect::<Vec<_>>();
        let region = match labels.as_slice() {
            ["s3", region] | [_, "s3", region] => Some(*region),
            _ => None,
        };
        return match region {
            Some(region) if !region.is_empty() && labels.iter().all(|v| !v.is_empty()) => {
                ("s3".to_string(), region.to_string())
            }
            _ => (String::new(), String::new()),
        };
    }

    infer_aws(&host.replacen("dualstack.", "", 1), path, headers)
}

fn infer_aws(host: &str, path: &str, headers: &HeaderMap) -> (String, String) {
    let Some(prefix) = host
        .strip_suffix(".amazonaws.com")
        .or_else(|| host.strip_suffix(".amazonaws.com.cn"))
    else {
        return (String::new(), String::new());
    };

    // The two labels right before `amazonaws.com` are `<service>.<region>`,
    // a lone label is the service of a global endpoint.
    let labels = prefix.rsplitn(3, '.').collect::<Vec<_>>();
    let (mut service, mut region) = match labels.as_slice() {
        [service] => (service.to_string(), None),
        [region, service, ..] => (service.to_string(), Some(region.to_string())),
        [] => return (String::new(), String::new()),
    };
    if service.is_empty() {
        return (String::new(), String::new());
    }

    let current = region.clone();
    match current.as_deref() {
        Some("us-gov") => region = Some("us-gov-west-1".to_string()),
        Some("s3") | Some("s3-accelerate") => {
            region = Some("us-east-1".to_string());
            service = "s3".to_string();
        }
        _ if service == "iot" => {
            service = if host.starts_with("iot.") {
                "execute-api"
            } else if host.starts_with("data.jobs.iot.") {
                "iot-jobs-data"
            } else if path == "/mqtt" {
                "iotdevicegateway"
            } else {
                "iotdata"
            }
            .to_string();
        }
        _ if service == "autoscaling" => {
            let target = headers
                .get(X_AMZ_TARGET)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            match target.split('.').next() {
                Some("AnyScaleFrontendService") => service = "application-autoscaling".to_string(),
                Some("AnyScaleScalingPlannerFrontendService") => {
                    service = "autoscaling-plans".to_string()
                }
                _ => {}
            }
        }
        None if service.starts_with("s3-") => {
            let legacy = &service[3..];
            let legacy = legacy
                .strip_prefix("fips-")
                .or_else(|| legacy.strip_prefix("external-1"))
                .unwrap_or(legacy);
            region = Some(legacy.to_string());
            service = "s3".to_string();
        }
        _ if service.ends_with("-fips") => {
            service.truncate(service.len() - "-fips".len());
        }
        Some(r) if !r.is_empty() && ends_with_dash_digit(&service) && !ends_with_dash_digit(r) => {
            region = Some(std::mem::replace(&mut service, r.to_string()));
        }
        _ => {}
    }

    (service, region.unwrap_or_default())
}

fn ends_with_dash_digit(s: &str) -> bool {
    let bs = s.as_bytes();
    bs.len() >= 2 && bs[bs.len() - 1].is_ascii_digit() && bs[bs.len() - 2] == b'-'
}
