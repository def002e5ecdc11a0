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

//! Utility functions and types.

use crate::request::QUERY_ENCODE_SET;
use percent_encoding::utf8_percent_encode;
use std::fmt::Debug;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// Redacted output still lets users tell two keys apart in debug logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// ```
/// use objsign_core::utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  a   b\t\tc "), "a b c");
/// ```
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Mask every occurrence of `secret` in `text`, raw or query encoded.
///
/// ```
/// use objsign_core::utils::redact_secret;
///
/// assert_eq!(
///     redact_secret("token=abc%2Bdefghijklm", "abc+defghijklm"),
///     "token=abc***klm"
/// );
/// ```
pub fn redact_secret(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }

    let masked = format!("{:?}", Redact::from(secret));
    let encoded = utf8_percent_encode(secret, &QUERY_ENCODE_SET).to_string();
    text.replace(secret, &masked).replace(&encoded, &masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_secret() {
        let token = "FwoGZXIvYXdzEJr//token=";
        let text = format!(
            "x-amz-security-token:{token}\nX-Amz-Security-Token=FwoGZXIvYXdzEJr%2F%2Ftoken%3D"
        );

        let redacted = redact_secret(&text, token);
        assert_eq!(
            redacted,
            "x-amz-security-token:Fwo***en=\nX-Amz-Security-Token=Fwo***en="
        );
        assert_eq!(redact_secret("nothing here", ""), "nothing here");
    }

    #[test]
    fn test_redact() {
        let cases = vec![
            ("Short", "***"),
            ("Hello World!", "Hel***ld!"),
            ("This is a longer string", "Thi***ing"),
            ("", "EMPTY"),
            ("HelloWorld", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("value"), "value");
        assert_eq!(collapse_whitespace(" a  b "), "a b");
        assert_eq!(collapse_whitespace("a\n\tb"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
