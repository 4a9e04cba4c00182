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

// Headers used in tuppari services.
pub const X_TUPPARI_DATE: &str = "x-tuppari-date";
pub const X_TUPPARI_OPERATION: &str = "x-tuppari-operation";

// Signing scheme.
pub const STRING_TO_SIGN_ALGORITHM: &str = "SHA256";
pub const AUTHORIZATION_ALGORITHM: &str = "HMAC-SHA256";
pub const SIGNING_KEY_PREFIX: &str = "TUPPARI";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Messages API.
pub const DEFAULT_ENDPOINT: &str = "https://api.tuppari.com";
pub const MESSAGES_PATH: &str = "/messages";
pub const PUBLISH_MESSAGE_OPERATION: &str = "PublishMessage";

// Env values used in tuppari services.
pub const TUPPARI_APPLICATION_ID: &str = "TUPPARI_APPLICATION_ID";
pub const TUPPARI_ACCESS_KEY_ID: &str = "TUPPARI_ACCESS_KEY_ID";
pub const TUPPARI_SECRET_ACCESS_KEY: &str = "TUPPARI_SECRET_ACCESS_KEY";
pub const TUPPARI_ENDPOINT: &str = "TUPPARI_ENDPOINT";
