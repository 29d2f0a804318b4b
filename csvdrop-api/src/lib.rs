// Copyright 2026 Csvdrop Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Csvdrop API Layer - HTTP surface of the file exchange service.
//!
//! This crate provides:
//! - `POST /upload` - multipart CSV upload with backup rotation
//! - `GET /download` - bearer-token-gated retrieval of the current file
//! - Middleware for download authorization
//! - The shared application state injected into handlers

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::ApiError;
pub use server::{create_router, AppState, DEFAULT_MAX_UPLOAD_SIZE};
