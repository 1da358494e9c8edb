// ABOUTME: Configuration module for server settings loaded from the environment
// ABOUTME: Environment-only configuration approach; no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management for the Repforge server

pub mod environment;

pub use environment::{
    BillingConfig, CorsConfig, DatabaseConfig, LlmConfig, LlmProviderType, ServerConfig,
};
