// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::path::PathBuf;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::RAGQ_API_URL, "RAGQ_API_URL");
    assert_eq!(vars::RAGQ_CONFIG_DIR, "RAGQ_CONFIG_DIR");
    assert_eq!(vars::RAGQ_DATA_DIR, "RAGQ_DATA_DIR");
    assert_eq!(vars::RAGQ_TOKEN, "RAGQ_TOKEN");
    assert_eq!(vars::RAGQ_LOG, "RAGQ_LOG");
    assert_eq!(vars::NO_COLOR, "NO_COLOR");
    assert_eq!(vars::COLOR, "COLOR");
}

#[test]
fn test_api_url_set_and_unset() {
    std::env::remove_var("RAGQ_API_URL");
    assert_eq!(api_url(), None);

    std::env::set_var("RAGQ_API_URL", "http://rag.internal:9000");
    assert_eq!(api_url(), Some("http://rag.internal:9000".to_string()));
    std::env::remove_var("RAGQ_API_URL");
}

#[test]
fn test_token_set_and_blank() {
    std::env::set_var("RAGQ_TOKEN", "abc123");
    assert_eq!(token(), Some("abc123".to_string()));

    std::env::set_var("RAGQ_TOKEN", "  ");
    assert_eq!(token(), None);
    std::env::remove_var("RAGQ_TOKEN");
}

#[test]
fn test_config_dir_set() {
    std::env::set_var("RAGQ_CONFIG_DIR", "/tmp/ragq-config");
    assert_eq!(config_dir(), Some(PathBuf::from("/tmp/ragq-config")));
    std::env::remove_var("RAGQ_CONFIG_DIR");
}

#[test]
fn test_data_dir_set() {
    std::env::set_var("RAGQ_DATA_DIR", "/tmp/ragq-data");
    assert_eq!(data_dir(), Some(PathBuf::from("/tmp/ragq-data")));
    std::env::remove_var("RAGQ_DATA_DIR");
}

#[test]
fn test_log_filter_set() {
    std::env::set_var("RAGQ_LOG", "ragq_core=debug");
    assert_eq!(log_filter(), Some("ragq_core=debug".to_string()));
    std::env::remove_var("RAGQ_LOG");
}

#[test]
fn test_no_color_only_for_one() {
    std::env::set_var("NO_COLOR", "true");
    assert!(!no_color());
    std::env::set_var("NO_COLOR", "1");
    assert!(no_color());
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_force_color_only_for_one() {
    std::env::set_var("COLOR", "yes");
    assert!(!force_color());
    std::env::set_var("COLOR", "1");
    assert!(force_color());
    std::env::remove_var("COLOR");
}
