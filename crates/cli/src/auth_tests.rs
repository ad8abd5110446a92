// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

fn creds(token: &str) -> Credentials {
    Credentials {
        token: token.to_string(),
        username: Some("alice".to_string()),
    }
}

#[test]
fn test_load_without_file_is_none() {
    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(&temp.path().join("cfg"));

    store.save(&creds("tok-1")).unwrap();

    assert_eq!(store.load().unwrap(), Some(creds("tok-1")));
}

#[test]
fn test_save_overwrites_previous_session() {
    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());

    store.save(&creds("old")).unwrap();
    store.save(&creds("new")).unwrap();

    assert_eq!(store.load().unwrap().unwrap().token, "new");
}

#[cfg(unix)]
#[test]
fn test_credentials_are_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());
    store.save(&creds("secret")).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn test_save_tightens_existing_loose_file() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());
    fs::write(store.path(), "token = \"old\"\n").unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    store.save(&creds("secret")).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_clear_reports_whether_session_existed() {
    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());

    assert!(!store.clear().unwrap());
    store.save(&creds("tok")).unwrap();
    assert!(store.clear().unwrap());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_corrupt_credentials_is_config_error() {
    let temp = TempDir::new().unwrap();
    let store = TokenStore::new(temp.path());
    fs::write(store.path(), "token = ").unwrap();

    assert!(matches!(store.load().unwrap_err(), Error::Config(_)));
}
