mod common;
use crate::common::builders::SettingsFileBuilder;
use crate::common::{FakeLauncher, init_tracing};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use composer_bridge::config::SettingsLayer;
use composer_bridge::context::{ClientChanged, ComposerContext, SettingsChanged};
use composer_bridge::errors::ComposerError;
use composer_bridge::fs::MockFileSystem;

fn context(settings: composer_bridge::config::SettingsFile, fs: &MockFileSystem) -> ComposerContext {
    ComposerContext::new("/ws/app", Arc::new(settings), Arc::new(FakeLauncher::new()))
        .with_file_system(Arc::new(fs.clone()))
}

#[test]
fn resolve_without_executable_is_a_configuration_error() {
    init_tracing();
    let fs = MockFileSystem::new();
    let mut ctx = context(SettingsFileBuilder::new().build(), &fs);

    let err = ctx.resolve().unwrap_err();

    assert!(matches!(err, ComposerError::Configuration(_)));
    assert!(ctx.current_client().is_none());
}

#[test]
fn client_is_built_once_and_announced() {
    init_tracing();
    let fs = MockFileSystem::new();
    let mut ctx = context(
        SettingsFileBuilder::new()
            .executable("/usr/bin/composer")
            .build(),
        &fs,
    );
    let announced = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&announced);
    let _subscription = ctx.on_did_change_client(move |_: &ClientChanged| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let first = ctx.resolve().unwrap();
    let second = ctx.resolve().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(announced.load(Ordering::SeqCst), 1);
    assert_eq!(first.working_path(), Path::new("/ws/app"));
    assert_eq!(first.executable_path(), Some(Path::new("/usr/bin/composer")));
}

#[test]
fn folder_scope_overrides_window_scope() {
    init_tracing();
    let fs = MockFileSystem::new();
    let settings = SettingsFileBuilder::new()
        .executable("/usr/bin/composer")
        .working_path("backend")
        .folder(
            "/ws/app",
            SettingsLayer {
                executable_path: Some(PathBuf::from("/opt/composer.phar")),
                ..SettingsLayer::default()
            },
        )
        .build();
    let mut ctx = context(settings, &fs);

    let client = ctx.resolve().unwrap();

    assert_eq!(client.executable_path(), Some(Path::new("/opt/composer.phar")));
    assert_eq!(client.working_path(), Path::new("/ws/app/backend"));
}

#[test]
fn rebuild_replaces_an_existing_client() {
    init_tracing();
    let fs = MockFileSystem::new();
    let mut ctx = context(
        SettingsFileBuilder::new()
            .executable("/usr/bin/composer")
            .build(),
        &fs,
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = ctx.on_did_change_client(move |event: &ClientChanged| {
        sink.lock()
            .unwrap()
            .push(event.client.executable_path().map(Path::to_path_buf));
    });
    let old = ctx.resolve().unwrap();

    let new = ctx
        .rebuild(Arc::new(
            SettingsFileBuilder::new()
                .executable("/usr/local/bin/composer")
                .build(),
        ))
        .unwrap()
        .expect("a client existed, so one is rebuilt");

    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Some(PathBuf::from("/usr/bin/composer")),
            Some(PathBuf::from("/usr/local/bin/composer")),
        ]
    );
}

#[test]
fn rebuild_without_client_only_refreshes_settings() {
    init_tracing();
    let fs = MockFileSystem::new();
    let mut ctx = context(SettingsFileBuilder::new().build(), &fs);
    let encodings = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&encodings);
    let _subscription = ctx.on_did_change_settings(move |event: &SettingsChanged| {
        sink.lock().unwrap().push(event.settings.encoding.name());
    });

    let rebuilt = ctx
        .rebuild(Arc::new(SettingsFileBuilder::new().encoding("latin1").build()))
        .unwrap();

    assert!(rebuilt.is_none());
    assert!(ctx.current_client().is_none());
    assert_eq!(*encodings.lock().unwrap(), vec!["windows-1252"]);
}

#[test]
fn project_detection_follows_working_path() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/ws/app/backend/composer.json");
    let mut ctx = context(
        SettingsFileBuilder::new().working_path("backend").build(),
        &fs,
    );

    assert!(ctx.is_composer_project());
    assert_eq!(
        ctx.composer_json_path(),
        Some(PathBuf::from("/ws/app/backend/composer.json"))
    );

    fs.remove("/ws/app/backend/composer.json");
    assert!(!ctx.is_composer_project());
}

#[test]
fn marker_directory_is_not_a_project() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/ws/app/composer.json");
    let mut ctx = context(SettingsFileBuilder::new().build(), &fs);

    assert!(!ctx.is_composer_project());
}
