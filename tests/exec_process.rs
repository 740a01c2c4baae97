#![cfg(unix)]

mod common;
use crate::common::{init_tracing, owned, with_timeout};

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use composer_bridge::errors::{ComposerError, ComposerErrorCode};
use composer_bridge::exec::{
    ExecutionOptions, OutputChunk, ProgressFn, TextEncoding, cancellation, run_to_completion,
    run_with_progress, spawn,
};
use composer_bridge::types::OutputChannel;

const SH: &str = "/bin/sh";

fn sh(script: &str) -> Vec<String> {
    owned(&["-c", script])
}

fn recorder() -> (Arc<Mutex<Vec<OutputChunk>>>, ProgressFn) {
    let chunks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&chunks);
    let progress: ProgressFn = Arc::new(move |chunk: &OutputChunk| {
        sink.lock().unwrap().push(chunk.clone());
    });
    (chunks, progress)
}

fn joined(chunks: &[OutputChunk], channel: OutputChannel) -> String {
    chunks
        .iter()
        .filter(|c| c.channel == channel)
        .map(|c| c.text.as_str())
        .collect()
}

#[tokio::test]
async fn collect_reports_exit_code_and_both_pipes() {
    init_tracing();
    let options = ExecutionOptions::default();
    let child = spawn(
        Path::new(SH),
        &sh("printf out; printf err >&2; exit 3"),
        &options,
    )
    .unwrap();

    let result = with_timeout(run_to_completion(child, &options, None))
        .await
        .unwrap();

    assert_eq!(result.exit_code, Some(3));
    assert_eq!(result.stdout, "out");
    assert_eq!(result.stderr, "err");
    assert!(!result.success());
}

#[tokio::test]
async fn collect_decodes_primary_output_with_configured_encoding() {
    init_tracing();
    let options = ExecutionOptions {
        encoding: TextEncoding::for_label("windows-1252"),
        ..ExecutionOptions::default()
    };
    // 0xE9 is "é" in windows-1252.
    let child = spawn(Path::new(SH), &sh(r"printf '\351'"), &options).unwrap();

    let result = with_timeout(run_to_completion(child, &options, None))
        .await
        .unwrap();

    assert_eq!(result.stdout, "é");
    assert!(result.success());
}

#[tokio::test]
async fn diagnostics_are_utf8_when_collected_but_follow_encoding_when_streamed() {
    init_tracing();
    let options = ExecutionOptions {
        encoding: TextEncoding::for_label("windows-1252"),
        ..ExecutionOptions::default()
    };
    // 0xE9 alone is invalid UTF-8 but "é" in windows-1252.
    let script = sh(r"printf '\351' >&2");

    let child = spawn(Path::new(SH), &script, &options).unwrap();
    let collected = with_timeout(run_to_completion(child, &options, None))
        .await
        .unwrap();
    assert_eq!(collected.stderr, "\u{FFFD}");

    let child = spawn(Path::new(SH), &script, &options).unwrap();
    let (chunks, progress) = recorder();
    let streamed = with_timeout(run_with_progress(child, &options, progress, None))
        .await
        .unwrap();
    assert_eq!(streamed.stderr, "é");
    assert_eq!(joined(&chunks.lock().unwrap(), OutputChannel::Diagnostic), "é");
}

#[tokio::test]
async fn extra_env_and_working_directory_apply_to_child() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut options = ExecutionOptions::in_dir(dir.path());
    options
        .extra_env
        .insert("BRIDGE_TEST_VALUE".to_string(), "hello".to_string());

    let child = spawn(
        Path::new(SH),
        &sh(r#"printf '%s\n' "$BRIDGE_TEST_VALUE"; pwd"#),
        &options,
    )
    .unwrap();
    let result = with_timeout(run_to_completion(child, &options, None))
        .await
        .unwrap();

    let mut lines = result.stdout.lines();
    assert_eq!(lines.next(), Some("hello"));
    let cwd = lines.next().unwrap();
    assert_eq!(
        std::fs::canonicalize(cwd).unwrap(),
        std::fs::canonicalize(dir.path()).unwrap()
    );
    assert!(std::env::var("BRIDGE_TEST_VALUE").is_err());
}

#[tokio::test]
async fn stdin_payload_is_written_then_closed() {
    init_tracing();
    let options = ExecutionOptions {
        stdin: Some(b"from stdin".to_vec()),
        ..ExecutionOptions::default()
    };
    let child = spawn(Path::new("cat"), &[], &options).unwrap();

    let result = with_timeout(run_to_completion(child, &options, None))
        .await
        .unwrap();

    assert_eq!(result.stdout, "from stdin");
    assert_eq!(result.exit_code, Some(0));
}

#[tokio::test]
async fn stream_aggregate_equals_delivered_chunks() {
    init_tracing();
    let options = ExecutionOptions::default();
    let child = spawn(
        Path::new(SH),
        &sh("echo one; sleep 0.05; echo two >&2; sleep 0.05; echo three"),
        &options,
    )
    .unwrap();
    let (chunks, progress) = recorder();

    let result = with_timeout(run_with_progress(child, &options, progress, None))
        .await
        .unwrap();

    let chunks = chunks.lock().unwrap();
    assert_eq!(result.stdout, "one\nthree\n");
    assert_eq!(result.stderr, "two\n");
    assert_eq!(joined(&chunks, OutputChannel::Primary), result.stdout);
    assert_eq!(joined(&chunks, OutputChannel::Diagnostic), result.stderr);
    assert!(chunks.iter().all(|c| !c.text.is_empty()));
}

#[tokio::test]
async fn stream_keeps_multibyte_character_split_across_reads() {
    init_tracing();
    let options = ExecutionOptions::default();
    // "é" is 0xC3 0xA9 in UTF-8; emit the two bytes in separate writes.
    let child = spawn(
        Path::new(SH),
        &sh(r"printf '\303'; sleep 0.1; printf '\251'"),
        &options,
    )
    .unwrap();
    let (chunks, progress) = recorder();

    let result = with_timeout(run_with_progress(child, &options, progress, None))
        .await
        .unwrap();

    assert_eq!(result.stdout, "é");
    assert!(
        chunks
            .lock()
            .unwrap()
            .iter()
            .all(|c| !c.text.contains('\u{FFFD}'))
    );
}

#[tokio::test]
async fn missing_executable_is_tool_not_found() {
    init_tracing();
    let err = spawn(
        Path::new("/definitely/not/here/composer"),
        &owned(&["about"]),
        &ExecutionOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.code(), Some(ComposerErrorCode::ToolNotFound));
    assert!(err.to_string().contains("ENOENT"));
}

#[tokio::test]
async fn cancellation_kills_the_child() {
    init_tracing();
    let options = ExecutionOptions::default();
    let child = spawn(Path::new(SH), &sh("sleep 30"), &options).unwrap();
    let (handle, signal) = cancellation();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let outcome = with_timeout(run_to_completion(child, &options, Some(signal))).await;
    assert!(matches!(outcome, Err(ComposerError::Cancelled)));
}

#[tokio::test]
async fn dropped_cancel_handle_never_cancels() {
    init_tracing();
    let options = ExecutionOptions::default();
    let child = spawn(Path::new(SH), &sh("sleep 0.1; printf done"), &options).unwrap();
    let (handle, signal) = cancellation();
    drop(handle);

    let (_, progress) = recorder();
    let result = with_timeout(run_with_progress(child, &options, progress, Some(signal)))
        .await
        .unwrap();
    assert_eq!(result.stdout, "done");
}
