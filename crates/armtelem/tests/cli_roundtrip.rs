use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use armtelem_proto::FRAME_SIZE;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "armtelem-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn armtelem(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_armtelem"))
        .args(args)
        .output()
        .expect("armtelem should run")
}

/// Last JSON line of an analyze run is the summary record.
fn summary_of(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let last = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .last()
        .expect("analyze should print at least the summary");
    let value: serde_json::Value = serde_json::from_str(last).expect("summary should be JSON");
    assert_eq!(value["record"], "summary");
    value
}

#[test]
fn simulate_then_analyze_accounts_for_every_byte() {
    let dir = unique_temp_dir("roundtrip");
    let data = dir.join("frames.bin");
    let data_arg = data.to_str().expect("temp path should be utf-8");

    let out = armtelem(&[
        "simulate",
        "-n",
        "50",
        "--seed",
        "7",
        "--noise-probability",
        "0.2",
        "--output",
        data_arg,
    ]);
    assert!(out.status.success(), "simulate failed: {out:?}");

    let stream_len = std::fs::metadata(&data).expect("stream file should exist").len();
    assert!(stream_len >= 50 * FRAME_SIZE as u64);

    let out = armtelem(&["analyze", data_arg, "--format", "json", "--threshold", "5.0"]);
    assert!(out.status.success(), "analyze failed: {out:?}");

    let summary = summary_of(&out.stdout);
    assert_eq!(summary["valid_frames"], 50);
    assert_eq!(summary["bytes_total"], stream_len);
    assert_eq!(
        summary["noise_bytes"],
        stream_len - 50 * FRAME_SIZE as u64
    );
    assert_eq!(summary["sequence_min"], 0);
    assert_eq!(summary["sequence_max"], 49);
    assert_eq!(summary["estimated_lost_frames"], 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn identical_seeds_reproduce_identical_streams() {
    let dir = unique_temp_dir("seeded");
    let first = dir.join("a.bin");
    let second = dir.join("b.bin");

    for path in [&first, &second] {
        let out = armtelem(&[
            "simulate",
            "-n",
            "30",
            "--seed",
            "99",
            "--noise-probability",
            "0.3",
            "--alert-probability",
            "0.1",
            "--output",
            path.to_str().expect("temp path should be utf-8"),
        ]);
        assert!(out.status.success(), "simulate failed: {out:?}");
    }

    let a = std::fs::read(&first).expect("first stream readable");
    let b = std::fs::read(&second).expect("second stream readable");
    assert_eq!(a, b);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn injected_alerts_reach_the_summary() {
    let dir = unique_temp_dir("alerts");
    let data = dir.join("frames.bin");
    let data_arg = data.to_str().expect("temp path should be utf-8");

    let out = armtelem(&[
        "simulate",
        "-n",
        "20",
        "--seed",
        "3",
        "--noise-probability",
        "0",
        "--alert-probability",
        "1",
        "--output",
        data_arg,
    ]);
    assert!(out.status.success(), "simulate failed: {out:?}");

    // Alert injections draw 5.5-8.0 A, all above the 5 A threshold.
    let out = armtelem(&["analyze", data_arg, "--format", "json"]);
    assert!(out.status.success(), "analyze failed: {out:?}");
    let summary = summary_of(&out.stdout);
    assert_eq!(summary["alert_frames"], 20);
    assert_eq!(summary["noise_bytes"], 0);

    // A threshold above the whole band reports none.
    let out = armtelem(&[
        "analyze",
        data_arg,
        "--format",
        "json",
        "--threshold",
        "100",
    ]);
    assert!(out.status.success());
    assert_eq!(summary_of(&out.stdout)["alert_frames"], 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn analyze_reads_stdin_when_input_is_dash() {
    let dir = unique_temp_dir("stdin");
    let data = dir.join("frames.bin");
    let data_arg = data.to_str().expect("temp path should be utf-8");

    let out = armtelem(&[
        "simulate",
        "-n",
        "5",
        "--seed",
        "1",
        "--noise-probability",
        "0",
        "--output",
        data_arg,
    ]);
    assert!(out.status.success(), "simulate failed: {out:?}");
    let stream = std::fs::read(&data).expect("stream readable");

    let mut child = Command::new(env!("CARGO_BIN_EXE_armtelem"))
        .args(["analyze", "-", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("analyze should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&stream)
        .expect("stream should be writable");
    let out = child.wait_with_output().expect("analyze should finish");

    assert!(out.status.success(), "analyze failed: {out:?}");
    assert_eq!(summary_of(&out.stdout)["valid_frames"], 5);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_input_exits_with_data_invalid() {
    let dir = unique_temp_dir("empty");
    let data = dir.join("empty.bin");
    std::fs::write(&data, []).expect("empty file should be creatable");

    let out = armtelem(&[
        "analyze",
        data.to_str().expect("temp path should be utf-8"),
    ]);
    assert_eq!(out.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bad_flag_values_exit_with_usage() {
    let out = armtelem(&["simulate", "-n", "1", "--rate", "0"]);
    assert_eq!(out.status.code(), Some(64));

    let out = armtelem(&["simulate", "-n", "1", "--noise-probability", "1.5"]);
    assert_eq!(out.status.code(), Some(64));

    let out = armtelem(&["analyze", "-", "--threshold=-1"]);
    assert_eq!(out.status.code(), Some(64));
}

#[test]
fn pretty_report_carries_per_frame_lines_and_summary() {
    let dir = unique_temp_dir("pretty");
    let data = dir.join("frames.bin");
    let data_arg = data.to_str().expect("temp path should be utf-8");

    let out = armtelem(&[
        "simulate",
        "-n",
        "3",
        "--seed",
        "5",
        "--noise-probability",
        "0",
        "--output",
        data_arg,
    ]);
    assert!(out.status.success(), "simulate failed: {out:?}");

    let out = armtelem(&["analyze", data_arg, "--format", "pretty"]);
    assert!(out.status.success(), "analyze failed: {out:?}");
    let text = String::from_utf8_lossy(&out.stdout);

    assert!(text.contains("frame 000"));
    assert!(text.contains("axis 1"));
    assert!(text.contains("axis 6"));
    assert!(text.contains("STATISTICS"));

    let _ = std::fs::remove_dir_all(&dir);
}
