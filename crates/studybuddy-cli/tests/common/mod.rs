//! Common utilities for CLI E2E tests.
//!
//! Every test gets its own data directory, so tests can run in parallel
//! without sharing a database or config file.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp data dir"),
        }
    }

    /// The SQLite file the CLI writes in this sandbox.
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("studybuddy.db")
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run_cli(&self, args: &[&str]) -> (String, String, i32) {
        self.run_cli_with_env(args, &[])
    }

    /// Like [`Sandbox::run_cli`] with extra environment variables.
    pub fn run_cli_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_studybuddy"))
            .args(args)
            .env("STUDYBUDDY_DATA_DIR", self.dir.path())
            .env_remove("STUDYBUDDY_LOG")
            .envs(envs.iter().copied())
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run_cli(args);
        assert_eq!(code, 0, "CLI command failed with code {code}: {args:?}\n{stderr}");
        stdout
    }

    /// Invoke a CLI command and expect failure.
    pub fn run_cli_failure(&self, args: &[&str]) -> (String, String, i32) {
        let (stdout, stderr, code) = self.run_cli(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        (stdout, stderr, code)
    }

    /// Run a command whose stdout is a single JSON document.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        parse_json(&self.run_cli_success(args))
    }
}

/// Parse JSON output from CLI.
pub fn parse_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> T {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Split stdout made of several pretty-printed JSON documents.
pub fn parse_json_stream(out: &str) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_str(out)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("Failed to parse JSON stream")
}
