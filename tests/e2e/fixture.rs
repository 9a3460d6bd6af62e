//! Shared fixture for end-to-end scenarios: an isolated data root, a runner
//! for the `partdb` binary, and step logging that shows up on failure.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use serde_json::Value;
use tempfile::TempDir;

pub struct CommandOutput {
    pub command: String,
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|err| {
            panic!(
                "`{}` did not print JSON: {err}\nstdout: {}\nstderr: {}",
                self.command, self.stdout, self.stderr
            )
        })
    }

    /// The `data` member of a robot-mode response.
    pub fn data(&self) -> Value {
        self.json()["data"].clone()
    }
}

pub struct E2EFixture {
    pub scenario: String,
    pub root: PathBuf,
    _temp_dir: TempDir,
    steps: Vec<String>,
    checkpoints: Vec<String>,
    started: Instant,
}

impl E2EFixture {
    pub fn new(scenario: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let root = temp_dir.path().join(".partdb");
        std::fs::create_dir_all(&root).expect("create data root");
        println!("[E2E] scenario {scenario} at {}", root.display());
        Self {
            scenario: scenario.to_string(),
            root,
            _temp_dir: temp_dir,
            steps: Vec::new(),
            checkpoints: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn log_step(&mut self, step: &str) {
        println!("[E2E:{}] step {}: {step}", self.scenario, self.steps.len() + 1);
        self.steps.push(step.to_string());
    }

    pub fn checkpoint(&mut self, name: &str) {
        println!(
            "[E2E:{}] checkpoint {name} after {:?}",
            self.scenario,
            self.started.elapsed()
        );
        self.checkpoints.push(name.to_string());
    }

    pub fn run_partdb(&self, args: &[&str]) -> CommandOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_partdb"))
            .args(args)
            .env("PARTDB_ROOT", &self.root)
            .env("PARTDB_EMBEDDING_BACKEND", "hash")
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("PARTDB_CONFIG")
            .env_remove("PARTDB_DB_PATH")
            .env_remove("RUST_LOG")
            .output()
            .expect("run partdb");

        CommandOutput {
            command: format!("partdb {}", args.join(" ")),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn assert_success(&self, output: &CommandOutput, what: &str) {
        assert!(
            output.success,
            "[{}] {what} failed: {}\nexit code: {}\nstdout: {}\nstderr: {}",
            self.scenario, output.command, output.exit_code, output.stdout, output.stderr
        );
    }

    pub fn assert_failure(&self, output: &CommandOutput, what: &str) {
        assert!(
            !output.success,
            "[{}] {what} unexpectedly succeeded: {}\nstdout: {}",
            self.scenario, output.command, output.stdout
        );
    }

    /// Run a robot-mode command that must succeed and return its `data`.
    pub fn robot(&self, args: &[&str]) -> Value {
        let mut argv = vec!["--robot"];
        argv.extend_from_slice(args);
        let output = self.run_partdb(&argv);
        self.assert_success(&output, &output.command);
        output.data()
    }

    pub fn generate_report(&self) {
        println!(
            "[E2E:{}] {} steps, {} checkpoints, {:?}",
            self.scenario,
            self.steps.len(),
            self.checkpoints.len(),
            self.started.elapsed()
        );
    }
}
