// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Execution of helm commands

use crate::error::{Result, ShepherdError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs a helm invocation and returns its stdout
#[async_trait]
pub trait HelmExecutor: Send + Sync {
    async fn execute(&self, args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<Vec<u8>>;
}

/// Executes the helm binary as a subprocess
#[derive(Debug, Clone)]
pub struct HelmCli {
    binary: String,
}

impl HelmCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for HelmCli {
    fn default() -> Self {
        Self::new("helm")
    }
}

#[async_trait]
impl HelmExecutor for HelmCli {
    async fn execute(&self, args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!("Running `{}`", command);

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        if let Some(input) = stdin {
            if let Some(mut child_stdin) = child.stdin.take() {
                match child_stdin.write_all(&input).await {
                    Ok(()) => {}
                    // helm exited before reading its values; its exit status says why
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        warn!("helm closed stdin early while running `{}`", command)
                    }
                    Err(e) => return Err(e.into()),
                }
                // Closing stdin lets helm finish reading values
                drop(child_stdin);
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ShepherdError::HelmCommand {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
