//! Installing bunup into an existing project
//!
//! Runs the package manager's "add dev dependency" command in the project root
//! and streams its output.

use crate::runtime::check::PackageManager;
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Package installed by the init flow
pub const BUNUP_PACKAGE: &str = "bunup";

/// Timeout for installation (2 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Installs a dev dependency with a given package manager
pub struct DevDependencyInstaller {
    package_manager: PackageManager,
    project_root: PathBuf,
    package: &'static str,
}

impl DevDependencyInstaller {
    pub fn new(package_manager: PackageManager, project_root: &Path) -> Self {
        Self {
            package_manager,
            project_root: project_root.to_path_buf(),
            package: BUNUP_PACKAGE,
        }
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// The command string, for display and manual fallback
    pub fn install_command(&self) -> String {
        self.package_manager.add_dev_command(self.package)
    }

    /// Run the install, streaming stdout/stderr
    pub async fn install(&self) -> Result<()> {
        let cmd = self.install_command();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        tracing::debug!(command = %cmd, cwd = %self.project_root.display(), "spawning installer");
        let mut child = TokioCommand::new(self.package_manager.command())
            .args(self.package_manager.add_dev_args(self.package))
            .current_dir(&self.project_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to start {}: {}",
                    self.package_manager.command(),
                    e
                )
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture installer stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture installer stderr"))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let output_task = async {
            let mut stderr_open = true;
            loop {
                tokio::select! {
                    line = stdout_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => break,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                break;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Installation timed out after {} seconds",
                INSTALL_TIMEOUT.as_secs()
            );
        }

        match timeout(Duration::from_secs(10), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "{} exited with code {}",
                        self.package_manager.command(),
                        status.code().unwrap_or(-1)
                    );
                }
            }
            Ok(Err(e)) => {
                anyhow::bail!("Failed to wait for installer: {}", e);
            }
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!("Installation process hung");
            }
        }
    }
}
