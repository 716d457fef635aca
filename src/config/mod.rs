use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/* =======================
CLI ARGS
======================= */

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the record for this account and persist it as the session
    Login {
        #[arg(long)]
        email: String,
    },
    /// Clear the persisted session
    Logout,
    /// Live dashboard for the signed-in user (admin roster or own task)
    Watch,
    /// Assign a task with a deadline to an employee (admin only)
    Assign {
        #[arg(long)]
        email: String,
        #[arg(long)]
        task: String,
        /// Deadline, e.g. "2025-03-21 02:30 PM" or "21-03-2025 02:30 PM"
        #[arg(long)]
        due: String,
    },
}

/* =======================
WORKFLOW ENDPOINTS
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub read_url: String,
    pub update_url: String,
    pub deadline_workflow_url: String,
}

/* =======================
POLLING
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl PollingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/* =======================
MAIN CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub workflow: WorkflowConfig,
    pub polling: PollingConfig,
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflow: WorkflowConfig {
                read_url:
                    "https://asia-south1.workflow.boltic.app/a5ee752b-0198-4d31-a3ef-c2831426c2c8"
                        .to_string(),
                update_url:
                    "https://asia-south1.workflow.boltic.app/59b8370f-fbb9-4da5-ac13-c946c56d6907"
                        .to_string(),
                deadline_workflow_url:
                    "https://asia-south1.api.boltic.io/service/webhook/temporal/v1.0/dbada971-3256-44e8-8531-d6d99c670580/workflows/execute/d034d31e-7b91-4721-8c1c-a1ddd9e96939"
                        .to_string(),
            },
            polling: PollingConfig {
                refresh_interval_secs: 5,
                request_timeout_secs: 10,
            },
            session_file: PathBuf::from(".chaser-session.json"),
        }
    }
}

/* =======================
LOAD / CREATE CONFIG
======================= */

impl Config {
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let cfg = Config::default();
            let content = serde_json::to_string_pretty(&cfg)?;
            std::fs::write(path, content)?;
            Ok(cfg)
        }
    }
}

// ==================================================
// ENVIRONMENT HELPERS
// ==================================================

impl Config {
    /// CHASER_SESSION_FILE wins over the configured session path
    pub fn session_file_override() -> Option<PathBuf> {
        std::env::var("CHASER_SESSION_FILE").ok().map(PathBuf::from)
    }

    pub fn session_path(&self) -> PathBuf {
        Self::session_file_override().unwrap_or_else(|| self.session_file.clone())
    }

    /// REFRESH_INTERVAL_SECS wins over the configured polling cadence
    pub fn refresh_interval(&self) -> Duration {
        std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.polling.refresh_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let cfg = Config::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.polling.refresh_interval_secs, 5);
        assert!(cfg.workflow.read_url.contains("workflow.boltic.app"));
    }

    #[test]
    fn load_round_trips_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut cfg = Config::default();
        cfg.polling.refresh_interval_secs = 30;
        std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.polling.refresh_interval_secs, 30);
    }
}
