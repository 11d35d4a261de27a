//! Control of an external bag player process.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::{Child, Command};

pub const DEFAULT_PLAYER_PROGRAM: &str = "rosbag";

#[derive(thiserror::Error, Debug)]
pub enum BagError {
    #[error("could not read bag metadata")]
    Unreadable,
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Playback switches, mapped one-to-one onto player arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BagOptions {
    pub immediate: bool,
    pub loop_playback: bool,
    pub publish_clock: bool,
    pub clock_hz: Option<i64>,
    pub queue_size: i64,
    pub rate: f64,
}

impl Default for BagOptions {
    fn default() -> Self {
        Self {
            immediate: false,
            loop_playback: false,
            publish_clock: false,
            clock_hz: None,
            queue_size: 100,
            rate: 1.0,
        }
    }
}

impl BagOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.immediate {
            args.push("--immediate".to_string());
        }
        if self.loop_playback {
            args.push("--loop".to_string());
        }
        if self.publish_clock {
            args.push("--clock".to_string());
        }
        if let Some(hz) = self.clock_hz {
            args.push(format!("--hz={hz}"));
        }
        args.push(format!("--queue={}", self.queue_size));
        args.push(format!("--rate={}", self.rate));
        args
    }
}

/// Metadata from `<program> info --yaml`. Fields the player does not report
/// stay None; anything it reports beyond these lands in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct BagInfo {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub topics: Vec<BagTopicInfo>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BagTopicInfo {
    pub topic: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub frequency: Option<f64>,
}

/// Drives one bag file through an external player binary.
pub struct BagPlayer {
    program: String,
    pub path: String,
    pub options: BagOptions,
    child: Option<Child>,
}

impl BagPlayer {
    pub fn new(path: &str) -> Self {
        Self::with_program(DEFAULT_PLAYER_PROGRAM, path)
    }

    pub fn with_program(program: &str, path: &str) -> Self {
        Self {
            program: program.to_string(),
            path: path.to_string(),
            options: BagOptions::default(),
            child: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Asks the player for the bag's metadata. An empty or unparseable
    /// answer reads as an unreadable bag, whatever the underlying cause.
    pub fn info(&self) -> Result<BagInfo, BagError> {
        let output = Command::new(&self.program)
            .args(["info", "--yaml"])
            .arg(&self.path)
            .output()
            .map_err(|source| BagError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if output.stdout.is_empty() {
            return Err(BagError::Unreadable);
        }
        serde_yaml::from_slice(&output.stdout).map_err(|_| BagError::Unreadable)
    }

    /// Starts playback in its own process group so the player and anything
    /// it forks can be interrupted together. Does nothing while a previous
    /// playback is still running.
    pub fn play(&mut self) -> Result<(), BagError> {
        if self.is_playing() {
            return Ok(());
        }
        let mut command = Command::new(&self.program);
        command.arg("play").arg(&self.path).args(self.options.to_args());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let child = command.spawn().map_err(|source| BagError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        log::info!("playing '{}' (pid {})", self.path, child.id());
        self.child = Some(child);
        Ok(())
    }

    /// Interrupts playback and reaps the child. Safe to call when playback
    /// already ended on its own.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            #[cfg(unix)]
            {
                // Signal the whole group; ESRCH just means it already exited.
                let _ = unsafe { libc::kill(-(child.id() as i32), libc::SIGINT) };
            }
            #[cfg(not(unix))]
            {
                let _ = child.kill();
            }
            let _ = child.wait();
            log::info!("stopped playback of '{}'", self.path);
        }
    }

    pub fn is_playing(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                log::debug!("player for '{}' exited: {status}", self.path);
                self.child = None;
                false
            }
            Err(_) => false,
        }
    }
}

impl Drop for BagPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
