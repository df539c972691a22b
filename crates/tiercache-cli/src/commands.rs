//! Script commands executed against a string-keyed hierarchy.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! add-level 3 lru
//! put key1 value1
//! get key1
//! remove-level 0
//! invalidate key1
//! clear
//! show
//! stats
//! ```

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tiercache::{EvictionPolicy, TieredCache};
use tracing::debug;

/// Hierarchy type driven by the CLI.
pub type StringCache = TieredCache<String, String>;

/// A single script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    AddLevel { capacity: usize, policy: EvictionPolicy },
    RemoveLevel { index: usize },
    Invalidate { key: String },
    Clear,
    Show,
    Stats,
}

impl Command {
    /// Parse one script line; blank lines and comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();

        let command = match parts.as_slice() {
            ["put", key, value] => Self::Put {
                key: key.to_string(),
                value: value.to_string(),
            },
            ["get", key] => Self::Get {
                key: key.to_string(),
            },
            ["add-level", capacity, policy] => Self::AddLevel {
                capacity: capacity
                    .parse()
                    .with_context(|| format!("Invalid capacity '{}'", capacity))?,
                policy: policy.parse()?,
            },
            ["remove-level", index] => Self::RemoveLevel {
                index: index
                    .parse()
                    .with_context(|| format!("Invalid level index '{}'", index))?,
            },
            ["invalidate", key] => Self::Invalidate {
                key: key.to_string(),
            },
            ["clear"] => Self::Clear,
            ["show"] => Self::Show,
            ["stats"] => Self::Stats,
            _ => bail!("Unrecognized command: '{}'", s),
        };

        Ok(command)
    }
}

/// Run one command, writing any output to `out`.
pub fn execute(cache: &StringCache, command: Command, out: &mut impl Write) -> Result<()> {
    debug!("Executing {:?}", command);

    match command {
        Command::Put { key, value } => cache.put(key, value),
        Command::Get { key } => match cache.get(&key) {
            Some(value) => writeln!(out, "{}", value)?,
            None => writeln!(out, "(absent)")?,
        },
        Command::AddLevel { capacity, policy } => {
            let index = cache.add_level(capacity, policy)?;
            writeln!(out, "added level {}", index)?;
        }
        Command::RemoveLevel { index } => cache.remove_level(index)?,
        Command::Invalidate { key } => {
            let found = cache.invalidate(&key);
            writeln!(out, "{}", if found { "invalidated" } else { "(absent)" })?;
        }
        Command::Clear => cache.clear(),
        Command::Show => write!(out, "{}", cache.snapshot())?,
        Command::Stats => {
            let stats = cache.stats();
            writeln!(
                out,
                "gets={} hits={} misses={} puts={} promotions={} hit_rate={:.2}",
                stats.total_gets,
                stats.hits,
                stats.misses,
                stats.total_puts,
                stats.promotions,
                stats.hit_rate()
            )?;
        }
    }

    Ok(())
}

/// Execute every command in `input`; returns how many commands ran.
///
/// Stops at the first failing line, reporting its line number.
pub fn replay(cache: &StringCache, input: impl BufRead, out: &mut impl Write) -> Result<usize> {
    let mut executed = 0;

    for (number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read script")?;
        let line_no = number + 1;

        let Some(command) =
            Command::parse_line(&line).with_context(|| format!("line {}", line_no))?
        else {
            continue;
        };

        execute(cache, command, out).with_context(|| format!("line {}", line_no))?;
        executed += 1;
    }

    Ok(executed)
}

/// Reference scenario: fill level 0 past capacity, then read back a key.
pub fn run_demo(cache: &StringCache, out: &mut impl Write) -> Result<()> {
    if cache.is_empty() {
        bail!("Demo needs at least one cache level");
    }

    for i in 1..=4 {
        cache.put(format!("key{}", i), format!("value{}", i));
    }

    match cache.get(&"key2".to_string()) {
        Some(value) => writeln!(out, "{}", value)?,
        None => writeln!(out, "(absent)")?,
    }
    write!(out, "{}", cache.snapshot())?;

    Ok(())
}
