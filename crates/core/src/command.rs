// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-message command parsing.
//!
//! A control message body is tokenized by whitespace. One-token bodies
//! carry `shutdown`; two-token bodies carry a verb and an argument.
//! Anything else is not a command and is ignored by callers.

/// A parsed control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Shut down the whole kernel.
    Shutdown,
    /// Load and start a worker by registry identifier.
    LoadBot(String),
    /// Stop a named worker.
    StopBot(String),
    /// Register a named crawler, creating it from a known spec.
    AddCrawler(String),
    /// Unregister a named crawler.
    RemoveCrawler(String),
}

impl Command {
    /// Parse a message body into a command.
    ///
    /// Returns `None` for unknown verbs or unexpected token counts.
    pub fn parse(body: &str) -> Option<Command> {
        let tokens: Vec<&str> = body.split_whitespace().collect();
        match tokens.as_slice() {
            ["shutdown"] => Some(Command::Shutdown),
            ["loadbot", id] => Some(Command::LoadBot(id.to_string())),
            ["stopbot", name] => Some(Command::StopBot(name.to_string())),
            ["addcrawler", name] => Some(Command::AddCrawler(name.to_string())),
            ["removecrawler", name] => Some(Command::RemoveCrawler(name.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
