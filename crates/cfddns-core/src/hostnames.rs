//! Hostname list input
//!
//! One fully-qualified domain name per line. Surrounding whitespace is trimmed
//! and blank lines are skipped; order is preserved.

use std::path::Path;

use crate::error::{Error, Result};

/// Ordered list of hostnames processed by every pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameList {
    names: Vec<String>,
}

impl HostnameList {
    /// Build a list from already-split names
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            return Err(Error::config("hostname list is empty"));
        }

        Ok(Self { names })
    }

    /// Parse newline-delimited text
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(text.lines())
    }

    /// Read and parse a hostname list file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Iterate over the hostnames in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
