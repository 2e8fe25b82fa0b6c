//! Interface selection.
//!
//! Name lists match by exact, case-sensitive equality. Patterns are regular
//! expressions matched anywhere in the name; anchor them to match whole names.

use crate::error::{ExporterError, Result};
use crate::inspector::InterfaceHandle;
use regex::Regex;
use std::collections::BTreeSet;

/// Which interfaces a scrape looks at.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    exclude_names: BTreeSet<String>,
    include_names: BTreeSet<String>,
    exclude_pattern: Option<Regex>,
    include_pattern: Option<Regex>,
    exclude_admin_down: bool,
}

impl FilterConfig {
    /// A filter that only drops loopback interfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from the raw command-line values.
    ///
    /// Name lists are comma separated; empty patterns count as unset.
    pub fn from_lists(
        exclude_names: &str,
        include_names: &str,
        exclude_pattern: &str,
        include_pattern: &str,
        exclude_admin_down: bool,
    ) -> Result<Self> {
        Self::new()
            .with_excluded_names(split_name_list(exclude_names))
            .with_included_names(split_name_list(include_names))
            .with_exclude_admin_down(exclude_admin_down)
            .with_exclude_pattern(exclude_pattern)?
            .with_include_pattern(include_pattern)
    }

    /// Add names to the exclude list. Names are trimmed, blanks are ignored.
    pub fn with_excluded_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_names.extend(clean_names(names));
        self
    }

    /// Add names to the include list. Names are trimmed, blanks are ignored.
    pub fn with_included_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_names.extend(clean_names(names));
        self
    }

    pub fn with_exclude_pattern(mut self, pattern: &str) -> Result<Self> {
        self.exclude_pattern = compile(pattern, "exclude")?;
        Ok(self)
    }

    pub fn with_include_pattern(mut self, pattern: &str) -> Result<Self> {
        self.include_pattern = compile(pattern, "include")?;
        Ok(self)
    }

    pub fn with_exclude_admin_down(mut self, exclude: bool) -> Self {
        self.exclude_admin_down = exclude;
        self
    }

    pub fn excluded_names(&self) -> impl Iterator<Item = &str> {
        self.exclude_names.iter().map(String::as_str)
    }

    pub fn included_names(&self) -> impl Iterator<Item = &str> {
        self.include_names.iter().map(String::as_str)
    }

    pub fn exclude_pattern(&self) -> Option<&str> {
        self.exclude_pattern.as_ref().map(Regex::as_str)
    }

    pub fn include_pattern(&self) -> Option<&str> {
        self.include_pattern.as_ref().map(Regex::as_str)
    }

    pub fn excludes_admin_down(&self) -> bool {
        self.exclude_admin_down
    }

    /// Reject contradictory settings.
    pub fn validate(&self) -> Result<()> {
        if !self.exclude_names.is_empty() && !self.include_names.is_empty() {
            return Err(ExporterError::config_error(
                "Cannot include and exclude interfaces at the same time",
            ));
        }
        Ok(())
    }

    /// Names of the interfaces to scrape, in enumeration order.
    pub fn select(&self, interfaces: &[InterfaceHandle]) -> Result<Vec<String>> {
        self.validate()?;
        Ok(interfaces
            .iter()
            .filter(|iface| self.admits(iface))
            .map(|iface| iface.name.clone())
            .collect())
    }

    fn admits(&self, iface: &InterfaceHandle) -> bool {
        if iface.is_loopback {
            return false;
        }
        if self.exclude_admin_down && iface.is_admin_down() {
            return false;
        }
        if !self.exclude_names.is_empty() && self.exclude_names.contains(&iface.name) {
            return false;
        }
        if !self.include_names.is_empty() && !self.include_names.contains(&iface.name) {
            return false;
        }
        if let Some(pattern) = &self.exclude_pattern {
            if pattern.is_match(&iface.name) {
                return false;
            }
        }
        if let Some(pattern) = &self.include_pattern {
            if !pattern.is_match(&iface.name) {
                return false;
            }
        }
        true
    }
}

/// Split a comma separated list of interface names.
pub fn split_name_list(raw: &str) -> Vec<String> {
    clean_names(raw.split(',')).collect()
}

fn clean_names<I, S>(names: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn compile(pattern: &str, which: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|e| ExporterError::config_error(format!("Invalid {} pattern: {}", which, e)))
}
