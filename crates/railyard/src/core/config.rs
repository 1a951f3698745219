//! Option records for the builder and the renderer
//!
//! Options are plain records with named fields and defaults. Callers that
//! configure from text (command lines, config files) collect `key=value`
//! pairs into [`Overrides`] and merge them once with `with_overrides`
//! before constructing the builder or renderer.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RailyardError, Result};

/// A partial set of option values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` pairs
    ///
    /// # Example
    /// ```
    /// use railyard::core::Overrides;
    ///
    /// let overrides = Overrides::parse(["arc_radius=4", "show_title=false"]).unwrap();
    /// assert_eq!(overrides.get("arc_radius"), Some("4"));
    /// ```
    pub fn parse<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                RailyardError::invalid_option(pair, "expected the form key=value")
            })?;
            overrides = overrides.with(key.trim(), value.trim());
        }
        Ok(overrides)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Restrict to keys with the given prefix, stripping `prefix.`
    ///
    /// Lets one command line carry `builder.x=..` and `render.y=..` pairs.
    pub fn scoped(&self, prefix: &str) -> Self {
        let prefix = format!("{}.", prefix);
        let values = self
            .values
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        Self { values }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| RailyardError::invalid_option(key, format!("expected {}, got {:?}", expected, value)))
}

/// Options for the diagram builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Expand case-insensitive literals into per-character upper/lower branches
    pub expand_any_case: bool,
    /// Factor runs shared by every alternative out of a branch
    pub factor_affixes: bool,
    /// Fold `item (sep item)*` into a single separated loop
    pub collapse_separator_loops: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            expand_any_case: false,
            factor_affixes: true,
            collapse_separator_loops: true,
        }
    }
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_any_case(mut self, expand: bool) -> Self {
        self.expand_any_case = expand;
        self
    }

    /// Merge `overrides` into this record
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self> {
        for (key, value) in overrides.iter() {
            match key {
                "expand_any_case" => self.expand_any_case = parse_value(key, value, "a boolean")?,
                "factor_affixes" => self.factor_affixes = parse_value(key, value, "a boolean")?,
                "collapse_separator_loops" => {
                    self.collapse_separator_loops = parse_value(key, value, "a boolean")?
                }
                _ => return Err(RailyardError::invalid_option(key, "unknown builder option")),
            }
        }
        Ok(self)
    }
}

/// Geometry options for the shape renderer
///
/// All values are in the backend's coordinate unit: points for vector
/// output, character cells for grid output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rail length between consecutive figures of a line
    pub horizontal_gap: f64,
    /// Space between stacked alternatives and above a loop-back rail
    pub vertical_gap: f64,
    /// Radius of the curved joins at branch and loop corners
    pub arc_radius: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Lead-in and lead-out rail length around the whole figure
    pub terminal_length: f64,
    pub margin: f64,
    /// Draw the production name above the diagram
    pub show_title: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            horizontal_gap: 16.0,
            vertical_gap: 12.0,
            arc_radius: 8.0,
            padding_x: 10.0,
            padding_y: 6.0,
            terminal_length: 20.0,
            margin: 10.0,
            show_title: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options sized for character-cell backends
    pub fn grid() -> Self {
        Self {
            horizontal_gap: 2.0,
            vertical_gap: 1.0,
            arc_radius: 1.0,
            padding_x: 2.0,
            padding_y: 1.0,
            terminal_length: 2.0,
            margin: 0.0,
            show_title: true,
        }
    }

    /// Merge `overrides` into this record
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self> {
        for (key, value) in overrides.iter() {
            let field = match key {
                "horizontal_gap" => &mut self.horizontal_gap,
                "vertical_gap" => &mut self.vertical_gap,
                "arc_radius" => &mut self.arc_radius,
                "padding_x" => &mut self.padding_x,
                "padding_y" => &mut self.padding_y,
                "terminal_length" => &mut self.terminal_length,
                "margin" => &mut self.margin,
                "show_title" => {
                    self.show_title = parse_value(key, value, "a boolean")?;
                    continue;
                }
                _ => return Err(RailyardError::invalid_option(key, "unknown render option")),
            };
            let number: f64 = parse_value(key, value, "a number")?;
            if !number.is_finite() || number < 0.0 {
                return Err(RailyardError::invalid_option(
                    key,
                    "expected a non-negative number",
                ));
            }
            *field = number;
        }
        Ok(self)
    }
}
