//! Per-panel properties.
//!
//! A property is either one value for every panel or a mapping from panel ids
//! (or groups of ids) to values. Keyword properties additionally accept a
//! nested form, where each panel key maps to an options object.
//!
//! Every mapping resolves to a dense `Vec` indexed by 0-based panel position.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Options object passed through to a drawing surface.
pub type Options = BTreeMap<String, OptionValue>;

/// A loosely typed option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// List of values.
    List(Vec<OptionValue>),
    /// Nested options object.
    Map(Options),
}

impl OptionValue {
    /// Numeric value, if this is an integer or float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(v) => Some(*v as f64),
            OptionValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value, if this is a flag.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this value is a nested options object.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, OptionValue::Map(_))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Str(v) => write!(f, "{v:?}"),
            OptionValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            OptionValue::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<Options> for OptionValue {
    fn from(v: Options) -> Self {
        OptionValue::Map(v)
    }
}

/// One or more 1-based panel ids addressed by a mapping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelKey {
    /// A single panel.
    One(usize),
    /// Several panels sharing one value.
    Many(Vec<usize>),
    /// Inclusive id ranges, kept unexpanded until the panel count is known.
    Ranges(Vec<RangeInclusive<usize>>),
}

impl PanelKey {
    /// The addressed ids as inclusive spans.
    #[must_use]
    pub fn spans(&self) -> Vec<RangeInclusive<usize>> {
        match self {
            PanelKey::One(id) => vec![*id..=*id],
            PanelKey::Many(ids) => ids.iter().map(|&id| id..=id).collect(),
            PanelKey::Ranges(spans) => spans.clone(),
        }
    }

    /// The addressed ids, in key order.
    pub fn ids(&self) -> impl Iterator<Item = usize> {
        self.spans().into_iter().flatten()
    }

    /// The id outside `1..=panel_count`, if any.
    fn out_of_range(&self, panel_count: usize) -> Option<usize> {
        self.spans().into_iter().filter(|r| !r.is_empty()).find_map(|r| {
            if *r.start() == 0 {
                Some(0)
            } else if *r.end() > panel_count {
                Some(*r.end())
            } else {
                None
            }
        })
    }
}

impl From<usize> for PanelKey {
    fn from(id: usize) -> Self {
        PanelKey::One(id)
    }
}

impl From<Vec<usize>> for PanelKey {
    fn from(ids: Vec<usize>) -> Self {
        PanelKey::Many(ids)
    }
}

impl<const N: usize> From<[usize; N]> for PanelKey {
    fn from(ids: [usize; N]) -> Self {
        PanelKey::Many(ids.to_vec())
    }
}

impl From<RangeInclusive<usize>> for PanelKey {
    fn from(ids: RangeInclusive<usize>) -> Self {
        PanelKey::Ranges(vec![ids])
    }
}

/// Parses `"3"`, `"2,3"` and `"1-4"` (and combinations like `"1,3-5"`).
impl FromStr for PanelKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |t: &str| {
            t.trim().parse::<usize>().map_err(|_| format!("{s:?} does not name panels"))
        };
        let mut spans = Vec::new();
        let mut ranged = false;
        for part in s.split(',') {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let (lo, hi) = (parse(lo)?, parse(hi)?);
                    if lo > hi {
                        return Err(format!("{s:?} has an empty range"));
                    }
                    ranged = true;
                    spans.push(lo..=hi);
                }
                None => {
                    let id = parse(part)?;
                    spans.push(id..=id);
                }
            }
        }
        if ranged {
            return Ok(PanelKey::Ranges(spans));
        }
        let ids: Vec<usize> = spans.iter().map(|r| *r.start()).collect();
        Ok(if ids.len() == 1 { PanelKey::One(ids[0]) } else { PanelKey::Many(ids) })
    }
}

/// Formats in the same syntax [`FromStr`] accepts.
impl fmt::Display for PanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .spans()
            .iter()
            .map(|r| {
                if r.start() == r.end() {
                    r.start().to_string()
                } else {
                    format!("{}-{}", r.start(), r.end())
                }
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// A property given once for all panels, or per panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PerPanel<T> {
    /// Same value for every panel.
    All(T),
    /// Values keyed by panel id or id group.
    Mapped(Vec<(PanelKey, T)>),
}

impl<T: Default> Default for PerPanel<T> {
    fn default() -> Self {
        PerPanel::All(T::default())
    }
}

impl<T> PerPanel<T> {
    /// Same value for every panel.
    #[must_use]
    pub fn all(value: T) -> Self {
        PerPanel::All(value)
    }

    /// Empty mapping, to be filled with [`PerPanel::with`].
    #[must_use]
    pub fn mapped() -> Self {
        PerPanel::Mapped(Vec::new())
    }

    /// Add a keyed value. Turns an `All` into a mapping.
    #[must_use]
    pub fn with(self, key: impl Into<PanelKey>, value: T) -> Self {
        let mut entries = match self {
            PerPanel::All(_) => Vec::new(),
            PerPanel::Mapped(entries) => entries,
        };
        entries.push((key.into(), value));
        PerPanel::Mapped(entries)
    }

    /// Expand into one value per panel, indexed by 0-based position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertySpec`] if an id is out of range, an id
    /// is assigned twice, or some panel receives no value.
    pub fn resolve(&self, property: &str, panel_count: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        match self {
            PerPanel::All(value) => Ok(vec![value.clone(); panel_count]),
            PerPanel::Mapped(entries) => {
                expand(property, panel_count, entries.iter().map(|(k, v)| (k, v.clone())))
            }
        }
    }
}

/// Spread keyed values into dense per-panel slots and check coverage.
fn expand<'a, T>(
    property: &str,
    panel_count: usize,
    entries: impl Iterator<Item = (&'a PanelKey, T)>,
) -> Result<Vec<T>>
where
    T: Clone,
{
    let mut slots: Vec<Option<T>> = vec![None; panel_count];
    let mut keys = Vec::new();
    for (key, value) in entries {
        if let Some(id) = key.out_of_range(panel_count) {
            return Err(Error::property(
                property,
                format!("key {key} refers to panel {id}, but panels are 1..={panel_count}"),
            ));
        }
        for id in key.ids() {
            if slots[id - 1].is_some() {
                return Err(Error::property(property, format!("panel {id} is assigned twice")));
            }
            slots[id - 1] = Some(value.clone());
        }
        keys.push(key.to_string());
    }

    let missing: Vec<usize> =
        slots.iter().enumerate().filter(|(_, s)| s.is_none()).map(|(i, _)| i + 1).collect();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        return Err(Error::InvalidPropertySpec {
            property: property.to_string(),
            reason: format!(
                "have {panel_count} panels, but keys {keys:?} give no value for panel(s) {}",
                names.join(", ")
            ),
            missing,
        });
    }
    Ok(slots.into_iter().flatten().collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PerPanelRepr<T> {
    Mapped(BTreeMap<String, T>),
    All(T),
}

impl<'de, T> Deserialize<'de> for PerPanel<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match PerPanelRepr::<T>::deserialize(deserializer)? {
            PerPanelRepr::All(value) => Ok(PerPanel::All(value)),
            PerPanelRepr::Mapped(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let key = key.parse::<PanelKey>().map_err(serde::de::Error::custom)?;
                    entries.push((key, value));
                }
                Ok(PerPanel::Mapped(entries))
            }
        }
    }
}

/// Keyword options for panels: either one flat options object for every
/// panel, or panel keys mapped to nested options objects.
///
/// If none of the values are objects, the whole mapping is one options object.
/// If all of them are, every key names panels. A mix is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, OptionValue>")]
pub struct KeywordSpec {
    entries: Vec<(String, OptionValue)>,
}

impl From<BTreeMap<String, OptionValue>> for KeywordSpec {
    fn from(map: BTreeMap<String, OptionValue>) -> Self {
        Self { entries: map.into_iter().collect() }
    }
}

impl KeywordSpec {
    /// Empty spec: every panel gets an empty options object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flat option applied to every panel. Setting a name again
    /// replaces its value.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        let (name, value) = (name.into(), value.into());
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Set the options object for a panel or id group. Every call adds an
    /// entry, so naming a panel twice fails at resolution.
    #[must_use]
    pub fn panel(mut self, key: impl Into<PanelKey>, options: Options) -> Self {
        self.entries.push((key.into().to_string(), OptionValue::Map(options)));
        self
    }

    /// Whether no options were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand into one options object per panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertySpec`] for mixed nested and flat values,
    /// keys that do not name panels, panels named twice, or incomplete
    /// panel coverage.
    pub fn resolve(&self, property: &str, panel_count: usize) -> Result<Vec<Options>> {
        let nested = self.entries.iter().filter(|(_, v)| v.is_map()).count();
        if nested == 0 {
            let flat: Options = self.entries.iter().cloned().collect();
            return Ok(vec![flat; panel_count]);
        }
        if nested != self.entries.len() {
            let flat: Vec<&str> = self
                .entries
                .iter()
                .filter(|(_, v)| !v.is_map())
                .map(|(k, _)| k.as_str())
                .collect();
            return Err(Error::property(
                property,
                format!("mixes per-panel objects with flat options {flat:?}"),
            ));
        }

        let mut keyed = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            let key = key.parse::<PanelKey>().map_err(|reason| Error::property(property, reason))?;
            let OptionValue::Map(options) = value else {
                continue;
            };
            keyed.push((key, options.clone()));
        }
        expand(property, panel_count, keyed.iter().map(|(k, v)| (k, v.clone())))
    }
}
