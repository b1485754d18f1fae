pub mod brand;
pub mod options;
pub mod pages;

use crate::error::{GenerationError, Result};

/// Fixed label→value lookup table for one configuration axis.
///
/// Labels are the human-facing strings shown by the form layer; values carry
/// the canonical keys and descriptor payloads the composer works with. Every
/// catalog is a process-lifetime constant.
pub struct Catalog<V: 'static> {
    name: &'static str,
    entries: &'static [(&'static str, V)],
    default_label: Option<&'static str>,
}

impl<V: 'static> Catalog<V> {
    pub const fn new(
        name: &'static str,
        entries: &'static [(&'static str, V)],
        default_label: Option<&'static str>,
    ) -> Self {
        Catalog {
            name,
            entries,
            default_label,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn resolve(&self, label: &str) -> Option<&'static V> {
        self.entries
            .iter()
            .find(|(entry_label, _)| *entry_label == label)
            .map(|(_, value)| value)
    }

    /// Lookup with fallback to the catalog's designated default. Only
    /// catalogs constructed with a default label may use this; the default
    /// label is guaranteed at construction to be a member of the table.
    pub fn resolve_or_default(&self, label: &str) -> &'static V {
        self.resolve(label).unwrap_or_else(|| {
            let default = self
                .default_label
                .unwrap_or_else(|| panic!("catalog '{}' has no default entry", self.name));
            self.resolve(default)
                .unwrap_or_else(|| panic!("catalog '{}' default '{}' missing", self.name, default))
        })
    }

    /// Lookup for required axes; an unknown label is a configuration error,
    /// never a silent default.
    pub fn require(&self, label: &str) -> Result<&'static V> {
        self.resolve(label).ok_or_else(|| {
            GenerationError::Configuration(format!(
                "unknown {} label: '{}'",
                self.name, label
            ))
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    pub fn default_label(&self) -> Option<&'static str> {
        self.default_label
    }
}
