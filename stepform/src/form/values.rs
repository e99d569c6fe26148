// Per-step form state containers.

use super::fields::FieldId;
use std::collections::{BTreeMap, BTreeSet};

/// Field → message for the failures currently known on a step.
pub type ErrorMap = BTreeMap<FieldId, String>;

/// Fields the user has edited (or that were forced into visible-error mode).
pub type TouchedSet = BTreeSet<FieldId>;

/// Current raw values of a step's fields. Missing entries read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<FieldId, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> &str {
        self.values.get(&field).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<const N: usize> From<[(FieldId, &str); N]> for FormValues {
    fn from(pairs: [(FieldId, &str); N]) -> Self {
        let mut values = FormValues::new();
        for (field, value) in pairs {
            values.set(field, value);
        }
        values
    }
}
