//! Domain models: the metro catalog, the guess option list, hint descriptors and guess entries.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One playable metro. `name` is the display name players pick from the option list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetroRecord {
  pub name: String,
  pub state: String,
  #[serde(default)] pub highlights: Vec<String>,
}

/// Read-only catalog of playable metros keyed by stable id ("Memphis", "DC", ...).
/// Ordered by id so seeded target selection is reproducible.
#[derive(Clone, Debug, Default)]
pub struct MetroCatalog {
  metros: BTreeMap<String, MetroRecord>,
}

impl MetroCatalog {
  pub fn new(metros: impl IntoIterator<Item = (String, MetroRecord)>) -> Self {
    Self { metros: metros.into_iter().collect() }
  }

  /// Insert or replace a metro by id.
  pub fn insert(&mut self, id: String, record: MetroRecord) {
    self.metros.insert(id, record);
  }

  pub fn lookup(&self, id: &str) -> Option<&MetroRecord> {
    self.metros.get(id)
  }

  pub fn all_ids(&self) -> Vec<&str> {
    self.metros.keys().map(String::as_str).collect()
  }

  /// Id of the metro shown under `name`, if any.
  pub fn id_for_name(&self, name: &str) -> Option<&str> {
    self.metros.iter().find(|(_, m)| m.name == name).map(|(id, _)| id.as_str())
  }

  pub fn len(&self) -> usize { self.metros.len() }

  pub fn records(&self) -> impl Iterator<Item = (&str, &MetroRecord)> {
    self.metros.iter().map(|(id, m)| (id.as_str(), m))
  }
}

/// Candidate display names offered in the guess selector.
/// Always a superset of the catalog's display names.
#[derive(Clone, Debug, Default)]
pub struct GuessOptions {
  names: BTreeSet<String>,
}

impl GuessOptions {
  /// Build the option set, folding in every catalog display name.
  pub fn new(names: impl IntoIterator<Item = String>, catalog: &MetroCatalog) -> Self {
    let mut names: BTreeSet<String> = names
      .into_iter()
      .map(|n| n.trim().to_string())
      .filter(|n| !n.is_empty())
      .collect();
    for (_, m) in catalog.records() {
      names.insert(m.name.clone());
    }
    Self { names }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  /// Sorted display names.
  pub fn all_display_names(&self) -> Vec<String> {
    self.names.iter().cloned().collect()
  }

  pub fn len(&self) -> usize { self.names.len() }
}

/// A hint as the core sees it. Rendering the visualization belongs to the front end.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HintDescriptor {
  pub name: String,
  /// Shown to the player next to the hint. Scoring never reads it.
  pub penalty_display_only: u32,
}

/// Ordered hints; index 0 is free at round start.
#[derive(Clone, Debug)]
pub struct HintRegistry {
  hints: Vec<HintDescriptor>,
}

impl HintRegistry {
  pub fn new(hints: Vec<HintDescriptor>) -> Self {
    Self { hints }
  }

  pub fn len(&self) -> usize { self.hints.len() }

  pub fn is_empty(&self) -> bool { self.hints.is_empty() }

  pub fn get(&self, index: usize) -> Option<&HintDescriptor> {
    self.hints.get(index)
  }

  pub fn all(&self) -> &[HintDescriptor] {
    &self.hints
  }
}

/// Result of a single guess.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuessStatus {
  Correct,
  Wrong,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessEntry {
  pub value: String,
  pub status: GuessStatus,
}
