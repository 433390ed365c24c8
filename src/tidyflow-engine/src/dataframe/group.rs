//! Grouping and deduplication.

use std::collections::{HashMap, HashSet};

use common_error::FlowResult;
use tidyflow_core::{Row, Value, ValueKey, GROUP_COL};

use super::DataFrame;

/// Key of a row restricted to `columns`.
fn row_key(row: &Row, columns: &[&str]) -> Vec<ValueKey> {
    columns
        .iter()
        .map(|c| row.get(*c).map_or(ValueKey::Missing, Value::key))
        .collect()
}

impl DataFrame {
    /// Tag each row with the id of its distinct combination of `columns`.
    ///
    /// Ids are `1, 2, 3, ...` in order of first appearance. Missing is an
    /// ordinary key component. Regrouping replaces any existing ids.
    pub fn group_by<S: AsRef<str>>(&self, columns: &[S]) -> FlowResult<Self> {
        let keys: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        self.require_columns(keys.iter().copied())?;

        let mut ids: HashMap<Vec<ValueKey>, u32> = HashMap::new();
        let data = self
            .data
            .iter()
            .map(|row| {
                let next = ids.len() as u32 + 1;
                let id = *ids.entry(row_key(row, &keys)).or_insert(next);
                let mut row = row.clone();
                row.insert(GROUP_COL.to_string(), Value::from(f64::from(id)));
                row
            })
            .collect();

        let mut columns = self.columns.clone();
        columns.insert(GROUP_COL.to_string());
        Ok(Self::from_parts(data, columns))
    }

    /// Remove group ids. An ungrouped frame is returned unchanged.
    pub fn ungroup(&self) -> FlowResult<Self> {
        if !self.is_grouped() {
            return Ok(self.clone());
        }
        let data = self
            .data
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove(GROUP_COL);
                row
            })
            .collect();
        let mut columns = self.columns.clone();
        columns.remove(GROUP_COL);
        Ok(Self::from_parts(data, columns))
    }

    /// Keep the first row for each distinct combination of `columns`.
    pub fn unique<S: AsRef<str>>(&self, columns: &[S]) -> FlowResult<Self> {
        let keys: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        self.require_columns(keys.iter().copied())?;

        let mut seen = HashSet::new();
        let data = self
            .data
            .iter()
            .filter(|row| seen.insert(row_key(row, &keys)))
            .cloned()
            .collect();
        Ok(Self::from_parts(data, self.columns.clone()))
    }

    /// Split rows into groups, keyed by group id in first-seen order.
    ///
    /// An ungrouped frame yields a single group holding every row.
    pub(crate) fn partition(&self) -> Vec<Vec<usize>> {
        if !self.is_grouped() {
            return vec![(0..self.data.len()).collect()];
        }
        let mut order: HashMap<ValueKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (index, row) in self.data.iter().enumerate() {
            let key = row.get(GROUP_COL).map_or(ValueKey::Missing, Value::key);
            let slot = *order.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(index);
        }
        groups
    }
}
