//! Filter state, its record predicate, and the cross-filter dispatch table.
//!
//! Explicit controls (`FilterUpdate`) may set any field. Chart clicks go
//! through [`FilterState::toggle`], which only touches the shape and country
//! dimensions and toggles a single value rather than accumulating.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Record;

/// Dimension a chart segment can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Shape,
    Country,
}

/// Currently active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Inclusive lower bound on the occurrence date
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on the occurrence date
    pub end: Option<NaiveDate>,
    /// Selected shapes; empty means no restriction
    pub shapes: BTreeSet<String>,
    /// Selected country; `None` means no restriction
    pub country: Option<String>,
}

/// Explicit change coming from the filter controls.
///
/// `None` leaves a field untouched; the `clear_*` flags reset it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterUpdate {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub shapes: Option<Vec<String>>,
    pub country: Option<String>,
    pub clear_start: bool,
    pub clear_end: bool,
    pub clear_country: bool,
}

/// Result of a cross-filter toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "outcome", content = "value")]
pub enum ToggleOutcome {
    /// The category is now the dimension's only selected value
    Selected(String),
    /// The category was the sole selection and has been cleared
    Cleared,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.shapes.is_empty()
            && self.country.is_none()
    }

    /// Whether `record` passes every active constraint.
    ///
    /// Records without a parsable occurrence timestamp fail any active date
    /// bound and pass when no bound is set.
    pub fn matches(&self, record: &Record) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let date = match record.occurred_date() {
                Some(date) => date,
                None => return false,
            };
            if self.start.is_some_and(|start| date < start) {
                return false;
            }
            if self.end.is_some_and(|end| date > end) {
                return false;
            }
        }

        if !self.shapes.is_empty() && !self.shapes.contains(&record.shape) {
            return false;
        }

        match &self.country {
            Some(country) => &record.country == country,
            None => true,
        }
    }

    /// Apply an explicit control change.
    pub fn apply(&mut self, update: FilterUpdate) {
        if update.clear_start {
            self.start = None;
        } else if let Some(start) = update.start {
            self.start = Some(start);
        }

        if update.clear_end {
            self.end = None;
        } else if let Some(end) = update.end {
            self.end = Some(end);
        }

        if let Some(shapes) = update.shapes {
            self.shapes = shapes
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if update.clear_country {
            self.country = None;
        } else if let Some(country) = update.country {
            let country = country.trim().to_string();
            self.country = if country.is_empty() { None } else { Some(country) };
        }
    }

    /// Cross-filter click on `category` in `dimension`.
    ///
    /// If the category is already the dimension's sole selection it is
    /// cleared; otherwise it replaces any prior selection.
    pub fn toggle(&mut self, dimension: Dimension, category: &str) -> ToggleOutcome {
        match dimension {
            Dimension::Shape => {
                if self.shapes.len() == 1 && self.shapes.contains(category) {
                    self.shapes.clear();
                    ToggleOutcome::Cleared
                } else {
                    self.shapes = BTreeSet::from([category.to_string()]);
                    ToggleOutcome::Selected(category.to_string())
                }
            }
            Dimension::Country => {
                if self.country.as_deref() == Some(category) {
                    self.country = None;
                    ToggleOutcome::Cleared
                } else {
                    self.country = Some(category.to_string());
                    ToggleOutcome::Selected(category.to_string())
                }
            }
        }
    }
}

/// Central table mapping chart ids to the dimension their segments filter.
#[derive(Debug, Clone)]
pub struct CrossFilterTable {
    entries: Vec<(&'static str, Dimension)>,
}

impl CrossFilterTable {
    pub fn new(entries: Vec<(&'static str, Dimension)>) -> Self {
        Self { entries }
    }

    /// Dimension filtered by clicks on `chart_id`, if any.
    pub fn dimension_for(&self, chart_id: &str) -> Option<Dimension> {
        self.entries
            .iter()
            .find(|(id, _)| *id == chart_id)
            .map(|(_, dim)| *dim)
    }

    pub fn is_cross_filterable(&self, chart_id: &str) -> bool {
        self.dimension_for(chart_id).is_some()
    }
}

impl Default for CrossFilterTable {
    fn default() -> Self {
        use crate::services::dashboard::chart_ids;
        Self::new(vec![
            (chart_ids::SHAPES, Dimension::Shape),
            (chart_ids::SHAPE_DONUT, Dimension::Shape),
            (chart_ids::COUNTRIES, Dimension::Country),
        ])
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
