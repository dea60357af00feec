//! # Build Selection
//!
//! One component per category, plus the aggregates derived from it:
//! totals, the two compatibility checks, and completion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::{Category, Component, Preset, Price};

/// PSU rated output must be at least draw × HEADROOM_NUM / HEADROOM_DEN (20% margin).
const HEADROOM_NUM: u64 = 6;
const HEADROOM_DEN: u64 = 5;

/// Outcome of a compatibility rule.
///
/// `NotEvaluated` means the inputs the rule needs are not selected yet. It
/// reads as compatible (see [`Check::is_ok`]) but is kept distinct so a caller
/// can tell a vacuous pass from a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Pass,
    Fail,
    NotEvaluated,
}

impl Check {
    pub fn is_ok(self) -> bool {
        self != Check::Fail
    }

    fn from_bool(ok: bool) -> Self {
        if ok {
            Check::Pass
        } else {
            Check::Fail
        }
    }
}

/// Result of resolving a preset against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresetLoad {
    /// Ids that resolved to a catalog component.
    pub resolved: usize,
    /// Ids the catalog does not know; dropped.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSelection {
    slots: BTreeMap<Category, Component>,
}

impl BuildSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `ids` in order, later ids overwriting earlier ones of the same
    /// category. Unknown ids are skipped.
    pub fn from_ids<S: AsRef<str>>(ids: &[S], catalog: &Catalog) -> (Self, PresetLoad) {
        let mut selection = Self::new();
        let mut report = PresetLoad::default();
        for id in ids {
            let id = id.as_ref();
            match catalog.get(id) {
                Some(component) => {
                    selection.select(component.clone());
                    report.resolved += 1;
                }
                None => {
                    log::debug!("dropping unknown component id '{id}'");
                    report.skipped.push(id.to_string());
                }
            }
        }
        (selection, report)
    }

    /// Puts `component` into its category slot, returning what it replaced.
    pub fn select(&mut self, component: Component) -> Option<Component> {
        self.slots.insert(component.category, component)
    }

    pub fn remove(&mut self, category: Category) -> Option<Component> {
        self.slots.remove(&category)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Replaces the whole selection with the preset's resolved components.
    pub fn load_preset(&mut self, preset: &Preset, catalog: &Catalog) -> PresetLoad {
        let (selection, report) = Self::from_ids(preset.components.as_slice(), catalog);
        *self = selection;
        report
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.slots.get(&category)
    }

    /// Selected components in category display order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.slots.values()
    }

    pub fn component_ids(&self) -> Vec<String> {
        self.components().map(|c| c.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_price(&self) -> Price {
        self.components().map(|c| c.price).sum()
    }

    /// Watts drawn by the selected parts. The PSU's own `power` is its rated
    /// output, so it is left out.
    pub fn total_power(&self) -> u64 {
        self.components()
            .filter(|c| c.category != Category::Psu)
            .map(|c| u64::from(c.power.unwrap_or(0)))
            .sum()
    }

    /// CPU and motherboard sockets must match exactly.
    pub fn socket_check(&self) -> Check {
        match (self.get(Category::Cpu), self.get(Category::Motherboard)) {
            (Some(cpu), Some(board)) => Check::from_bool(cpu.socket == board.socket),
            _ => Check::NotEvaluated,
        }
    }

    /// PSU output must cover total draw with 20% headroom; equality passes.
    pub fn power_check(&self) -> Check {
        match self.get(Category::Psu) {
            Some(psu) => {
                let output = u64::from(psu.power.unwrap_or(0));
                let draw = self.total_power();
                Check::from_bool(output * HEADROOM_DEN >= draw * HEADROOM_NUM)
            }
            None => Check::NotEvaluated,
        }
    }

    /// Share of required slots filled, as a percentage rounded half up.
    pub fn completion_percent(&self) -> u8 {
        let required = Category::required().count() as u64;
        let filled = Category::required().filter(|c| self.slots.contains_key(c)).count() as u64;
        ((filled * 100 + required / 2) / required) as u8
    }

    /// All required slots filled and neither check failed.
    pub fn is_complete(&self) -> bool {
        Category::required().all(|c| self.slots.contains_key(&c))
            && self.socket_check().is_ok()
            && self.power_check().is_ok()
    }

    /// Every category in display order, filled or not.
    pub fn slots(&self) -> Vec<Slot> {
        Category::ALL
            .into_iter()
            .map(|category| Slot {
                category,
                required: category.is_required(),
                component: self.get(category).cloned(),
            })
            .collect()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            component_count: self.len(),
            total_price: self.total_price(),
            total_power: self.total_power(),
            psu_output: self.get(Category::Psu).map(|p| p.power.unwrap_or(0)),
            socket: self.socket_check(),
            power: self.power_check(),
            completion_percent: self.completion_percent(),
            complete: self.is_complete(),
            slots: self.slots(),
        }
    }
}

/// One category of the picker: empty required slots are what keep a build
/// incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub category: Category,
    pub required: bool,
    pub component: Option<Component>,
}

/// Everything the summary panel shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub component_count: usize,
    pub total_price: Price,
    pub total_power: u64,
    pub psu_output: Option<u32>,
    pub socket: Check,
    pub power: Check,
    pub completion_percent: u8,
    pub complete: bool,
    pub slots: Vec<Slot>,
}
