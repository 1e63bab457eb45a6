//! Per-slot code resolution.
//!
//! For every [`DayType`] and every slot of a day the resolver precomputes which
//! billing codes cleanly cover the slot, and whether a code boundary falls inside
//! it. The result is immutable and shared by the grid operations that need a
//! default code.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::table::{BillingCode, BillingCodeTable, DayType};
use crate::grid::geometry::SlotSize;

/// How a slot's minute range relates to a code's minute range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The slot lies entirely inside the code range.
    Contained,
    /// The ranges do not intersect.
    Disjoint,
    /// The ranges intersect but the slot is not contained.
    Split,
}

/// Classifies slot range `[slot_start, slot_end)` against code range
/// `[code_start, code_end)`.
///
/// An empty code range never covers anything and is always disjoint.
///
/// # Examples
///
/// ```
/// use ndis_timesheet::codes::{classify_overlap, Overlap};
///
/// assert_eq!(classify_overlap((360, 375), (360, 1080)), Overlap::Contained);
/// assert_eq!(classify_overlap((345, 360), (360, 1080)), Overlap::Disjoint);
/// assert_eq!(classify_overlap((350, 365), (360, 1080)), Overlap::Split);
/// ```
pub fn classify_overlap(slot: (u32, u32), code: (u32, u32)) -> Overlap {
    let (slot_start, slot_end) = slot;
    let (code_start, code_end) = code;

    if code_start == code_end {
        return Overlap::Disjoint;
    }
    if slot_start >= code_start && slot_end <= code_end {
        Overlap::Contained
    } else if slot_end <= code_start || slot_start >= code_end {
        Overlap::Disjoint
    } else {
        Overlap::Split
    }
}

/// Codes applicable to one `(DayType, slot)` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeSlotMapping {
    /// Codes whose range fully contains the slot, in table order.
    pub codes: Vec<Arc<BillingCode>>,
    /// A code boundary falls strictly inside the slot.
    pub is_split: bool,
}

impl CodeSlotMapping {
    /// More than one clean code, or a split boundary.
    pub fn is_ambiguous(&self) -> bool {
        self.is_split || self.codes.len() > 1
    }

    /// The code to assign when the user asks for "the default".
    ///
    /// Ambiguous slots have no default.
    pub fn default_code(&self) -> Option<&Arc<BillingCode>> {
        if self.is_ambiguous() {
            None
        } else {
            self.codes.first()
        }
    }
}

/// Kind of authoring problem detected in the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Several codes cleanly cover the same slot.
    Overlapping { item_numbers: Vec<String> },
    /// A code boundary falls mid-slot.
    Split,
}

/// One `(DayType, slot)` pair the rule table does not resolve cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAnomaly {
    pub day_type: DayType,
    pub slot: usize,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

impl fmt::Display for RuleAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AnomalyKind::Overlapping { item_numbers } => write!(
                f,
                "{} slot {}: overlapping codes {}",
                self.day_type,
                self.slot,
                item_numbers.join(", ")
            ),
            AnomalyKind::Split => write!(
                f,
                "{} slot {}: a code boundary falls inside the slot",
                self.day_type, self.slot
            ),
        }
    }
}

/// Precomputed code mappings for every day type and slot.
#[derive(Debug, Clone)]
pub struct CodeSlotResolver {
    slot_size: SlotSize,
    maps: [Vec<CodeSlotMapping>; 4],
}

impl CodeSlotResolver {
    /// Computes mappings for all day types and logs any anomalies found.
    pub fn new(table: &BillingCodeTable, slot_size: SlotSize) -> Self {
        let maps = DayType::ALL.map(|day_type| Self::build_day(table, day_type, slot_size));
        let resolver = Self { slot_size, maps };

        let anomalies = resolver.anomalies();
        if !anomalies.is_empty() {
            log::warn!(
                "Billing code table has {} ambiguous slot(s) at {}-minute resolution",
                anomalies.len(),
                slot_size.minutes()
            );
            for anomaly in &anomalies {
                log::debug!("{}", anomaly);
            }
        }

        resolver
    }

    fn build_day(
        table: &BillingCodeTable,
        day_type: DayType,
        slot_size: SlotSize,
    ) -> Vec<CodeSlotMapping> {
        (0..slot_size.slots_per_day())
            .map(|slot| {
                let range = slot_size.slot_range(slot);
                let mut mapping = CodeSlotMapping::default();
                for code in table.codes_for(day_type) {
                    match classify_overlap(range, code.applied_to.bounds()) {
                        Overlap::Contained => mapping.codes.push(Arc::clone(code)),
                        Overlap::Disjoint => {}
                        Overlap::Split => mapping.is_split = true,
                    }
                }
                mapping
            })
            .collect()
    }

    pub fn slot_size(&self) -> SlotSize {
        self.slot_size
    }

    /// Mapping for one slot, or `None` when `slot` is out of range.
    pub fn mapping(&self, day_type: DayType, slot: usize) -> Option<&CodeSlotMapping> {
        self.maps[day_type.ordinal()].get(slot)
    }

    /// All mappings for one day type, indexed by slot.
    pub fn day(&self, day_type: DayType) -> &[CodeSlotMapping] {
        &self.maps[day_type.ordinal()]
    }

    pub fn default_code(&self, day_type: DayType, slot: usize) -> Option<&Arc<BillingCode>> {
        self.mapping(day_type, slot)
            .and_then(CodeSlotMapping::default_code)
    }

    /// Every `(DayType, slot)` pair that is split or covered by several codes.
    pub fn anomalies(&self) -> Vec<RuleAnomaly> {
        let mut found = Vec::new();
        for day_type in DayType::ALL {
            for (slot, mapping) in self.day(day_type).iter().enumerate() {
                if mapping.is_split {
                    found.push(RuleAnomaly {
                        day_type,
                        slot,
                        kind: AnomalyKind::Split,
                    });
                }
                if mapping.codes.len() > 1 {
                    found.push(RuleAnomaly {
                        day_type,
                        slot,
                        kind: AnomalyKind::Overlapping {
                            item_numbers: mapping
                                .codes
                                .iter()
                                .map(|c| c.item_number.clone())
                                .collect(),
                        },
                    });
                }
            }
        }
        found
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
