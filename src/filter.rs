use std::fmt;

use tracing::warn;

use crate::floor::{self, FloorPolicy};
use crate::listing::ListingRecord;

/// Acceptance bounds for one run. Built once and passed in explicitly; no
/// module-level mutable state.
#[derive(Debug, Clone)]
pub struct Criteria {
    pub min_area: f64,
    pub max_area: f64,
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub max_unit_price: f64,
    pub require_elevator: bool,
    pub floor_policy: FloorPolicy,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            min_area: 35.0,
            max_area: 55.0,
            min_rooms: 2,
            max_rooms: 3,
            max_unit_price: 12000.0,
            require_elevator: true,
            floor_policy: FloorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NoElevator,
    AreaRange,
    RoomRange,
    FloorPosition,
    PricePerArea,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::NoElevator => "no-elevator",
            Reason::AreaRange => "area-range",
            Reason::RoomRange => "room-range",
            Reason::FloorPosition => "floor-position",
            Reason::PricePerArea => "price-per-area",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted { unit_price: Option<f64> },
    Rejected(Reason),
}

/// Ordered checks, first failure wins. Unknown area or rooms pass with a
/// warning: partial extraction is common and must not cost a real match.
/// A missing elevator, by contrast, is a hard no after both passes ran.
pub fn evaluate(record: &ListingRecord, criteria: &Criteria) -> Verdict {
    if criteria.require_elevator && !record.has_elevator {
        return Verdict::Rejected(Reason::NoElevator);
    }

    match record.area {
        Some(a) if a < criteria.min_area || a > criteria.max_area => {
            return Verdict::Rejected(Reason::AreaRange);
        }
        None => warn!(id = %record.id, "no area found, including anyway"),
        _ => {}
    }

    match record.rooms {
        Some(r) if r < criteria.min_rooms || r > criteria.max_rooms => {
            return Verdict::Rejected(Reason::RoomRange);
        }
        None => warn!(id = %record.id, "no room count found, including anyway"),
        _ => {}
    }

    if !floor::is_valid(&record.floor, &criteria.floor_policy) {
        return Verdict::Rejected(Reason::FloorPosition);
    }

    if let Some(unit) = record.price_per_area {
        if unit > criteria.max_unit_price {
            return Verdict::Rejected(Reason::PricePerArea);
        }
    }

    Verdict::Accepted {
        unit_price: record.price_per_area,
    }
}

// ── Tests ──
