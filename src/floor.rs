//! Floor descriptor parsing and positional policy.
//!
//! Descriptors arrive as `"3"`, `"3/8"`, `"parter"`, `"parter/4"` or the
//! `"unknown"` sentinel. `parter` is ground level (0). An unknown position is
//! never grounds for rejection.

/// (current, total) position inside the building. None means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorPosition {
    pub current: Option<i32>,
    pub total: Option<i32>,
}

/// Positional acceptance policy. Ground and first floors are excluded via
/// `min_level`; the top floor is excluded when the building height is known.
#[derive(Debug, Clone, Copy)]
pub struct FloorPolicy {
    pub min_level: i32,
    pub avoid_top: bool,
}

impl Default for FloorPolicy {
    fn default() -> Self {
        Self {
            min_level: 2,
            avoid_top: true,
        }
    }
}

pub fn parse(descriptor: &str) -> FloorPosition {
    let d = descriptor.trim().to_lowercase();
    match d.split_once('/') {
        Some((current, total)) => FloorPosition {
            current: parse_level(current),
            total: parse_level(total),
        },
        None => FloorPosition {
            current: parse_level(&d),
            total: None,
        },
    }
}

fn parse_level(token: &str) -> Option<i32> {
    let token = token.trim();
    if token == "parter" || token == "ground" {
        return Some(0);
    }
    token.parse().ok()
}

pub fn is_valid(descriptor: &str, policy: &FloorPolicy) -> bool {
    let pos = parse(descriptor);
    let Some(current) = pos.current else {
        return true;
    };
    if current < policy.min_level {
        return false;
    }
    if policy.avoid_top {
        if let Some(total) = pos.total {
            if current >= total {
                return false;
            }
        }
    }
    true
}

// ── Tests ──
