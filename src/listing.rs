use serde::Serialize;

use crate::extract::FieldSet;

pub const UNKNOWN_FLOOR: &str = "unknown";
const DEFAULT_LOCATION: &str = "Wrocław";

/// Canonical listing, immutable once built. Merged summary-first with
/// detail-page fallback; id and link always come from the summary context.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub area: Option<f64>,
    pub rooms: Option<u32>,
    pub floor: String,
    pub has_elevator: bool,
    pub has_balcony: bool,
    pub location: String,
    pub link: String,
    pub price_per_area: Option<f64>,
}

/// Whether the detail page is worth fetching: only when the summary card left
/// one of the expensive-to-miss fields open.
pub fn needs_detail(summary: &FieldSet) -> bool {
    summary.area.is_none() || summary.rooms.is_none() || !summary.has_elevator
}

/// Merge field sets into a record. Present summary values win; booleans
/// promote with OR. Returns None when no pass produced a title or a price —
/// there is nothing to filter without them.
pub fn build(
    id: String,
    link: String,
    summary: FieldSet,
    detail: Option<FieldSet>,
) -> Option<ListingRecord> {
    let d = detail.unwrap_or_default();
    let title = summary.title?;
    let price = summary.price.or(d.price)?;
    let area = summary.area.or(d.area);
    let price_per_area = area.filter(|a| *a > 0.0).map(|a| price / a);

    Some(ListingRecord {
        id,
        title,
        price,
        area,
        rooms: summary.rooms.or(d.rooms),
        floor: summary
            .floor
            .or(d.floor)
            .unwrap_or_else(|| UNKNOWN_FLOOR.to_string()),
        has_elevator: summary.has_elevator || d.has_elevator,
        has_balcony: summary.has_balcony || d.has_balcony,
        location: summary
            .location
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        link,
        price_per_area,
    })
}

impl ListingRecord {
    pub fn price_display(&self) -> String {
        format!("{} zł", group_thousands(self.price))
    }

    pub fn area_display(&self) -> String {
        match self.area {
            Some(a) => format!("{} m²", a),
            None => "N/A".to_string(),
        }
    }

    pub fn rooms_display(&self) -> String {
        match self.rooms {
            Some(r) => r.to_string(),
            None => "N/A".to_string(),
        }
    }

    pub fn unit_price_display(&self) -> String {
        match self.price_per_area {
            Some(u) => format!("{} zł/m²", group_thousands(u)),
            None => "N/A".to_string(),
        }
    }
}

fn group_thousands(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ── Tests ──
