use anyhow::Result;

use crate::listing::ListingRecord;

/// Delivery channel for qualified listings. Callers skip delivery entirely
/// when nothing qualified.
pub trait MessageSink {
    fn deliver(&self, records: &[ListingRecord]) -> Result<()>;
}

/// Prints matches to stdout, the fallback channel when no mail credentials
/// are configured.
pub struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn deliver(&self, records: &[ListingRecord]) -> Result<()> {
        println!(
            "\n{} new listings ({})",
            records.len(),
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        );
        for r in records {
            let elevator = if r.has_elevator { "✓" } else { "?" };
            let balcony = if r.has_balcony { "✓" } else { "?" };
            println!("- {}", r.title);
            println!(
                "  {} | {} | {} rooms | floor {} | {}",
                r.price_display(),
                r.area_display(),
                r.rooms_display(),
                r.floor,
                r.unit_price_display(),
            );
            println!(
                "  {} | elevator {} | balcony {}",
                r.location, elevator, balcony
            );
            println!("  {}", r.link);
        }
        Ok(())
    }
}
