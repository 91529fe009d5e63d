use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::extract::{self, Context};
use crate::filter::{self, Criteria, Verdict};
use crate::ledger::Ledger;
use crate::listing::{self, ListingRecord};
use crate::source::DocumentSource;

/// Per-run counters, printed after each portal scan.
#[derive(Debug, Default)]
pub struct RunCounts {
    pub scanned: usize,
    pub skipped_seen: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub incomplete: usize,
}

impl RunCounts {
    pub fn print(&self, label: &str) {
        println!(
            "{}: {} cards ({} already seen, {} accepted, {} rejected, {} incomplete)",
            label, self.scanned, self.skipped_seen, self.accepted, self.rejected, self.incomplete,
        );
    }
}

/// Drive one portal: skip-if-seen, mark, extract, merge, filter, collect.
///
/// Ids are marked the moment they are first encountered, before any further
/// work, so an aborted run skips rather than re-notifies. The ledger is
/// persisted unconditionally at the end; a persist failure is the only fatal
/// outcome here. A source that cannot even list candidates yields an empty
/// scan, not an aborted run.
pub fn run(
    source: &mut dyn DocumentSource,
    ledger: &mut Ledger,
    criteria: &Criteria,
    limit: Option<usize>,
) -> Result<(Vec<ListingRecord>, RunCounts)> {
    let mut cards = match source.candidates() {
        Ok(cards) => cards,
        Err(e) => {
            warn!("listing scan failed: {:#}", e);
            Vec::new()
        }
    };
    if let Some(n) = limit {
        cards.truncate(n);
    }

    let pb = ProgressBar::new(cards.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut accepted = Vec::new();
    let mut counts = RunCounts::default();

    for card in cards {
        pb.inc(1);
        counts.scanned += 1;

        let Some(id) = extract::listing_id(&card.link) else {
            warn!(link = %card.link, "no listing id in link");
            counts.incomplete += 1;
            continue;
        };
        if ledger.contains(&id) {
            counts.skipped_seen += 1;
            continue;
        }
        ledger.mark(&id);

        let summary = extract::extract_fields(&card.text, Context::Summary);
        let detail = if listing::needs_detail(&summary) {
            match source.detail_text(&card.link) {
                Ok(text) => Some(extract::extract_fields(&text, Context::Detail)),
                Err(e) => {
                    // Degrade to summary-only fields; never abort the run
                    // for one listing.
                    warn!(id = %id, "detail fetch failed: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        let Some(record) = listing::build(id.clone(), card.link, summary, detail) else {
            debug!(id = %id, "no title or price after both passes");
            counts.incomplete += 1;
            continue;
        };

        match filter::evaluate(&record, criteria) {
            Verdict::Accepted { unit_price } => {
                debug!(id = %record.id, ?unit_price, "accepted");
                counts.accepted += 1;
                accepted.push(record);
            }
            Verdict::Rejected(reason) => {
                debug!(id = %record.id, %reason, "rejected");
                counts.rejected += 1;
            }
        }
    }

    pb.finish_and_clear();
    ledger.persist()?;
    Ok((accepted, counts))
}

// ── Tests ──
