//! Override precedence: deciding which source kind governs each interface.

use crate::error::{AuditError, Result};
use crate::record::ResolverRecord;
use std::collections::HashMap;

/// Stamps `is_active` on every record.
///
/// For each interface, the maximum override rank among its records wins;
/// a record is active iff its own kind's rank is at least that maximum.
/// Every interface with records therefore keeps at least one active
/// record, and kinds tied at the maximum (impossible under the current
/// strictly ordered table, but the rule generalizes) would all be active.
///
/// Records are only mutated, never created, removed, or reordered, and
/// re-running over an already-stamped set yields identical flags.
///
/// # Errors
///
/// Returns [`AuditError::UnrankedSource`] if any record carries a kind
/// outside the override table ([`SourceKind::Unknown`]); in that case no
/// record is stamped. Adapters never emit such records, so hitting this
/// means a caller fabricated one.
///
/// [`SourceKind::Unknown`]: crate::record::SourceKind::Unknown
pub fn mark_active(records: &mut [ResolverRecord]) -> Result<()> {
    // Rank everything up front so an unranked kind fails before any
    // record has been stamped.
    let mut best: HashMap<String, u8> = HashMap::new();
    for record in records.iter() {
        let rank = record
            .source
            .override_rank()
            .ok_or(AuditError::UnrankedSource {
                kind: record.source,
            })?;
        best.entry(record.interface.clone())
            .and_modify(|b| *b = (*b).max(rank))
            .or_insert(rank);
    }

    for record in records.iter_mut() {
        // Rank and interface max are both present after the pass above.
        let rank = record.source.override_rank().unwrap_or_default();
        let max = best.get(&record.interface).copied().unwrap_or_default();
        record.is_active = Some(rank >= max);
    }
    Ok(())
}
