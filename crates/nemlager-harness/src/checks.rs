// crates/nemlager-harness/src/checks.rs
// ============================================================================
// Module: Response Invariants
// Description: Pure checks over decoded API payloads.
// Purpose: Keep endpoint invariants testable without a live service.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Shape invariants asserted by the endpoint cases: product ids are unique
//! and a filtered cron listing is exactly the flagged subset of the
//! unfiltered listing.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::models::CronMail;
use crate::models::MailType;
use crate::models::ProductSummary;

/// Counts occurrences of each product id.
#[must_use]
pub fn product_id_counts(products: &[ProductSummary]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for product in products {
        *counts.entry(product.id).or_insert(0) += 1;
    }
    counts
}

/// Returns ids that occur more than once, with their counts.
#[must_use]
pub fn duplicate_product_ids(products: &[ProductSummary]) -> BTreeMap<i64, usize> {
    product_id_counts(products).into_iter().filter(|(_, count)| *count > 1).collect()
}

/// Counts mails carrying the flag for `mail_type`.
#[must_use]
pub fn count_flagged(mails: &[CronMail], mail_type: MailType) -> usize {
    mails.iter().filter(|mail| mail_type.is_flagged(mail)).count()
}

/// Returns the mails carrying the flag for `mail_type`, in listing order.
#[must_use]
pub fn flagged(mails: &[CronMail], mail_type: MailType) -> Vec<&CronMail> {
    mails.iter().filter(|mail| mail_type.is_flagged(mail)).collect()
}

/// Mismatch between a filtered listing and the flagged unfiltered subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMismatch {
    /// Flagged entries in the unfiltered listing.
    pub expected_count: usize,
    /// Entries in the filtered listing.
    pub actual_count: usize,
    /// Filtered ids absent from the flagged subset.
    pub unexpected_ids: Vec<i64>,
    /// Flagged ids absent from the filtered listing.
    pub missing_ids: Vec<i64>,
}

impl std::fmt::Display for FilterMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected {} mails, got {} (unexpected ids {:?}, missing ids {:?})",
            self.expected_count, self.actual_count, self.unexpected_ids, self.missing_ids
        )
    }
}

/// Verifies `filtered` is exactly the `mail_type` subset of `unfiltered`.
///
/// # Errors
///
/// Returns [`FilterMismatch`] when counts differ or ids disagree.
pub fn verify_filtered_listing(
    unfiltered: &[CronMail],
    filtered: &[CronMail],
    mail_type: MailType,
) -> Result<(), FilterMismatch> {
    let expected: BTreeSet<i64> = flagged(unfiltered, mail_type).iter().map(|mail| mail.id).collect();
    let actual: BTreeSet<i64> = filtered.iter().map(|mail| mail.id).collect();
    let expected_count = count_flagged(unfiltered, mail_type);
    let unexpected_ids: Vec<i64> = actual.difference(&expected).copied().collect();
    let missing_ids: Vec<i64> = expected.difference(&actual).copied().collect();
    if expected_count == filtered.len() && unexpected_ids.is_empty() && missing_ids.is_empty() {
        return Ok(());
    }
    Err(FilterMismatch {
        expected_count,
        actual_count: filtered.len(),
        unexpected_ids,
        missing_ids,
    })
}
