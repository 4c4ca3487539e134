// ── Snapshot change detection ──
//
// Decides whether a freshly polled domain list differs from the one the
// UI is already showing. Used only to suppress redundant renders.

use vmswitch_api::DomainSummary;

/// `true` iff `a` and `b` hold the same multiset of domains, compared by
/// full structural value and ignoring order.
pub fn snapshots_equal(a: &[DomainSummary], b: &[DomainSummary]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut left: Vec<&DomainSummary> = a.iter().collect();
    let mut right: Vec<&DomainSummary> = b.iter().collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Whether `next` should replace `previous`.
///
/// An absent previous snapshot always counts as changed, even against an
/// empty list, so the first successful poll is always rendered.
pub fn snapshot_changed(previous: Option<&[DomainSummary]>, next: &[DomainSummary]) -> bool {
    previous.is_none_or(|prev| !snapshots_equal(prev, next))
}
