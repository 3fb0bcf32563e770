//! Candidate pair enumeration.
//!
//! The enumerator reports exactly the pairs an all-pairs scan would report.
//! It avoids most Levenshtein work with two bounds that never underestimate a
//! pair's composite score:
//!
//! * named records are swept in order of name length; edit similarity is at
//!   most `shorter / longer`, so once that ratio drops below the lowest name
//!   similarity that could still reach the threshold, no longer name can pair
//!   with the current record;
//! * every remaining pair gets a cheap upper bound (exact email and phone
//!   equality, length ratios for name and address) before it is scored.
//!
//! Records without a name are compared against everything.

use std::collections::HashSet;

use thiserror::Error;

use crate::candidate::{sort_candidates, CandidatePair};
use crate::contact::{ContactRecord, NormalizedContact};
use crate::engine::Matcher;
use crate::scorers::edit_similarity_bound;

/// Slack applied to every pruning comparison so rounding cannot drop a pair
/// whose exact score sits on the threshold.
const BOUND_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("candidate enumeration cancelled after {completed} of {total} records")]
pub struct Cancelled {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    pub records: usize,
    /// Records with at least one comparable field.
    pub comparable: usize,
    /// Pairs fully scored.
    pub scored: usize,
    /// Pairs rejected by the per-pair upper bound.
    pub bounded: usize,
    /// Pairs never visited because the name-length sweep stopped early.
    pub swept: usize,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub candidates: Vec<CandidatePair>,
    pub stats: EnumerationStats,
}

struct Entry {
    contact: NormalizedContact,
    name_len: usize,
    address_len: usize,
}

impl Entry {
    fn new(contact: NormalizedContact) -> Self {
        let name_len = contact.name.as_deref().map_or(0, |n| n.chars().count());
        let address_len = contact.address.as_deref().map_or(0, |a| a.chars().count());
        Self {
            contact,
            name_len,
            address_len,
        }
    }
}

/// Normalized records laid out for the sweep. Each step handles one outer
/// record: named records first (in name-length order), then unnamed ones.
struct Sweep {
    entries: Vec<Entry>,
    named: Vec<usize>,
    unnamed: Vec<usize>,
    name_floor: f64,
    candidates: Vec<CandidatePair>,
    stats: EnumerationStats,
}

impl Sweep {
    fn steps(&self) -> usize {
        self.named.len() + self.unnamed.len()
    }

    fn finish(mut self) -> Enumeration {
        sort_candidates(&mut self.candidates);
        self.stats.candidates = self.candidates.len();

        tracing::debug!(
            records = self.stats.records,
            comparable = self.stats.comparable,
            scored = self.stats.scored,
            bounded = self.stats.bounded,
            swept = self.stats.swept,
            candidates = self.stats.candidates,
            "candidate enumeration finished"
        );

        Enumeration {
            candidates: self.candidates,
            stats: self.stats,
        }
    }
}

impl Matcher {
    /// All candidate pairs, sorted for reporting.
    pub fn find_candidates(&self, records: &[ContactRecord]) -> Vec<CandidatePair> {
        let mut sweep = self.prepare(records);
        for step in 0..sweep.steps() {
            self.advance(&mut sweep, step);
        }
        sweep.finish().candidates
    }

    /// Reference all-pairs scan. Same output as [`Matcher::find_candidates`].
    pub fn find_candidates_exhaustive(&self, records: &[ContactRecord]) -> Vec<CandidatePair> {
        let contacts: Vec<NormalizedContact> =
            records.iter().map(NormalizedContact::from_record).collect();

        let mut candidates = Vec::new();
        for (i, a) in contacts.iter().enumerate() {
            for b in &contacts[i + 1..] {
                if let Some(pair) = self.candidate(a, b) {
                    candidates.push(pair);
                }
            }
        }
        sort_candidates(&mut candidates);
        candidates
    }

    /// Pruned enumeration. `should_stop` is polled once per outer record and
    /// ends the run with [`Cancelled`] when it returns true.
    pub fn enumerate<F>(
        &self,
        records: &[ContactRecord],
        mut should_stop: F,
    ) -> Result<Enumeration, Cancelled>
    where
        F: FnMut() -> bool,
    {
        let mut sweep = self.prepare(records);
        let total = sweep.steps();
        for step in 0..total {
            if should_stop() {
                return Err(Cancelled {
                    completed: step,
                    total,
                });
            }
            self.advance(&mut sweep, step);
        }
        Ok(sweep.finish())
    }

    fn prepare(&self, records: &[ContactRecord]) -> Sweep {
        let mut stats = EnumerationStats {
            records: records.len(),
            ..EnumerationStats::default()
        };

        let mut seen = HashSet::with_capacity(records.len());
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id.as_str()) {
                tracing::warn!(id = %record.id, "duplicate contact identifier in input");
            }
            let contact = NormalizedContact::from_record(record);
            if contact.has_comparable_fields() {
                entries.push(Entry::new(contact));
            }
        }
        stats.comparable = entries.len();

        let (mut named, unnamed): (Vec<usize>, Vec<usize>) =
            (0..entries.len()).partition(|&i| entries[i].contact.name.is_some());
        named.sort_by_key(|&i| (entries[i].name_len, i));

        Sweep {
            entries,
            named,
            unnamed,
            name_floor: self.name_similarity_floor(),
            candidates: Vec::new(),
            stats,
        }
    }

    /// Compare the outer record at `step` against every record after it that
    /// could still pair with it.
    fn advance(&self, sweep: &mut Sweep, step: usize) {
        let Sweep {
            entries,
            named,
            unnamed,
            name_floor,
            candidates,
            stats,
        } = sweep;

        if step < named.len() {
            let i = named[step];
            let rest = &named[step + 1..];
            for (offset, &j) in rest.iter().enumerate() {
                let ratio = edit_similarity_bound(entries[i].name_len, entries[j].name_len);
                if ratio + BOUND_EPSILON < *name_floor {
                    stats.swept += rest.len() - offset;
                    break;
                }
                self.consider(&entries[i], &entries[j], candidates, stats);
            }
        } else {
            let pos = step - named.len();
            let i = unnamed[pos];
            for &j in named.iter().chain(&unnamed[pos + 1..]) {
                self.consider(&entries[i], &entries[j], candidates, stats);
            }
        }
    }

    fn consider(
        &self,
        a: &Entry,
        b: &Entry,
        candidates: &mut Vec<CandidatePair>,
        stats: &mut EnumerationStats,
    ) {
        let may_qualify = self
            .upper_bound(a, b)
            .is_some_and(|bound| bound + BOUND_EPSILON >= self.config().threshold);
        if !may_qualify {
            stats.bounded += 1;
            return;
        }

        stats.scored += 1;
        if let Some(pair) = self.candidate(&a.contact, &b.contact) {
            candidates.push(pair);
        }
    }

    /// Best composite score the pair could reach, or `None` when too few
    /// sub-scores are defined (or none carries weight) for it to qualify.
    fn upper_bound(&self, a: &Entry, b: &Entry) -> Option<f64> {
        let weights = self.weights();
        let (a_c, b_c) = (&a.contact, &b.contact);

        let mut defined = 0;
        let mut best_total = 0.0;
        let mut weight_sum = 0.0;

        if a_c.name.is_some() && b_c.name.is_some() {
            defined += 1;
            best_total += weights.name * edit_similarity_bound(a.name_len, b.name_len);
            weight_sum += weights.name;
        }
        if let (Some(x), Some(y)) = (&a_c.email, &b_c.email) {
            defined += 1;
            if x == y {
                best_total += weights.email;
            }
            weight_sum += weights.email;
        }
        if let (Some(x), Some(y)) = (&a_c.phone, &b_c.phone) {
            defined += 1;
            if x == y {
                best_total += weights.phone;
            }
            weight_sum += weights.phone;
        }
        if a_c.address.is_some() && b_c.address.is_some() {
            defined += 1;
            best_total += weights.address * edit_similarity_bound(a.address_len, b.address_len);
            weight_sum += weights.address;
        }

        if defined < self.config().min_defined_subscores || weight_sum <= 0.0 {
            return None;
        }
        Some(best_total / weight_sum)
    }

    /// Lowest name similarity that can still reach the threshold when every
    /// other sub-score is defined and perfect.
    fn name_similarity_floor(&self) -> f64 {
        let weights = self.weights();
        if weights.name <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let total = weights.total();
        1.0 - (1.0 - self.config().threshold) * total / weights.name
    }
}
