//! Food id allocation.
//!
//! Ids look like `IND0042`: a three letter prefix chosen from the food's
//! category followed by a sequence number padded to four digits.

/// Returns the id prefix for a category. Matching is exact.
pub fn prefix_for_category(category: &str) -> &'static str {
    match category {
        "Indian" => "IND",
        "High-Protein" => "HPR",
        "Custom" => "CUS",
        _ => "GEN",
    }
}

/// Formats an id from a prefix and sequence number.
pub fn format_id(prefix: &str, seq: u64) -> String {
    format!("{}{:04}", prefix, seq)
}

/// Extracts the trailing sequence number of an id, if it has one.
pub fn sequence_of(id: &str) -> Option<u64> {
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    id[digits_start..].parse().ok()
}

/// Monotonic id sequence.
///
/// Starts above both the record count and the largest numeric suffix seen,
/// so ids stay unique even if records were removed from the file by hand.
#[derive(Debug, Clone)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn starting_after<'a>(record_count: usize, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let max_suffix = ids.into_iter().filter_map(sequence_of).max().unwrap_or(0);
        Self {
            last: max_suffix.max(record_count as u64),
        }
    }

    /// Next id for `category` for which `taken` returns false, or `None`
    /// once the sequence would pass `u64::MAX`.
    ///
    /// Does not advance the sequence; call [`IdSequence::commit`] once the
    /// id has actually been stored.
    pub fn peek(&self, category: &str, taken: impl Fn(&str) -> bool) -> Option<(String, u64)> {
        let prefix = prefix_for_category(category);
        let mut seq = self.last.checked_add(1)?;
        loop {
            let id = format_id(prefix, seq);
            if !taken(&id) {
                return Some((id, seq));
            }
            seq = seq.checked_add(1)?;
        }
    }

    pub fn commit(&mut self, seq: u64) {
        self.last = self.last.max(seq);
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}
