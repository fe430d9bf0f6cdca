//! Token number issuance.

use walkin_core::TokenNo;

/// Issues token numbers for the current operating day.
///
/// Owned by the walk-in actor, so every call runs inside its mailbox and no
/// two callers can observe the same counter value. The counter is seeded from
/// the store's high-water mark and is unsynced until then; an unsynced
/// sequencer issues nothing.
#[derive(Debug, Default)]
pub struct TokenSequencer {
    last_issued: Option<u64>,
}

impl TokenSequencer {
    /// A sequencer that must be seeded before issuing.
    pub fn unsynced() -> Self {
        Self { last_issued: None }
    }

    pub fn is_synced(&self) -> bool {
        self.last_issued.is_some()
    }

    /// Resume after the highest token found in the store.
    pub fn seed(&mut self, high_water_mark: u64) {
        self.last_issued = Some(high_water_mark);
    }

    /// Next token, strictly greater than every token issued since the last reset.
    pub fn next(&mut self) -> Option<TokenNo> {
        let next = self.last_issued?.checked_add(1)?;
        self.last_issued = Some(next);
        Some(TokenNo(next))
    }

    /// Forget the counter; the next issue must reseed from the store.
    pub fn invalidate(&mut self) {
        self.last_issued = None;
    }

    /// Start the next operating day at token 1.
    pub fn reset(&mut self) {
        self.last_issued = Some(0);
    }

    /// Last token handed out, 0 right after a reset.
    pub fn last_issued(&self) -> Option<u64> {
        self.last_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(high_water_mark: u64) -> TokenSequencer {
        let mut seq = TokenSequencer::unsynced();
        seq.seed(high_water_mark);
        seq
    }

    #[test]
    fn issues_increasing_tokens_from_seed() {
        let mut seq = seeded(0);
        assert_eq!(seq.next(), Some(TokenNo(1)));
        assert_eq!(seq.next(), Some(TokenNo(2)));

        let mut resumed = seeded(41);
        assert_eq!(resumed.next(), Some(TokenNo(42)));
    }

    #[test]
    fn unsynced_issues_nothing_until_seeded() {
        let mut seq = TokenSequencer::unsynced();
        assert_eq!(seq.next(), None);
        seq.seed(7);
        assert_eq!(seq.next(), Some(TokenNo(8)));
    }

    #[test]
    fn reset_restarts_at_one() {
        let mut seq = seeded(17);
        seq.reset();
        assert_eq!(seq.last_issued(), Some(0));
        assert_eq!(seq.next(), Some(TokenNo(1)));
    }

    #[test]
    fn invalidate_requires_reseed() {
        let mut seq = seeded(3);
        seq.invalidate();
        assert!(!seq.is_synced());
        assert_eq!(seq.next(), None);
    }
}
