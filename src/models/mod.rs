/// The three outcome buckets every cast value is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteCast {
    Yea,
    Nay,
    Abstain,
}

impl VoteCast {
    /// Normalize a raw `vote_cast` string from senate.gov. Anything that is
    /// not exactly "Yea" or "Nay" (e.g. "Not Voting", "Present", "Guilty")
    /// counts as an abstention.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "Yea" => VoteCast::Yea,
            "Nay" => VoteCast::Nay,
            _ => VoteCast::Abstain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Democrat,
    Republican,
    Other,
}

impl Party {
    pub fn from_code(code: &str) -> Self {
        match code {
            "D" => Party::Democrat,
            "R" => Party::Republican,
            _ => Party::Other,
        }
    }
}

/// One senator's recorded choice on one roll call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    /// Two-letter state code, e.g. "WY".
    pub state: String,
    pub party: Party,
    pub cast: VoteCast,
}

/// The kinds of questions the bot knows how to describe. Matched in this
/// order against the normalized question text; first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Motion,
    Bill,
    Amendment,
    Resolution,
    Nomination,
    Veto,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::Motion,
        QuestionType::Bill,
        QuestionType::Amendment,
        QuestionType::Resolution,
        QuestionType::Nomination,
        QuestionType::Veto,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            QuestionType::Motion => "motion",
            QuestionType::Bill => "bill",
            QuestionType::Amendment => "amendment",
            QuestionType::Resolution => "resolution",
            QuestionType::Nomination => "nomination",
            QuestionType::Veto => "veto",
        }
    }
}

/// Share of the national population represented by each outcome bucket.
///
/// Each fraction is in [0, 1] against a denominator of twice the national
/// population (two seats per state). The three fractions do not need to sum
/// to 1: seats can be vacant and the denominator deliberately ignores DC and
/// PR residents, who have no senators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RepresentationStats {
    pub yea: f64,
    pub nay: f64,
    pub abstain: f64,
}

/// Vote counts for one outcome bucket, split by major party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketCount {
    pub total: u32,
    pub democrats: u32,
    pub republicans: u32,
}

impl BucketCount {
    /// Independents and third-party members: whatever the majors don't cover.
    pub fn others(&self) -> u32 {
        self.total - (self.democrats + self.republicans)
    }
}

/// Per-bucket vote counts with the major-party split, derived from a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartyBreakdown {
    pub yea: BucketCount,
    pub nay: BucketCount,
    pub abstain: BucketCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_exact_yea_and_nay() {
        assert_eq!(VoteCast::normalize("Yea"), VoteCast::Yea);
        assert_eq!(VoteCast::normalize("Nay"), VoteCast::Nay);
    }

    #[test]
    fn normalize_maps_everything_else_to_abstain() {
        for raw in ["Not Voting", "Present", "Guilty", "yea", "NAY", ""] {
            assert_eq!(VoteCast::normalize(raw), VoteCast::Abstain);
        }
    }

    #[test]
    fn party_codes() {
        assert_eq!(Party::from_code("D"), Party::Democrat);
        assert_eq!(Party::from_code("R"), Party::Republican);
        assert_eq!(Party::from_code("I"), Party::Other);
        assert_eq!(Party::from_code("ID"), Party::Other);
    }

    #[test]
    fn bucket_others_is_remainder() {
        let bucket = BucketCount {
            total: 52,
            democrats: 48,
            republicans: 2,
        };
        assert_eq!(bucket.others(), 2);
    }
}
