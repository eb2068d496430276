use crate::census::PopulationIndex;
use crate::models::{
    Ballot, BucketCount, Party, PartyBreakdown, RepresentationStats, VoteCast,
};

use super::ProcessError;

/// Compute the population-weighted representation and the party breakdown
/// for one roster of ballots.
///
/// Each ballot contributes its state's full population to its bucket, once
/// per seat: two senators from the same state voting the same way count that
/// population twice, against a denominator of twice the national population.
pub fn compute(
    ballots: &[Ballot],
    index: &PopulationIndex,
) -> Result<(RepresentationStats, PartyBreakdown), ProcessError> {
    let mut population = [0u64; 3];
    let mut party = PartyBreakdown::default();

    for ballot in ballots {
        let state_population = index.population_of(&ballot.state).ok_or_else(|| {
            ProcessError::DataUnavailable(format!(
                "no population data for state {}",
                ballot.state
            ))
        })?;

        let bucket = match ballot.cast {
            VoteCast::Yea => &mut party.yea,
            VoteCast::Nay => &mut party.nay,
            VoteCast::Abstain => &mut party.abstain,
        };
        bucket.total += 1;
        match ballot.party {
            Party::Democrat => bucket.democrats += 1,
            Party::Republican => bucket.republicans += 1,
            Party::Other => {}
        }

        population[ballot.cast as usize] += state_population;
    }

    // two seats per state
    let denominator = index.national_population() * 2;
    let fraction = |cast: VoteCast| {
        if denominator == 0 {
            0.0
        } else {
            population[cast as usize] as f64 / denominator as f64
        }
    };

    let stats = RepresentationStats {
        yea: fraction(VoteCast::Yea),
        nay: fraction(VoteCast::Nay),
        abstain: fraction(VoteCast::Abstain),
    };
    Ok((stats, party))
}
