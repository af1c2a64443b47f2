/*!
# Distribution Aggregation

Turns decoded chain records into the `token -> account -> amount` table
every merkle tree is built from.

## Arithmetic

All amounts are `uint256` and every step is exact integer math:

- net bribe: `gross - floor(gross * fee / 10000)`
- claim: `floor(bribe * allocation / reactor_votes)`

Truncation always rounds down, so the sum of claims for a reactor never
exceeds its bribe. Any overflow is an error rather than a wrapped value.
*/

use {
    crate::{
        DistributionError, DistributionResult, FeeSchedule,
        records::{BribeRecords, Bribes, ReactorBreakdown, ReactorVotes, TokenDistribution, UserVotesList},
    },
    tracing::{debug, info},
    votemak_merkle::Amount,
};

/// Sum every allocation per reactor key.
pub fn reactor_votes(user_votes: &UserVotesList) -> DistributionResult<ReactorVotes> {
    let mut totals = ReactorVotes::new();
    for votes in user_votes.values() {
        for allocation in &votes.allocations {
            let total = totals.entry(allocation.reactor_key.clone()).or_default();
            *total = checked_add(*total, allocation.amount)?;
        }
    }
    Ok(totals)
}

/// Net-of-fee bribe totals per token and reactor.
///
/// Bribes are priced with the fee in effect at their position in the chain.
/// A bribe on a proposal with no known reactor key fails the whole pass.
pub fn bribes_from_events(
    records: &BribeRecords,
    initial_fee: Amount,
) -> DistributionResult<Bribes> {
    let schedule = FeeSchedule::new(initial_fee, &records.fee_events)?;

    let mut bribe_events: Vec<_> = records.bribe_events.iter().collect();
    bribe_events.sort_by_key(|event| event.position());

    let mut bribes = Bribes::new();
    for event in bribe_events {
        let reactor_key = records
            .proposal_reactor_keys
            .get(&event.proposal)
            .ok_or(DistributionError::UnknownProposal {
                proposal: event.proposal,
            })?;

        let net = schedule.net_amount(event.amount, event.position())?;
        let total = bribes
            .entry(event.token)
            .or_default()
            .entry(reactor_key.clone())
            .or_default();
        *total = checked_add(*total, net)?;
    }

    info!(
        fee_events = records.fee_events.len(),
        bribe_events = records.bribe_events.len(),
        tokens = bribes.len(),
        "computed net bribes"
    );
    Ok(bribes)
}

/// Each user's proportional share of every bribe on the reactors they voted for.
///
/// Zero-value shares are left out, and a user funded by several reactors for
/// the same token gets the sum. Reactors with zero total votes pay nobody.
pub fn generate_distribution(
    bribes: &Bribes,
    user_votes: &UserVotesList,
    reactor_votes: &ReactorVotes,
) -> DistributionResult<TokenDistribution> {
    let mut distribution = TokenDistribution::new();

    for (user, votes) in user_votes {
        for allocation in &votes.allocations {
            let Some(total_votes) = reactor_votes
                .get(&allocation.reactor_key)
                .filter(|total| !total.is_zero())
            else {
                continue;
            };

            for (token, reactor_bribes) in bribes {
                let Some(bribe) = reactor_bribes.get(&allocation.reactor_key) else {
                    continue;
                };

                let claim = bribe
                    .mul_div_floor(allocation.amount, *total_votes)
                    .ok_or_else(|| {
                        DistributionError::AmountOverflow(format!(
                            "{bribe} * {} / {total_votes}",
                            allocation.amount
                        ))
                    })?;
                if claim.is_zero() {
                    continue;
                }

                let entry = distribution
                    .entry(*token)
                    .or_default()
                    .entry(*user)
                    .or_default();
                *entry = checked_add(*entry, claim)?;
            }
        }
    }

    for (token, claims) in &distribution {
        debug!(%token, accounts = claims.len(), "aggregated token distribution");
    }
    info!(tokens = distribution.len(), "generated distribution");

    Ok(distribution)
}

/// Who voted how much for each reactor.
pub fn reactor_breakdown(user_votes: &UserVotesList) -> ReactorBreakdown {
    let mut breakdown = ReactorBreakdown::new();
    for (user, votes) in user_votes {
        for allocation in &votes.allocations {
            breakdown
                .entry(allocation.reactor_key.clone())
                .or_default()
                .insert(*user, allocation.amount);
        }
    }
    breakdown
}

pub(crate) fn checked_add(a: Amount, b: Amount) -> DistributionResult<Amount> {
    a.checked_add(b)
        .ok_or_else(|| DistributionError::AmountOverflow(format!("{a} + {b}")))
}
