/*!
# Validation Pass

Independent re-derivation of everything the distribution relies on. Each
check collects every discrepancy into a [`ValidationReport`] instead of
stopping at the first, so one run gives a complete audit.

Small drift between per-user vote totals and their allocations is tolerated
(`epsilon`); per-reactor totals must match exactly.
*/

use {
    crate::{
        MultiMerkleDistributorInfo, UserClaimsList,
        records::{Bribes, SystemVotes, UserVotesList},
    },
    serde::Serialize,
    std::{collections::BTreeMap, fmt},
    tracing::{info, warn},
    votemak_merkle::{Account, Amount},
};

/// Default tolerance between a user's `totalVotes` and their summed allocations.
pub const DEFAULT_USER_VOTES_EPSILON: u64 = 1_000_000;

/// The system-wide total tolerates this many user epsilons.
pub const SYSTEM_EPSILON_MULTIPLIER: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    UserVotes,
    SystemVotes,
    ReactorVotes,
    BribeBalance,
    UserClaim,
    InvalidProof,
    RootMismatch,
    ClaimIndex,
    TokenTotal,
    TokenOverAllocated,
    UnknownToken,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MismatchKind::*;
        let s = match self {
            UserVotes => "user votes",
            SystemVotes => "system votes",
            ReactorVotes => "reactor votes",
            BribeBalance => "bribe balance",
            UserClaim => "user claim",
            InvalidProof => "invalid proof",
            RootMismatch => "root mismatch",
            ClaimIndex => "claim index",
            TokenTotal => "token total",
            TokenOverAllocated => "token over-allocated",
            UnknownToken => "unknown token",
        };

        write!(f, "{}", s)
    }
}

/// A computed value that disagrees with its re-derived or observed counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityMismatch {
    pub kind: MismatchKind,
    /// Token, account or reactor key the check was about.
    pub subject: String,
    pub computed: String,
    pub expected: String,
}

impl fmt::Display for IntegrityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INVALID {}: {} (computed {}, expected {})",
            self.kind, self.subject, self.computed, self.expected
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub mismatches: Vec<IntegrityMismatch>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.mismatches.extend(other.mismatches);
    }

    fn report(
        &mut self,
        kind: MismatchKind,
        subject: impl ToString,
        computed: impl ToString,
        expected: impl ToString,
    ) {
        let mismatch = IntegrityMismatch {
            kind,
            subject: subject.to_string(),
            computed: computed.to_string(),
            expected: expected.to_string(),
        };
        warn!(%mismatch, "integrity mismatch");
        self.mismatches.push(mismatch);
    }
}

/// Sum a sequence of amounts for reporting. An overflowing sum is reported
/// as `None`, which no finite expected value can match.
fn total<I: IntoIterator<Item = Amount>>(amounts: I) -> Option<Amount> {
    Amount::checked_sum(amounts)
}

fn display(amount: Option<Amount>) -> String {
    amount.map_or_else(|| "overflow".to_string(), |a| a.to_string())
}

fn within(a: Amount, b: Option<Amount>, epsilon: Amount) -> bool {
    b.is_some_and(|b| a.abs_diff(b) < epsilon)
}

/// Check the vote snapshot against itself and against the vote tracker.
pub fn validate_votes(
    user_votes: &UserVotesList,
    system_votes: &SystemVotes,
    epsilon: Amount,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (account, votes) in user_votes {
        let allocated = total(votes.allocations.iter().map(|a| a.amount));
        if !within(votes.total_votes, allocated, epsilon) {
            report.report(
                MismatchKind::UserVotes,
                account,
                display(allocated),
                votes.total_votes,
            );
        }
    }

    let system_epsilon = epsilon
        .checked_mul(Amount::from(SYSTEM_EPSILON_MULTIPLIER))
        .unwrap_or(Amount::MAX);
    let users_total = total(user_votes.values().map(|v| v.total_votes));
    if !within(system_votes.total_votes, users_total, system_epsilon) {
        report.report(
            MismatchKind::SystemVotes,
            "total",
            display(users_total),
            system_votes.total_votes,
        );
    }

    let mut reactor_totals: BTreeMap<_, Option<Amount>> = BTreeMap::new();
    for votes in user_votes.values() {
        for allocation in &votes.allocations {
            let entry = reactor_totals
                .entry(&allocation.reactor_key)
                .or_insert(Some(Amount::ZERO));
            *entry = entry.and_then(|sum| sum.checked_add(allocation.amount));
        }
    }
    for reactor in &system_votes.votes {
        match reactor_totals.get(&reactor.reactor_key) {
            Some(Some(sum)) if *sum == reactor.total_votes => {}
            Some(sum) => report.report(
                MismatchKind::ReactorVotes,
                &reactor.reactor_key,
                display(*sum),
                reactor.total_votes,
            ),
            None => report.report(
                MismatchKind::ReactorVotes,
                &reactor.reactor_key,
                "missing",
                reactor.total_votes,
            ),
        }
    }

    info!(
        accounts = user_votes.len(),
        mismatches = report.mismatches.len(),
        "validated votes"
    );
    report
}

/// The distributor must hold at least the summed net bribes of every token.
///
/// Expected to fail for tokens where claiming has already started.
pub fn validate_bribes(
    bribes: &Bribes,
    distributor_balances: &BTreeMap<Account, Amount>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (token, reactor_bribes) in bribes {
        let expected = total(reactor_bribes.values().copied());
        let balance = distributor_balances.get(token).copied().unwrap_or_default();
        if expected.is_none_or(|expected| balance < expected) {
            report.report(MismatchKind::BribeBalance, token, balance, display(expected));
        }
    }

    info!(
        tokens = bribes.len(),
        mismatches = report.mismatches.len(),
        "validated bribes (ignore failures if claiming has started)"
    );
    report
}

/// Cross-check the published trees, the per-user view and the bribes.
///
/// Each tree is rebuilt from its published claims, so a claim dropped from
/// both views still shows up as a root mismatch.
pub fn validate_merkle_tree(
    bribes: &Bribes,
    info: &MultiMerkleDistributorInfo,
    user_claims: &UserClaimsList,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // user view against tree view
    let mut user_view_totals: BTreeMap<Account, Option<Amount>> = BTreeMap::new();
    for (account, claims) in user_claims {
        for (token, claim) in claims {
            let tree_claim = info
                .get(token)
                .and_then(|distributor| distributor.claims.get(account));
            match tree_claim {
                Some(tree_claim) if tree_claim.amount == claim.amount => {}
                Some(tree_claim) => report.report(
                    MismatchKind::UserClaim,
                    format!("{account} / {token}"),
                    claim.amount,
                    tree_claim.amount,
                ),
                None => report.report(
                    MismatchKind::UserClaim,
                    format!("{account} / {token}"),
                    claim.amount,
                    "no claim in tree",
                ),
            }

            let sum = user_view_totals.entry(*token).or_insert(Some(Amount::ZERO));
            *sum = sum.and_then(|s| s.checked_add(claim.amount));
        }
    }

    // every tree against itself
    for (token, distributor) in info {
        for (account, claim) in &distributor.claims {
            let in_user_view = user_claims
                .get(account)
                .is_some_and(|claims| claims.contains_key(token));
            if !in_user_view {
                report.report(
                    MismatchKind::UserClaim,
                    format!("{account} / {token}"),
                    "no user claim",
                    claim.amount,
                );
            }

            if !distributor.verify(account, claim) {
                report.report(
                    MismatchKind::InvalidProof,
                    format!("{account} / {token}"),
                    claim.index,
                    distributor.merkle_root,
                );
            }
        }

        // the published claims must reproduce the published root and indices
        match distributor.rebuild_tree() {
            Ok(tree) => {
                if tree.root() != distributor.merkle_root {
                    report.report(
                        MismatchKind::RootMismatch,
                        token,
                        tree.root(),
                        distributor.merkle_root,
                    );
                }
                for (account, claim) in &distributor.claims {
                    let rebuilt = tree.index_of(account).ok().map(|index| index as u64);
                    if rebuilt != Some(claim.index) {
                        report.report(
                            MismatchKind::ClaimIndex,
                            format!("{account} / {token}"),
                            claim.index,
                            rebuilt.map_or_else(|| "none".to_string(), |i| i.to_string()),
                        );
                    }
                }
            }
            Err(e) => report.report(
                MismatchKind::RootMismatch,
                token,
                e,
                distributor.merkle_root,
            ),
        }

        let claims_total = total(distributor.claims.values().map(|c| c.amount));
        if claims_total != Some(distributor.token_total) {
            report.report(
                MismatchKind::TokenTotal,
                token,
                display(claims_total),
                distributor.token_total,
            );
        }
    }

    // claims never exceed what was bribed
    for (token, claimed) in &user_view_totals {
        let Some(reactor_bribes) = bribes.get(token) else {
            report.report(MismatchKind::UnknownToken, token, display(*claimed), "no bribes");
            continue;
        };
        let bribed = total(reactor_bribes.values().copied());
        let over = match (claimed, bribed) {
            (Some(claimed), Some(bribed)) => *claimed > bribed,
            _ => true,
        };
        if over {
            report.report(
                MismatchKind::TokenOverAllocated,
                token,
                display(*claimed),
                display(bribed),
            );
        }
    }

    info!(
        tokens = info.len(),
        accounts = user_claims.len(),
        mismatches = report.mismatches.len(),
        "validated merkle trees"
    );
    report
}
