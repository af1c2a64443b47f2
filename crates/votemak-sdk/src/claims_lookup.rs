use {
    crate::{UserClaims, UserClaimsList},
    tracing::debug,
    votemak_merkle::Account,
};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Failed to parse address")]
    InvalidAddress(#[source] votemak_merkle::ParseAccountError),
}

/// Serves one account's claims across every token.
#[derive(Debug, Clone, Default)]
pub struct ClaimsLookup {
    claims: UserClaimsList,
}

impl ClaimsLookup {
    pub fn new(claims: UserClaimsList) -> Self {
        Self { claims }
    }

    /// Claims for `raw_address` in any casing.
    ///
    /// A malformed address is an error; a well-formed address with nothing
    /// to claim gets an empty set.
    pub fn lookup(&self, raw_address: &str) -> Result<(Account, UserClaims), LookupError> {
        let account: Account = raw_address
            .trim()
            .parse()
            .map_err(LookupError::InvalidAddress)?;

        let claims = self.claims.get(&account).cloned().unwrap_or_default();
        debug!(%account, tokens = claims.len(), "looked up claims");
        Ok((account, claims))
    }
}
