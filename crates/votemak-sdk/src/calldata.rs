use {
    crate::{MultiMerkleDistributorInfo, UserClaims},
    alloy_primitives::{Address, U256},
    alloy_sol_types::{SolCall, sol},
    serde::Serialize,
    votemak_merkle::{Account, B256},
};

sol! {
    /// One entry of a batched claim on the distributor.
    struct ClaimParams {
        address token;
        address account;
        uint256 index;
        uint256 amount;
        bytes32[] merkleProof;
    }

    function updateMerkleRoots(address[] tokens, bytes32[] merkleRoots);

    function claim(ClaimParams[] claims);
}

/// The root publishing call, with the arrays it was built from for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootUpdatePayload {
    pub tokens: Vec<Account>,
    pub merkle_roots: Vec<B256>,
    #[serde(serialize_with = "serialize_calldata")]
    pub calldata: Vec<u8>,
}

impl RootUpdatePayload {
    pub fn hex_calldata(&self) -> String {
        format!("0x{}", hex::encode(&self.calldata))
    }
}

/// `updateMerkleRoots(tokens, merkleRoots)` for every token in `info`.
///
/// `tokens[i]` and `merkle_roots[i]` always refer to the same tree.
pub fn generate_calldata(info: &MultiMerkleDistributorInfo) -> RootUpdatePayload {
    let (tokens, merkle_roots): (Vec<Account>, Vec<B256>) = info
        .iter()
        .map(|(token, distributor)| (*token, distributor.merkle_root))
        .unzip();

    let call = updateMerkleRootsCall {
        tokens: tokens.iter().map(|token| token.address()).collect(),
        merkleRoots: merkle_roots.clone(),
    };

    RootUpdatePayload {
        tokens,
        merkle_roots,
        calldata: call.abi_encode(),
    }
}

/// `claim(...)` covering every token `account` can claim, as submitted by the user.
pub fn encode_claim_calldata(account: &Account, user_claims: &UserClaims) -> Vec<u8> {
    let claims = user_claims
        .iter()
        .map(|(token, claim)| ClaimParams {
            token: token.address(),
            account: Address::from(*account),
            index: U256::from(claim.index),
            amount: claim.amount.as_u256(),
            merkleProof: claim.proof.clone(),
        })
        .collect();

    claimCall { claims }.abi_encode()
}

fn serialize_calldata<S>(calldata: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(calldata)))
}
