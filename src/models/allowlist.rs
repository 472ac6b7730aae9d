use ethers::types::{Address, H256, U256};
use serde::Serialize;

use crate::crypto::merkle::{verify_proof, AllowListLeaf};

/// An address's allowlist entitlement plus the proof for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowListEntry {
    pub user: Address,
    pub max_can_mint: u64,
    pub price: U256,
    pub proof: Vec<H256>,
}

impl AllowListEntry {
    /// Returns `None` when `max_can_mint` does not fit in a u64.
    pub fn from_leaf(leaf: AllowListLeaf, proof: Vec<H256>) -> Option<Self> {
        if leaf.max_can_mint > U256::from(u64::MAX) {
            return None;
        }
        Some(Self {
            user: leaf.user,
            max_can_mint: leaf.max_can_mint.as_u64(),
            price: leaf.price,
            proof,
        })
    }

    pub fn leaf(&self) -> AllowListLeaf {
        AllowListLeaf {
            user: self.user,
            max_can_mint: U256::from(self.max_can_mint),
            price: self.price,
        }
    }

    pub fn verify(&self, merkle_root: H256) -> bool {
        verify_proof(merkle_root, self.leaf().hash(), &self.proof)
    }
}
