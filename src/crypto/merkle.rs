use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, H256, U256};

use super::hash::{hash_pair_sorted, keccak256};

/// Leaf committed to by an allowlist merkle root:
/// `abi.encode(address user, uint256 maxCanMint, uint256 price)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowListLeaf {
    pub user: Address,
    pub max_can_mint: U256,
    pub price: U256,
}

impl AllowListLeaf {
    pub fn encode(&self) -> Vec<u8> {
        abi::encode(&[
            Token::Address(self.user),
            Token::Uint(self.max_can_mint),
            Token::Uint(self.price),
        ])
    }

    pub fn decode(unhashed: &[u8]) -> Option<Self> {
        let tokens = abi::decode(
            &[ParamType::Address, ParamType::Uint(256), ParamType::Uint(256)],
            unhashed,
        )
        .ok()?;
        let mut tokens = tokens.into_iter();
        let user = tokens.next()?.into_address()?;
        let max_can_mint = tokens.next()?.into_uint()?;
        let price = tokens.next()?.into_uint()?;
        Some(Self {
            user,
            max_can_mint,
            price,
        })
    }

    pub fn hash(&self) -> H256 {
        keccak256(&self.encode())
    }
}

/// Folds `proof` over `leaf` with sorted-pair hashing and compares to `root`.
pub fn verify_proof(root: H256, leaf: H256, proof: &[H256]) -> bool {
    let computed = proof
        .iter()
        .fold(leaf, |current, sibling| hash_pair_sorted(current, *sibling));
    computed == root
}

/// Builds a root from leaves the same way the allowlist service does. Only
/// used to produce fixtures; the client never builds trees itself.
#[cfg(test)]
pub(crate) fn root_and_proofs(leaves: &[H256]) -> (H256, Vec<Vec<H256>>) {
    let mut levels: Vec<Vec<H256>> = vec![leaves.to_vec()];
    while levels.last().map(|l| l.len()).unwrap_or(0) > 1 {
        let current = levels.last().cloned().unwrap_or_default();
        let next = current
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash_pair_sorted(*left, *right),
                [single] => *single,
                _ => unreachable!(),
            })
            .collect();
        levels.push(next);
    }
    let root = levels.last().and_then(|l| l.first().copied()).unwrap_or_default();

    let proofs = (0..leaves.len())
        .map(|leaf_index| {
            let mut proof = Vec::new();
            let mut index = leaf_index;
            for level in &levels[..levels.len() - 1] {
                let sibling = index ^ 1;
                if sibling < level.len() {
                    proof.push(level[sibling]);
                }
                index /= 2;
            }
            proof
        })
        .collect();
    (root, proofs)
}
