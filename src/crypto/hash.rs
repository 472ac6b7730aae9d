use ethers::types::H256;
use sha3::{Digest, Keccak256};

/// Keccak256 digest of `data`.
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

/// Hash of two nodes in ascending order, as OpenZeppelin's `MerkleProof` does.
pub fn hash_pair_sorted(left: H256, right: H256) -> H256 {
    let (first, second) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(first.as_bytes());
    buf[32..].copy_from_slice(second.as_bytes());
    keccak256(&buf)
}
