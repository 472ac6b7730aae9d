use async_trait::async_trait;
use ethers::types::{Address, H256};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::{timeout, Duration};
use url::Url;

use crate::{
    constants::HTTP_TIMEOUT_MS,
    crypto::merkle::AllowListLeaf,
    error::{Result, SdkError},
    models::AllowListEntry,
    utils::{with_retries, RetryPolicy},
};

/// Looks up an address's entry under an allowlist merkle root.
#[async_trait]
pub trait AllowListProvider: Send + Sync {
    async fn entry_for(&self, merkle_root: H256, user: Address) -> Result<Option<AllowListEntry>>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowListProofResponse {
    pub proof: Vec<String>,
    pub unhashed_leaf: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllowedBody {
    One(AllowListProofResponse),
    Many(Vec<AllowListProofResponse>),
}

impl AllowedBody {
    fn into_first(self) -> Option<AllowListProofResponse> {
        match self {
            AllowedBody::One(response) => Some(response),
            AllowedBody::Many(responses) => responses.into_iter().next(),
        }
    }
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    let trimmed = value.trim();
    hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed)).ok()
}

/// Turns the service's response into an entry. Anything that does not decode,
/// belongs to another address or fails proof verification is "not eligible".
pub fn decode_allowlist_response(
    response: &AllowListProofResponse,
    merkle_root: H256,
    user: Address,
) -> Option<AllowListEntry> {
    let Some(leaf) = decode_hex(&response.unhashed_leaf).and_then(|b| AllowListLeaf::decode(&b))
    else {
        tracing::warn!("Could not decode allowlist leaf for {:#x}", user);
        return None;
    };

    let mut proof = Vec::with_capacity(response.proof.len());
    for node in &response.proof {
        match decode_hex(node).filter(|bytes| bytes.len() == 32) {
            Some(bytes) => proof.push(H256::from_slice(&bytes)),
            None => {
                tracing::warn!("Invalid allowlist proof node {:?} for {:#x}", node, user);
                return None;
            }
        }
    }

    if leaf.user != user {
        tracing::warn!(
            "Allowlist leaf is for {:#x}, expected {:#x}",
            leaf.user,
            user
        );
        return None;
    }

    let Some(entry) = AllowListEntry::from_leaf(leaf, proof) else {
        tracing::warn!("Allowlist cap for {:#x} does not fit in u64", user);
        return None;
    };

    if !entry.verify(merkle_root) {
        tracing::warn!(
            "Allowlist proof for {:#x} does not match root {:#x}",
            user,
            merkle_root
        );
        return None;
    }
    Some(entry)
}

#[derive(Clone, Debug)]
pub struct AllowListApiClient {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl AllowListApiClient {
    pub fn new(base_url: String, retry: RetryPolicy) -> Self {
        Self {
            base_url,
            client: Client::new(),
            retry,
        }
    }

    fn allowed_url(&self, merkle_root: H256, user: Address) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/allowed", self.base_url.trim_end_matches('/')))
            .map_err(|e| SdkError::Config(format!("Invalid allowlist API url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("user", &format!("{:#x}", user))
            .append_pair("root", &format!("{:#x}", merkle_root));
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Option<AllowListProofResponse>> {
        let response = timeout(
            Duration::from_millis(HTTP_TIMEOUT_MS),
            self.client.get(url.clone()).send(),
        )
        .await
        .map_err(|_| SdkError::ExternalApi("allowlist API timeout".to_string()))??;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SdkError::ExternalApi(format!(
                "allowlist API returned {}",
                status
            )));
        }

        let text = response.text().await?;
        match serde_json::from_str::<AllowedBody>(&text) {
            Ok(body) => Ok(body.into_first()),
            Err(e) => {
                tracing::warn!("Unreadable allowlist API response: {}", e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl AllowListProvider for AllowListApiClient {
    async fn entry_for(&self, merkle_root: H256, user: Address) -> Result<Option<AllowListEntry>> {
        let url = self.allowed_url(merkle_root, user)?;
        let url_ref = &url;
        let response = with_retries(self.retry, "allowlist lookup", move |_| {
            self.fetch_once(url_ref)
        })
        .await?;

        Ok(response.and_then(|r| decode_allowlist_response(&r, merkle_root, user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::merkle::root_and_proofs;
    use ethers::types::U256;

    fn fixture() -> (H256, Vec<AllowListLeaf>, Vec<Vec<H256>>) {
        let leaves: Vec<AllowListLeaf> = (1..=4u8)
            .map(|b| AllowListLeaf {
                user: Address::repeat_byte(b),
                max_can_mint: U256::from(b as u64),
                price: U256::from(1_000u64),
            })
            .collect();
        let hashes: Vec<H256> = leaves.iter().map(AllowListLeaf::hash).collect();
        let (root, proofs) = root_and_proofs(&hashes);
        (root, leaves, proofs)
    }

    fn response_for(leaf: &AllowListLeaf, proof: &[H256]) -> AllowListProofResponse {
        AllowListProofResponse {
            proof: proof.iter().map(|p| format!("{:#x}", p)).collect(),
            unhashed_leaf: format!("0x{}", hex::encode(leaf.encode())),
        }
    }

    #[test]
    fn decodes_and_verifies_entry() {
        let (root, leaves, proofs) = fixture();
        let entry = decode_allowlist_response(
            &response_for(&leaves[2], &proofs[2]),
            root,
            Address::repeat_byte(3),
        )
        .expect("entry should be valid");
        assert_eq!(entry.max_can_mint, 3);
        assert_eq!(entry.price, U256::from(1_000u64));
        assert_eq!(entry.proof, proofs[2]);
    }

    #[test]
    fn garbage_leaf_is_treated_as_absent() {
        let (root, _, _) = fixture();
        let response = AllowListProofResponse {
            proof: vec![],
            unhashed_leaf: "0xdeadbeef".to_string(),
        };
        assert!(decode_allowlist_response(&response, root, Address::repeat_byte(1)).is_none());
    }

    #[test]
    fn leaf_for_other_user_is_rejected() {
        let (root, leaves, proofs) = fixture();
        let response = response_for(&leaves[0], &proofs[0]);
        assert!(decode_allowlist_response(&response, root, Address::repeat_byte(2)).is_none());
    }

    #[test]
    fn proof_against_wrong_root_is_rejected() {
        let (_, leaves, proofs) = fixture();
        let response = response_for(&leaves[0], &proofs[0]);
        assert!(decode_allowlist_response(
            &response,
            H256::repeat_byte(0xff),
            Address::repeat_byte(1)
        )
        .is_none());
    }

    #[test]
    fn allowed_body_accepts_object_or_array() {
        let one: AllowedBody =
            serde_json::from_str(r#"{"proof":[],"unhashedLeaf":"0x"}"#).unwrap();
        assert!(one.into_first().is_some());
        let many: AllowedBody = serde_json::from_str(r#"[]"#).unwrap();
        assert!(many.into_first().is_none());
    }

    #[test]
    fn allowed_url_carries_user_and_root() {
        let client = AllowListApiClient::new(
            "https://allowlist.zora.co/".to_string(),
            RetryPolicy::default(),
        );
        let url = client
            .allowed_url(H256::repeat_byte(0xab), Address::repeat_byte(0x01))
            .unwrap();
        assert_eq!(url.path(), "/allowed");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].0, "user");
        assert_eq!(pairs[0].1, format!("0x{}", "01".repeat(20)));
        assert_eq!(pairs[1].1, format!("0x{}", "ab".repeat(32)));
    }
}
