use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde::Deserialize;
use tokio::time::{timeout, Duration};

use super::records::{RawSalesStrategy, TokenSalesData};
use crate::{
    constants::HTTP_TIMEOUT_MS,
    error::{Result, SdkError},
    utils::{with_retries, RetryPolicy},
};

const TOKEN_SALES_QUERY: &str = r#"
query TokenSales($id: ID!) {
  zoraCreateToken(id: $id) {
    contract {
      mintFeePerQuantity
    }
    salesStrategies(where: { type_in: ["FIXED_PRICE", "ERC_20_MINTER", "PRESALE", "ZORA_TIMED"] }) {
      type
      fixedPrice { address pricePerToken saleStart saleEnd maxTokensPerAddress }
      erc20Minter { address currency pricePerToken saleStart saleEnd maxTokensPerAddress }
      presale { address presaleStart presaleEnd merkleRoot }
      zoraTimedMinter {
        address
        mintFee
        saleStart
        saleEnd
        erc20Z { id pool }
        secondaryActivated
        marketCountdown
        minimumMarketEth
      }
    }
  }
}
"#;

/// Source of raw sale records for a token. Implemented over the subgraph in
/// production and by fixtures in tests.
#[async_trait]
pub trait SaleStrategySource: Send + Sync {
    async fn token_sales(&self, contract: Address, token_id: U256) -> Result<TokenSalesData>;
}

fn subgraph_token_id(contract: Address, token_id: U256) -> String {
    format!("{:#x}-{}", contract, token_id)
}

fn graphql_request(query: &str, variables: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "variables": variables,
    })
}

/// GraphQL client for the protocol subgraph
pub struct SubgraphClient {
    url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl SubgraphClient {
    pub fn new(url: String, retry: RetryPolicy) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
            retry,
        }
    }

    async fn query_token(&self, id: &str) -> Result<Option<TokenNode>> {
        let request = graphql_request(TOKEN_SALES_QUERY, serde_json::json!({ "id": id }));

        let response = timeout(
            Duration::from_millis(HTTP_TIMEOUT_MS),
            self.client.post(&self.url).json(&request).send(),
        )
        .await
        .map_err(|_| SdkError::Indexer("subgraph request timeout".to_string()))??;

        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::Indexer(format!("subgraph returned {}", status)));
        }

        let body: GraphQlResponse<TokenQueryData> = response
            .json()
            .await
            .map_err(|e| SdkError::Indexer(e.to_string()))?;
        body.into_data().map(|data| data.zora_create_token)
    }
}

#[async_trait]
impl SaleStrategySource for SubgraphClient {
    async fn token_sales(&self, contract: Address, token_id: U256) -> Result<TokenSalesData> {
        let id = subgraph_token_id(contract, token_id);
        let id_ref = id.as_str();
        let token = with_retries(self.retry, "subgraph token query", move |_| {
            self.query_token(id_ref)
        })
        .await?;

        let Some(token) = token else {
            tracing::debug!("Token {} not found in subgraph", id);
            return Ok(TokenSalesData {
                contract_mint_fee: "0".to_string(),
                strategies: vec![],
            });
        };

        tracing::debug!(
            "Subgraph returned {} sale strategies for {}",
            token.sales_strategies.len(),
            id
        );
        Ok(TokenSalesData {
            contract_mint_fee: token.contract.mint_fee_per_quantity,
            strategies: token.sales_strategies,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(SdkError::Indexer(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| SdkError::Indexer("subgraph response has no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenQueryData {
    zora_create_token: Option<TokenNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenNode {
    contract: ContractNode,
    #[serde(default)]
    sales_strategies: Vec<RawSalesStrategy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractNode {
    mint_fee_per_quantity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subgraph_token_id_uses_lowercase_full_address() {
        let contract = crate::utils::parse_address(
            "contract",
            "0xAbCdEf0000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            subgraph_token_id(contract, U256::from(7u64)),
            "0xabcdef0000000000000000000000000000000001-7"
        );
    }

    #[test]
    fn graphql_request_carries_variables() {
        let req = graphql_request("query {}", serde_json::json!({ "id": "x" }));
        assert_eq!(req["variables"]["id"].as_str(), Some("x"));
        assert_eq!(req["query"].as_str(), Some("query {}"));
    }

    #[test]
    fn graphql_errors_become_indexer_errors() {
        let body: GraphQlResponse<TokenQueryData> = serde_json::from_value(serde_json::json!({
            "data": null,
            "errors": [{ "message": "indexing_error" }]
        }))
        .unwrap();
        match body.into_data() {
            Err(SdkError::Indexer(message)) => assert_eq!(message, "indexing_error"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn token_response_parses_strategies_and_fee() {
        let body: GraphQlResponse<TokenQueryData> = serde_json::from_value(serde_json::json!({
            "data": {
                "zoraCreateToken": {
                    "contract": { "mintFeePerQuantity": "111000000000000" },
                    "salesStrategies": [{
                        "type": "FIXED_PRICE",
                        "fixedPrice": {
                            "address": "0x04E2516A2c207E84a1839755675dfd8eF6302F0a",
                            "pricePerToken": "1000",
                            "saleStart": "0",
                            "saleEnd": "18446744073709551615",
                            "maxTokensPerAddress": "0"
                        }
                    }]
                }
            }
        }))
        .unwrap();
        let token = body.into_data().unwrap().zora_create_token.unwrap();
        assert_eq!(token.contract.mint_fee_per_quantity, "111000000000000");
        assert_eq!(token.sales_strategies.len(), 1);
        assert_eq!(token.sales_strategies[0].kind, "FIXED_PRICE");
    }
}
