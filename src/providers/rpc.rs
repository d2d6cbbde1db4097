use crate::core::error::FetchError;
use crate::core::gateway::{ContractGateway, SupplierSnapshot};
use alloy::primitives::{Address, I256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::sol;
use alloy::transports::TransportError;
use async_trait::async_trait;
use tracing::{debug, instrument};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ILoanToken {
        function assetBalanceOf(address owner) external view returns (uint256);
        function profitOf(address user) external view returns (int256);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IKToken {
        function exchangeRateStored() external view returns (uint256);
        function getSupplierSnapshotStored(address account) external view returns (uint256, uint256, uint256, uint256);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IPriceOracle {
        function getPrice() external view returns (uint256);
    }
}

fn call_error(contract: Address, function: &str, err: alloy::contract::Error) -> FetchError {
    match err {
        alloy::contract::Error::TransportError(e) => transport_error(contract, function, e),
        // Undecodable return data, e.g. an empty result from an address without code
        other => FetchError::malformed(function, other),
    }
}

fn transport_error(contract: Address, function: &str, err: TransportError) -> FetchError {
    if err.is_error_resp() {
        FetchError::contract_call(contract, function, err)
    } else if err.is_deser_error() {
        FetchError::malformed(function, err)
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Contract gateway over a JSON-RPC endpoint.
pub struct RpcGateway<P> {
    provider: P,
}

impl<P: Provider> RpcGateway<P> {
    pub fn new(provider: P) -> Self {
        RpcGateway { provider }
    }
}

/// Builds a gateway for an HTTP JSON-RPC endpoint. No request is made until
/// the first read.
pub fn connect(rpc_url: &str) -> Result<RpcGateway<impl Provider + Clone + use<>>, FetchError> {
    let url = rpc_url
        .parse()
        .map_err(|e| FetchError::Transport(format!("invalid RPC URL {rpc_url}: {e}")))?;
    debug!("Using RPC endpoint {}", rpc_url);
    Ok(RpcGateway::new(ProviderBuilder::new().connect_http(url)))
}

#[async_trait]
impl<P: Provider> ContractGateway for RpcGateway<P> {
    #[instrument(skip(self))]
    async fn native_balance(&self, account: Address) -> Result<U256, FetchError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| transport_error(account, "eth_getBalance", e))
    }

    #[instrument(skip(self))]
    async fn erc20_balance_of(&self, token: Address, holder: Address) -> Result<U256, FetchError> {
        IERC20::new(token, &self.provider)
            .balanceOf(holder)
            .call()
            .await
            .map_err(|e| call_error(token, "balanceOf", e))
    }

    #[instrument(skip(self))]
    async fn asset_balance_of(
        &self,
        loan_token: Address,
        holder: Address,
    ) -> Result<U256, FetchError> {
        ILoanToken::new(loan_token, &self.provider)
            .assetBalanceOf(holder)
            .call()
            .await
            .map_err(|e| call_error(loan_token, "assetBalanceOf", e))
    }

    #[instrument(skip(self))]
    async fn profit_of(&self, loan_token: Address, holder: Address) -> Result<I256, FetchError> {
        ILoanToken::new(loan_token, &self.provider)
            .profitOf(holder)
            .call()
            .await
            .map_err(|e| call_error(loan_token, "profitOf", e))
    }

    #[instrument(skip(self))]
    async fn exchange_rate_stored(&self, ktoken: Address) -> Result<U256, FetchError> {
        IKToken::new(ktoken, &self.provider)
            .exchangeRateStored()
            .call()
            .await
            .map_err(|e| call_error(ktoken, "exchangeRateStored", e))
    }

    #[instrument(skip(self))]
    async fn supplier_snapshot_stored(
        &self,
        ktoken: Address,
        holder: Address,
    ) -> Result<SupplierSnapshot, FetchError> {
        let snapshot = IKToken::new(ktoken, &self.provider)
            .getSupplierSnapshotStored(holder)
            .call()
            .await
            .map_err(|e| call_error(ktoken, "getSupplierSnapshotStored", e))?;

        Ok(SupplierSnapshot {
            deposits: snapshot._0,
            underlying_amount: snapshot._1,
            supplied_at: snapshot._2,
            promised_supply_rate: snapshot._3,
        })
    }

    #[instrument(skip(self))]
    async fn oracle_price(&self, oracle: Address) -> Result<U256, FetchError> {
        IPriceOracle::new(oracle, &self.provider)
            .getPrice()
            .call()
            .await
            .map_err(|e| call_error(oracle, "getPrice", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, hex};
    use alloy::sol_types::SolCall;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    const TOKEN: Address = address!("0x544eb90e766b405134b3b3f62b6b4c23fcd5fda2");
    const HOLDER: Address = address!("0xb60024d0030d7876f02bb766e18f0664e81b0856");

    /// Answers JSON-RPC requests by method name, or by selector for `eth_call`.
    /// Unknown calls get an `execution reverted` error response.
    struct JsonRpcResponder {
        results: HashMap<String, String>,
    }

    impl Respond for JsonRpcResponder {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let method = body["method"].as_str().unwrap_or_default();
            let key = if method == "eth_call" {
                let tx = &body["params"][0];
                let data = tx["input"].as_str().or(tx["data"].as_str()).unwrap_or_default();
                data.chars().take(10).collect()
            } else {
                method.to_string()
            };

            let reply = match self.results.get(&key) {
                Some(result) => json!({"jsonrpc": "2.0", "id": body["id"], "result": result}),
                None => json!({
                    "jsonrpc": "2.0",
                    "id": body["id"],
                    "error": {"code": 3, "message": "execution reverted"}
                }),
            };
            ResponseTemplate::new(200).set_body_json(reply)
        }
    }

    fn selector<C: SolCall>() -> String {
        format!("0x{}", hex::encode(C::SELECTOR))
    }

    fn word(value: u128) -> String {
        format!("{value:064x}")
    }

    fn signed_word(value: i128) -> String {
        let fill = if value < 0 { "f" } else { "0" };
        format!("{}{:032x}", fill.repeat(32), value as u128)
    }

    async fn create_rpc_server(results: Vec<(String, String)>) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(JsonRpcResponder {
                results: results.into_iter().collect(),
            })
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_reads_decode_from_json_rpc() {
        let mock_server = create_rpc_server(vec![
            (
                "eth_getBalance".to_string(),
                format!("0x{:x}", 250_000_000_000_000_000u128),
            ),
            ("eth_chainId".to_string(), "0x1e".to_string()),
            (
                selector::<IERC20::balanceOfCall>(),
                format!("0x{}", word(1_000_000_000_000_000_000_000)),
            ),
            (
                selector::<IKToken::exchangeRateStoredCall>(),
                format!("0x{}", word(1_050_000_000_000_000_000)),
            ),
            (
                selector::<IKToken::getSupplierSnapshotStoredCall>(),
                format!(
                    "0x{}{}{}{}",
                    word(900_000_000_000_000_000_000),
                    word(1_000_000_000_000_000_000_000),
                    word(1_700_000_000),
                    word(0)
                ),
            ),
            (
                selector::<ILoanToken::profitOfCall>(),
                format!("0x{}", signed_word(-2_000_000_000_000_000_000)),
            ),
        ])
        .await;

        let gateway = connect(&mock_server.uri()).unwrap();

        let balance = gateway.native_balance(HOLDER).await.unwrap();
        assert_eq!(balance, U256::from(250_000_000_000_000_000u128));

        let shares = gateway.erc20_balance_of(TOKEN, HOLDER).await.unwrap();
        assert_eq!(shares, U256::from(1_000_000_000_000_000_000_000u128));

        let rate = gateway.exchange_rate_stored(TOKEN).await.unwrap();
        assert_eq!(rate, U256::from(1_050_000_000_000_000_000u128));

        let snapshot = gateway.supplier_snapshot_stored(TOKEN, HOLDER).await.unwrap();
        assert_eq!(
            snapshot.underlying_amount,
            U256::from(1_000_000_000_000_000_000_000u128)
        );
        assert_eq!(snapshot.supplied_at, U256::from(1_700_000_000u64));

        let profit = gateway.profit_of(TOKEN, HOLDER).await.unwrap();
        assert_eq!(profit, "-2000000000000000000".parse::<I256>().unwrap());
    }

    #[tokio::test]
    async fn test_error_response_is_contract_call_failure() {
        let mock_server = create_rpc_server(vec![]).await;
        let gateway = connect(&mock_server.uri()).unwrap();

        let err = gateway.oracle_price(TOKEN).await.unwrap_err();

        match err {
            FetchError::ContractCall {
                function, address, ..
            } => {
                assert_eq!(function, "getPrice");
                assert_eq!(address, TOKEN.to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_failure() {
        let gateway = connect("http://127.0.0.1:9").unwrap();

        let err = gateway.native_balance(HOLDER).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(connect("not a url").is_err());
    }
}
