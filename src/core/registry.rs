//! Rootstock mainnet contracts, tokens and lending handlers

use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod contracts {
    use super::*;

    pub const TROPYKUS_DOC_HANDLER_MOC: Address =
        address!("0xb60024d0030d7876f02bb766e18f0664e81b0856");
    pub const SOVRYN_DOC_HANDLER_MOC: Address =
        address!("0xa1a752784d4d43778ed23771777b18ae9cb66461");
    pub const TROPYKUS_ERC20_HANDLER_DEX: Address =
        address!("0xafcd7a6f5165f09b049ded06eec12f5a9e3d09a2");
}

pub mod tokens {
    use super::*;

    pub const DOC: Address = address!("0xe700691da7b9851f2f35f8b8182c69c53ccad9db");
    pub const USDRIF: Address = address!("0x3a15461d8ae0f0fb5fa2629e9da7d66a794a6e37");
    pub const KDOC: Address = address!("0x544eb90e766b405134b3b3f62b6b4c23fcd5fda2");
    pub const ISUSD: Address = address!("0xd8d25f03ebba94e15df2ed4d6d38276b595593c1");
    pub const KUSDRIF: Address = address!("0xddf3ce45fcf080df61ee61dac5ddefef7ed4f46c");
}

pub mod operations {
    use super::*;

    pub const SWAPPER: Address = address!("0x362051aeda2df55ffa6cefced3973d90a0891285");
    pub const FEE_COLLECTOR: Address = address!("0xab8ae06160b77d604edef7ec12d9f12ddee7123f");
    pub const BTC_ORACLE: Address = address!("0xe2927a0620b82a66d67f678fc9b826b0e01b1bfd");
}

/// Lending protocol a handler deposits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Sovryn,
    Tropykus,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Protocol::Sovryn => "sovryn",
                Protocol::Tropykus => "tropykus",
            }
        )
    }
}

/// A handler contract pairing one stablecoin with one lending protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandlerConfig {
    pub name: &'static str,
    pub contract_address: Address,
    pub stablecoin_address: Address,
    /// kToken for Tropykus, loan token (iSUSD) for Sovryn.
    pub lending_token_address: Address,
    pub protocol: Protocol,
}

pub const HANDLERS: [HandlerConfig; 3] = [
    HandlerConfig {
        name: "Tropykus DOC Handler",
        contract_address: contracts::TROPYKUS_DOC_HANDLER_MOC,
        stablecoin_address: tokens::DOC,
        lending_token_address: tokens::KDOC,
        protocol: Protocol::Tropykus,
    },
    HandlerConfig {
        name: "Sovryn DOC Handler",
        contract_address: contracts::SOVRYN_DOC_HANDLER_MOC,
        stablecoin_address: tokens::DOC,
        lending_token_address: tokens::ISUSD,
        protocol: Protocol::Sovryn,
    },
    HandlerConfig {
        name: "Tropykus USDRIF Handler",
        contract_address: contracts::TROPYKUS_ERC20_HANDLER_DEX,
        stablecoin_address: tokens::USDRIF,
        lending_token_address: tokens::KUSDRIF,
        protocol: Protocol::Tropykus,
    },
];

/// Display symbol for a known token address.
pub fn token_symbol(token: &Address) -> Option<&'static str> {
    [
        (tokens::DOC, "DOC"),
        (tokens::USDRIF, "USDRIF"),
        (tokens::KDOC, "kDOC"),
        (tokens::ISUSD, "iSUSD"),
        (tokens::KUSDRIF, "kUSDRIF"),
    ]
    .iter()
    .find(|(address, _)| address == token)
    .map(|(_, symbol)| *symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_display_matches_json_name() {
        for protocol in [Protocol::Sovryn, Protocol::Tropykus] {
            assert_eq!(
                serde_json::to_value(protocol).unwrap(),
                serde_json::json!(protocol.to_string())
            );
        }
    }

    #[test]
    fn test_handlers_pair_tokens_with_protocols() {
        assert_eq!(HANDLERS.len(), 3);
        let sovryn: Vec<_> = HANDLERS
            .iter()
            .filter(|h| h.protocol == Protocol::Sovryn)
            .collect();
        assert_eq!(sovryn.len(), 1);
        assert_eq!(sovryn[0].lending_token_address, tokens::ISUSD);

        for handler in HANDLERS.iter().filter(|h| h.protocol == Protocol::Tropykus) {
            assert!(
                [tokens::KDOC, tokens::KUSDRIF].contains(&handler.lending_token_address),
                "{} should use a kToken",
                handler.name
            );
        }
    }

    #[test]
    fn test_token_symbol() {
        assert_eq!(token_symbol(&tokens::USDRIF), Some("USDRIF"));
        assert_eq!(token_symbol(&operations::SWAPPER), None);
    }
}
