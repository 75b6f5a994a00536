//! Core type definitions for the Glittr DEX

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Block height
pub type BlockHeight = u64;

/// On-chain contract identifier: the block height the deploying transaction
/// was mined at plus its index within that block. Rendered as `"block:tx"`
/// everywhere the indexer API uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId {
    pub block: BlockHeight,
    pub tx: u32,
}

impl ContractId {
    pub fn new(block: BlockHeight, tx: u32) -> Self {
        Self { block, tx }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.tx)
    }
}

/// Error parsing a `"block:tx"` contract identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid contract id {input:?}: {reason}")]
pub struct ParseContractIdError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for ContractId {
    type Err = ParseContractIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseContractIdError {
            input: s.to_string(),
            reason,
        };
        let (block, tx) = s.split_once(':').ok_or_else(|| err("missing ':'"))?;
        let block = block.parse().map_err(|_| err("block is not a number"))?;
        let tx = tx.parse().map_err(|_| err("tx index is not a number"))?;
        Ok(Self { block, tx })
    }
}

impl Serialize for ContractId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContractId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Transaction ID (hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing a network name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network {0:?}")]
pub struct ParseNetworkError(pub String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            other => Err(ParseNetworkError(other.to_string())),
        }
    }
}

/// Error parsing a decimal token-amount string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount {input:?}: {reason}")]
pub struct ParseAmountError {
    pub input: String,
    pub reason: &'static str,
}

/// Parse a token amount from the decimal-string form the indexer uses.
///
/// Amounts cross the wire as JSON strings, never as floats. Rejects empty
/// strings, signs, non-digit characters, and values above `u64::MAX`.
pub fn parse_amount(s: &str) -> Result<u64, ParseAmountError> {
    let err = |reason| ParseAmountError {
        input: s.to_string(),
        reason,
    };
    if s.is_empty() {
        return Err(err("empty string"));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err("not an unsigned decimal integer"));
    }
    s.parse().map_err(|_| err("exceeds u64 range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_id_roundtrip() {
        let id = ContractId::new(343451, 1);
        assert_eq!(id.to_string(), "343451:1");
        assert_eq!("343451:1".parse::<ContractId>().unwrap(), id);
    }

    #[test]
    fn test_contract_id_rejects_garbage() {
        assert!("343451".parse::<ContractId>().is_err());
        assert!("a:1".parse::<ContractId>().is_err());
        assert!("1:b".parse::<ContractId>().is_err());
        assert!("-1:1".parse::<ContractId>().is_err());
    }

    #[test]
    fn test_contract_id_serde_as_string() {
        let id = ContractId::new(343443, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"343443:1\"");
        let parsed: ContractId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount("1000").unwrap(), 1000);
        assert_eq!(parse_amount("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_parse_amount_rejects_non_integers() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("+5").is_err());
        assert!(parse_amount("1.5").is_err());
        assert!(parse_amount("1e9").is_err());
        assert!(parse_amount("18446744073709551616").is_err());
    }

    #[test]
    fn test_network_display() {
        assert_eq!(Network::Mainnet.as_str(), "mainnet");
        assert_eq!(Network::Regtest.as_str(), "regtest");
        let json = serde_json::to_string(&Network::Regtest).unwrap();
        assert_eq!(json, "\"regtest\"");
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("regtest".parse::<Network>().unwrap(), Network::Regtest);
        assert!("devnet".parse::<Network>().is_err());
    }
}
