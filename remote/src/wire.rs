//! Chaingraph response shapes and their normalization into source records.

use cashscope_sources::{
    AuthHeadRecord, AuthchainRecord, GenesisRecord, MigrationRecord, SourceError,
};
use cashscope_types::{
    amount::parse_output_amount, LockingBytecode, NftCapability, Outpoint, Timestamp, TxHash,
    UnspentOutput,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub message: String,
}

/// Hasura serializes Postgres `bigint` as a string, but `int` columns as numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BigInt {
    Text(String),
    Number(u64),
}

impl BigInt {
    fn to_u64(&self, field: &str) -> Result<u64, SourceError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| malformed(format!("{field} is not an integer: {s:?}"))),
        }
    }
}

/// A relationship Chaingraph renders either as an object or as a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(items) => items.into_iter().next(),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsData {
    pub transaction: Vec<WireTransaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputsData {
    pub output: Vec<WireOutput>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTransaction {
    pub hash: String,
    #[serde(default)]
    pub block_inclusions: Vec<WireBlockInclusion>,
    #[serde(default)]
    pub outputs: Vec<WireOutput>,
    #[serde(default)]
    pub authchains: Vec<WireAuthchain>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBlockInclusion {
    pub block: WireBlock,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBlock {
    pub timestamp: BigInt,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOutput {
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub output_index: Option<BigInt>,
    pub locking_bytecode: String,
    #[serde(default)]
    pub fungible_token_amount: Option<BigInt>,
    #[serde(default)]
    pub nonfungible_token_capability: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAuthchain {
    #[serde(default)]
    pub authchain_length: Option<BigInt>,
    pub authhead: WireAuthHead,
    #[serde(default)]
    pub migrations: Vec<WireMigration>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAuthHead {
    pub hash: String,
    #[serde(default)]
    pub identity_output: OneOrMany<WireOutput>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMigration {
    #[serde(default)]
    pub migration_index: Option<BigInt>,
    pub transaction: OneOrMany<WireTransaction>,
}

fn malformed(msg: impl Into<String>) -> SourceError {
    SourceError::Malformed(msg.into())
}

fn tx_hash(s: &str) -> Result<TxHash, SourceError> {
    TxHash::from_hex(s).map_err(|e| malformed(format!("bad transaction hash {s:?}: {e}")))
}

fn first_timestamp(inclusions: &[WireBlockInclusion]) -> Result<Option<Timestamp>, SourceError> {
    inclusions
        .iter()
        .map(|i| i.block.timestamp.to_u64("block.timestamp").map(Timestamp::new))
        .next()
        .transpose()
}

impl WireOutput {
    pub(crate) fn normalize(self) -> Result<UnspentOutput, SourceError> {
        let locking_bytecode = LockingBytecode::from_hex(&self.locking_bytecode)
            .map_err(|e| malformed(format!("bad locking bytecode: {e}")))?;

        let fungible_amount = match &self.fungible_token_amount {
            None => None,
            Some(BigInt::Number(n)) => Some(*n),
            Some(BigInt::Text(s)) => Some(
                parse_output_amount(s)
                    .map_err(|e| malformed(format!("bad fungible_token_amount: {e}")))?,
            ),
        };

        let nft_capability = self
            .nonfungible_token_capability
            .as_deref()
            .map(str::parse::<NftCapability>)
            .transpose()
            .map_err(|e| malformed(format!("bad nonfungible_token_capability: {e}")))?;

        let outpoint = match (&self.transaction_hash, &self.output_index) {
            (Some(hash), Some(index)) => {
                let index = index.to_u64("output_index")?;
                Some(Outpoint {
                    tx_hash: tx_hash(hash)?,
                    index: u32::try_from(index)
                        .map_err(|_| malformed(format!("output_index {index} out of range")))?,
                })
            }
            _ => None,
        };

        Ok(UnspentOutput {
            outpoint,
            locking_bytecode,
            fungible_amount,
            nft_capability,
        })
    }
}

pub(crate) fn normalize_outputs(outputs: Vec<WireOutput>) -> Result<Vec<UnspentOutput>, SourceError> {
    outputs.into_iter().map(WireOutput::normalize).collect()
}

pub(crate) fn normalize_genesis(data: TransactionsData) -> Result<Option<GenesisRecord>, SourceError> {
    let Some(tx) = data.transaction.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(GenesisRecord {
        tx_hash: tx_hash(&tx.hash)?,
        timestamp: first_timestamp(&tx.block_inclusions)?,
        outputs: normalize_outputs(tx.outputs)?,
    }))
}

pub(crate) fn normalize_authchain(
    data: TransactionsData,
) -> Result<Option<AuthchainRecord>, SourceError> {
    let Some(root) = data.transaction.into_iter().next() else {
        return Ok(None);
    };
    let Some(chain) = root.authchains.into_iter().next() else {
        return Ok(None);
    };

    let mut indexed = Vec::with_capacity(chain.migrations.len());
    for (position, migration) in chain.migrations.into_iter().enumerate() {
        let order = match &migration.migration_index {
            Some(index) => index.to_u64("migration_index")?,
            None => position as u64,
        };
        let tx = migration
            .transaction
            .into_first()
            .ok_or_else(|| malformed("migration without transaction"))?;
        // Output 0 is the identity output; the response order is not trusted.
        let mut numbered = Vec::with_capacity(tx.outputs.len());
        for (position, output) in tx.outputs.iter().enumerate() {
            let index = match &output.output_index {
                Some(index) => index.to_u64("output_index")?,
                None => position as u64,
            };
            let bytecode = LockingBytecode::from_hex(&output.locking_bytecode)
                .map_err(|e| malformed(format!("bad locking bytecode: {e}")))?;
            numbered.push((index, bytecode));
        }
        numbered.sort_by_key(|(index, _)| *index);
        let outputs = numbered.into_iter().map(|(_, bytecode)| bytecode).collect();
        indexed.push((
            order,
            MigrationRecord {
                tx_hash: tx_hash(&tx.hash)?,
                timestamp: first_timestamp(&tx.block_inclusions)?,
                outputs,
            },
        ));
    }
    indexed.sort_by_key(|(order, _)| *order);
    let migrations: Vec<MigrationRecord> = indexed.into_iter().map(|(_, m)| m).collect();

    let length = match &chain.authchain_length {
        Some(len) => len.to_u64("authchain_length")?,
        None => migrations.len() as u64,
    };

    let head = AuthHeadRecord {
        tx_hash: tx_hash(&chain.authhead.hash)?,
        identity_output: chain
            .authhead
            .identity_output
            .into_first()
            .map(WireOutput::normalize)
            .transpose()?,
    };

    Ok(Some(AuthchainRecord {
        length,
        head,
        migrations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: &str) -> String {
        format!("\\\\x{}", byte.repeat(32))
    }

    #[test]
    fn output_with_string_bigints() {
        let json = format!(
            r#"{{"output":[{{"transaction_hash":"{}","output_index":"3",
                "locking_bytecode":"\\x76a914{}88ac",
                "fungible_token_amount":"9223372036854775807",
                "nonfungible_token_capability":"minting"}}]}}"#,
            hash("aa"),
            "11".repeat(20)
        );
        let data: OutputsData = serde_json::from_str(&json).unwrap();
        let out = normalize_outputs(data.output).unwrap().remove(0);
        assert_eq!(out.fungible_amount, Some(i64::MAX as u64));
        assert_eq!(out.nft_capability, Some(NftCapability::Minting));
        assert_eq!(out.outpoint.unwrap().index, 3);
        assert_eq!(out.locking_bytecode.len(), 25);
    }

    #[test]
    fn output_without_tokens_fields() {
        let data: OutputsData =
            serde_json::from_str(r#"{"output":[{"locking_bytecode":"\\x51"}]}"#).unwrap();
        let out = normalize_outputs(data.output).unwrap().remove(0);
        assert_eq!(out.fungible_amount, None);
        assert_eq!(out.nft_capability, None);
        assert_eq!(out.outpoint, None);
    }

    #[test]
    fn unknown_capability_is_malformed() {
        let data: OutputsData = serde_json::from_str(
            r#"{"output":[{"locking_bytecode":"\\x51","nonfungible_token_capability":"burn"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            normalize_outputs(data.output),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn genesis_missing_is_none() {
        let data: TransactionsData = serde_json::from_str(r#"{"transaction":[]}"#).unwrap();
        assert_eq!(normalize_genesis(data).unwrap(), None);
    }

    #[test]
    fn genesis_with_timestamp() {
        let json = format!(
            r#"{{"transaction":[{{"hash":"{}",
                "block_inclusions":[{{"block":{{"timestamp":"1684152000"}}}}],
                "outputs":[{{"locking_bytecode":"\\x51","fungible_token_amount":"1000"}}]}}]}}"#,
            hash("bb")
        );
        let data: TransactionsData = serde_json::from_str(&json).unwrap();
        let genesis = normalize_genesis(data).unwrap().unwrap();
        assert_eq!(genesis.timestamp, Some(Timestamp::new(1_684_152_000)));
        assert_eq!(genesis.outputs[0].fungible_amount, Some(1000));
    }

    #[test]
    fn authchain_accepts_object_or_list_transactions() {
        let json = format!(
            r#"{{"transaction":[{{"hash":"{root}","authchains":[{{
                "authchain_length":"2",
                "authhead":{{"hash":"{head}","identity_output":[
                    {{"locking_bytecode":"\\x51","fungible_token_amount":"50"}}]}},
                "migrations":[
                  {{"migration_index":"1","transaction":[{{"hash":"{head}","outputs":[
                      {{"output_index":"0","locking_bytecode":"\\x6a0442434d52"}}]}}]}},
                  {{"migration_index":"0","transaction":{{"hash":"{root}",
                      "block_inclusions":[{{"block":{{"timestamp":"100"}}}}],"outputs":[]}}}}
                ]}}]}}]}}"#,
            root = hash("01"),
            head = hash("02"),
        );
        let data: TransactionsData = serde_json::from_str(&json).unwrap();
        let chain = normalize_authchain(data).unwrap().unwrap();
        assert_eq!(chain.length, 2);
        assert_eq!(chain.migrations.len(), 2);
        assert_eq!(chain.migrations[0].tx_hash.to_hex(), "01".repeat(32));
        assert_eq!(chain.migrations[0].timestamp, Some(Timestamp::new(100)));
        assert_eq!(chain.migrations[1].outputs[0].to_hex(), "6a0442434d52");
        assert_eq!(chain.head.tx_hash.to_hex(), "02".repeat(32));
        assert_eq!(
            chain.head.identity_output.unwrap().fungible_amount,
            Some(50)
        );
    }

    #[test]
    fn migration_outputs_follow_output_index() {
        let json = format!(
            r#"{{"transaction":[{{"hash":"{root}","authchains":[{{
                "authhead":{{"hash":"{root}"}},
                "migrations":[{{"transaction":{{"hash":"{root}","outputs":[
                    {{"output_index":"1","locking_bytecode":"\\x6a0442434d52"}},
                    {{"output_index":"0","locking_bytecode":"\\x51"}}]}}}}]}}]}}]}}"#,
            root = hash("04"),
        );
        let data: TransactionsData = serde_json::from_str(&json).unwrap();
        let chain = normalize_authchain(data).unwrap().unwrap();
        let outputs = &chain.migrations[0].outputs;
        assert_eq!(outputs[0].to_hex(), "51");
        assert_eq!(outputs[1].to_hex(), "6a0442434d52");
    }

    #[test]
    fn no_authchain_is_none() {
        let json = format!(r#"{{"transaction":[{{"hash":"{}","authchains":[]}}]}}"#, hash("03"));
        let data: TransactionsData = serde_json::from_str(&json).unwrap();
        assert_eq!(normalize_authchain(data).unwrap(), None);
    }
}
