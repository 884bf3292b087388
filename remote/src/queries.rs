//! GraphQL documents sent to Chaingraph.
//!
//! Bytea literals are written as `"\\x<hex>"`: the GraphQL string escape
//! yields the single backslash Postgres expects.

use cashscope_sources::PAGE_SIZE;
use cashscope_types::TokenId;

const OUTPUT_FIELDS: &str = "transaction_hash output_index locking_bytecode \
                             fungible_token_amount nonfungible_token_capability";

fn bytea(token: &TokenId) -> String {
    format!("\"\\\\x{}\"", token.to_hex())
}

/// The transaction spending `<token>:0` and its outputs of the new category.
pub fn genesis(token: &TokenId) -> String {
    let id = bytea(token);
    format!(
        "query {{
  transaction(
    where: {{ inputs: {{ outpoint_transaction_hash: {{ _eq: {id} }}, outpoint_index: {{ _eq: 0 }} }} }}
  ) {{
    hash
    block_inclusions {{ block {{ timestamp }} }}
    outputs(where: {{ token_category: {{ _eq: {id} }} }}) {{ {OUTPUT_FIELDS} }}
  }}
}}"
    )
}

fn unspent_outputs(token: &TokenId, extra_filter: &str, offset: usize) -> String {
    let id = bytea(token);
    format!(
        "query {{
  output(
    offset: {offset}
    limit: {PAGE_SIZE}
    where: {{
      token_category: {{ _eq: {id} }}
      {extra_filter}
      _not: {{ spent_by: {{}} }}
    }}
  ) {{ {OUTPUT_FIELDS} }}
}}"
    )
}

/// One page of every unspent output of the category.
pub fn token_outputs(token: &TokenId, offset: usize) -> String {
    unspent_outputs(token, "", offset)
}

/// One page of unspent outputs carrying an NFT of the category.
pub fn nft_outputs(token: &TokenId, offset: usize) -> String {
    unspent_outputs(
        token,
        "nonfungible_token_capability: { _is_null: false }",
        offset,
    )
}

/// One page of unspent minting NFTs of the category.
pub fn minting_outputs(token: &TokenId, offset: usize) -> String {
    unspent_outputs(
        token,
        "nonfungible_token_capability: { _eq: \"minting\" }",
        offset,
    )
}

/// Authchain rooted at the token id: length, head, identity output and every
/// migration with its outputs.
pub fn authchain(token: &TokenId) -> String {
    let id = bytea(token);
    format!(
        "query {{
  transaction(where: {{ hash: {{ _eq: {id} }} }}) {{
    hash
    authchains {{
      authchain_length
      authhead {{
        hash
        identity_output {{ {OUTPUT_FIELDS} }}
      }}
      migrations(order_by: {{ migration_index: asc }}) {{
        migration_index
        transaction {{
          hash
          block_inclusions {{ block {{ timestamp }} }}
          outputs(order_by: {{ output_index: asc }}) {{ output_index locking_bytecode }}
        }}
      }}
    }}
  }}
}}"
    )
}
