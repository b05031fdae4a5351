//! Given steps for command catalogue scenarios.

use chrono::{TimeZone, Utc};
use memechat::command::ports::trading::{AdapterError, TokenInfo};
use rstest_bdd_macros::given;
use serde_json::Number;

use super::world::CommandWorld;

#[given(r#"the backend lists the token "{name}" "{symbol}""#)]
fn backend_lists_token(world: &mut CommandWorld, name: String, symbol: String) {
    let token = TokenInfo {
        address: "0x00000000000000000000000000000000000d06e".to_owned(),
        name,
        symbol,
        decimals: 18,
        total_supply: Number::from(1_000_000_u64),
        created_hash: "0xabc".to_owned(),
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 20, 12, 0, 0)
            .single()
            .unwrap_or_default(),
    };
    world
        .trading()
        .expect_list_tokens()
        .times(1)
        .returning(move |_| Ok(vec![token.clone()]));
}

#[given("the backend is unreachable")]
fn backend_unreachable(world: &mut CommandWorld) {
    world
        .trading()
        .expect_list_tokens()
        .returning(|_| Err(AdapterError::Transport("connection refused".to_owned())));
}
