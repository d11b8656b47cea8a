//! Shop record commands.
//!
//! # Usage
//!
//! ```bash
//! mc-cli shop show your-store.myshopify.com
//! mc-cli shop upsert your-store.myshopify.com --set plan=pro --set 'limits={"sms":500}'
//! printf '%s' "$TOKEN" | mc-cli shop save-token your-store.myshopify.com
//! ```

use std::io::Read;

use mitto_connect::error::set_sentry_shop;
use mitto_connect::models::{JsonMap, Shop};
use mitto_connect::state::AppState;
use mitto_connect_core::ShopDomain;
use serde_json::{Value, json};

use super::CommandError;

/// Print a shop as JSON.
pub async fn show(state: &AppState, domain: &str) -> Result<(), CommandError> {
    let domain = parse_domain(domain)?;

    let shop = state
        .shops()
        .find_by_domain(&domain)
        .await?
        .ok_or_else(|| CommandError::NotFound(domain.to_string()))?;

    print_shop(&shop)
}

/// Create or merge `key=value` assignments into a shop.
pub async fn upsert(
    state: &AppState,
    domain: &str,
    assignments: &[String],
) -> Result<(), CommandError> {
    let domain = parse_domain(domain)?;

    let mut data = JsonMap::new();
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        data.insert(key, value);
    }

    let shop = state.shops().upsert_by_domain(&domain, data).await?;
    print_shop(&shop)
}

/// Seal the token read from stdin and store it for the shop.
pub async fn save_token(state: &AppState, domain: &str) -> Result<(), CommandError> {
    let domain = parse_domain(domain)?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let token = input.trim();
    if token.is_empty() {
        return Err(CommandError::InvalidArgument(
            "expected the offline token on stdin".to_string(),
        ));
    }

    let shop = state.shops().save_offline_token(&domain, token).await?;
    print_shop(&shop)
}

fn parse_domain(raw: &str) -> Result<ShopDomain, CommandError> {
    let domain = ShopDomain::parse(raw)?;
    set_sentry_shop(&domain);
    Ok(domain)
}

/// Split `key=value`. The value is parsed as JSON when possible, so
/// `credits=500` stores a number and `plan=pro` stores a string.
fn parse_assignment(raw: &str) -> Result<(String, Value), CommandError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CommandError::InvalidArgument(format!("expected KEY=VALUE, got `{raw}`")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "empty key in `{raw}`"
        )));
    }

    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// JSON view of a shop. The sealed token is never printed.
fn shop_view(shop: &Shop) -> Value {
    json!({
        "id": shop.id,
        "domain": shop.domain,
        "hasOfflineToken": shop.has_offline_token(),
        "attributes": shop.attributes,
        "createdAt": shop.created_at,
        "updatedAt": shop.updated_at,
    })
}

fn print_shop(shop: &Shop) -> Result<(), CommandError> {
    let output = serde_json::to_string_pretty(&shop_view(shop))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }

    Ok(())
}
