//! Plain-text rendering of a token report for the terminal.

use cashscope_explorer::TokenReport;
use cashscope_types::{Timestamp, TokenKind};
use cashscope_utils::{format_duration, format_timestamp, format_token_amount, group_thousands};

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "n/a",
    }
}

fn when(ts: Option<Timestamp>) -> String {
    ts.map(format_timestamp)
        .unwrap_or_else(|| "unconfirmed".to_string())
}

/// Render `report` as an aligned summary. `now` adds the age of the
/// authchain head when given.
pub fn render_report(report: &TokenReport, now: Option<Timestamp>) -> String {
    let overview = &report.overview;
    let supply = &report.supply;
    let document = report.metadata.document.as_ref();
    let decimals = document.map(|d| d.decimals()).unwrap_or(0);
    let symbol = document.and_then(|d| d.symbol());
    let amount = |raw: i128| format_token_amount(raw, decimals, symbol);

    let mut lines = Vec::new();
    lines.push(format!("Token      {}", overview.token_id));
    lines.push(format!("Network    {}", overview.network));
    if let Some(doc) = document {
        match symbol.filter(|s| !s.is_empty()) {
            Some(symbol) => lines.push(format!("Name       {} ({symbol})", doc.name)),
            None => lines.push(format!("Name       {}", doc.name)),
        }
    }
    if overview.token_kind != TokenKind::Unknown {
        lines.push(format!("Kind       {}", overview.token_kind.label()));
    }
    lines.push(format!(
        "Trust      {}",
        if report.trust_verified {
            "listed in the trust registry"
        } else {
            "not listed"
        }
    ));
    lines.push(format!(
        "Genesis    {}  {}",
        overview.genesis_tx,
        when(overview.genesis_timestamp)
    ));

    lines.push(String::new());
    lines.push("Supply".to_string());
    if !supply.genesis_supply_ft.is_zero() {
        lines.push(format!("  genesis      {}", amount(supply.genesis_supply_ft.raw() as i128)));
        lines.push(format!("  total        {}", amount(supply.total_supply_ft.raw() as i128)));
        lines.push(format!("  circulating  {}", amount(supply.circulating_supply_ft)));
        lines.push(format!("  reserved     {}", amount(supply.reserved_supply_ft.raw() as i128)));
        let burned = amount(supply.burned_ft);
        if supply.has_burn_anomaly() {
            lines.push(format!("  burned       {burned} (inconsistent indexer data)"));
        } else {
            lines.push(format!("  burned       {burned}"));
        }
    }
    if supply.total_supply_nfts > 0 {
        lines.push(format!(
            "  nfts         {} ({} minting)",
            group_thousands(&supply.total_supply_nfts.to_string()),
            supply.minting_nfts
        ));
    }
    lines.push(format!(
        "  holders      {} ({} addresses)",
        group_thousands(&supply.number_holders.to_string()),
        group_thousands(&supply.number_token_addresses.to_string())
    ));
    lines.push(format!(
        "  minting      {}",
        if supply.has_active_minting_token {
            "active"
        } else {
            "none"
        }
    ));

    lines.push(String::new());
    lines.push(format!(
        "Authchain  length {}, {} metadata update(s)",
        overview.authchain_length, overview.metadata_updates
    ));
    let head = &overview.auth_head;
    let mut head_line = format!("  head       {}", head.tx_hash);
    if let Some(address) = &head.address {
        head_line.push_str(&format!("  {address}"));
    }
    if head.uses_auth_guard {
        head_line.push_str("  [AuthGuard]");
    }
    lines.push(head_line);
    if let (Some(now), Some(moved)) = (now, overview.auth_head_timestamp) {
        let age = now.as_secs().saturating_sub(moved.as_secs());
        lines.push(format!("  last moved {} ago", format_duration(age)));
    }
    for entry in &report.timeline {
        let mut tags = Vec::new();
        if entry.is_genesis {
            tags.push("genesis");
        }
        if entry.is_metadata_update {
            tags.push("metadata");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };
        lines.push(format!("  {}  {}{tags}", when(entry.timestamp), entry.tx_hash));
    }

    let metadata = &report.metadata;
    if metadata.metadata_location.is_some() || document.is_some() {
        lines.push(String::new());
        lines.push("Metadata".to_string());
        if let Some(location) = &metadata.metadata_location {
            lines.push(format!("  location     {location}"));
        }
        if let Some(url) = &metadata.https_url {
            lines.push(format!("  url          {url}"));
        }
        if let Some(description) = document.and_then(|d| d.description.as_deref()) {
            lines.push(format!("  description  {description}"));
        }
        if let Some(icon) = &metadata.icon_url {
            lines.push(format!("  icon         {icon}"));
        }
        lines.push(format!("  schema valid {}", yes_no(metadata.is_schema_valid)));
        lines.push(format!("  hash match   {}", yes_no(metadata.hash_match)));
        if metadata.domains_match.is_some() {
            lines.push(format!("  same domain  {}", yes_no(metadata.domains_match)));
        }
    }

    if !report.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Diagnostics".to_string());
        for diagnostic in &report.diagnostics {
            lines.push(format!("  {diagnostic}"));
        }
    }

    lines.join("\n")
}
