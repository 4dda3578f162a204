use clap::{Parser, Subcommand};
use give_and_get_common::donations::DONATION_CATEGORIES;
use give_and_get_common::DonationDraft;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "give-and-get")]
#[command(about = "Connect donors and people in need with local shelters and charities", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides config and GIVE_AND_GET_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register as a donor
    Donor {
        /// Check contact details with /api/donor/validate before creating the account
        #[arg(long)]
        precheck: bool,
    },

    /// Register a shelter or charity
    Org,

    /// Find nearby organizations
    Match {
        #[command(subcommand)]
        target: MatchTarget,
    },

    /// Show the mission and impact numbers
    About,

    /// Check that the backend is reachable
    Health,

    /// Manage settings
    Config {
        /// Set the backend base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Set the Google Maps API key used by the web client
        #[arg(long)]
        set_maps_key: Option<String>,

        /// Show current settings
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum MatchTarget {
    /// Organizations that need the items you want to give
    Supplies {
        #[command(flatten)]
        area: SearchArea,

        /// Item to donate as CATEGORY:NAME[:QUANTITY] (repeatable)
        #[arg(long = "item", value_name = "CATEGORY:NAME[:QTY]", value_parser = parse_item)]
        items: Vec<DonationDraft>,
    },

    /// Shelters and services for a person seeking help
    People {
        #[command(flatten)]
        area: SearchArea,

        /// JSON file with survey answers (field name -> value)
        #[arg(long)]
        survey: Option<PathBuf>,

        /// Survey answer as FIELD=VALUE (repeatable, applied after --survey)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        answers: Vec<String>,
    },
}

/// 検索の中心と半径
#[derive(clap::Args, Debug, Clone)]
pub struct SearchArea {
    /// Latitude of the search origin
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the search origin
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Search radius in miles
    #[arg(short, long)]
    pub radius: Option<u32>,

    /// Show details for this result id
    #[arg(long)]
    pub select: Option<String>,
}

/// `CATEGORY:NAME[:QTY]` を寄付下書きに変換
///
/// カテゴリは大文字小文字を区別せず既定の分類に合わせる
pub fn parse_item(raw: &str) -> Result<DonationDraft, String> {
    let mut parts = raw.splitn(3, ':').map(str::trim);
    let category = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    let quantity = parts.next().unwrap_or("1");

    if name.is_empty() {
        return Err(format!("expected CATEGORY:NAME[:QTY], got `{}`", raw));
    }
    let category = DONATION_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(category))
        .ok_or_else(|| format!("unknown category `{}` (expected one of: {})", category, DONATION_CATEGORIES.join(", ")))?;
    match quantity.parse::<u32>() {
        Ok(n) if n >= 1 => {}
        _ => return Err(format!("quantity must be a positive whole number, got `{}`", quantity)),
    }

    Ok(DonationDraft {
        category: category.to_string(),
        item_name: name.to_string(),
        quantity: quantity.to_string(),
        description: String::new(),
    })
}
