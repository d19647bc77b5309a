// crates/rocket-cli/src/config.rs
//
// Sandbox configuration for the Rocket CLI.
// Loaded from a TOML file or populated with defaults that reproduce a
// VOO-for-BUSD desk: both priced at 1 USD, 10% discount, 21-day lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rocket_core::{parse_units, Address, Amount, AssetId, Discount, SECONDS_PER_DAY};
use rocket_ledger::DeskConfig;

use crate::error::CliError;

/// Runtime configuration for the sandbox.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxConfig {
    /// Currency the oracle prices assets in.
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,

    /// Lock between deposit and harvest, in days.
    #[serde(default = "default_lock_duration_days")]
    pub lock_duration_days: u64,

    /// Symbol of the asset the desk sells.
    #[serde(default = "default_principal")]
    pub principal: String,

    /// Address holding assets on behalf of the desk.
    #[serde(default = "default_custody")]
    pub custody: Address,

    /// Address receiving deposit payments.
    #[serde(default = "default_treasury")]
    pub treasury: Address,

    /// Default caller for allocate/deallocate.
    #[serde(default = "default_operator")]
    pub operator: Address,

    /// Discount applied to every purchase.
    #[serde(default)]
    pub discount: DiscountConfig,

    /// Assets known to the sandbox oracle.
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetConfig>,

    /// Named accounts and their starting balances, minted by `rocket init`.
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,

    /// Events kept in the desk journal; older ones are dropped on save.
    #[serde(default = "default_journal_capacity")]
    pub journal_capacity: usize,

    /// Path of the JSON state file. Overridden by `--state`.
    #[serde(default)]
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountConfig {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            numerator: 9,
            denominator: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub symbol: String,
    pub address: AssetId,
    /// Price of one whole token in the reference currency, e.g. "1.25".
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub address: Address,
    /// Starting balances keyed by asset symbol, e.g. { VOO = "1000" }.
    #[serde(default)]
    pub balances: BTreeMap<String, String>,
}

fn default_reference_currency() -> String {
    rocket_core::DEFAULT_REFERENCE_CURRENCY.to_string()
}

fn default_lock_duration_days() -> u64 {
    21
}

fn default_journal_capacity() -> usize {
    rocket_ledger::DEFAULT_JOURNAL_CAPACITY
}

fn default_principal() -> String {
    "VOO".to_string()
}

fn default_custody() -> Address {
    Address::repeat_byte(0xcc)
}

fn default_treasury() -> Address {
    Address::repeat_byte(0x7e)
}

fn default_operator() -> Address {
    Address::repeat_byte(0x0a)
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig {
            symbol: "VOO".to_string(),
            address: Address::repeat_byte(0x70),
            price: "1".to_string(),
        },
        AssetConfig {
            symbol: "BUSD".to_string(),
            address: Address::repeat_byte(0xb0),
            price: "1".to_string(),
        },
    ]
}

fn default_accounts() -> Vec<AccountConfig> {
    let balances: BTreeMap<String, String> = [
        ("VOO".to_string(), "1000".to_string()),
        ("BUSD".to_string(), "1000".to_string()),
    ]
    .into_iter()
    .collect();
    vec![
        AccountConfig {
            name: "operator".to_string(),
            address: default_operator(),
            balances: balances.clone(),
        },
        AccountConfig {
            name: "alice".to_string(),
            address: Address::repeat_byte(0xa1),
            balances,
        },
    ]
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            reference_currency: default_reference_currency(),
            lock_duration_days: default_lock_duration_days(),
            principal: default_principal(),
            custody: default_custody(),
            treasury: default_treasury(),
            operator: default_operator(),
            discount: DiscountConfig::default(),
            assets: default_assets(),
            accounts: default_accounts(),
            journal_capacity: default_journal_capacity(),
            state_file: None,
        }
    }
}

impl SandboxConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path)?;
        let config: SandboxConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            tracing::warn!(
                "No config at {}. Using the built-in sandbox defaults.",
                path.display()
            );
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.discount.denominator == 0 {
            return Err(CliError::Config(
                "discount.denominator must be greater than zero".to_string(),
            ));
        }
        self.asset(&self.principal)?;
        for asset in &self.assets {
            self.asset_price(asset)?;
        }
        for account in &self.accounts {
            for (symbol, amount) in &account.balances {
                self.asset(symbol)?;
                parse_units(amount)?;
            }
        }
        Ok(())
    }

    /// Look up an asset by symbol (case-insensitive) or hex address.
    pub fn asset(&self, key: &str) -> Result<&AssetConfig, CliError> {
        if let Some(asset) = self
            .assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(key))
        {
            return Ok(asset);
        }
        if let Ok(address) = key.parse::<Address>() {
            if let Some(asset) = self.assets.iter().find(|a| a.address == address) {
                return Ok(asset);
            }
        }
        Err(CliError::UnknownAsset(key.to_string()))
    }

    /// Resolve an account by name or hex address.
    pub fn party(&self, key: &str) -> Result<Address, CliError> {
        if let Some(account) = self
            .accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(key))
        {
            return Ok(account.address);
        }
        key.parse::<Address>()
            .map_err(|_| CliError::UnknownAccount(key.to_string()))
    }

    /// Human label for an address: account name, well-known role, or the hex form.
    pub fn label(&self, address: &Address) -> String {
        if let Some(account) = self.accounts.iter().find(|a| a.address == *address) {
            return account.name.clone();
        }
        if let Some(asset) = self.assets.iter().find(|a| a.address == *address) {
            return asset.symbol.clone();
        }
        if *address == self.custody {
            return "custody".to_string();
        }
        if *address == self.treasury {
            return "treasury".to_string();
        }
        address.to_string()
    }

    pub fn asset_price(&self, asset: &AssetConfig) -> Result<Amount, CliError> {
        Ok(parse_units(&asset.price)?)
    }

    pub fn discount(&self) -> Discount {
        Discount::new(self.discount.numerator, self.discount.denominator)
    }

    pub fn lock_duration_secs(&self) -> u64 {
        self.lock_duration_days.saturating_mul(SECONDS_PER_DAY)
    }

    /// Desk parameters derived from this configuration.
    pub fn desk_config(&self) -> Result<DeskConfig, CliError> {
        let principal = self.asset(&self.principal)?;
        let mut config = DeskConfig::new(principal.address, self.treasury);
        config.reference_currency = self.reference_currency.clone();
        config.lock_duration_secs = self.lock_duration_secs();
        config.journal_capacity = self.journal_capacity;
        Ok(config)
    }

    /// State file: `--state` flag, then `state_file`, then `~/.rocket/state.json`.
    pub fn state_path(&self, flag: Option<&str>) -> PathBuf {
        if let Some(path) = flag.or(self.state_file.as_deref()) {
            return expand_tilde(path);
        }
        default_home().join("state.json")
    }
}

/// Default directory for sandbox files: `~/.rocket`.
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rocket")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SandboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_duration_secs(), rocket_core::LOCK_DURATION_SECS);
        assert_eq!(config.desk_config().unwrap().principal_asset, Address::repeat_byte(0x70));
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            lock_duration_days = 7
            principal = "GLD"
            accounts = []
            journal_capacity = 50

            [discount]
            numerator = 4
            denominator = 5

            [[assets]]
            symbol = "GLD"
            address = "0x1111111111111111111111111111111111111111"
            price = "2.5"
        "#;
        let config: SandboxConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_duration_secs(), 7 * SECONDS_PER_DAY);
        assert_eq!(config.discount(), Discount::new(4, 5));
        assert_eq!(config.reference_currency, "USD");
        assert_eq!(config.desk_config().unwrap().journal_capacity, 50);
        let gld = config.asset("gld").unwrap();
        assert_eq!(config.asset_price(gld).unwrap(), parse_units("2.5").unwrap());
    }

    #[test]
    fn test_load_sample_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/sandbox.toml");
        let config = SandboxConfig::load(&path).unwrap();
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.operator, default_operator());
        assert_eq!(config.treasury, default_treasury());
        assert_eq!(config.desk_config().unwrap().principal_asset, Address::repeat_byte(0x70));
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let mut config = SandboxConfig::default();
        config.discount.denominator = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_principal_rejected() {
        let mut config = SandboxConfig::default();
        config.principal = "XYZ".to_string();
        assert!(matches!(config.validate(), Err(CliError::UnknownAsset(_))));
    }

    #[test]
    fn test_resolve_by_symbol_or_address() {
        let config = SandboxConfig::default();
        let by_symbol = config.asset("busd").unwrap().address;
        let by_address = config.asset(&by_symbol.to_string()).unwrap().address;
        assert_eq!(by_symbol, by_address);
        assert!(config.asset("nope").is_err());
    }

    #[test]
    fn test_party_by_name_or_address() {
        let config = SandboxConfig::default();
        assert_eq!(config.party("alice").unwrap(), Address::repeat_byte(0xa1));
        let raw = Address::repeat_byte(0x42);
        assert_eq!(config.party(&raw.to_string()).unwrap(), raw);
        assert!(config.party("bob").is_err());
    }

    #[test]
    fn test_labels() {
        let config = SandboxConfig::default();
        assert_eq!(config.label(&Address::repeat_byte(0x7e)), "treasury");
        assert_eq!(config.label(&Address::repeat_byte(0xa1)), "alice");
        assert_eq!(config.label(&Address::repeat_byte(0xb0)), "BUSD");
    }

    #[test]
    fn test_state_path_precedence() {
        let mut config = SandboxConfig::default();
        config.state_file = Some("/tmp/from-config.json".to_string());
        assert_eq!(
            config.state_path(Some("/tmp/flag.json")),
            PathBuf::from("/tmp/flag.json")
        );
        assert_eq!(config.state_path(None), PathBuf::from("/tmp/from-config.json"));
    }
}
