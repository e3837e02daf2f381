//! Program configuration

use escrow_types::fee::{FeePolicy, DEFAULT_FEE_RATE};
use escrow_types::ids::Pubkey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default program identity; scopes every derived address.
pub const PROGRAM_ID: Pubkey = Pubkey::new([
    0x17, 0x5a, 0x3e, 0x91, 0xc4, 0x08, 0x6b, 0xd2, 0x4f, 0x70, 0x2c, 0xe8, 0x93, 0x1b, 0x56, 0xa0,
    0x0d, 0xb7, 0x62, 0x39, 0xfe, 0x84, 0x25, 0xca, 0x7e, 0x13, 0x9f, 0x48, 0xe1, 0x36, 0x5b, 0x02,
]);

/// Vault program configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Identity of the program; namespaces all derived addresses
    pub program_id: Pubkey,
    /// Fraction of each claimed amount kept as protocol fee
    pub fee_rate: Decimal,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            program_id: PROGRAM_ID,
            fee_rate: DEFAULT_FEE_RATE,
        }
    }
}

impl VaultConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fee_policy().is_valid() {
            return Err(ConfigError::InvalidFeeRate {
                rate: self.fee_rate.to_string(),
            });
        }
        Ok(())
    }

    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy::new(self.fee_rate)
    }
}
