use cosmrs::bip32;
use cosmrs::crypto::secp256k1;
use cosmrs::AccountId;
use std::fmt;

use super::error::ClientError;

// https://github.com/confio/cosmos-hd-key-derivation-spec#the-cosmos-hub-path
pub const COSMOS_HUB_PATH: &str = "m/44'/118'/0'/0/0";

pub const SECRET_PATH: &str = "m/44'/529'/0'/0/0";

/// Chain specific HD wallet derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdParams {
    /// bech32 account prefix
    pub prefix: &'static str,
    /// `None` falls back to the cosmos hub path
    pub path: Option<&'static str>,
}

/// Signing wallet derived from a mnemonic.
#[derive(Clone)]
pub struct Wallet {
    xprv: bip32::XPrv,
    address: AccountId,
}

impl Wallet {
    pub fn from_mnemonic(mnemonic: &str, params: &HdParams) -> Result<Self, ClientError> {
        let seed = bip32::Mnemonic::new(mnemonic.trim(), bip32::Language::English)
            .map_err(|_| ClientError::Mnemonic)?
            .to_seed("");

        let path: bip32::DerivationPath = params
            .path
            .unwrap_or(COSMOS_HUB_PATH)
            .parse()
            .map_err(|_| ClientError::DerivationPath)?;

        let xprv =
            bip32::XPrv::derive_from_path(seed, &path).map_err(|_| ClientError::DerivationPath)?;

        let key: secp256k1::SigningKey = xprv.clone().into();
        let address = key
            .public_key()
            .account_id(params.prefix)
            .map_err(ClientError::crypto)?;

        Ok(Self { xprv, address })
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn signing_key(&self) -> secp256k1::SigningKey {
        self.xprv.clone().into()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}
