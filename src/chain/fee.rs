use crate::client::secret::TxOptions;
use crate::config::cfg::{Coin, Network, TxnFee};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeKind {
    Upload,
    Init,
    Exec,
}

impl FeeKind {
    /// Hard-coded fee used when neither the caller nor the network set one.
    pub fn default_fee(self) -> TxnFee {
        let (amount, gas) = match self {
            FeeKind::Upload => ("250000", "10000000"),
            FeeKind::Init => ("125000", "500000"),
            FeeKind::Exec => ("50000", "200000"),
        };

        TxnFee {
            amount: vec![Coin::new(amount, "untrn")],
            gas: gas.to_string(),
        }
    }

    pub fn network_default(self, network: &Network) -> Option<TxnFee> {
        let fees = network.fees();
        match self {
            FeeKind::Upload => fees.upload,
            FeeKind::Init => fees.init,
            FeeKind::Exec => fees.exec,
        }
    }

    /// Resolves the fee for this kind of operation on `network`.
    pub fn resolve(self, explicit: Option<&TxnFee>, network: &Network) -> TxnFee {
        resolve_fee(
            explicit,
            self.network_default(network).as_ref(),
            &self.default_fee(),
        )
    }
}

/// Explicit fee, then the network default, then the hard-coded default.
pub fn resolve_fee(
    explicit: Option<&TxnFee>,
    network_default: Option<&TxnFee>,
    hard_default: &TxnFee,
) -> TxnFee {
    explicit.or(network_default).unwrap_or(hard_default).clone()
}

/// Gas limit and price derived from a fee for secret network txs.
///
/// Values that can't be derived stay `None` so the client applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GasTerms {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<f64>,
}

impl GasTerms {
    /// Reads the leading number of each string, so `"200000.0"` is 200000 gas.
    pub fn derive(fee: &TxnFee) -> Self {
        let gas_price = fee
            .amount
            .first()
            .and_then(|c| leading_float(&c.amount))
            .zip(leading_float(&fee.gas))
            .map(|(amount, gas)| amount / gas)
            .filter(|p| p.is_finite());

        Self {
            gas_limit: leading_integer(&fee.gas),
            gas_price,
        }
    }

    pub fn tx_options<S: Into<String>>(self, memo: S) -> TxOptions {
        TxOptions {
            gas_limit: self.gas_limit,
            gas_price_in_fee_denom: self.gas_price,
            memo: memo.into(),
        }
    }
}

fn leading_integer(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&i| s.is_char_boundary(i))
        .find_map(|i| s[..i].parse::<f64>().ok())
}
