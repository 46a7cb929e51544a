use thiserror::Error;

use crate::client::chain_res::ArrayLog;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LogScanError {
    #[error("no {ty:?} log entry with key {key:?}")]
    Missing { ty: String, key: String },

    #[error("{count} {ty:?} log entries with key {key:?}, expected one")]
    Ambiguous { ty: String, key: String, count: usize },
}

/// Extracts the single log entry of type `ty` carrying `key`.
pub fn extract_log<'a>(
    logs: &'a [ArrayLog],
    ty: &str,
    key: &str,
) -> Result<&'a ArrayLog, LogScanError> {
    let mut matches = logs.iter().filter(|l| l.ty == ty && l.key == key);

    let first = matches.next().ok_or_else(|| LogScanError::Missing {
        ty: ty.to_string(),
        key: key.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(LogScanError::Ambiguous {
            ty: ty.to_string(),
            key: key.to_string(),
            count: extra + 1,
        });
    }

    Ok(first)
}
