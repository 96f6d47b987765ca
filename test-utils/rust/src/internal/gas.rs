//! Gas usage tracking and reporting

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;

use crate::errors::Result;

/// Extract gas used from a receipt
pub fn gas_used(receipt: &TransactionReceipt) -> u64 {
    receipt.gas_used
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasEntry {
    pub label: String,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

/// Aggregate for all transactions sharing a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasSummary {
    pub label: String,
    pub calls: usize,
    pub min: u64,
    pub max: u64,
    pub avg: u64,
    pub total_fee_wei: u128,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GasReport {
    entries: Vec<GasEntry>,
}

impl GasReport {
    pub fn record(&mut self, label: &str, gas_used: u64, effective_gas_price: u128) {
        self.entries.push(GasEntry {
            label: label.to_string(),
            gas_used,
            effective_gas_price,
        });
    }

    pub fn entries(&self) -> &[GasEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One row per label, sorted by label
    pub fn summary(&self) -> Vec<GasSummary> {
        let mut grouped: BTreeMap<&str, Vec<&GasEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped.entry(entry.label.as_str()).or_default().push(entry);
        }

        grouped
            .into_iter()
            .map(|(label, entries)| {
                let total: u64 = entries.iter().map(|e| e.gas_used).sum();
                GasSummary {
                    label: label.to_string(),
                    calls: entries.len(),
                    min: entries.iter().map(|e| e.gas_used).min().unwrap_or(0),
                    max: entries.iter().map(|e| e.gas_used).max().unwrap_or(0),
                    avg: total / entries.len() as u64,
                    total_fee_wei: entries
                        .iter()
                        .map(|e| u128::from(e.gas_used).saturating_mul(e.effective_gas_price))
                        .sum(),
                }
            })
            .collect()
    }

    /// Plain-text table of the summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<32} {:>6} {:>10} {:>10} {:>10}",
            "transaction", "calls", "min", "max", "avg"
        );
        for row in self.summary() {
            let _ = writeln!(
                out,
                "{:<32} {:>6} {:>10} {:>10} {:>10}",
                row.label, row.calls, row.min, row.max, row.avg
            );
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
