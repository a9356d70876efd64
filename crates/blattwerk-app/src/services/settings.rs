// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings persistence — AppConfig as JSON in the data directory.

use std::path::PathBuf;

use blattwerk_core::AppConfig;
use blattwerk_core::error::Result;
use tracing::warn;

use super::data_dir;

fn config_path() -> PathBuf {
    data_dir::data_dir().join("config.json")
}

/// Load persisted settings, or `None` on first run / unreadable file.
pub fn load_config() -> Option<AppConfig> {
    let path = config_path();
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "stored settings unreadable, ignoring");
            None
        }
    }
}

/// Persist settings to the data directory.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let raw = serde_json::to_string_pretty(config)?;
    std::fs::write(config_path(), raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::PaperSize;

    #[test]
    fn config_round_trips_through_json() {
        let mut config = AppConfig::default();
        config.paper_size = PaperSize::Letter;
        config.export_dpi = 300;

        let raw = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&raw).unwrap();

        assert_eq!(back.paper_size, PaperSize::Letter);
        assert_eq!(back.export_dpi, 300);
    }
}
