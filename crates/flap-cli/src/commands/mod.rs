pub mod config;
pub mod run;

use flap_core::SimConfig;

/// The configuration every command starts from.
fn base_config(seed: Option<u64>) -> SimConfig {
    let config = SimConfig::default();
    match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}
