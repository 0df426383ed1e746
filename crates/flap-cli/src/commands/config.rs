pub fn run(seed: Option<u64>) -> Result<(), String> {
    let config = super::base_config(seed);
    config.validate().map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("JSON serialization error: {e}"))?;
    println!("{json}");
    Ok(())
}
