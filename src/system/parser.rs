//! ipmitool output parser.

use anyhow::{anyhow, Result};

/// Parse `ipmitool chassis power status` output.
/// Input: "Chassis Power is on\n" or "Chassis Power is off\n"
pub fn parse_chassis_power(output: &str) -> Result<bool> {
    let state = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Chassis Power is"))
        .map(|s| s.trim().to_ascii_lowercase())
        .ok_or_else(|| anyhow!("Unexpected chassis power output: {:?}", output.trim()))?;

    match state.as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(anyhow!("Unknown chassis power state: {}", other)),
    }
}
