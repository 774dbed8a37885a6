//! `ip-in-range` command

use super::output;
use anyhow::Result;
use colored::Colorize;
use metatypes_types::validators::ip;

/// Configuration for the ip-in-range command
pub struct IpRangeConfig {
    pub address: String,
    pub ranges: Vec<String>,
}

/// Ranges containing the address, in the given order
pub fn matching_ranges<'a>(address: &str, ranges: &'a [String]) -> Vec<&'a str> {
    ranges
        .iter()
        .map(String::as_str)
        .filter(|range| ip::is_ip_in_range(address, range))
        .collect()
}

pub fn run(config: IpRangeConfig) -> Result<()> {
    if ip::parse_ip(&config.address).is_none() {
        anyhow::bail!("{} is not an IP address", config.address);
    }
    if config.ranges.is_empty() {
        anyhow::bail!("No ranges given");
    }
    let matching = matching_ranges(&config.address, &config.ranges);
    for range in &config.ranges {
        let mark = if matching.contains(&range.as_str()) {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{} {}", mark, range);
    }
    if matching.is_empty() {
        anyhow::bail!("{} is in none of the ranges", config.address);
    }
    println!(
        "{}",
        output::format_success(&format!("{} is in {}", config.address, matching.join(", ")))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_ranges() {
        let ranges = vec![
            "10.0.0.0/8".to_string(),
            "192.168.0.0/16".to_string(),
            "10.1.*".to_string(),
        ];
        assert_eq!(matching_ranges("10.1.2.3", &ranges), ["10.0.0.0/8", "10.1.*"]);
        assert!(matching_ranges("8.8.8.8", &ranges).is_empty());
    }
}
