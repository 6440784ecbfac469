use anyhow::{Context, Result, anyhow};

use tt_dashboard::config::DashboardConfig;
use tt_dashboard::dataset::{ScalarDraws, Tier};
use tt_dashboard::filter::MatchFilter;
use tt_dashboard::view;

// Prints the dashboard view for one selection as JSON. Defaults come from the
// same environment knobs as the terminal app; flags override them.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = DashboardConfig::from_env();

    if let Some(raw) = arg_value(&args, "--seed") {
        config.seed = raw
            .parse::<u64>()
            .with_context(|| format!("invalid --seed {raw:?}"))?;
    }
    if let Some(raw) = arg_value(&args, "--rows") {
        let rows = raw
            .parse::<usize>()
            .with_context(|| format!("invalid --rows {raw:?}"))?;
        if rows == 0 {
            return Err(anyhow!("--rows must be positive"));
        }
        config.rows = rows;
    }
    if args.iter().any(|arg| arg == "--shared-draws") {
        config.scalar_draws = ScalarDraws::Shared;
    }

    let dataset = config.build_dataset();
    let mut filter = MatchFilter::defaults_for(&dataset);

    if let Some(player) = arg_value(&args, "--player") {
        filter.player = player;
    }
    if let Some(raw) = arg_value(&args, "--years") {
        filter.years = parse_years(&raw)?;
    }
    if let Some(raw) = arg_value(&args, "--tiers") {
        filter.tiers = parse_tiers(&raw)?;
    }

    let view = view::render(&dataset, &filter);
    let json = serde_json::to_string_pretty(&view).context("serialize dashboard view")?;
    println!("{json}");
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            return Some(raw.trim().to_string());
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_years(raw: &str) -> Result<Vec<u16>> {
    let mut years = Vec::new();
    for part in raw.split([',', ';', ' ']).filter(|p| !p.trim().is_empty()) {
        let year = part
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid year {part:?}"))?;
        if !years.contains(&year) {
            years.push(year);
        }
    }
    Ok(years)
}

fn parse_tiers(raw: &str) -> Result<Vec<Tier>> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(Tier::ALL.to_vec());
    }
    let mut tiers = Vec::new();
    for part in raw.split([',', ';']).filter(|p| !p.trim().is_empty()) {
        let tier = Tier::parse(part).ok_or_else(|| anyhow!("unknown tier {part:?}"))?;
        if !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_value_accepts_both_spellings() {
        let argv = args(&["--seed", "7", "--player=孙颖莎", "--shared-draws"]);
        assert_eq!(arg_value(&argv, "--seed").as_deref(), Some("7"));
        assert_eq!(arg_value(&argv, "--player").as_deref(), Some("孙颖莎"));
        assert_eq!(arg_value(&argv, "--rows"), None);
        assert_eq!(arg_value(&args(&["--years"]), "--years"), None);
    }

    #[test]
    fn years_are_deduplicated_in_input_order() {
        assert_eq!(parse_years("2024, 2023;2024").unwrap(), vec![2024, 2023]);
        assert!(parse_years("").unwrap().is_empty());
        assert!(parse_years("2023,twenty").is_err());
    }

    #[test]
    fn tiers_accept_all_labels_and_keys() {
        assert_eq!(parse_tiers(" ALL ").unwrap(), Tier::ALL.to_vec());
        assert_eq!(
            parse_tiers("世界杯,wtt_champions,世界杯").unwrap(),
            vec![Tier::WorldCup, Tier::WttChampions]
        );
        let err = parse_tiers("世界杯,olympics").unwrap_err();
        assert!(err.to_string().contains("olympics"));
    }
}
