//! Report rendering for finished runs.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::logic::simulation::{RunEnding, RunRecord};

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Run Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;

    let total = records.len();
    let won = records.iter().filter(|r| r.ending == RunEnding::Won).count();
    let lost = records
        .iter()
        .filter(|r| matches!(r.ending, RunEnding::LostMorale | RunEnding::LostMoney))
        .count();
    let timed_out = total - won - lost;

    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Won: {}", won.to_string().green())?;
    writeln!(out, "Lost: {}", lost.to_string().red())?;
    writeln!(out, "Timed out: {}", timed_out.to_string().yellow())?;
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let win_rate = (won as f64 / total as f64) * 100.0;
        writeln!(out, "Win rate: {win_rate:.1}%")?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for record in records {
        let status = match record.ending {
            RunEnding::Won => "✅ WON ".green(),
            RunEnding::LostMorale | RunEnding::LostMoney => "❌ LOST".red(),
            RunEnding::Timeout => "⏱  CAP ".yellow(),
        };
        writeln!(
            out,
            "{} seed {:<12} {:<8} {:>3} days  week {:<2} goals {}/5  ${:<4} skill {:<3} {}",
            status,
            record.seed,
            record.strategy,
            record.days_played,
            record.weeks,
            record.goals_completed.len(),
            record.final_money,
            record.final_skill,
            record.ending.label()
        )?;
        if !record.goals_completed.is_empty() {
            writeln!(out, "    goals: {}", record.goals_completed.join(", "))?;
        }
    }
    writeln!(out)?;

    if let Some(best) = records.iter().min_by_key(|r| r.days_played) {
        if best.ending == RunEnding::Won {
            writeln!(
                out,
                "{} seed {} in {} days ({})",
                "⚡ Fastest win:".bright_yellow().bold(),
                best.seed,
                best.days_played,
                best.strategy
            )?;
        }
    }

    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, records: &[RunRecord]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(records)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(ending: RunEnding) -> RunRecord {
        RunRecord {
            seed: 42,
            strategy: "Balanced",
            ending,
            days_played: 14,
            weeks: 2,
            goals_completed: vec!["nest-egg".to_string()],
            events_resolved: 3,
            final_energy: 6,
            final_morale: 7,
            final_skill: 4,
            final_money: 25,
            upgrades_bought: 1,
        }
    }

    #[test]
    fn console_report_counts_outcomes() {
        let records = vec![
            sample_record(RunEnding::Won),
            sample_record(RunEnding::LostMorale),
            sample_record(RunEnding::Timeout),
        ];
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &records, Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total runs: 3"));
        assert!(text.contains("nest-egg"));
    }

    #[test]
    fn json_report_is_valid_json() {
        let records = vec![sample_record(RunEnding::Won)];
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &records).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["seed"], 42);
        assert_eq!(value[0]["ending"], "won");
    }
}
