//! Output formatting helpers for the CLI

use crate::pipeline::TrialStats;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print aggregate trial statistics
pub fn print_trial_stats(title: &str, stats: &TrialStats) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
    print_kv("trials", &stats.trials.to_string());
    print_kv(
        "successes",
        &format!("{} ({:.1}%)", stats.successes, stats.success_rate * 100.0),
    );
    print_kv("avg reward", &format!("{:+.2}", stats.avg_reward));
    print_kv("avg steps", &format!("{:.1}", stats.avg_steps));
    print_kv(
        "violation rate",
        &format!("{:.1}%", stats.violation_rate * 100.0),
    );
}
