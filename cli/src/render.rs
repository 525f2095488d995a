//! Plain-text rendering for terminal output

use buildwatch_health::{AggregateStats, ProjectView};

/// One row per view, in the order given
pub fn views_table(views: &[ProjectView]) -> String {
    if views.is_empty() {
        return "No projects match the current filters.".to_string();
    }

    let mut lines = vec![format!(
        "{:<12} {:<28} {:<12} {:<8} {:>5} {:>8} {:<9} {:<9}",
        "ID", "NAME", "STATUS", "RISK", "SCORE", "PROGRESS", "PRIORITY", "HEALTH"
    )];
    for view in views {
        lines.push(format!(
            "{:<12} {:<28} {:<12} {:<8} {:>5.1} {:>7.0}% {:<9} {:<9}",
            truncate(&view.id, 12),
            truncate(&view.name, 28),
            view.effective_status,
            view.effective_risk_level,
            view.quality_score,
            view.progress,
            view.priority,
            view.health_level,
        ));
        lines.extend(view.warnings.iter().map(|w| format!("  ! {w}")));
    }
    lines.push(format!("{} project(s)", views.len()));
    lines.join("\n")
}

/// Key/value listing of fleet aggregates
pub fn stats_listing(stats: &AggregateStats) -> String {
    let variance = match stats.budget_variance_pct {
        Some(pct) => format!("{:.2} ({pct:+.1}%)", stats.budget_variance),
        None => format!("{:.2}", stats.budget_variance),
    };

    let mut lines = vec![
        format!("Projects:           {}", stats.total),
        format!("  completed:        {}", stats.completed),
        format!("  in progress:      {}", stats.in_progress),
        format!("  on hold:          {}", stats.on_hold),
        format!("  planning:         {}", stats.planning),
        format!("  approved:         {}", stats.approved),
        format!("  overdue:          {}", stats.overdue),
        format!("High risk:          {}", stats.high_risk),
        format!("Avg quality score:  {:.1}", stats.average_quality_score),
        format!("Open Q/P issues:    {}", stats.open_quality_progress_issues),
        format!("Budget:             {:.2}", stats.total_budget),
        format!("Actual cost:        {:.2}", stats.total_actual_cost),
        format!("Variance:           {variance}"),
    ];

    for (title, dist) in [
        ("Risk", &stats.risk_distribution),
        ("Health", &stats.health_distribution),
        ("Phase", &stats.phase_distribution),
    ] {
        if dist.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{title}:"));
        lines.extend(dist.iter().map(|(label, count)| format!("  {label:<16} {count}")));
    }
    lines.join("\n")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
