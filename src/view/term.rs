use std::path::Path;

use super::chart::CategoryBreakdown;
use super::DashboardView;
use crate::capture::{Controls, SlotKind};
use crate::records::{Expense, Goal, SummaryStats};

/// Terminal renderer for the dashboard.
///
/// Prints each collection as it arrives; a failed refresh simply prints
/// nothing, leaving the previous listing on screen.
pub struct TermView;

impl TermView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TermView {
    fn default() -> Self {
        Self::new()
    }
}

/// One expense as the dashboard prints it: amount, category, payment method,
/// and the timestamp in local time.
pub fn expense_row(expense: &Expense) -> String {
    let local = expense.timestamp.with_timezone(&chrono::Local);
    format!(
        "₹{:.2} - {} ({}) [{}]",
        expense.amount,
        expense.category,
        expense.payment_method,
        local.format("%d/%m/%Y, %H:%M:%S"),
    )
}

/// One goal with its progress bar and (unclamped) percentage.
pub fn goal_row(goal: &Goal) -> String {
    let pct = goal.progress_percent();
    let filled = (pct.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!(
        "{}: ₹{:.2} / ₹{:.2} [{}{}] {:.0}%",
        goal.name,
        goal.saved,
        goal.target,
        "#".repeat(filled),
        "-".repeat(10 - filled),
        pct,
    )
}

impl DashboardView for TermView {
    fn show_expenses(&mut self, expenses: &[Expense]) {
        println!("── Expenses ({}) ──", expenses.len());
        if expenses.is_empty() {
            println!("  (none yet)");
        }
        for expense in expenses {
            println!("  {}", expense_row(expense));
        }
    }

    fn show_goals(&mut self, goals: &[Goal]) {
        println!("── Goals ({}) ──", goals.len());
        if goals.is_empty() {
            println!("  (none yet)");
        }
        for goal in goals {
            println!("  {}", goal_row(goal));
        }
    }

    fn show_chart(&mut self, breakdown: &CategoryBreakdown) {
        if breakdown.is_empty() {
            return;
        }
        println!("── Spending by category ──");
        let max = breakdown
            .slices()
            .iter()
            .map(|s| s.total)
            .fold(0.0, f64::max);
        for slice in breakdown.slices() {
            let width = if max > 0.0 {
                ((slice.total / max) * 30.0).round() as usize
            } else {
                0
            };
            println!(
                "  {:<14} {} ₹{:.2}",
                slice.category,
                "█".repeat(width),
                slice.total,
            );
        }
    }

    fn show_summary(&mut self, summary: &SummaryStats) {
        println!(
            "── Last 30 days: ₹{:.2} spent across {} expenses (avg ₹{:.2}), ₹{:.2} saved ──",
            summary.total_spent, summary.total_expenses, summary.avg_expense, summary.total_saved,
        );
    }

    fn update_controls(&mut self, slot: SlotKind, controls: Controls) {
        let mut actions = Vec::new();
        if controls.start_enabled {
            actions.push("start");
        }
        if controls.stop_enabled {
            actions.push("stop");
        }
        if controls.send_enabled {
            actions.push("send");
        }
        println!("[{}] available: {}", slot, actions.join(", "));
    }

    fn playback_ready(&mut self, slot: SlotKind, path: &Path) {
        println!("[{}] playback saved to {}", slot, path.display());
    }

    fn show_notice(&mut self, message: &str) {
        println!("• {}", message);
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("! {}", message);
    }
}
