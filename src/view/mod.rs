//! Dashboard rendering
//!
//! The `DashboardView` trait is the seam between the controller and whatever
//! surface displays the lists, chart, and control states. The crate ships a
//! terminal implementation; tests substitute a recording double.

mod chart;
mod term;

use std::path::Path;

use crate::capture::{Controls, SlotKind};
use crate::records::{Expense, Goal, SummaryStats};

pub use chart::{CategoryBreakdown, CategorySlice};
pub use term::{expense_row, goal_row, TermView};

/// Rendering surface for the dashboard controller.
///
/// Implementations replace whatever they currently display for a collection
/// when the corresponding `show_*` is called; the controller deliberately
/// does not call them on failed refreshes, which is how the previous listing
/// survives a fetch error.
pub trait DashboardView: Send {
    fn show_expenses(&mut self, expenses: &[Expense]);
    fn show_goals(&mut self, goals: &[Goal]);
    fn show_chart(&mut self, breakdown: &CategoryBreakdown);
    fn show_summary(&mut self, summary: &SummaryStats);
    fn update_controls(&mut self, slot: SlotKind, controls: Controls);
    fn playback_ready(&mut self, slot: SlotKind, path: &Path);
    fn show_notice(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
}
