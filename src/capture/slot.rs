use std::fmt;

/// The two independent recording slots on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Expense,
    Goal,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Expense => write!(f, "expense"),
            SlotKind::Goal => write!(f, "goal"),
        }
    }
}

/// Static wiring for one slot: where its clips go and how the upload form
/// names them. The two instances differ only in this configuration.
#[derive(Debug, Clone)]
pub struct SlotConfig {
    pub kind: SlotKind,
    /// Path under the backend base URL that accepts this slot's uploads
    pub upload_path: String,
    /// Multipart field name (the form carries exactly one field)
    pub field_name: String,
    /// Filename the backend expects on the uploaded part
    pub upload_filename: String,
}

impl SlotConfig {
    /// Wiring for the expense recorder
    pub fn expense() -> Self {
        Self {
            kind: SlotKind::Expense,
            upload_path: "/upload-audio".to_string(),
            field_name: "audio".to_string(),
            upload_filename: "expense.webm".to_string(),
        }
    }

    /// Wiring for the savings-goal recorder
    pub fn goal() -> Self {
        Self {
            kind: SlotKind::Goal,
            upload_path: "/api/voice_goal".to_string(),
            field_name: "audio".to_string(),
            upload_filename: "goal.webm".to_string(),
        }
    }
}
