#[derive(Debug, Clone)]
pub enum MenuAction {
    RunBatch,
    AnalyzeSingleSite,
    FilterOutputs,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::RunBatch => {
                write!(f, "🚀 Process target list (classify + harvest contacts)")
            }
            MenuAction::AnalyzeSingleSite => {
                write!(f, "🔎 Analyze a single website")
            }
            MenuAction::FilterOutputs => {
                write!(f, "🧹 Filter results: keep only sites with contacts")
            }
            MenuAction::Exit => write!(f, "👋 Exit"),
        }
    }
}
