use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Import;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Discover, LoadFile, Batch, CreateEntry, Summary }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Discover => "discover",
        Phase::LoadFile => "load_file",
        Phase::Batch => "batch",
        Phase::CreateEntry => "create_entry",
        Phase::Summary => "summary",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Discover => info_span!("discover"),
        Phase::LoadFile => info_span!("load_file"),
        Phase::Batch => info_span!("batch"),
        Phase::CreateEntry => info_span!("create_entry"),
        Phase::Summary => info_span!("summary"),
    }}
}

impl OpMarker for Import {
    const NAME: &'static str = "import";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("import") }
}
