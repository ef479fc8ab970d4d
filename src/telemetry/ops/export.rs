use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Export;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, FetchType, WriteType, WriteBundle }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::FetchType => "fetch_type",
        Phase::WriteType => "write_type",
        Phase::WriteBundle => "write_bundle",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::FetchType => info_span!("fetch_type"),
        Phase::WriteType => info_span!("write_type"),
        Phase::WriteBundle => info_span!("write_bundle"),
    }}
}

impl OpMarker for Export {
    const NAME: &'static str = "export";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("export") }
}
