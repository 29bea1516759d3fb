use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::layout::greenways::{generate_greenways, Greenway};
use crate::layout::zones::{collect_zones, Zone};
use crate::layout::{self, Adjacency, Pod};
use crate::report::Report;
use crate::routing::{route_infrastructure, Segment};
use crate::spec::{CitySpec, ResolvedParams};

/// The complete spatial plan for one city, plus its cumulative validation
/// report. Every field is immutable once returned; an external layer
/// serializes the plan to JSON for scene assembly and persistence.
#[derive(Debug, Clone, Serialize)]
pub struct CityPlan {
    pub pods: Vec<Pod>,
    pub adjacency: Adjacency,
    pub zones: Vec<Zone>,
    pub greenways: Vec<Greenway>,
    pub segments: Vec<Segment>,
    pub report: Report,
}

/// Runs the full spatial pipeline: pod layout → zone decomposition →
/// greenways → infrastructure routing.
///
/// Stages run in fixed sequential order as pure functions of the spec and
/// upstream results; their reports merge into one cumulative report. A
/// stage-level failure (for example zero seeds) invalidates the report but
/// still lets the remaining stages run over whatever was produced, so one
/// call yields a complete diagnostic pass. The function holds no hidden
/// state and never mutates its inputs, so it is safe to call from any
/// thread; identical input produces bit-for-bit identical output.
///
/// # Errors
///
/// Returns a [`crate::error::SpecError`] if the spec fails structural
/// validation before any stage runs.
pub fn solve(spec: &CitySpec, params: &ResolvedParams) -> Result<CityPlan> {
    spec.validate()?;

    let mut report = Report::new();

    let (pods, adjacency, layout_report) = layout::layout_pods(spec, params);
    report.merge(layout_report);

    let (zones, zones_report) = collect_zones(spec, &pods);
    report.merge(zones_report);

    let (greenways, greenways_report) = generate_greenways(&pods, &spec.rings);
    report.merge(greenways_report);

    let (segments, routing_report) = route_infrastructure(spec, &pods);
    report.merge(routing_report);

    info!(
        pods = pods.len(),
        zones = zones.len(),
        greenways = greenways.len(),
        segments = segments.len(),
        valid = report.valid,
        "city plan solved"
    );

    Ok(CityPlan {
        pods,
        adjacency,
        zones,
        greenways,
        segments,
        report,
    })
}
