//! Solves the reference 50k-person city and prints a plan summary.
//!
//! Pass `--json` to dump the full plan as JSON instead.

use civitas::spec::{
    CitySpec, InfrastructureSpec, RingCharacter, RingParams, RingSpec, ResolvedParams,
    VehicleSpec,
};

fn reference_spec() -> CitySpec {
    CitySpec {
        population: 50_000,
        rings: vec![
            RingSpec {
                name: "center".into(),
                character: RingCharacter::CivicCommercial,
                radius_from_m: 0.0,
                radius_to_m: 300.0,
                max_stories: 20,
                required_services: vec!["hospital".into(), "city_hall".into()],
            },
            RingSpec {
                name: "middle".into(),
                character: RingCharacter::MixedUse,
                radius_from_m: 300.0,
                radius_to_m: 600.0,
                max_stories: 10,
                required_services: vec!["secondary_school".into(), "retail".into()],
            },
            RingSpec {
                name: "edge".into(),
                character: RingCharacter::FamilyResidential,
                radius_from_m: 600.0,
                radius_to_m: 900.0,
                max_stories: 4,
                required_services: vec!["elementary_school".into(), "grocery".into()],
            },
        ],
        walk_radius_m: 400.0,
        infrastructure: InfrastructureSpec::default(),
        vehicles: VehicleSpec::default(),
    }
}

fn reference_params() -> ResolvedParams {
    let ring = |name: &str, from: f64, to: f64, area: f64, pop: u32, hh: u32, pods: u32, stories: u32| RingParams {
        name: name.into(),
        radius_from_m: from,
        radius_to_m: to,
        area_ha: area,
        population: pop,
        households: hh,
        pod_count: pods,
        pod_population: 8_333,
        max_stories: stories,
    };
    ResolvedParams {
        total_population: 50_000,
        total_households: 20_202,
        city_area_ha: 254.47,
        rings: vec![
            ring("center", 0.0, 300.0, 28.27, 8_333, 3_367, 1, 20),
            ring("middle", 300.0, 600.0, 84.82, 16_667, 6_734, 2, 10),
            ring("edge", 600.0, 900.0, 141.37, 25_000, 10_101, 3, 4),
        ],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let plan = civitas::solve(&reference_spec(), &reference_params())?;

    if std::env::args().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("pods:      {}", plan.pods.len());
    for pod in &plan.pods {
        println!(
            "  {:<16} {:>7.1} ha  pop {:>6}  neighbors {}",
            pod.id,
            pod.area_ha,
            pod.target_population,
            plan.adjacency.get(&pod.id).map_or(0, Vec::len),
        );
    }
    println!("zones:     {}", plan.zones.len());
    println!("greenways: {}", plan.greenways.len());
    println!("segments:  {}", plan.segments.len());
    println!("report:    {} (valid: {})", plan.report.summary(), plan.report.valid);
    for finding in plan.report.warnings.iter().chain(&plan.report.errors) {
        println!("  [{:?}] {}: {}", finding.severity, finding.stage, finding.message);
    }
    Ok(())
}
