//! Shared fixtures for the test suite: the reference 50k-person city with
//! three rings and six pods.

use crate::spec::{
    CitySpec, InfrastructureSpec, RingCharacter, RingParams, RingSpec, ResolvedParams,
    VehicleSpec,
};

pub(crate) fn default_spec() -> CitySpec {
    CitySpec {
        population: 50_000,
        rings: vec![
            RingSpec {
                name: "center".into(),
                character: RingCharacter::CivicCommercial,
                radius_from_m: 0.0,
                radius_to_m: 300.0,
                max_stories: 20,
                required_services: vec![
                    "hospital".into(),
                    "performing_arts".into(),
                    "city_hall".into(),
                    "coworking_hub".into(),
                ],
            },
            RingSpec {
                name: "middle".into(),
                character: RingCharacter::MixedUse,
                radius_from_m: 300.0,
                radius_to_m: 600.0,
                max_stories: 10,
                required_services: vec![
                    "secondary_school".into(),
                    "medical_clinic".into(),
                    "retail".into(),
                    "restaurant".into(),
                ],
            },
            RingSpec {
                name: "edge".into(),
                character: RingCharacter::FamilyResidential,
                radius_from_m: 600.0,
                radius_to_m: 900.0,
                max_stories: 4,
                required_services: vec![
                    "elementary_school".into(),
                    "library".into(),
                    "grocery".into(),
                    "playground".into(),
                    "daycare".into(),
                ],
            },
        ],
        walk_radius_m: 400.0,
        infrastructure: InfrastructureSpec::default(),
        vehicles: VehicleSpec::default(),
    }
}

pub(crate) fn default_params() -> ResolvedParams {
    ResolvedParams {
        total_population: 50_000,
        total_households: 20_202,
        city_area_ha: 254.47,
        rings: vec![
            RingParams {
                name: "center".into(),
                radius_from_m: 0.0,
                radius_to_m: 300.0,
                area_ha: 28.27,
                population: 8_333,
                households: 3_367,
                pod_count: 1,
                pod_population: 8_333,
                max_stories: 20,
            },
            RingParams {
                name: "middle".into(),
                radius_from_m: 300.0,
                radius_to_m: 600.0,
                area_ha: 84.82,
                population: 16_667,
                households: 6_734,
                pod_count: 2,
                pod_population: 8_333,
                max_stories: 10,
            },
            RingParams {
                name: "edge".into(),
                radius_from_m: 600.0,
                radius_to_m: 900.0,
                area_ha: 141.37,
                population: 25_000,
                households: 10_101,
                pod_count: 3,
                pod_population: 8_333,
                max_stories: 4,
            },
        ],
    }
}
