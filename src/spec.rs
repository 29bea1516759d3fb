use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::math::TOLERANCE;

/// Validated city specification.
///
/// Produced by an external schema layer; the solver treats it as an
/// immutable configuration passed by reference and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySpec {
    pub population: u32,
    /// Concentric rings ordered from the center outward.
    pub rings: Vec<RingSpec>,
    /// Target maximum distance from a pod center to its boundary, meters.
    pub walk_radius_m: f64,
    #[serde(default)]
    pub infrastructure: InfrastructureSpec,
    #[serde(default)]
    pub vehicles: VehicleSpec,
}

impl CitySpec {
    /// Returns the outermost ring's outer radius, or 0 with no rings.
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.rings.last().map_or(0.0, |r| r.radius_to_m)
    }

    /// Returns the ring definition with the given name.
    #[must_use]
    pub fn ring(&self, name: &str) -> Option<&RingSpec> {
        self.rings.iter().find(|r| r.name == name)
    }

    /// Checks the structural invariants the spatial solver depends on.
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] if the ring list is empty, ring radii are not
    /// ascending and contiguous, or population / walk radius are not
    /// positive. Field-range checks beyond these belong to the schema layer.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.rings.is_empty() {
            return Err(SpecError::NoRings);
        }
        if self.population == 0 {
            return Err(SpecError::ZeroPopulation);
        }
        if self.walk_radius_m <= 0.0 {
            return Err(SpecError::InvalidWalkRadius(self.walk_radius_m));
        }
        let mut prev_to = 0.0;
        for ring in &self.rings {
            if ring.radius_to_m <= ring.radius_from_m {
                return Err(SpecError::InvalidRingRadii {
                    name: ring.name.clone(),
                    from: ring.radius_from_m,
                    to: ring.radius_to_m,
                });
            }
            if (ring.radius_from_m - prev_to).abs() > TOLERANCE {
                return Err(SpecError::RingsNotContiguous {
                    name: ring.name.clone(),
                    from: ring.radius_from_m,
                    prev_to,
                });
            }
            prev_to = ring.radius_to_m;
        }
        Ok(())
    }
}

/// One concentric ring zone of the city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingSpec {
    pub name: String,
    pub character: RingCharacter,
    pub radius_from_m: f64,
    pub radius_to_m: f64,
    pub max_stories: u32,
    #[serde(default)]
    pub required_services: Vec<String>,
}

/// Functional character of a ring, which drives its land-use mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingCharacter {
    /// Dense civic/commercial core.
    CivicCommercial,
    /// Mixed residential and commercial.
    MixedUse,
    /// Family-oriented residential with schools.
    FamilyResidential,
}

/// Per-capita and geometric constants for infrastructure sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureSpec {
    pub water_gpd_per_capita: f64,
    pub sewage_gpd_per_capita: f64,
    pub electrical_kw_per_capita: f64,
    pub telecom_node_spacing_m: f64,
}

impl Default for InfrastructureSpec {
    fn default() -> Self {
        Self {
            water_gpd_per_capita: 100.0,
            sewage_gpd_per_capita: 95.0,
            electrical_kw_per_capita: 2.5,
            telecom_node_spacing_m: 75.0,
        }
    }
}

/// Widths of the underground vehicle network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSpec {
    pub arterial_width_m: f64,
    pub service_branch_width_m: f64,
}

impl Default for VehicleSpec {
    fn default() -> Self {
        Self {
            arterial_width_m: 6.0,
            service_branch_width_m: 4.0,
        }
    }
}

/// Analytics results the solver consumes, resolved by an external stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedParams {
    pub total_population: u32,
    pub total_households: u32,
    pub city_area_ha: f64,
    /// Per-ring breakdown, ordered to match [`CitySpec::rings`].
    pub rings: Vec<RingParams>,
}

/// Per-ring analytics breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingParams {
    pub name: String,
    pub radius_from_m: f64,
    pub radius_to_m: f64,
    pub area_ha: f64,
    pub population: u32,
    pub households: u32,
    /// Capacity-weighted pod count for this ring.
    pub pod_count: u32,
    /// Target population per pod.
    pub pod_population: u32,
    pub max_stories: u32,
}
