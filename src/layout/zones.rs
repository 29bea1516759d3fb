use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::math::clip::clip_to_annulus;
use crate::math::{Point2, Polygon};
use crate::report::{Report, Stage};
use crate::spec::{CitySpec, RingCharacter};

use super::Pod;

/// Functional zone type within a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Residential,
    Commercial,
    Civic,
    Green,
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Civic => "civic",
            Self::Green => "green",
        };
        f.write_str(s)
    }
}

/// A functional zone within a pod.
#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    pub id: String,
    pub pod_id: String,
    pub zone_type: ZoneType,
    pub polygon: Polygon,
    pub area_ha: f64,
}

/// Bands below this area are dropped as slivers, in m².
const MIN_ZONE_AREA: f64 = 100.0;

const M2_PER_HA: f64 = 10_000.0;

/// Land-use fractions for a ring character. Residential occupies the band
/// left between the civic cut and the green cut.
struct ZoneFractions {
    commercial: f64,
    civic: f64,
    green: f64,
}

fn zone_fractions(character: RingCharacter) -> ZoneFractions {
    match character {
        RingCharacter::CivicCommercial => ZoneFractions {
            commercial: 0.35,
            civic: 0.25,
            green: 0.15,
        },
        RingCharacter::MixedUse | RingCharacter::FamilyResidential => ZoneFractions {
            commercial: 0.15,
            civic: 0.10,
            green: 0.15,
        },
    }
}

/// Divides a pod into functional zones as concentric radial bands measured
/// from the city center.
///
/// Band order from inner (nearest the city center) to outer:
/// commercial → civic → residential → green. The cut radii come from the
/// ring extents so band positions are independent of the pod polygon shape;
/// each band is the pod boundary annulus-clipped to its absolute radii.
/// Bands below [`MIN_ZONE_AREA`] are dropped.
#[must_use]
pub fn allocate_zones(
    pod: &Pod,
    character: RingCharacter,
    ring_inner_r: f64,
    ring_outer_r: f64,
) -> Vec<Zone> {
    if pod.boundary.is_empty() {
        return Vec::new();
    }
    let extent = ring_outer_r - ring_inner_r;
    if extent < 1.0 {
        return Vec::new();
    }

    let fractions = zone_fractions(character);
    let cut1 = ring_inner_r + fractions.commercial * extent;
    let mut cut2 = cut1 + fractions.civic * extent;
    let cut3 = ring_outer_r - fractions.green * extent;
    if cut2 > cut3 {
        cut2 = (cut1 + cut3) / 2.0;
    }

    let bands = [
        (ZoneType::Commercial, ring_inner_r, cut1),
        (ZoneType::Civic, cut1, cut2),
        (ZoneType::Residential, cut2, cut3),
        (ZoneType::Green, cut3, ring_outer_r),
    ];

    let mut zones = Vec::new();
    for (zone_type, inner_r, outer_r) in bands {
        let polygon = clip_to_annulus(&pod.boundary, Point2::origin(), inner_r, outer_r);
        if polygon.is_empty() {
            continue;
        }
        let area = polygon.area();
        if area < MIN_ZONE_AREA {
            continue;
        }
        zones.push(Zone {
            id: format!("{}_{zone_type}", pod.id),
            pod_id: pod.id.clone(),
            zone_type,
            polygon,
            area_ha: area / M2_PER_HA,
        });
    }
    zones
}

/// Allocates zones for every pod, resolving ring character and radii from
/// the spec. Pods whose ring is missing from the spec are warned about and
/// skipped; siblings keep processing.
#[must_use]
pub fn collect_zones(spec: &CitySpec, pods: &[Pod]) -> (Vec<Zone>, Report) {
    let mut report = Report::new();
    let mut zones = Vec::new();
    for pod in pods {
        let Some(ring) = spec.ring(&pod.ring) else {
            report.warning(
                Stage::Zones,
                format!("pod {}: ring {} not found in spec", pod.id, pod.ring),
            );
            continue;
        };
        zones.extend(allocate_zones(
            pod,
            ring.character,
            ring.radius_from_m,
            ring.radius_to_m,
        ));
    }
    report.info(
        Stage::Zones,
        format!("allocated {} zones across {} pods", zones.len(), pods.len()),
    );
    debug!(zones = zones.len(), "zone decomposition complete");
    (zones, report)
}

/// Returns only the green zones across all pods.
#[must_use]
pub fn green_zones(spec: &CitySpec, pods: &[Pod]) -> Vec<Zone> {
    let (zones, _) = collect_zones(spec, pods);
    zones
        .into_iter()
        .filter(|z| z.zone_type == ZoneType::Green)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::layout_pods;
    use crate::testutil::{default_params, default_spec};

    fn default_pods() -> Vec<Pod> {
        let (pods, _, report) = layout_pods(&default_spec(), &default_params());
        assert!(report.valid);
        pods
    }

    #[test]
    fn every_pod_gets_zones() {
        let spec = default_spec();
        let pods = default_pods();
        let (zones, report) = collect_zones(&spec, &pods);
        assert!(report.valid);
        for pod in &pods {
            assert!(
                zones.iter().any(|z| z.pod_id == pod.id),
                "pod {} has no zones",
                pod.id
            );
        }
    }

    #[test]
    fn zones_stay_within_their_pod_ring() {
        let spec = default_spec();
        let pods = default_pods();
        let (zones, _) = collect_zones(&spec, &pods);
        for zone in &zones {
            let pod = pods.iter().find(|p| p.id == zone.pod_id).unwrap();
            let ring = spec.ring(&pod.ring).unwrap();
            for v in &zone.polygon.vertices {
                let r = v.coords.norm();
                assert!(
                    r >= ring.radius_from_m - 1.0 && r <= ring.radius_to_m + 1.0,
                    "zone {} vertex at radius {r:.1} outside ring [{}, {}]",
                    zone.id,
                    ring.radius_from_m,
                    ring.radius_to_m
                );
            }
        }
    }

    #[test]
    fn zone_area_does_not_exceed_pod_area() {
        let spec = default_spec();
        let pods = default_pods();
        let (zones, _) = collect_zones(&spec, &pods);
        for pod in &pods {
            let zone_total: f64 = zones
                .iter()
                .filter(|z| z.pod_id == pod.id)
                .map(|z| z.area_ha)
                .sum();
            assert!(
                zone_total <= pod.area_ha * 1.05,
                "pod {}: zones {zone_total:.2} ha exceed pod {:.2} ha",
                pod.id,
                pod.area_ha
            );
        }
    }

    #[test]
    fn no_sliver_zones() {
        let spec = default_spec();
        let (zones, _) = collect_zones(&spec, &default_pods());
        for zone in &zones {
            assert!(zone.area_ha * M2_PER_HA >= MIN_ZONE_AREA);
        }
    }

    #[test]
    fn empty_pod_boundary_yields_no_zones() {
        let pod = Pod {
            id: "pod_test_0".into(),
            ring: "center".into(),
            center: Point2::origin(),
            boundary: Polygon::default(),
            area_ha: 0.0,
            target_population: 0,
        };
        assert!(allocate_zones(&pod, RingCharacter::MixedUse, 0.0, 300.0).is_empty());
    }

    #[test]
    fn green_zone_filter() {
        let spec = default_spec();
        let pods = default_pods();
        let greens = green_zones(&spec, &pods);
        assert!(!greens.is_empty());
        assert!(greens.iter().all(|z| z.zone_type == ZoneType::Green));
    }

    #[test]
    fn zone_ids_name_pod_and_type() {
        let spec = default_spec();
        let (zones, _) = collect_zones(&spec, &default_pods());
        let z = zones.iter().find(|z| z.pod_id == "pod_center_0").unwrap();
        assert!(z.id.starts_with("pod_center_0_"));
    }
}
