//! Energy and direction distributions for primary generation.

use std::f64::consts::PI;

use rand::Rng;

use crate::error::{Result, SimError};

/// Sample a beta kinetic energy [MeV] from the approximate Kurie shape
/// `P(E) = (1 - E/Emax)^2 E^2` on `[0, Emax]`.
///
/// Rejection sampling against the envelope `Emax^2`, which bounds `P` because
/// `(1 - E/Emax)^2 <= 1`. The envelope is loose (acceptance ~1/30) and kept as is.
/// Sampling runs in `x = E/Emax`, where the envelope is 1, so extreme endpoints
/// cannot underflow or overflow it.
pub fn sample_beta_energy<R: Rng + ?Sized>(endpoint: f64, rng: &mut R) -> Result<f64> {
    if !endpoint.is_finite() || endpoint <= 0.0 {
        return Err(SimError::InvalidEndpointEnergy(endpoint));
    }
    loop {
        let x = rng.gen::<f64>();
        let p = (1.0 - x).powi(2) * x * x;
        if rng.gen::<f64>() < p {
            return Ok(x * endpoint);
        }
    }
}

/// Sample a unit vector uniformly over the spherical cap of half-angle
/// `max_theta` around +x.
pub fn sample_cone_direction<R: Rng + ?Sized>(max_theta: f64, rng: &mut R) -> Result<[f64; 3]> {
    if !max_theta.is_finite() || !(0.0..=PI).contains(&max_theta) {
        return Err(SimError::InvalidConeAngle(max_theta));
    }
    Ok(cap_direction(max_theta.cos(), rng))
}

fn cap_direction<R: Rng + ?Sized>(cos_min: f64, rng: &mut R) -> [f64; 3] {
    let cos_theta = cos_min + (1.0 - cos_min) * rng.gen::<f64>();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.gen::<f64>();
    [cos_theta, sin_theta * phi.cos(), sin_theta * phi.sin()]
}

/// Uniform point on a disk of `radius`, returned as (a, b) in the disk plane.
pub fn sample_disk<R: Rng + ?Sized>(radius: f64, rng: &mut R) -> (f64, f64) {
    let r = radius * rng.gen::<f64>().sqrt();
    let phi = 2.0 * PI * rng.gen::<f64>();
    (r * phi.cos(), r * phi.sin())
}

/// Angular distribution of a source
#[derive(Debug, Clone, PartialEq)]
pub enum AngularDistribution {
    /// Every particle along one unit vector
    Monodirectional { reference_uvw: [f64; 3] },
    /// Uniform over a cap around +x
    Cone { max_theta: f64 },
}

impl AngularDistribution {
    pub fn new_monodirectional(u: f64, v: f64, w: f64) -> Result<Self> {
        let mag = (u * u + v * v + w * w).sqrt();
        if !(mag.is_finite() && mag > 0.0) {
            return Err(SimError::parameter(
                "direction",
                format!("cannot normalise [{}, {}, {}]", u, v, w),
            ));
        }
        Ok(Self::Monodirectional {
            reference_uvw: [u / mag, v / mag, w / mag],
        })
    }

    pub fn new_cone(max_theta: f64) -> Result<Self> {
        if !max_theta.is_finite() || !(0.0..=PI).contains(&max_theta) {
            return Err(SimError::InvalidConeAngle(max_theta));
        }
        Ok(Self::Cone { max_theta })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        match self {
            AngularDistribution::Monodirectional { reference_uvw } => *reference_uvw,
            AngularDistribution::Cone { max_theta } => cap_direction(max_theta.cos(), rng),
        }
    }
}

/// Kinetic energy distribution of a source
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyDistribution {
    Discrete(f64),
    BetaSpectrum { endpoint: f64 },
}

impl EnergyDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        match self {
            EnergyDistribution::Discrete(e) => Ok(*e),
            EnergyDistribution::BetaSpectrum { endpoint } => sample_beta_energy(*endpoint, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn norm(v: [f64; 3]) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_beta_energy_within_endpoint() {
        let mut rng = StdRng::seed_from_u64(1);
        for &endpoint in &[0.546, 2.28, 1e-3] {
            for _ in 0..2000 {
                let e = sample_beta_energy(endpoint, &mut rng).unwrap();
                assert!((0.0..=endpoint).contains(&e));
            }
        }
    }

    #[test]
    fn test_beta_energy_mean() {
        // mean of x^2 (1-x)^2 on [0, 1] is 1/2 by symmetry
        let mut rng = StdRng::seed_from_u64(2);
        let n = 20_000;
        let endpoint = 2.28;
        let mean: f64 = (0..n)
            .map(|_| sample_beta_energy(endpoint, &mut rng).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean / endpoint - 0.5).abs() < 0.01, "mean fraction {}", mean / endpoint);
    }

    #[test]
    fn test_beta_energy_extreme_endpoints_terminate() {
        let mut rng = StdRng::seed_from_u64(12);
        for &endpoint in &[1e-200, 1e-300, 1e200, 1e300, f64::MAX] {
            for _ in 0..100 {
                let e = sample_beta_energy(endpoint, &mut rng).unwrap();
                assert!(e.is_finite() && (0.0..=endpoint).contains(&e), "{} for {}", e, endpoint);
            }
        }
    }

    #[test]
    fn test_beta_energy_rejects_bad_endpoint() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_beta_energy(0.0, &mut rng),
            Err(SimError::InvalidEndpointEnergy(_))
        ));
        assert!(sample_beta_energy(-1.0, &mut rng).is_err());
        assert!(sample_beta_energy(f64::NAN, &mut rng).is_err());
        assert!(sample_beta_energy(f64::INFINITY, &mut rng).is_err());
    }

    #[test]
    fn test_cone_direction_unit_and_inside() {
        let mut rng = StdRng::seed_from_u64(3);
        let max_theta = (3.53f64 / 33.01).atan();
        for _ in 0..5000 {
            let d = sample_cone_direction(max_theta, &mut rng).unwrap();
            assert!((norm(d) - 1.0).abs() < 1e-12);
            assert!(d[0].clamp(-1.0, 1.0).acos() <= max_theta + 1e-12);
        }
    }

    #[test]
    fn test_cone_zero_angle_is_axis() {
        let mut rng = StdRng::seed_from_u64(4);
        let d = sample_cone_direction(0.0, &mut rng).unwrap();
        assert_eq!(d[0], 1.0);
        assert!(d[1].abs() < 1e-12 && d[2].abs() < 1e-12);
    }

    #[test]
    fn test_cone_rejects_bad_angle() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            sample_cone_direction(-0.1, &mut rng),
            Err(SimError::InvalidConeAngle(_))
        ));
        assert!(sample_cone_direction(4.0, &mut rng).is_err());
        assert!(AngularDistribution::new_cone(f64::NAN).is_err());
    }

    #[test]
    fn test_full_sphere_cone_covers_backward() {
        let mut rng = StdRng::seed_from_u64(6);
        let backward = (0..1000)
            .map(|_| sample_cone_direction(PI, &mut rng).unwrap())
            .filter(|d| d[0] < 0.0)
            .count();
        assert!(backward > 400 && backward < 600);
    }

    #[test]
    fn test_disk_within_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (a, b) = sample_disk(3.53, &mut rng);
            assert!((a * a + b * b).sqrt() <= 3.53);
        }
    }

    #[test]
    fn test_monodirectional_normalizes() {
        let mut rng = StdRng::seed_from_u64(8);
        let mono = AngularDistribution::new_monodirectional(0.0, 0.0, 2.0).unwrap();
        assert_eq!(mono.sample(&mut rng), [0.0, 0.0, 1.0]);
        assert!(AngularDistribution::new_monodirectional(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_cone_distribution_matches_sampler() {
        let cone = AngularDistribution::new_cone(0.2).unwrap();
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        assert_eq!(cone.sample(&mut a), sample_cone_direction(0.2, &mut b).unwrap());
    }

    #[test]
    fn test_energy_distribution_variants() {
        let mut rng = StdRng::seed_from_u64(10);
        assert_eq!(EnergyDistribution::Discrete(3000.0).sample(&mut rng).unwrap(), 3000.0);
        let e = EnergyDistribution::BetaSpectrum { endpoint: 0.546 }
            .sample(&mut rng)
            .unwrap();
        assert!(e <= 0.546);
    }

    #[test]
    fn test_send_sync_bounds() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AngularDistribution>();
        assert_sync::<AngularDistribution>();
    }
}
