// Unit conventions: lengths in mm, energies in MeV, wavelengths in nm, times in ns.

/// Planck constant times speed of light [MeV nm]
pub const HC_MEV_NM: f64 = 1.239841984e-3;

pub const MM: f64 = 1.0;
pub const CM: f64 = 10.0;
pub const M: f64 = 1000.0;

pub const MEV: f64 = 1.0;
pub const KEV: f64 = 1.0e-3;
pub const GEV: f64 = 1.0e3;

pub const NS: f64 = 1.0;

/// Minimum-ionising mass stopping power [MeV cm^2 / g]
pub const MIP_STOPPING_POWER: f64 = 2.0;

/// Wavelength [nm] of a photon with total energy `energy` [MeV].
pub fn wavelength_from_energy(energy: f64) -> f64 {
    HC_MEV_NM / energy
}

/// Photon energy [MeV] for a wavelength [nm].
pub fn energy_from_wavelength(wavelength_nm: f64) -> f64 {
    HC_MEV_NM / wavelength_nm
}
