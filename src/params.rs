use rand::Rng;
use serde::{Deserialize, Serialize};

/// A source of one numeric value per declared scalar range.
///
/// Model parameters are declared as (min, max) ranges per family; the value
/// source decides which point of the range each index tuple receives. The
/// default is the range midpoint, which makes runs reproducible; a sampling
/// source can be swapped in, and tests inject literal fixtures.
pub trait ValueSource {
    /// A fractional value drawn from `[lo, hi]`.
    fn scalar(&mut self, lo: f64, hi: f64) -> f64;

    /// A whole-number value drawn from `[lo, hi]`.
    fn whole(&mut self, lo: f64, hi: f64) -> f64 {
        self.scalar(lo, hi).trunc()
    }
}

/// Central-value parameterization: every range yields its arithmetic
/// midpoint. Deterministic, used to replicate the case study.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl ValueSource for Midpoint {
    fn scalar(&mut self, lo: f64, hi: f64) -> f64 {
        (lo + hi) / 2.0
    }
}

/// Uniform sampling over each declared range.
#[derive(Debug)]
pub struct UniformSource<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformSource<R> {
    pub fn new(rng: R) -> Self {
        UniformSource { rng }
    }
}

impl<R: Rng> ValueSource for UniformSource<R> {
    fn scalar(&mut self, lo: f64, hi: f64) -> f64 {
        if lo == hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn whole(&mut self, lo: f64, hi: f64) -> f64 {
        self.scalar(lo, hi).round()
    }
}

/// The scalar ranges every parameter family is generated from, with the case
/// study values as defaults. Fixed-value families are plain scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterRanges {
    /// Demand per (period, product, hospital) [units]
    pub hospital_demand: f64,
    /// Demand per (period, product, clinic) [units]
    pub clinic_demand: f64,
    /// Production capacity of a regional bank per period [units]
    pub production_capacity: (f64, f64),
    /// Storage capacity at a regional bank [units]
    pub regional_storage: f64,
    /// Storage capacity at a hospital [units]
    pub hospital_storage: f64,
    /// Storage capacity at a clinic [units]
    pub clinic_storage: f64,
    /// Processing capacity of a mobile unit per period [units]
    pub mobile_throughput: (f64, f64),
    /// Processing capacity of a local center per period [units]
    pub local_throughput: (f64, f64),
    /// Selling price to hospitals [IDR/unit]
    pub hospital_price: (f64, f64),
    /// Selling price to clinics [IDR/unit]
    pub clinic_price: (f64, f64),
    /// Production cost at regional banks [IDR/unit]
    pub production_cost: (f64, f64),
    /// Acquisition cost of inbound product at regional banks [IDR/unit]
    pub acquisition_cost: (f64, f64),
    /// Inventory holding cost [IDR/unit/period]
    pub holding_cost: (f64, f64),
    /// Discard handling cost [IDR/unit]
    pub discard_cost: (f64, f64),
    /// Transport cost [IDR/unit/km]
    pub transport_cost: (f64, f64),
    /// Production emission factor [kg CO2e/unit]
    pub production_emission: (f64, f64),
    /// Storage emission factor [kg CO2e/unit/period]
    pub storage_emission: (f64, f64),
    /// Transport emission factor [kg CO2e/unit/km]
    pub transport_emission: (f64, f64),
    /// Distance from mobile units to regional banks [km]
    pub mobile_regional_distance: (f64, f64),
    /// Distance from local centers to regional banks [km]
    pub local_regional_distance: (f64, f64),
    /// Distance from regional banks to hospitals/clinics [km]
    pub regional_demand_distance: (f64, f64),
    /// Distance from local centers to hospitals/clinics [km]
    pub local_demand_distance: (f64, f64),
    /// Distance between two distinct regional banks [km]
    pub cross_transfer_distance: f64,
    /// Distance from any stock-holding node to a waste center [km]
    pub waste_distance: (f64, f64),
}

impl Default for ParameterRanges {
    fn default() -> Self {
        ParameterRanges {
            hospital_demand: 13.0,
            clinic_demand: 13.0,
            production_capacity: (300.0, 450.0),
            regional_storage: 10_000.0,
            hospital_storage: 2_000.0,
            clinic_storage: 2_000.0,
            mobile_throughput: (50.0, 150.0),
            local_throughput: (100.0, 200.0),
            hospital_price: (288_000.0, 292_000.0),
            clinic_price: (358_000.0, 362_000.0),
            production_cost: (180_000.0, 200_000.0),
            acquisition_cost: (50_000.0, 100_000.0),
            holding_cost: (130.0, 150.0),
            discard_cost: (5_000.0, 7_000.0),
            transport_cost: (10.0, 50.0),
            production_emission: (0.017, 0.068),
            storage_emission: (0.0017, 0.0068),
            transport_emission: (0.00017, 0.00068),
            mobile_regional_distance: (7.0, 20.0),
            local_regional_distance: (3.0, 20.0),
            regional_demand_distance: (0.5, 30.0),
            local_demand_distance: (1.0, 25.0),
            cross_transfer_distance: 18.0,
            waste_distance: (1.5, 32.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn midpoint_is_central() {
        let mut source = Midpoint;
        assert_eq!(source.scalar(7.0, 20.0), 13.5);
        assert_eq!(source.scalar(0.017, 0.068), 0.0425);
    }

    #[test]
    fn midpoint_whole_truncates() {
        let mut source = Midpoint;
        // (300 + 450) / 2 = 375
        assert_eq!(source.whole(300.0, 450.0), 375.0);
        // (50_000 + 100_000) / 2 = 75_000
        assert_eq!(source.whole(50_000.0, 100_000.0), 75_000.0);
        // (288_000 + 292_000 + 1) / 2 would not be whole; truncation applies
        assert_eq!(source.whole(10.0, 51.0), 30.0);
    }

    #[test]
    fn uniform_stays_within_range() {
        let mut source = UniformSource::new(StdRng::seed_from_u64(42));
        for _ in 0..100 {
            let v = source.scalar(1.5, 32.0);
            assert!((1.5..=32.0).contains(&v));
        }
    }

    #[test]
    fn uniform_handles_degenerate_range() {
        let mut source = UniformSource::new(StdRng::seed_from_u64(42));
        assert_eq!(source.scalar(18.0, 18.0), 18.0);
    }
}
