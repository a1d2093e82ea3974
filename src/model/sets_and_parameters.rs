use itertools::iproduct;

use crate::config::ConfigError;
use crate::instance::{Cost, Distance, Emission, Instance, Quantity, RegionalIndex};
use crate::params::{ParameterRanges, ValueSource};

/// The index sets the model is enumerated over, materialized once before any
/// variable or constraint is generated.
#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct Sets {
    /// Set of mobile collection units
    pub I: Vec<usize>,
    /// Set of local distribution centers
    pub J: Vec<usize>,
    /// Set of regional blood banks
    pub R: Vec<usize>,
    /// Set of hospitals
    pub H: Vec<usize>,
    /// Set of clinics
    pub K: Vec<usize>,
    /// Set of waste centers
    pub U: Vec<usize>,
    /// Set of product types
    pub P: Vec<usize>,
    /// Set of time periods
    pub T: Vec<usize>,
    /// Ordered cross-transfer pairs (from, to) between distinct regional
    /// banks. Self-transfers are excluded from the index space entirely.
    pub RR: Vec<(RegionalIndex, RegionalIndex)>,
}

impl Sets {
    pub fn new(instance: &Instance) -> Sets {
        let banks = instance.regional_banks().len();
        let RR = iproduct!(0..banks, 0..banks)
            .filter(|(from, to)| from != to)
            .collect();

        Sets {
            I: (0..instance.mobile_units().len()).collect(),
            J: (0..instance.local_centers().len()).collect(),
            R: (0..banks).collect(),
            H: (0..instance.hospitals().len()).collect(),
            K: (0..instance.clinics().len()).collect(),
            U: (0..instance.waste_centers().len()).collect(),
            P: (0..instance.products().len()).collect(),
            T: (0..instance.periods()).collect(),
            RR,
        }
    }

    /// The index of the cross-transfer pair (from, to) in `RR`.
    ///
    /// Panics if `from == to` or either bank is outside the declared set;
    /// both are programming errors, not recoverable conditions.
    pub fn transfer_pair(&self, from: RegionalIndex, to: RegionalIndex) -> usize {
        assert_ne!(from, to, "self-transfers are not part of the index space");
        self.RR
            .iter()
            .position(|&pair| pair == (from, to))
            .unwrap_or_else(|| panic!("transfer pair ({}, {}) outside declared sets", from, to))
    }
}

/// One deterministic scalar per index tuple, for every parameter family the
/// constraint generator and objective composer query. Tables are dense: the
/// entry for an index tuple always exists, and `validate` rejects any table
/// that does not cover its full index space.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Hospital demand per (t, p, h) [units]
    pub hospital_demand: Vec<Vec<Vec<Quantity>>>,
    /// Clinic demand per (t, p, k) [units]
    pub clinic_demand: Vec<Vec<Vec<Quantity>>>,
    /// Production capacity at a regional bank per (t, p, r) [units]
    pub production_capacity: Vec<Vec<Vec<Quantity>>>,
    /// Storage capacity at a regional bank per (p, r) [units]
    pub regional_storage: Vec<Vec<Quantity>>,
    /// Storage capacity at a hospital per (p, h) [units]
    pub hospital_storage: Vec<Vec<Quantity>>,
    /// Storage capacity at a clinic per (p, k) [units]
    pub clinic_storage: Vec<Vec<Quantity>>,
    /// Processing capacity of a mobile unit per (t, p, i) [units]
    pub mobile_throughput: Vec<Vec<Vec<Quantity>>>,
    /// Processing capacity of a local center per (t, p, j) [units]
    pub local_throughput: Vec<Vec<Vec<Quantity>>>,
    /// Selling price to hospitals per (t, p, r, h) [IDR/unit]
    pub hospital_price: Vec<Vec<Vec<Vec<Cost>>>>,
    /// Selling price to clinics per (t, p, r, k) [IDR/unit]
    pub clinic_price: Vec<Vec<Vec<Vec<Cost>>>>,
    /// Production cost per (t, p, r) [IDR/unit]
    pub production_cost: Vec<Vec<Vec<Cost>>>,
    /// Acquisition cost of product collected by mobile units per (t, p, i, r)
    pub mobile_acquisition_cost: Vec<Vec<Vec<Vec<Cost>>>>,
    /// Acquisition cost of product from local centers per (t, p, j, r)
    pub local_acquisition_cost: Vec<Vec<Vec<Vec<Cost>>>>,
    /// Holding cost at regional banks per (t, p, r) [IDR/unit/period]
    pub regional_holding_cost: Vec<Vec<Vec<Cost>>>,
    /// Holding cost at hospitals per (t, p, h)
    pub hospital_holding_cost: Vec<Vec<Vec<Cost>>>,
    /// Holding cost at clinics per (t, p, k)
    pub clinic_holding_cost: Vec<Vec<Vec<Cost>>>,
    /// Discard handling cost at regional banks per (t, p, r) [IDR/unit]
    pub regional_discard_cost: Vec<Vec<Vec<Cost>>>,
    /// Discard handling cost at hospitals per (t, p, h)
    pub hospital_discard_cost: Vec<Vec<Vec<Cost>>>,
    /// Discard handling cost at clinics per (t, p, k)
    pub clinic_discard_cost: Vec<Vec<Vec<Cost>>>,

    /// Transport unit cost per route family [IDR/unit/km]
    pub transport_cost_ir: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_jr: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_jh: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_jk: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_rh: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_rk: Vec<Vec<Vec<Vec<Cost>>>>,
    /// Cross-transfer transport cost per (t, p, pair)
    pub transport_cost_rr: Vec<Vec<Vec<Cost>>>,
    pub transport_cost_ru: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_hu: Vec<Vec<Vec<Vec<Cost>>>>,
    pub transport_cost_ku: Vec<Vec<Vec<Vec<Cost>>>>,

    /// Distances between adjacent node classes [km]
    pub distance_ir: Vec<Vec<Distance>>,
    pub distance_jr: Vec<Vec<Distance>>,
    pub distance_jh: Vec<Vec<Distance>>,
    pub distance_jk: Vec<Vec<Distance>>,
    pub distance_rh: Vec<Vec<Distance>>,
    pub distance_rk: Vec<Vec<Distance>>,
    /// Cross-transfer distance per pair index
    pub distance_rr: Vec<Distance>,
    pub distance_ru: Vec<Vec<Distance>>,
    pub distance_hu: Vec<Vec<Distance>>,
    pub distance_ku: Vec<Vec<Distance>>,

    /// Production emission factor per (t, p, r) [kg CO2e/unit]
    pub production_emission: Vec<Vec<Vec<Emission>>>,
    /// Storage emission factors per (t, p, node) [kg CO2e/unit/period]
    pub regional_storage_emission: Vec<Vec<Vec<Emission>>>,
    pub hospital_storage_emission: Vec<Vec<Vec<Emission>>>,
    pub clinic_storage_emission: Vec<Vec<Vec<Emission>>>,
    /// Transport emission factors per route family [kg CO2e/unit/km].
    /// Only the seven capped families carry these; waste routes do not
    /// participate in the environmental cap or the emissions criterion.
    pub transport_emission_ir: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_jr: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_jh: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_jk: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_rh: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_rk: Vec<Vec<Vec<Vec<Emission>>>>,
    pub transport_emission_rr: Vec<Vec<Vec<Emission>>>,
}

fn fill1(n: usize, f: &mut impl FnMut() -> f64) -> Vec<f64> {
    (0..n).map(|_| f()).collect()
}

fn fill2(a: usize, b: usize, f: &mut impl FnMut() -> f64) -> Vec<Vec<f64>> {
    (0..a).map(|_| fill1(b, f)).collect()
}

fn fill3(a: usize, b: usize, c: usize, f: &mut impl FnMut() -> f64) -> Vec<Vec<Vec<f64>>> {
    (0..a).map(|_| fill2(b, c, f)).collect()
}

fn fill4(
    a: usize,
    b: usize,
    c: usize,
    d: usize,
    f: &mut impl FnMut() -> f64,
) -> Vec<Vec<Vec<Vec<f64>>>> {
    (0..a).map(|_| fill3(b, c, d, f)).collect()
}

impl Parameters {
    /// Generate every parameter family from its declared range through the
    /// given value source. Time-indexed families receive one draw per index
    /// tuple even when the range is degenerate, so sampling sources vary
    /// across the full index space.
    pub fn new(sets: &Sets, ranges: &ParameterRanges, source: &mut dyn ValueSource) -> Parameters {
        let (t, p) = (sets.T.len(), sets.P.len());
        let (i, j, r) = (sets.I.len(), sets.J.len(), sets.R.len());
        let (h, k, u) = (sets.H.len(), sets.K.len(), sets.U.len());
        let rr = sets.RR.len();

        Parameters {
            hospital_demand: fill3(t, p, h, &mut || ranges.hospital_demand),
            clinic_demand: fill3(t, p, k, &mut || ranges.clinic_demand),
            production_capacity: fill3(t, p, r, &mut || {
                source.whole(ranges.production_capacity.0, ranges.production_capacity.1)
            }),
            regional_storage: fill2(p, r, &mut || ranges.regional_storage),
            hospital_storage: fill2(p, h, &mut || ranges.hospital_storage),
            clinic_storage: fill2(p, k, &mut || ranges.clinic_storage),
            mobile_throughput: fill3(t, p, i, &mut || {
                source.whole(ranges.mobile_throughput.0, ranges.mobile_throughput.1)
            }),
            local_throughput: fill3(t, p, j, &mut || {
                source.whole(ranges.local_throughput.0, ranges.local_throughput.1)
            }),
            hospital_price: fill4(t, p, r, h, &mut || {
                source.whole(ranges.hospital_price.0, ranges.hospital_price.1)
            }),
            clinic_price: fill4(t, p, r, k, &mut || {
                source.whole(ranges.clinic_price.0, ranges.clinic_price.1)
            }),
            production_cost: fill3(t, p, r, &mut || {
                source.whole(ranges.production_cost.0, ranges.production_cost.1)
            }),
            mobile_acquisition_cost: fill4(t, p, i, r, &mut || {
                source.whole(ranges.acquisition_cost.0, ranges.acquisition_cost.1)
            }),
            local_acquisition_cost: fill4(t, p, j, r, &mut || {
                source.whole(ranges.acquisition_cost.0, ranges.acquisition_cost.1)
            }),
            regional_holding_cost: fill3(t, p, r, &mut || {
                source.whole(ranges.holding_cost.0, ranges.holding_cost.1)
            }),
            hospital_holding_cost: fill3(t, p, h, &mut || {
                source.whole(ranges.holding_cost.0, ranges.holding_cost.1)
            }),
            clinic_holding_cost: fill3(t, p, k, &mut || {
                source.whole(ranges.holding_cost.0, ranges.holding_cost.1)
            }),
            regional_discard_cost: fill3(t, p, r, &mut || {
                source.whole(ranges.discard_cost.0, ranges.discard_cost.1)
            }),
            hospital_discard_cost: fill3(t, p, h, &mut || {
                source.whole(ranges.discard_cost.0, ranges.discard_cost.1)
            }),
            clinic_discard_cost: fill3(t, p, k, &mut || {
                source.whole(ranges.discard_cost.0, ranges.discard_cost.1)
            }),
            transport_cost_ir: fill4(t, p, i, r, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_jr: fill4(t, p, j, r, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_jh: fill4(t, p, j, h, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_jk: fill4(t, p, j, k, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_rh: fill4(t, p, r, h, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_rk: fill4(t, p, r, k, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_rr: fill3(t, p, rr, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_ru: fill4(t, p, r, u, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_hu: fill4(t, p, h, u, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            transport_cost_ku: fill4(t, p, k, u, &mut || {
                source.whole(ranges.transport_cost.0, ranges.transport_cost.1)
            }),
            distance_ir: fill2(i, r, &mut || {
                source.scalar(
                    ranges.mobile_regional_distance.0,
                    ranges.mobile_regional_distance.1,
                )
            }),
            distance_jr: fill2(j, r, &mut || {
                source.scalar(
                    ranges.local_regional_distance.0,
                    ranges.local_regional_distance.1,
                )
            }),
            distance_jh: fill2(j, h, &mut || {
                source.scalar(
                    ranges.local_demand_distance.0,
                    ranges.local_demand_distance.1,
                )
            }),
            distance_jk: fill2(j, k, &mut || {
                source.scalar(
                    ranges.local_demand_distance.0,
                    ranges.local_demand_distance.1,
                )
            }),
            distance_rh: fill2(r, h, &mut || {
                source.scalar(
                    ranges.regional_demand_distance.0,
                    ranges.regional_demand_distance.1,
                )
            }),
            distance_rk: fill2(r, k, &mut || {
                source.scalar(
                    ranges.regional_demand_distance.0,
                    ranges.regional_demand_distance.1,
                )
            }),
            distance_rr: fill1(rr, &mut || ranges.cross_transfer_distance),
            distance_ru: fill2(r, u, &mut || {
                source.scalar(ranges.waste_distance.0, ranges.waste_distance.1)
            }),
            distance_hu: fill2(h, u, &mut || {
                source.scalar(ranges.waste_distance.0, ranges.waste_distance.1)
            }),
            distance_ku: fill2(k, u, &mut || {
                source.scalar(ranges.waste_distance.0, ranges.waste_distance.1)
            }),
            production_emission: fill3(t, p, r, &mut || {
                source.scalar(ranges.production_emission.0, ranges.production_emission.1)
            }),
            regional_storage_emission: fill3(t, p, r, &mut || {
                source.scalar(ranges.storage_emission.0, ranges.storage_emission.1)
            }),
            hospital_storage_emission: fill3(t, p, h, &mut || {
                source.scalar(ranges.storage_emission.0, ranges.storage_emission.1)
            }),
            clinic_storage_emission: fill3(t, p, k, &mut || {
                source.scalar(ranges.storage_emission.0, ranges.storage_emission.1)
            }),
            transport_emission_ir: fill4(t, p, i, r, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_jr: fill4(t, p, j, r, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_jh: fill4(t, p, j, h, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_jk: fill4(t, p, j, k, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_rh: fill4(t, p, r, h, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_rk: fill4(t, p, r, k, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
            transport_emission_rr: fill3(t, p, rr, &mut || {
                source.scalar(ranges.transport_emission.0, ranges.transport_emission.1)
            }),
        }
    }

    /// Check that every table covers the full index space the generators
    /// will query. A short or ragged table is a configuration error; it is
    /// rejected here, before any variable or constraint exists.
    pub fn validate(&self, sets: &Sets) -> Result<(), ConfigError> {
        let (t, p) = (sets.T.len(), sets.P.len());
        let (i, j, r) = (sets.I.len(), sets.J.len(), sets.R.len());
        let (h, k, u) = (sets.H.len(), sets.K.len(), sets.U.len());
        let rr = sets.RR.len();

        check3("hospital_demand", &self.hospital_demand, (t, p, h))?;
        check3("clinic_demand", &self.clinic_demand, (t, p, k))?;
        check3("production_capacity", &self.production_capacity, (t, p, r))?;
        check2("regional_storage", &self.regional_storage, (p, r))?;
        check2("hospital_storage", &self.hospital_storage, (p, h))?;
        check2("clinic_storage", &self.clinic_storage, (p, k))?;
        check3("mobile_throughput", &self.mobile_throughput, (t, p, i))?;
        check3("local_throughput", &self.local_throughput, (t, p, j))?;
        check4("hospital_price", &self.hospital_price, (t, p, r, h))?;
        check4("clinic_price", &self.clinic_price, (t, p, r, k))?;
        check3("production_cost", &self.production_cost, (t, p, r))?;
        check4(
            "mobile_acquisition_cost",
            &self.mobile_acquisition_cost,
            (t, p, i, r),
        )?;
        check4(
            "local_acquisition_cost",
            &self.local_acquisition_cost,
            (t, p, j, r),
        )?;
        check3(
            "regional_holding_cost",
            &self.regional_holding_cost,
            (t, p, r),
        )?;
        check3(
            "hospital_holding_cost",
            &self.hospital_holding_cost,
            (t, p, h),
        )?;
        check3("clinic_holding_cost", &self.clinic_holding_cost, (t, p, k))?;
        check3(
            "regional_discard_cost",
            &self.regional_discard_cost,
            (t, p, r),
        )?;
        check3(
            "hospital_discard_cost",
            &self.hospital_discard_cost,
            (t, p, h),
        )?;
        check3("clinic_discard_cost", &self.clinic_discard_cost, (t, p, k))?;

        check4("transport_cost_ir", &self.transport_cost_ir, (t, p, i, r))?;
        check4("transport_cost_jr", &self.transport_cost_jr, (t, p, j, r))?;
        check4("transport_cost_jh", &self.transport_cost_jh, (t, p, j, h))?;
        check4("transport_cost_jk", &self.transport_cost_jk, (t, p, j, k))?;
        check4("transport_cost_rh", &self.transport_cost_rh, (t, p, r, h))?;
        check4("transport_cost_rk", &self.transport_cost_rk, (t, p, r, k))?;
        check3("transport_cost_rr", &self.transport_cost_rr, (t, p, rr))?;
        check4("transport_cost_ru", &self.transport_cost_ru, (t, p, r, u))?;
        check4("transport_cost_hu", &self.transport_cost_hu, (t, p, h, u))?;
        check4("transport_cost_ku", &self.transport_cost_ku, (t, p, k, u))?;

        check2("distance_ir", &self.distance_ir, (i, r))?;
        check2("distance_jr", &self.distance_jr, (j, r))?;
        check2("distance_jh", &self.distance_jh, (j, h))?;
        check2("distance_jk", &self.distance_jk, (j, k))?;
        check2("distance_rh", &self.distance_rh, (r, h))?;
        check2("distance_rk", &self.distance_rk, (r, k))?;
        check1("distance_rr", &self.distance_rr, rr)?;
        check2("distance_ru", &self.distance_ru, (r, u))?;
        check2("distance_hu", &self.distance_hu, (h, u))?;
        check2("distance_ku", &self.distance_ku, (k, u))?;

        check3("production_emission", &self.production_emission, (t, p, r))?;
        check3(
            "regional_storage_emission",
            &self.regional_storage_emission,
            (t, p, r),
        )?;
        check3(
            "hospital_storage_emission",
            &self.hospital_storage_emission,
            (t, p, h),
        )?;
        check3(
            "clinic_storage_emission",
            &self.clinic_storage_emission,
            (t, p, k),
        )?;
        check4(
            "transport_emission_ir",
            &self.transport_emission_ir,
            (t, p, i, r),
        )?;
        check4(
            "transport_emission_jr",
            &self.transport_emission_jr,
            (t, p, j, r),
        )?;
        check4(
            "transport_emission_jh",
            &self.transport_emission_jh,
            (t, p, j, h),
        )?;
        check4(
            "transport_emission_jk",
            &self.transport_emission_jk,
            (t, p, j, k),
        )?;
        check4(
            "transport_emission_rh",
            &self.transport_emission_rh,
            (t, p, r, h),
        )?;
        check4(
            "transport_emission_rk",
            &self.transport_emission_rk,
            (t, p, r, k),
        )?;
        check3(
            "transport_emission_rr",
            &self.transport_emission_rr,
            (t, p, rr),
        )?;

        Ok(())
    }
}

fn shape(
    family: &'static str,
    depth: usize,
    expected: usize,
    actual: usize,
) -> Result<(), ConfigError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ConfigError::MissingParameter {
            family,
            depth,
            expected,
            actual,
        })
    }
}

fn check1(family: &'static str, table: &[f64], n: usize) -> Result<(), ConfigError> {
    shape(family, 0, n, table.len())
}

fn check2(family: &'static str, table: &[Vec<f64>], dims: (usize, usize)) -> Result<(), ConfigError> {
    shape(family, 0, dims.0, table.len())?;
    for row in table {
        shape(family, 1, dims.1, row.len())?;
    }
    Ok(())
}

fn check3(
    family: &'static str,
    table: &[Vec<Vec<f64>>],
    dims: (usize, usize, usize),
) -> Result<(), ConfigError> {
    shape(family, 0, dims.0, table.len())?;
    for plane in table {
        shape(family, 1, dims.1, plane.len())?;
        for row in plane {
            shape(family, 2, dims.2, row.len())?;
        }
    }
    Ok(())
}

fn check4(
    family: &'static str,
    table: &[Vec<Vec<Vec<f64>>>],
    dims: (usize, usize, usize, usize),
) -> Result<(), ConfigError> {
    shape(family, 0, dims.0, table.len())?;
    for cube in table {
        shape(family, 1, dims.1, cube.len())?;
        for plane in cube {
            shape(family, 2, dims.2, plane.len())?;
            for row in plane {
                shape(family, 3, dims.3, row.len())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Midpoint;

    fn small_instance() -> Instance {
        Instance::new(
            vec!["BM1".into()],
            vec!["LBDC1".into()],
            vec!["RBB1".into(), "RBB2".into()],
            vec!["H1".into()],
            vec!["C1".into()],
            vec!["W1".into()],
            vec!["O".into()],
            3,
        )
        .unwrap()
    }

    #[test]
    fn transfer_pairs_exclude_self() {
        let sets = Sets::new(&Instance::east_kalimantan());
        assert_eq!(sets.RR.len(), 2);
        assert!(sets.RR.iter().all(|(from, to)| from != to));
        assert_eq!(sets.transfer_pair(0, 1), 0);
        assert_eq!(sets.transfer_pair(1, 0), 1);
    }

    #[test]
    #[should_panic]
    fn self_transfer_lookup_panics() {
        let sets = Sets::new(&Instance::east_kalimantan());
        sets.transfer_pair(1, 1);
    }

    #[test]
    fn generated_parameters_cover_index_space() {
        let sets = Sets::new(&small_instance());
        let params = Parameters::new(&sets, &ParameterRanges::default(), &mut Midpoint);
        assert!(params.validate(&sets).is_ok());
    }

    #[test]
    fn central_values_match_case_study() {
        let sets = Sets::new(&small_instance());
        let params = Parameters::new(&sets, &ParameterRanges::default(), &mut Midpoint);
        // (300 + 450) / 2
        assert_eq!(params.production_capacity[0][0][0], 375.0);
        // (288_000 + 292_000) / 2
        assert_eq!(params.hospital_price[2][0][1][0], 290_000.0);
        // cross-transfer distance is fixed
        assert_eq!(params.distance_rr[0], 18.0);
        // (0.017 + 0.068) / 2
        assert_eq!(params.production_emission[1][0][1], 0.0425);
    }

    #[test]
    fn truncated_table_is_rejected() {
        let sets = Sets::new(&small_instance());
        let mut params = Parameters::new(&sets, &ParameterRanges::default(), &mut Midpoint);
        params.hospital_demand[1][0].clear();
        assert!(matches!(
            params.validate(&sets),
            Err(ConfigError::MissingParameter {
                family: "hospital_demand",
                depth: 2,
                ..
            })
        ));
    }
}
