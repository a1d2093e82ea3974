use std::fmt;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::sets_and_parameters::{Parameters, Sets};

/// The assigned value of every decision variable after a solve. Shapes
/// mirror the variable registry exactly, so anything that can be looked up
/// on a `Variables` handle can be looked up here by the same indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedVariables {
    pub flow_ir: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_jr: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_jh: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_jk: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_rh: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_rk: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_rr: Vec<Vec<Vec<f64>>>,
    pub flow_ru: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_hu: Vec<Vec<Vec<Vec<f64>>>>,
    pub flow_ku: Vec<Vec<Vec<Vec<f64>>>>,
    pub production: Vec<Vec<Vec<f64>>>,
    pub regional_stock: Vec<Vec<Vec<f64>>>,
    pub hospital_stock: Vec<Vec<Vec<f64>>>,
    pub clinic_stock: Vec<Vec<Vec<f64>>>,
    pub regional_discard: Vec<Vec<Vec<f64>>>,
    pub hospital_discard: Vec<Vec<Vec<f64>>>,
    pub clinic_discard: Vec<Vec<Vec<f64>>>,
    pub mobile_active: Vec<Vec<f64>>,
    pub local_active: Vec<Vec<f64>>,
    pub regional_active: Vec<Vec<f64>>,
}

fn zeros2(a: usize, b: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; b]; a]
}

fn zeros3(a: usize, b: usize, c: usize) -> Vec<Vec<Vec<f64>>> {
    vec![vec![vec![0.0; c]; b]; a]
}

fn zeros4(a: usize, b: usize, c: usize, d: usize) -> Vec<Vec<Vec<Vec<f64>>>> {
    vec![vec![vec![vec![0.0; d]; c]; b]; a]
}

impl SolvedVariables {
    /// The all-zero assignment over the given index space.
    pub fn zeros(sets: &Sets) -> SolvedVariables {
        let (t, p) = (sets.T.len(), sets.P.len());
        let (i, j, r) = (sets.I.len(), sets.J.len(), sets.R.len());
        let (h, k, u) = (sets.H.len(), sets.K.len(), sets.U.len());
        let rr = sets.RR.len();

        SolvedVariables {
            flow_ir: zeros4(t, p, i, r),
            flow_jr: zeros4(t, p, j, r),
            flow_jh: zeros4(t, p, j, h),
            flow_jk: zeros4(t, p, j, k),
            flow_rh: zeros4(t, p, r, h),
            flow_rk: zeros4(t, p, r, k),
            flow_rr: zeros3(t, p, rr),
            flow_ru: zeros4(t, p, r, u),
            flow_hu: zeros4(t, p, h, u),
            flow_ku: zeros4(t, p, k, u),
            production: zeros3(t, p, r),
            regional_stock: zeros3(t, p, r),
            hospital_stock: zeros3(t, p, h),
            clinic_stock: zeros3(t, p, k),
            regional_discard: zeros3(t, p, r),
            hospital_discard: zeros3(t, p, h),
            clinic_discard: zeros3(t, p, k),
            mobile_active: zeros2(t, i),
            local_active: zeros2(t, j),
            regional_active: zeros2(t, r),
        }
    }
}

/// The three criteria and their full breakdown, computed from a solved
/// assignment. Every figure here is re-derived from the assignment itself,
/// never read back from the solver's objective value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub revenue: f64,
    /// TC1: fixed activation costs
    pub fixed_cost: f64,
    /// TC2: acquisition cost of collected product
    pub acquisition_cost: f64,
    /// TC3: production cost
    pub production_cost: f64,
    /// TC4: inventory holding cost
    pub holding_cost: f64,
    /// TC5: discard handling cost
    pub discard_cost: f64,
    /// TC6: transport cost over all route families
    pub transport_cost: f64,
    /// TC7: monetary emissions penalty
    pub emission_cost: f64,
    pub profit: f64,
    pub production_emissions: f64,
    pub storage_emissions: f64,
    pub transport_emissions: f64,
    pub emissions: f64,
    /// Split-weighted hospital fulfillment term
    pub hospital_service: f64,
    /// Split-weighted clinic fulfillment term
    pub clinic_service: f64,
    pub service_level: f64,
    /// The scalarized objective value
    pub composite: f64,
}

/// Emissions generated in period `t`, split into (production, storage,
/// transport). Same scope as the environmental cap: waste routes excluded.
pub fn period_emissions(
    sets: &Sets,
    parameters: &Parameters,
    solved: &SolvedVariables,
    t: usize,
) -> (f64, f64, f64) {
    let production: f64 = iproduct!(&sets.P, &sets.R)
        .map(|(&p, &r)| parameters.production_emission[t][p][r] * solved.production[t][p][r])
        .sum();

    let storage: f64 = iproduct!(&sets.P, &sets.R)
        .map(|(&p, &r)| {
            parameters.regional_storage_emission[t][p][r] * solved.regional_stock[t][p][r]
        })
        .sum::<f64>()
        + iproduct!(&sets.P, &sets.H)
            .map(|(&p, &h)| {
                parameters.hospital_storage_emission[t][p][h] * solved.hospital_stock[t][p][h]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, &sets.K)
            .map(|(&p, &k)| {
                parameters.clinic_storage_emission[t][p][k] * solved.clinic_stock[t][p][k]
            })
            .sum::<f64>();

    let transport: f64 = iproduct!(&sets.P, &sets.I, &sets.R)
        .map(|(&p, &i, &r)| {
            parameters.transport_emission_ir[t][p][i][r]
                * parameters.distance_ir[i][r]
                * solved.flow_ir[t][p][i][r]
        })
        .sum::<f64>()
        + iproduct!(&sets.P, &sets.J, &sets.R)
            .map(|(&p, &j, &r)| {
                parameters.transport_emission_jr[t][p][j][r]
                    * parameters.distance_jr[j][r]
                    * solved.flow_jr[t][p][j][r]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, &sets.J, &sets.H)
            .map(|(&p, &j, &h)| {
                parameters.transport_emission_jh[t][p][j][h]
                    * parameters.distance_jh[j][h]
                    * solved.flow_jh[t][p][j][h]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, &sets.J, &sets.K)
            .map(|(&p, &j, &k)| {
                parameters.transport_emission_jk[t][p][j][k]
                    * parameters.distance_jk[j][k]
                    * solved.flow_jk[t][p][j][k]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, &sets.R, &sets.H)
            .map(|(&p, &r, &h)| {
                parameters.transport_emission_rh[t][p][r][h]
                    * parameters.distance_rh[r][h]
                    * solved.flow_rh[t][p][r][h]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, &sets.R, &sets.K)
            .map(|(&p, &r, &k)| {
                parameters.transport_emission_rk[t][p][r][k]
                    * parameters.distance_rk[r][k]
                    * solved.flow_rk[t][p][r][k]
            })
            .sum::<f64>()
        + iproduct!(&sets.P, 0..sets.RR.len())
            .map(|(&p, a)| {
                parameters.transport_emission_rr[t][p][a]
                    * parameters.distance_rr[a]
                    * solved.flow_rr[t][p][a]
            })
            .sum::<f64>();

    (production, storage, transport)
}

impl Criteria {
    /// Evaluate every criterion from a solved assignment. A pure function of
    /// its inputs: the same assignment always yields the same breakdown.
    pub fn evaluate(
        sets: &Sets,
        parameters: &Parameters,
        config: &Config,
        solved: &SolvedVariables,
    ) -> Criteria {
        let revenue: f64 = iproduct!(&sets.T, &sets.P, &sets.R, &sets.H)
            .map(|(&t, &p, &r, &h)| {
                parameters.hospital_price[t][p][r][h] * solved.flow_rh[t][p][r][h]
            })
            .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.R, &sets.K)
                .map(|(&t, &p, &r, &k)| {
                    parameters.clinic_price[t][p][r][k] * solved.flow_rk[t][p][r][k]
                })
                .sum::<f64>();

        let fixed_cost: f64 = iproduct!(&sets.T, &sets.I)
            .map(|(&t, &i)| config.mobile_fixed_cost * solved.mobile_active[t][i])
            .sum::<f64>()
            + iproduct!(&sets.T, &sets.J)
                .map(|(&t, &j)| config.local_fixed_cost * solved.local_active[t][j])
                .sum::<f64>();

        let acquisition_cost: f64 = iproduct!(&sets.T, &sets.P, &sets.I, &sets.R)
            .map(|(&t, &p, &i, &r)| {
                parameters.mobile_acquisition_cost[t][p][i][r] * solved.flow_ir[t][p][i][r]
            })
            .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.J, &sets.R)
                .map(|(&t, &p, &j, &r)| {
                    parameters.local_acquisition_cost[t][p][j][r] * solved.flow_jr[t][p][j][r]
                })
                .sum::<f64>();

        let production_cost: f64 = iproduct!(&sets.T, &sets.P, &sets.R)
            .map(|(&t, &p, &r)| parameters.production_cost[t][p][r] * solved.production[t][p][r])
            .sum();

        let holding_cost: f64 = iproduct!(&sets.T, &sets.P, &sets.R)
            .map(|(&t, &p, &r)| {
                parameters.regional_holding_cost[t][p][r] * solved.regional_stock[t][p][r]
            })
            .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.H)
                .map(|(&t, &p, &h)| {
                    parameters.hospital_holding_cost[t][p][h] * solved.hospital_stock[t][p][h]
                })
                .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.K)
                .map(|(&t, &p, &k)| {
                    parameters.clinic_holding_cost[t][p][k] * solved.clinic_stock[t][p][k]
                })
                .sum::<f64>();

        let discard_cost: f64 = iproduct!(&sets.T, &sets.P, &sets.R)
            .map(|(&t, &p, &r)| {
                parameters.regional_discard_cost[t][p][r] * solved.regional_discard[t][p][r]
            })
            .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.H)
                .map(|(&t, &p, &h)| {
                    parameters.hospital_discard_cost[t][p][h] * solved.hospital_discard[t][p][h]
                })
                .sum::<f64>()
            + iproduct!(&sets.T, &sets.P, &sets.K)
                .map(|(&t, &p, &k)| {
                    parameters.clinic_discard_cost[t][p][k] * solved.clinic_discard[t][p][k]
                })
                .sum::<f64>();

        let transport_cost = transport_cost(sets, parameters, solved);

        let (production_emissions, storage_emissions, transport_emissions) = sets
            .T
            .iter()
            .map(|&t| period_emissions(sets, parameters, solved, t))
            .fold((0.0, 0.0, 0.0), |acc, step| {
                (acc.0 + step.0, acc.1 + step.1, acc.2 + step.2)
            });
        let emissions = production_emissions + storage_emissions + transport_emissions;
        let emission_cost = config.emission_price * emissions;

        let profit = revenue
            - (fixed_cost
                + acquisition_cost
                + production_cost
                + holding_cost
                + discard_cost
                + transport_cost
                + emission_cost);

        let rho = config.service_split;
        let hospital_demand: f64 = iproduct!(&sets.T, &sets.P, &sets.H)
            .map(|(&t, &p, &h)| parameters.hospital_demand[t][p][h])
            .sum();
        let hospital_service = if hospital_demand > 0.0 {
            let supplied: f64 = iproduct!(&sets.T, &sets.P, &sets.H)
                .map(|(&t, &p, &h)| hospital_supply(sets, solved, t, p, h))
                .sum();
            rho * supplied / hospital_demand
        } else {
            rho
        };

        let clinic_demand: f64 = iproduct!(&sets.T, &sets.P, &sets.K)
            .map(|(&t, &p, &k)| parameters.clinic_demand[t][p][k])
            .sum();
        let clinic_service = if clinic_demand > 0.0 {
            let supplied: f64 = iproduct!(&sets.T, &sets.P, &sets.K)
                .map(|(&t, &p, &k)| clinic_supply(sets, solved, t, p, k))
                .sum();
            (1.0 - rho) * supplied / clinic_demand
        } else {
            1.0 - rho
        };

        let service_level = hospital_service + clinic_service;

        let composite = config.profit_weight * (profit / config.profit_reference)
            + config.service_weight * (service_level / config.service_reference)
            - config.emission_weight * (emissions / config.emission_reference);

        Criteria {
            revenue,
            fixed_cost,
            acquisition_cost,
            production_cost,
            holding_cost,
            discard_cost,
            transport_cost,
            emission_cost,
            profit,
            production_emissions,
            storage_emissions,
            transport_emissions,
            emissions,
            hospital_service,
            clinic_service,
            service_level,
            composite,
        }
    }
}

fn transport_cost(sets: &Sets, parameters: &Parameters, solved: &SolvedVariables) -> f64 {
    iproduct!(&sets.T, &sets.P, &sets.I, &sets.R)
        .map(|(&t, &p, &i, &r)| {
            parameters.transport_cost_ir[t][p][i][r]
                * parameters.distance_ir[i][r]
                * solved.flow_ir[t][p][i][r]
        })
        .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.J, &sets.R)
            .map(|(&t, &p, &j, &r)| {
                parameters.transport_cost_jr[t][p][j][r]
                    * parameters.distance_jr[j][r]
                    * solved.flow_jr[t][p][j][r]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.J, &sets.H)
            .map(|(&t, &p, &j, &h)| {
                parameters.transport_cost_jh[t][p][j][h]
                    * parameters.distance_jh[j][h]
                    * solved.flow_jh[t][p][j][h]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.J, &sets.K)
            .map(|(&t, &p, &j, &k)| {
                parameters.transport_cost_jk[t][p][j][k]
                    * parameters.distance_jk[j][k]
                    * solved.flow_jk[t][p][j][k]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.R, &sets.H)
            .map(|(&t, &p, &r, &h)| {
                parameters.transport_cost_rh[t][p][r][h]
                    * parameters.distance_rh[r][h]
                    * solved.flow_rh[t][p][r][h]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.R, &sets.K)
            .map(|(&t, &p, &r, &k)| {
                parameters.transport_cost_rk[t][p][r][k]
                    * parameters.distance_rk[r][k]
                    * solved.flow_rk[t][p][r][k]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, 0..sets.RR.len())
            .map(|(&t, &p, a)| {
                parameters.transport_cost_rr[t][p][a]
                    * parameters.distance_rr[a]
                    * solved.flow_rr[t][p][a]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.R, &sets.U)
            .map(|(&t, &p, &r, &u)| {
                parameters.transport_cost_ru[t][p][r][u]
                    * parameters.distance_ru[r][u]
                    * solved.flow_ru[t][p][r][u]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.H, &sets.U)
            .map(|(&t, &p, &h, &u)| {
                parameters.transport_cost_hu[t][p][h][u]
                    * parameters.distance_hu[h][u]
                    * solved.flow_hu[t][p][h][u]
            })
            .sum::<f64>()
        + iproduct!(&sets.T, &sets.P, &sets.K, &sets.U)
            .map(|(&t, &p, &k, &u)| {
                parameters.transport_cost_ku[t][p][k][u]
                    * parameters.distance_ku[k][u]
                    * solved.flow_ku[t][p][k][u]
            })
            .sum::<f64>()
}

fn hospital_supply(sets: &Sets, solved: &SolvedVariables, t: usize, p: usize, h: usize) -> f64 {
    sets.J
        .iter()
        .map(|&j| solved.flow_jh[t][p][j][h])
        .sum::<f64>()
        + sets
            .R
            .iter()
            .map(|&r| solved.flow_rh[t][p][r][h])
            .sum::<f64>()
}

fn clinic_supply(sets: &Sets, solved: &SolvedVariables, t: usize, p: usize, k: usize) -> f64 {
    sets.J
        .iter()
        .map(|&j| solved.flow_jk[t][p][j][k])
        .sum::<f64>()
        + sets
            .R
            .iter()
            .map(|&r| solved.flow_rk[t][p][r][k])
            .sum::<f64>()
}

/// A model invariant violated by an assignment. Any entry in the list
/// returned by `audit` indicates either numerical trouble in the solver or
/// a bug in constraint generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Balance {
        class: &'static str,
        t: usize,
        p: usize,
        node: usize,
        residual: f64,
    },
    Negative {
        role: &'static str,
        value: f64,
    },
    ShelfLife {
        class: &'static str,
        t: usize,
        p: usize,
        node: usize,
        discarded: f64,
        aged_stock: f64,
    },
    EmissionCap {
        t: usize,
        emitted: f64,
        cap: f64,
    },
    Activation {
        class: &'static str,
        node: usize,
    },
    ServiceBound {
        class: &'static str,
        t: usize,
        p: usize,
        node: usize,
        supplied: f64,
        limit: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Balance {
                class,
                t,
                p,
                node,
                residual,
            } => write!(
                f,
                "mass balance violated at {} {} in (t={}, p={}): residual {}",
                class, node, t, p, residual
            ),
            Violation::Negative { role, value } => {
                write!(f, "negative value {} in role {}", value, role)
            }
            Violation::ShelfLife {
                class,
                t,
                p,
                node,
                discarded,
                aged_stock,
            } => write!(
                f,
                "discard {} exceeds aged stock {} at {} {} in (t={}, p={})",
                discarded, aged_stock, class, node, t, p
            ),
            Violation::EmissionCap { t, emitted, cap } => {
                write!(f, "emissions {} exceed cap {} in period {}", emitted, cap, t)
            }
            Violation::Activation { class, node } => {
                write!(f, "{} {} never activated over the horizon", class, node)
            }
            Violation::ServiceBound {
                class,
                t,
                p,
                node,
                supplied,
                limit,
            } => write!(
                f,
                "supply {} exceeds bound {} at {} {} in (t={}, p={})",
                supplied, limit, class, node, t, p
            ),
        }
    }
}

/// Re-check every model invariant against an assignment, up to `tolerance`.
/// Returns every violation found.
pub fn audit(
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    solved: &SolvedVariables,
    tolerance: f64,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_non_negative(solved, tolerance, &mut violations);
    check_balance(sets, parameters, solved, tolerance, &mut violations);
    check_shelf_life(sets, config.shelf_life, solved, tolerance, &mut violations);
    check_emission_cap(sets, parameters, config, solved, tolerance, &mut violations);
    check_activation(sets, solved, tolerance, &mut violations);
    check_service_bound(sets, parameters, config, solved, tolerance, &mut violations);

    violations
}

fn check_non_negative(solved: &SolvedVariables, tolerance: f64, violations: &mut Vec<Violation>) {
    let flows: [(&'static str, &Vec<Vec<Vec<Vec<f64>>>>); 9] = [
        ("flow_ir", &solved.flow_ir),
        ("flow_jr", &solved.flow_jr),
        ("flow_jh", &solved.flow_jh),
        ("flow_jk", &solved.flow_jk),
        ("flow_rh", &solved.flow_rh),
        ("flow_rk", &solved.flow_rk),
        ("flow_ru", &solved.flow_ru),
        ("flow_hu", &solved.flow_hu),
        ("flow_ku", &solved.flow_ku),
    ];
    for (role, block) in flows {
        for &value in block.iter().flatten().flatten().flatten() {
            if value < -tolerance {
                violations.push(Violation::Negative { role, value });
            }
        }
    }

    let quantities: [(&'static str, &Vec<Vec<Vec<f64>>>); 8] = [
        ("flow_rr", &solved.flow_rr),
        ("production", &solved.production),
        ("regional_stock", &solved.regional_stock),
        ("hospital_stock", &solved.hospital_stock),
        ("clinic_stock", &solved.clinic_stock),
        ("regional_discard", &solved.regional_discard),
        ("hospital_discard", &solved.hospital_discard),
        ("clinic_discard", &solved.clinic_discard),
    ];
    for (role, block) in quantities {
        for &value in block.iter().flatten().flatten() {
            if value < -tolerance {
                violations.push(Violation::Negative { role, value });
            }
        }
    }
}

fn check_balance(
    sets: &Sets,
    parameters: &Parameters,
    solved: &SolvedVariables,
    tolerance: f64,
    violations: &mut Vec<Violation>,
) {
    for (&t, &p, &r) in iproduct!(&sets.T, &sets.P, &sets.R) {
        let carried = if t == 0 {
            0.0
        } else {
            solved.regional_stock[t - 1][p][r]
        };
        let transfers_in: f64 = sets
            .RR
            .iter()
            .enumerate()
            .filter(|(_, &(_, to))| to == r)
            .map(|(a, _)| solved.flow_rr[t][p][a])
            .sum();
        let transfers_out: f64 = sets
            .RR
            .iter()
            .enumerate()
            .filter(|(_, &(from, _))| from == r)
            .map(|(a, _)| solved.flow_rr[t][p][a])
            .sum();
        let inbound: f64 = solved.production[t][p][r]
            + sets
                .I
                .iter()
                .map(|&i| solved.flow_ir[t][p][i][r])
                .sum::<f64>()
            + sets
                .J
                .iter()
                .map(|&j| solved.flow_jr[t][p][j][r])
                .sum::<f64>()
            + transfers_in;
        let outbound: f64 = sets
            .H
            .iter()
            .map(|&h| solved.flow_rh[t][p][r][h])
            .sum::<f64>()
            + sets
                .K
                .iter()
                .map(|&k| solved.flow_rk[t][p][r][k])
                .sum::<f64>()
            + transfers_out
            + sets
                .U
                .iter()
                .map(|&u| solved.flow_ru[t][p][r][u])
                .sum::<f64>()
            + solved.regional_discard[t][p][r];

        let residual = carried + inbound - solved.regional_stock[t][p][r] - outbound;
        if residual.abs() > tolerance {
            violations.push(Violation::Balance {
                class: "regional bank",
                t,
                p,
                node: r,
                residual,
            });
        }
    }

    for (&t, &p, &h) in iproduct!(&sets.T, &sets.P, &sets.H) {
        let carried = if t == 0 {
            0.0
        } else {
            solved.hospital_stock[t - 1][p][h]
        };
        let inbound = hospital_supply(sets, solved, t, p, h);
        let outbound: f64 = parameters.hospital_demand[t][p][h]
            + sets
                .U
                .iter()
                .map(|&u| solved.flow_hu[t][p][h][u])
                .sum::<f64>()
            + solved.hospital_discard[t][p][h];

        let residual = carried + inbound - solved.hospital_stock[t][p][h] - outbound;
        if residual.abs() > tolerance {
            violations.push(Violation::Balance {
                class: "hospital",
                t,
                p,
                node: h,
                residual,
            });
        }
    }

    for (&t, &p, &k) in iproduct!(&sets.T, &sets.P, &sets.K) {
        let carried = if t == 0 {
            0.0
        } else {
            solved.clinic_stock[t - 1][p][k]
        };
        let inbound = clinic_supply(sets, solved, t, p, k);
        let outbound: f64 = parameters.clinic_demand[t][p][k]
            + sets
                .U
                .iter()
                .map(|&u| solved.flow_ku[t][p][k][u])
                .sum::<f64>()
            + solved.clinic_discard[t][p][k];

        let residual = carried + inbound - solved.clinic_stock[t][p][k] - outbound;
        if residual.abs() > tolerance {
            violations.push(Violation::Balance {
                class: "clinic",
                t,
                p,
                node: k,
                residual,
            });
        }
    }
}

fn check_shelf_life(
    sets: &Sets,
    alpha: usize,
    solved: &SolvedVariables,
    tolerance: f64,
    violations: &mut Vec<Violation>,
) {
    for (&t, &p) in iproduct!(&sets.T, &sets.P) {
        if t < alpha {
            continue;
        }

        let classes: [(&'static str, &Vec<Vec<Vec<f64>>>, &Vec<Vec<Vec<f64>>>, &Vec<usize>); 3] = [
            (
                "regional bank",
                &solved.regional_discard,
                &solved.regional_stock,
                &sets.R,
            ),
            (
                "hospital",
                &solved.hospital_discard,
                &solved.hospital_stock,
                &sets.H,
            ),
            (
                "clinic",
                &solved.clinic_discard,
                &solved.clinic_stock,
                &sets.K,
            ),
        ];

        for (class, discard, stock, nodes) in classes {
            for &node in nodes {
                let discarded = discard[t][p][node];
                let aged_stock = stock[t - alpha][p][node];
                if discarded > aged_stock + tolerance {
                    violations.push(Violation::ShelfLife {
                        class,
                        t,
                        p,
                        node,
                        discarded,
                        aged_stock,
                    });
                }
            }
        }
    }
}

fn check_emission_cap(
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    solved: &SolvedVariables,
    tolerance: f64,
    violations: &mut Vec<Violation>,
) {
    for &t in &sets.T {
        let (production, storage, transport) = period_emissions(sets, parameters, solved, t);
        let emitted = production + storage + transport;
        if emitted > config.emission_cap + tolerance {
            violations.push(Violation::EmissionCap {
                t,
                emitted,
                cap: config.emission_cap,
            });
        }
    }
}

fn check_activation(
    sets: &Sets,
    solved: &SolvedVariables,
    tolerance: f64,
    violations: &mut Vec<Violation>,
) {
    let classes: [(&'static str, &Vec<Vec<f64>>, &Vec<usize>); 3] = [
        ("mobile unit", &solved.mobile_active, &sets.I),
        ("local center", &solved.local_active, &sets.J),
        ("regional bank", &solved.regional_active, &sets.R),
    ];

    for (class, block, nodes) in classes {
        for &node in nodes {
            let total: f64 = sets.T.iter().map(|&t| block[t][node]).sum();
            if total < 1.0 - tolerance {
                violations.push(Violation::Activation { class, node });
            }
        }
    }
}

fn check_service_bound(
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    solved: &SolvedVariables,
    tolerance: f64,
    violations: &mut Vec<Violation>,
) {
    for (&t, &p) in iproduct!(&sets.T, &sets.P) {
        for &h in &sets.H {
            let supplied = hospital_supply(sets, solved, t, p, h);
            let limit = config.hospital_supply_factor * parameters.hospital_demand[t][p][h];
            if supplied > limit + tolerance {
                violations.push(Violation::ServiceBound {
                    class: "hospital",
                    t,
                    p,
                    node: h,
                    supplied,
                    limit,
                });
            }
        }

        for &k in &sets.K {
            let supplied = clinic_supply(sets, solved, t, p, k);
            let limit = config.clinic_supply_factor * parameters.clinic_demand[t][p][k];
            if supplied > limit + tolerance {
                violations.push(Violation::ServiceBound {
                    class: "clinic",
                    t,
                    p,
                    node: k,
                    supplied,
                    limit,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;
    use crate::params::{Midpoint, ParameterRanges};

    const TOLERANCE: f64 = 1e-6;

    /// One mobile unit, one local center, two regional banks, one hospital,
    /// one clinic, one waste center, one product, three periods.
    fn scenario() -> (Sets, Parameters, Config) {
        let instance = Instance::new(
            vec!["BM1".into()],
            vec!["LBDC1".into()],
            vec!["RBB1".into(), "RBB2".into()],
            vec!["H1".into()],
            vec!["C1".into()],
            vec!["W1".into()],
            vec!["WB".into()],
            3,
        )
        .unwrap();
        let sets = Sets::new(&instance);
        let mut parameters = Parameters::new(&sets, &ParameterRanges::default(), &mut Midpoint);

        // Hospital demands 10 per period, the clinic demands nothing.
        for t in 0..3 {
            parameters.hospital_demand[t][0][0] = 10.0;
            parameters.clinic_demand[t][0][0] = 0.0;
        }

        let mut config = Config::east_kalimantan();
        config.shelf_life = 2;

        (sets, parameters, config)
    }

    /// Bank 0 produces exactly the hospital demand each period and ships it
    /// out in full. Bank 1 stays idle. Every facility is activated once.
    fn fulfilled(sets: &Sets) -> SolvedVariables {
        let mut solved = SolvedVariables::zeros(sets);
        for t in 0..3 {
            solved.production[t][0][0] = 10.0;
            solved.flow_rh[t][0][0][0] = 10.0;
        }
        solved.mobile_active[0][0] = 1.0;
        solved.local_active[0][0] = 1.0;
        solved.regional_active[0][0] = 1.0;
        solved.regional_active[0][1] = 1.0;
        solved
    }

    #[test]
    fn fulfilled_assignment_passes_audit() {
        let (sets, parameters, config) = scenario();
        let solved = fulfilled(&sets);
        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn full_fulfillment_yields_split_service_terms() {
        let (sets, parameters, config) = scenario();
        let solved = fulfilled(&sets);
        let criteria = Criteria::evaluate(&sets, &parameters, &config, &solved);

        // 30 of 30 hospital units supplied
        assert_eq!(criteria.hospital_service, config.service_split);
        // zero clinic demand contributes the split weight as-is
        assert_eq!(criteria.clinic_service, 1.0 - config.service_split);
        assert_eq!(criteria.service_level, 1.0);
        assert!(criteria.service_level.is_finite());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let (sets, parameters, config) = scenario();
        let solved = fulfilled(&sets);
        let first = Criteria::evaluate(&sets, &parameters, &config, &solved);
        let second = Criteria::evaluate(&sets, &parameters, &config, &solved);
        assert_eq!(first, second);
    }

    #[test]
    fn criteria_breakdown_is_consistent() {
        let (sets, parameters, config) = scenario();
        let solved = fulfilled(&sets);
        let criteria = Criteria::evaluate(&sets, &parameters, &config, &solved);

        let costs = criteria.fixed_cost
            + criteria.acquisition_cost
            + criteria.production_cost
            + criteria.holding_cost
            + criteria.discard_cost
            + criteria.transport_cost
            + criteria.emission_cost;
        assert!((criteria.profit - (criteria.revenue - costs)).abs() < TOLERANCE);

        let emissions = criteria.production_emissions
            + criteria.storage_emissions
            + criteria.transport_emissions;
        assert!((criteria.emissions - emissions).abs() < TOLERANCE);
        assert!(criteria.revenue > 0.0);
    }

    #[test]
    fn audit_detects_broken_balance() {
        let (sets, parameters, config) = scenario();
        let mut solved = fulfilled(&sets);
        solved.production[1][0][0] = 7.0;

        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::Balance { class: "regional bank", t: 1, .. })));
    }

    #[test]
    fn audit_detects_premature_discard() {
        let (sets, parameters, config) = scenario();
        let mut solved = fulfilled(&sets);
        // Period 2 discard with no stock held in period 0 to age out.
        solved.production[2][0][0] = 13.0;
        solved.regional_discard[2][0][0] = 3.0;

        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::ShelfLife { t: 2, .. })));
    }

    #[test]
    fn audit_detects_missing_activation() {
        let (sets, parameters, config) = scenario();
        let mut solved = fulfilled(&sets);
        solved.regional_active[0][1] = 0.0;

        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::Activation { class: "regional bank", node: 1 })));
    }

    #[test]
    fn audit_detects_over_supply() {
        let (sets, parameters, config) = scenario();
        let mut solved = fulfilled(&sets);
        // 12 > 1.1 x 10; park the excess in hospital stock to keep balance.
        solved.production[0][0][0] = 12.0;
        solved.flow_rh[0][0][0][0] = 12.0;
        solved.hospital_stock[0][0][0] = 2.0;
        solved.hospital_stock[1][0][0] = 2.0;
        solved.hospital_stock[2][0][0] = 2.0;

        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::ServiceBound { class: "hospital", t: 0, .. })));
    }

    #[test]
    fn audit_detects_negative_flow() {
        let (sets, parameters, config) = scenario();
        let mut solved = fulfilled(&sets);
        solved.flow_ku[0][0][0][0] = -1.0;

        let violations = audit(&sets, &parameters, &config, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::Negative { role: "flow_ku", .. })));
    }

    #[test]
    fn audit_detects_breached_emission_cap() {
        let (sets, parameters, config) = scenario();
        let mut tight = config;
        tight.emission_cap = 0.1;
        let solved = fulfilled(&sets);

        let violations = audit(&sets, &parameters, &tight, &solved, TOLERANCE);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::EmissionCap { .. })));
    }
}
