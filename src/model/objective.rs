use grb::expr::Expr;
use grb::prelude::*;
use itertools::iproduct;

use crate::config::{Config, ConfigError};
use crate::model::sets_and_parameters::{Parameters, Sets};
use crate::model::variables::Variables;

/// Revenue from deliveries to hospitals and clinics.
pub fn revenue(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    let hospitals = iproduct!(&sets.T, &sets.P, &sets.R, &sets.H)
        .map(|(&t, &p, &r, &h)| parameters.hospital_price[t][p][r][h] * vars.flow_rh[t][p][r][h])
        .grb_sum();
    let clinics = iproduct!(&sets.T, &sets.P, &sets.R, &sets.K)
        .map(|(&t, &p, &r, &k)| parameters.clinic_price[t][p][r][k] * vars.flow_rk[t][p][r][k])
        .grb_sum();

    hospitals + clinics
}

/// Fixed activation costs of mobile units and local centers.
pub fn fixed_cost(sets: &Sets, config: &Config, vars: &Variables) -> Expr {
    let mobile = iproduct!(&sets.T, &sets.I)
        .map(|(&t, &i)| config.mobile_fixed_cost * vars.mobile_active[t][i])
        .grb_sum();
    let local = iproduct!(&sets.T, &sets.J)
        .map(|(&t, &j)| config.local_fixed_cost * vars.local_active[t][j])
        .grb_sum();

    mobile + local
}

/// Acquisition cost of product entering regional banks from collection.
pub fn acquisition_cost(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    let mobile = iproduct!(&sets.T, &sets.P, &sets.I, &sets.R)
        .map(|(&t, &p, &i, &r)| {
            parameters.mobile_acquisition_cost[t][p][i][r] * vars.flow_ir[t][p][i][r]
        })
        .grb_sum();
    let local = iproduct!(&sets.T, &sets.P, &sets.J, &sets.R)
        .map(|(&t, &p, &j, &r)| {
            parameters.local_acquisition_cost[t][p][j][r] * vars.flow_jr[t][p][j][r]
        })
        .grb_sum();

    mobile + local
}

/// Production cost at regional banks.
pub fn production_cost(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    iproduct!(&sets.T, &sets.P, &sets.R)
        .map(|(&t, &p, &r)| parameters.production_cost[t][p][r] * vars.production[t][p][r])
        .grb_sum()
}

/// Inventory holding cost over the three stock-holding node classes.
pub fn holding_cost(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    let regional = iproduct!(&sets.T, &sets.P, &sets.R)
        .map(|(&t, &p, &r)| parameters.regional_holding_cost[t][p][r] * vars.regional_stock[t][p][r])
        .grb_sum();
    let hospital = iproduct!(&sets.T, &sets.P, &sets.H)
        .map(|(&t, &p, &h)| parameters.hospital_holding_cost[t][p][h] * vars.hospital_stock[t][p][h])
        .grb_sum();
    let clinic = iproduct!(&sets.T, &sets.P, &sets.K)
        .map(|(&t, &p, &k)| parameters.clinic_holding_cost[t][p][k] * vars.clinic_stock[t][p][k])
        .grb_sum();

    regional + hospital + clinic
}

/// Discard handling cost over the three stock-holding node classes.
pub fn discard_cost(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    let regional = iproduct!(&sets.T, &sets.P, &sets.R)
        .map(|(&t, &p, &r)| {
            parameters.regional_discard_cost[t][p][r] * vars.regional_discard[t][p][r]
        })
        .grb_sum();
    let hospital = iproduct!(&sets.T, &sets.P, &sets.H)
        .map(|(&t, &p, &h)| {
            parameters.hospital_discard_cost[t][p][h] * vars.hospital_discard[t][p][h]
        })
        .grb_sum();
    let clinic = iproduct!(&sets.T, &sets.P, &sets.K)
        .map(|(&t, &p, &k)| parameters.clinic_discard_cost[t][p][k] * vars.clinic_discard[t][p][k])
        .grb_sum();

    regional + hospital + clinic
}

/// Transport cost over every route family, waste routes included:
/// unit cost × flow × distance.
pub fn transport_cost(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    let ir = iproduct!(&sets.T, &sets.P, &sets.I, &sets.R)
        .map(|(&t, &p, &i, &r)| {
            parameters.transport_cost_ir[t][p][i][r]
                * parameters.distance_ir[i][r]
                * vars.flow_ir[t][p][i][r]
        })
        .grb_sum();
    let jr = iproduct!(&sets.T, &sets.P, &sets.J, &sets.R)
        .map(|(&t, &p, &j, &r)| {
            parameters.transport_cost_jr[t][p][j][r]
                * parameters.distance_jr[j][r]
                * vars.flow_jr[t][p][j][r]
        })
        .grb_sum();
    let jh = iproduct!(&sets.T, &sets.P, &sets.J, &sets.H)
        .map(|(&t, &p, &j, &h)| {
            parameters.transport_cost_jh[t][p][j][h]
                * parameters.distance_jh[j][h]
                * vars.flow_jh[t][p][j][h]
        })
        .grb_sum();
    let jk = iproduct!(&sets.T, &sets.P, &sets.J, &sets.K)
        .map(|(&t, &p, &j, &k)| {
            parameters.transport_cost_jk[t][p][j][k]
                * parameters.distance_jk[j][k]
                * vars.flow_jk[t][p][j][k]
        })
        .grb_sum();
    let rh = iproduct!(&sets.T, &sets.P, &sets.R, &sets.H)
        .map(|(&t, &p, &r, &h)| {
            parameters.transport_cost_rh[t][p][r][h]
                * parameters.distance_rh[r][h]
                * vars.flow_rh[t][p][r][h]
        })
        .grb_sum();
    let rk = iproduct!(&sets.T, &sets.P, &sets.R, &sets.K)
        .map(|(&t, &p, &r, &k)| {
            parameters.transport_cost_rk[t][p][r][k]
                * parameters.distance_rk[r][k]
                * vars.flow_rk[t][p][r][k]
        })
        .grb_sum();
    let rr = iproduct!(&sets.T, &sets.P, 0..sets.RR.len())
        .map(|(&t, &p, a)| {
            parameters.transport_cost_rr[t][p][a]
                * parameters.distance_rr[a]
                * vars.flow_rr[t][p][a]
        })
        .grb_sum();
    let ru = iproduct!(&sets.T, &sets.P, &sets.R, &sets.U)
        .map(|(&t, &p, &r, &u)| {
            parameters.transport_cost_ru[t][p][r][u]
                * parameters.distance_ru[r][u]
                * vars.flow_ru[t][p][r][u]
        })
        .grb_sum();
    let hu = iproduct!(&sets.T, &sets.P, &sets.H, &sets.U)
        .map(|(&t, &p, &h, &u)| {
            parameters.transport_cost_hu[t][p][h][u]
                * parameters.distance_hu[h][u]
                * vars.flow_hu[t][p][h][u]
        })
        .grb_sum();
    let ku = iproduct!(&sets.T, &sets.P, &sets.K, &sets.U)
        .map(|(&t, &p, &k, &u)| {
            parameters.transport_cost_ku[t][p][k][u]
                * parameters.distance_ku[k][u]
                * vars.flow_ku[t][p][k][u]
        })
        .grb_sum();

    ir + jr + jh + jk + rh + rk + rr + ru + hu + ku
}

/// Emissions generated in one period: production, storage at the three
/// stock-holding classes, and transport on the seven capped route families.
/// Waste routes exist physically but do not feed the cap or the emissions
/// criterion. Shared by the per-period cap constraint and the emissions
/// total of the objective.
pub fn period_emissions(sets: &Sets, parameters: &Parameters, vars: &Variables, t: usize) -> Expr {
    let production = iproduct!(&sets.P, &sets.R)
        .map(|(&p, &r)| parameters.production_emission[t][p][r] * vars.production[t][p][r])
        .grb_sum();

    let storage = iproduct!(&sets.P, &sets.R)
        .map(|(&p, &r)| {
            parameters.regional_storage_emission[t][p][r] * vars.regional_stock[t][p][r]
        })
        .grb_sum()
        + iproduct!(&sets.P, &sets.H)
            .map(|(&p, &h)| {
                parameters.hospital_storage_emission[t][p][h] * vars.hospital_stock[t][p][h]
            })
            .grb_sum()
        + iproduct!(&sets.P, &sets.K)
            .map(|(&p, &k)| {
                parameters.clinic_storage_emission[t][p][k] * vars.clinic_stock[t][p][k]
            })
            .grb_sum();

    let transport = iproduct!(&sets.P, &sets.I, &sets.R)
        .map(|(&p, &i, &r)| {
            parameters.transport_emission_ir[t][p][i][r]
                * parameters.distance_ir[i][r]
                * vars.flow_ir[t][p][i][r]
        })
        .grb_sum()
        + iproduct!(&sets.P, &sets.J, &sets.R)
            .map(|(&p, &j, &r)| {
                parameters.transport_emission_jr[t][p][j][r]
                    * parameters.distance_jr[j][r]
                    * vars.flow_jr[t][p][j][r]
            })
            .grb_sum()
        + iproduct!(&sets.P, &sets.J, &sets.H)
            .map(|(&p, &j, &h)| {
                parameters.transport_emission_jh[t][p][j][h]
                    * parameters.distance_jh[j][h]
                    * vars.flow_jh[t][p][j][h]
            })
            .grb_sum()
        + iproduct!(&sets.P, &sets.J, &sets.K)
            .map(|(&p, &j, &k)| {
                parameters.transport_emission_jk[t][p][j][k]
                    * parameters.distance_jk[j][k]
                    * vars.flow_jk[t][p][j][k]
            })
            .grb_sum()
        + iproduct!(&sets.P, &sets.R, &sets.H)
            .map(|(&p, &r, &h)| {
                parameters.transport_emission_rh[t][p][r][h]
                    * parameters.distance_rh[r][h]
                    * vars.flow_rh[t][p][r][h]
            })
            .grb_sum()
        + iproduct!(&sets.P, &sets.R, &sets.K)
            .map(|(&p, &r, &k)| {
                parameters.transport_emission_rk[t][p][r][k]
                    * parameters.distance_rk[r][k]
                    * vars.flow_rk[t][p][r][k]
            })
            .grb_sum()
        + iproduct!(&sets.P, 0..sets.RR.len())
            .map(|(&p, a)| {
                parameters.transport_emission_rr[t][p][a]
                    * parameters.distance_rr[a]
                    * vars.flow_rr[t][p][a]
            })
            .grb_sum();

    production + storage + transport
}

/// Total emissions over the horizon.
pub fn total_emissions(sets: &Sets, parameters: &Parameters, vars: &Variables) -> Expr {
    sets.T
        .iter()
        .map(|&t| period_emissions(sets, parameters, vars, t))
        .grb_sum()
}

/// The service-level criterion: a split-weighted sum of the hospital and
/// clinic fulfillment ratios over the whole horizon. A demand class with
/// zero total demand contributes its weight as a constant instead of
/// dividing by zero.
pub fn service_level(sets: &Sets, parameters: &Parameters, config: &Config, vars: &Variables) -> Expr {
    let rho = config.service_split;

    let hospital_demand: f64 = iproduct!(&sets.T, &sets.P, &sets.H)
        .map(|(&t, &p, &h)| parameters.hospital_demand[t][p][h])
        .sum();
    let hospital = if hospital_demand > 0.0 {
        let supplied = iproduct!(&sets.T, &sets.P, &sets.J, &sets.H)
            .map(|(&t, &p, &j, &h)| vars.flow_jh[t][p][j][h])
            .grb_sum()
            + iproduct!(&sets.T, &sets.P, &sets.R, &sets.H)
                .map(|(&t, &p, &r, &h)| vars.flow_rh[t][p][r][h])
                .grb_sum();
        (rho / hospital_demand) * supplied
    } else {
        Expr::Constant(rho)
    };

    let clinic_demand: f64 = iproduct!(&sets.T, &sets.P, &sets.K)
        .map(|(&t, &p, &k)| parameters.clinic_demand[t][p][k])
        .sum();
    let clinic = if clinic_demand > 0.0 {
        let supplied = iproduct!(&sets.T, &sets.P, &sets.J, &sets.K)
            .map(|(&t, &p, &j, &k)| vars.flow_jk[t][p][j][k])
            .grb_sum()
            + iproduct!(&sets.T, &sets.P, &sets.R, &sets.K)
                .map(|(&t, &p, &r, &k)| vars.flow_rk[t][p][r][k])
                .grb_sum();
        ((1.0 - rho) / clinic_demand) * supplied
    } else {
        Expr::Constant(1.0 - rho)
    };

    hospital + clinic
}

/// Scalarize the three criteria into the single linear expression the solver
/// maximizes: profit and service level normalized by their fixed references
/// and weighted, minus the weighted normalized emissions. Fails before any
/// solve if a reference denominator is unusable.
pub fn compose(
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    vars: &Variables,
) -> Result<Expr, ConfigError> {
    config.validate()?;

    let emissions = total_emissions(sets, parameters, vars);
    let emission_cost = config.emission_price * emissions.clone();

    let costs = fixed_cost(sets, config, vars)
        + acquisition_cost(sets, parameters, vars)
        + production_cost(sets, parameters, vars)
        + holding_cost(sets, parameters, vars)
        + discard_cost(sets, parameters, vars)
        + transport_cost(sets, parameters, vars)
        + emission_cost;
    let profit = revenue(sets, parameters, vars) - costs;

    let profit_term = (config.profit_weight / config.profit_reference) * profit;
    let service_term = (config.service_weight / config.service_reference)
        * service_level(sets, parameters, config, vars);
    let emission_term = (config.emission_weight / config.emission_reference) * emissions;

    Ok(profit_term + service_term - emission_term)
}
