use grb::prelude::*;
use itertools::iproduct;
use log::{debug, info};

use crate::config::Config;
use crate::model::objective;
use crate::model::sets_and_parameters::{Parameters, Sets};
use crate::model::variables::Variables;

/// Emit the full constraint set into the model. Families are independent:
/// each reads only variable handles and parameter values, never other
/// constraints, so generation order is irrelevant.
pub fn add_all(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    vars: &Variables,
) -> grb::Result<()> {
    regional_balance(model, sets, vars)?;
    hospital_balance(model, sets, parameters, vars)?;
    clinic_balance(model, sets, parameters, vars)?;
    debug!("generated mass balance constraints");
    capacity(model, sets, parameters, vars)?;
    emission_cap(model, sets, parameters, config, vars)?;
    debug!("generated capacity and emission cap constraints");
    service_bound(model, sets, parameters, config, vars)?;
    shelf_life(model, sets, config.shelf_life, vars)?;
    min_activation(model, sets, vars)?;
    debug!("generated service, shelf life and activation constraints");

    info!(
        "generated constraints for {} periods, {} products",
        sets.T.len(),
        sets.P.len()
    );

    Ok(())
}

/// Mass balance at regional banks: carried-over inventory plus production,
/// collection inflows and cross-transfers in equals end-of-period inventory
/// plus deliveries, cross-transfers out, waste shipments and discard. The
/// first period carries in the literal value zero; there is no pre-horizon
/// stock.
pub fn regional_balance(model: &mut Model, sets: &Sets, vars: &Variables) -> grb::Result<()> {
    for (&t, &p, &r) in iproduct!(&sets.T, &sets.P, &sets.R) {
        let transfers_in = sets
            .RR
            .iter()
            .enumerate()
            .filter(|(_, &(_, to))| to == r)
            .map(|(a, _)| vars.flow_rr[t][p][a])
            .grb_sum();
        let transfers_out = sets
            .RR
            .iter()
            .enumerate()
            .filter(|(_, &(from, _))| from == r)
            .map(|(a, _)| vars.flow_rr[t][p][a])
            .grb_sum();

        let inbound = vars.production[t][p][r]
            + sets.I.iter().map(|&i| vars.flow_ir[t][p][i][r]).grb_sum()
            + sets.J.iter().map(|&j| vars.flow_jr[t][p][j][r]).grb_sum()
            + transfers_in;

        let outbound = sets.H.iter().map(|&h| vars.flow_rh[t][p][r][h]).grb_sum()
            + sets.K.iter().map(|&k| vars.flow_rk[t][p][r][k]).grb_sum()
            + transfers_out
            + sets.U.iter().map(|&u| vars.flow_ru[t][p][r][u]).grb_sum()
            + vars.regional_discard[t][p][r];

        let lhs = match t {
            0 => inbound,
            _ => vars.regional_stock[t - 1][p][r] + inbound,
        };

        model.add_constr(
            &format!("rbb_balance_{}_{}_{}", t, p, r),
            c!(lhs == vars.regional_stock[t][p][r] + outbound),
        )?;
    }

    Ok(())
}

/// Mass balance at hospitals: no production, demand is consumed from stock,
/// expired product leaves to waste centers or is discarded in place.
pub fn hospital_balance(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    vars: &Variables,
) -> grb::Result<()> {
    for (&t, &p, &h) in iproduct!(&sets.T, &sets.P, &sets.H) {
        let inbound = sets.J.iter().map(|&j| vars.flow_jh[t][p][j][h]).grb_sum()
            + sets.R.iter().map(|&r| vars.flow_rh[t][p][r][h]).grb_sum();

        let outbound = parameters.hospital_demand[t][p][h]
            + sets.U.iter().map(|&u| vars.flow_hu[t][p][h][u]).grb_sum()
            + vars.hospital_discard[t][p][h];

        let lhs = match t {
            0 => inbound,
            _ => vars.hospital_stock[t - 1][p][h] + inbound,
        };

        model.add_constr(
            &format!("hospital_balance_{}_{}_{}", t, p, h),
            c!(lhs == vars.hospital_stock[t][p][h] + outbound),
        )?;
    }

    Ok(())
}

/// Mass balance at clinics, analogous to hospitals.
pub fn clinic_balance(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    vars: &Variables,
) -> grb::Result<()> {
    for (&t, &p, &k) in iproduct!(&sets.T, &sets.P, &sets.K) {
        let inbound = sets.J.iter().map(|&j| vars.flow_jk[t][p][j][k]).grb_sum()
            + sets.R.iter().map(|&r| vars.flow_rk[t][p][r][k]).grb_sum();

        let outbound = parameters.clinic_demand[t][p][k]
            + sets.U.iter().map(|&u| vars.flow_ku[t][p][k][u]).grb_sum()
            + vars.clinic_discard[t][p][k];

        let lhs = match t {
            0 => inbound,
            _ => vars.clinic_stock[t - 1][p][k] + inbound,
        };

        model.add_constr(
            &format!("clinic_balance_{}_{}_{}", t, p, k),
            c!(lhs == vars.clinic_stock[t][p][k] + outbound),
        )?;
    }

    Ok(())
}

/// Production, storage and processing capacities, per (t, p, node).
pub fn capacity(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    vars: &Variables,
) -> grb::Result<()> {
    for (&t, &p) in iproduct!(&sets.T, &sets.P) {
        for &r in &sets.R {
            model.add_constr(
                &format!("production_cap_{}_{}_{}", t, p, r),
                c!(vars.production[t][p][r] <= parameters.production_capacity[t][p][r]),
            )?;
            model.add_constr(
                &format!("rbb_storage_cap_{}_{}_{}", t, p, r),
                c!(vars.regional_stock[t][p][r] <= parameters.regional_storage[p][r]),
            )?;
        }

        for &i in &sets.I {
            let collected = sets.R.iter().map(|&r| vars.flow_ir[t][p][i][r]).grb_sum();
            model.add_constr(
                &format!("mobile_cap_{}_{}_{}", t, p, i),
                c!(collected <= parameters.mobile_throughput[t][p][i]),
            )?;
        }

        for &j in &sets.J {
            let handled = sets.R.iter().map(|&r| vars.flow_jr[t][p][j][r]).grb_sum()
                + sets.H.iter().map(|&h| vars.flow_jh[t][p][j][h]).grb_sum()
                + sets.K.iter().map(|&k| vars.flow_jk[t][p][j][k]).grb_sum();
            model.add_constr(
                &format!("local_cap_{}_{}_{}", t, p, j),
                c!(handled <= parameters.local_throughput[t][p][j]),
            )?;
        }

        for &h in &sets.H {
            model.add_constr(
                &format!("hospital_storage_cap_{}_{}_{}", t, p, h),
                c!(vars.hospital_stock[t][p][h] <= parameters.hospital_storage[p][h]),
            )?;
        }

        for &k in &sets.K {
            model.add_constr(
                &format!("clinic_storage_cap_{}_{}_{}", t, p, k),
                c!(vars.clinic_stock[t][p][k] <= parameters.clinic_storage[p][k]),
            )?;
        }
    }

    Ok(())
}

/// One constraint per period bounding system-wide emissions: production,
/// storage at every stock-holding class, and transport on every capped
/// route, weighted by their emission factors.
pub fn emission_cap(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    vars: &Variables,
) -> grb::Result<()> {
    for &t in &sets.T {
        let emitted = objective::period_emissions(sets, parameters, vars, t);
        model.add_constr(
            &format!("emission_cap_{}", t),
            c!(emitted <= config.emission_cap),
        )?;
    }

    Ok(())
}

/// Aggregate supply to each demand node in a period is bounded by a policy
/// multiple of its demand, preventing over-supply from inflating the
/// service criterion.
pub fn service_bound(
    model: &mut Model,
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
    vars: &Variables,
) -> grb::Result<()> {
    for (&t, &p) in iproduct!(&sets.T, &sets.P) {
        for &h in &sets.H {
            let supplied = sets.J.iter().map(|&j| vars.flow_jh[t][p][j][h]).grb_sum()
                + sets.R.iter().map(|&r| vars.flow_rh[t][p][r][h]).grb_sum();
            model.add_constr(
                &format!("hospital_supply_{}_{}_{}", t, p, h),
                c!(supplied <= config.hospital_supply_factor * parameters.hospital_demand[t][p][h]),
            )?;
        }

        for &k in &sets.K {
            let supplied = sets.J.iter().map(|&j| vars.flow_jk[t][p][j][k]).grb_sum()
                + sets.R.iter().map(|&r| vars.flow_rk[t][p][r][k]).grb_sum();
            model.add_constr(
                &format!("clinic_supply_{}_{}_{}", t, p, k),
                c!(supplied <= config.clinic_supply_factor * parameters.clinic_demand[t][p][k]),
            )?;
        }
    }

    Ok(())
}

/// FIFO aging proxy: discard in a period cannot exceed the inventory that
/// existed `alpha` periods earlier at the same node. For the first `alpha`
/// periods no stock is old enough to expire and the constraint is not
/// generated at all.
pub fn shelf_life(
    model: &mut Model,
    sets: &Sets,
    alpha: usize,
    vars: &Variables,
) -> grb::Result<()> {
    for (&t, &p) in iproduct!(&sets.T, &sets.P) {
        if t < alpha {
            continue;
        }

        for &r in &sets.R {
            model.add_constr(
                &format!("rbb_shelf_life_{}_{}_{}", t, p, r),
                c!(vars.regional_discard[t][p][r] <= vars.regional_stock[t - alpha][p][r]),
            )?;
        }
        for &h in &sets.H {
            model.add_constr(
                &format!("hospital_shelf_life_{}_{}_{}", t, p, h),
                c!(vars.hospital_discard[t][p][h] <= vars.hospital_stock[t - alpha][p][h]),
            )?;
        }
        for &k in &sets.K {
            model.add_constr(
                &format!("clinic_shelf_life_{}_{}_{}", t, p, k),
                c!(vars.clinic_discard[t][p][k] <= vars.clinic_stock[t - alpha][p][k]),
            )?;
        }
    }

    Ok(())
}

/// Every facility must be activated in at least one period of the horizon.
pub fn min_activation(model: &mut Model, sets: &Sets, vars: &Variables) -> grb::Result<()> {
    for &i in &sets.I {
        let activations = sets.T.iter().map(|&t| vars.mobile_active[t][i]).grb_sum();
        model.add_constr(&format!("mobile_active_{}", i), c!(activations >= 1))?;
    }
    for &j in &sets.J {
        let activations = sets.T.iter().map(|&t| vars.local_active[t][j]).grb_sum();
        model.add_constr(&format!("local_active_{}", j), c!(activations >= 1))?;
    }
    for &r in &sets.R {
        let activations = sets.T.iter().map(|&t| vars.regional_active[t][r]).grb_sum();
        model.add_constr(&format!("rbb_active_{}", r), c!(activations >= 1))?;
    }

    Ok(())
}
