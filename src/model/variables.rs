use grb::prelude::*;

use crate::model::sets_and_parameters::Sets;
use crate::model::utils::{Extract, VarBlock};
use crate::solution::SolvedVariables;

/// Every decision variable of the model, one block per role. A block is a
/// dense nested vector keyed by the role's own index tuple, so a handle can
/// always be looked up by index and a whole role can be enumerated. Roles
/// never alias: production and inventory at the same (t, p, r) are distinct
/// variables.
pub struct Variables {
    /// Flow from mobile units to regional banks, per (t, p, i, r)
    pub flow_ir: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from local centers to regional banks, per (t, p, j, r)
    pub flow_jr: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from local centers to hospitals, per (t, p, j, h)
    pub flow_jh: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from local centers to clinics, per (t, p, j, k)
    pub flow_jk: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from regional banks to hospitals, per (t, p, r, h)
    pub flow_rh: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from regional banks to clinics, per (t, p, r, k)
    pub flow_rk: Vec<Vec<Vec<Vec<Var>>>>,
    /// Cross-transfer between distinct regional banks, per (t, p, pair).
    /// Keyed by the pair list in `Sets::RR`; self-transfers have no variable.
    pub flow_rr: Vec<Vec<Vec<Var>>>,
    /// Flow from regional banks to waste centers, per (t, p, r, u)
    pub flow_ru: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from hospitals to waste centers, per (t, p, h, u)
    pub flow_hu: Vec<Vec<Vec<Vec<Var>>>>,
    /// Flow from clinics to waste centers, per (t, p, k, u)
    pub flow_ku: Vec<Vec<Vec<Vec<Var>>>>,
    /// Production quantity at regional banks, per (t, p, r)
    pub production: Vec<Vec<Vec<Var>>>,
    /// End-of-period inventory at regional banks, per (t, p, r)
    pub regional_stock: Vec<Vec<Vec<Var>>>,
    /// End-of-period inventory at hospitals, per (t, p, h)
    pub hospital_stock: Vec<Vec<Vec<Var>>>,
    /// End-of-period inventory at clinics, per (t, p, k)
    pub clinic_stock: Vec<Vec<Vec<Var>>>,
    /// Expired quantity discarded at regional banks, per (t, p, r)
    pub regional_discard: Vec<Vec<Vec<Var>>>,
    /// Expired quantity discarded at hospitals, per (t, p, h)
    pub hospital_discard: Vec<Vec<Vec<Var>>>,
    /// Expired quantity discarded at clinics, per (t, p, k)
    pub clinic_discard: Vec<Vec<Vec<Var>>>,
    /// Activation of a mobile unit in a period, per (t, i), binary
    pub mobile_active: Vec<Vec<Var>>,
    /// Activation of a local center in a period, per (t, j), binary
    pub local_active: Vec<Vec<Var>>,
    /// Activation of a regional bank in a period, per (t, r), binary
    pub regional_active: Vec<Vec<Var>>,
}

impl Variables {
    /// Declare one variable per (role, index tuple). Flow, production,
    /// inventory and discard variables are continuous non-negative;
    /// activation variables are binary.
    pub fn new(model: &mut Model, sets: &Sets) -> grb::Result<Variables> {
        let (t, p) = (sets.T.len(), sets.P.len());
        let (i, j, r) = (sets.I.len(), sets.J.len(), sets.R.len());
        let (h, k, u) = (sets.H.len(), sets.K.len(), sets.U.len());
        let rr = sets.RR.len();

        Ok(Variables {
            flow_ir: (t, p, i, r).cont(model, "x_ir")?,
            flow_jr: (t, p, j, r).cont(model, "x_jr")?,
            flow_jh: (t, p, j, h).cont(model, "x_jh")?,
            flow_jk: (t, p, j, k).cont(model, "x_jk")?,
            flow_rh: (t, p, r, h).cont(model, "x_rh")?,
            flow_rk: (t, p, r, k).cont(model, "x_rk")?,
            flow_rr: (t, p, rr).cont(model, "x_rr")?,
            flow_ru: (t, p, r, u).cont(model, "x_ru")?,
            flow_hu: (t, p, h, u).cont(model, "x_hu")?,
            flow_ku: (t, p, k, u).cont(model, "x_ku")?,
            production: (t, p, r).cont(model, "pr")?,
            regional_stock: (t, p, r).cont(model, "inv_r")?,
            hospital_stock: (t, p, h).cont(model, "inv_h")?,
            clinic_stock: (t, p, k).cont(model, "inv_k")?,
            regional_discard: (t, p, r).cont(model, "wo_r")?,
            hospital_discard: (t, p, h).cont(model, "wo_h")?,
            clinic_discard: (t, p, k).cont(model, "wo_k")?,
            mobile_active: (t, i).binary(model, "y_i")?,
            local_active: (t, j).binary(model, "y_j")?,
            regional_active: (t, r).binary(model, "y_r")?,
        })
    }

    /// Read the assigned value of every declared variable after a solve.
    pub fn extract(&self, model: &Model) -> grb::Result<SolvedVariables> {
        Ok(SolvedVariables {
            flow_ir: self.flow_ir.extract(model)?,
            flow_jr: self.flow_jr.extract(model)?,
            flow_jh: self.flow_jh.extract(model)?,
            flow_jk: self.flow_jk.extract(model)?,
            flow_rh: self.flow_rh.extract(model)?,
            flow_rk: self.flow_rk.extract(model)?,
            flow_rr: self.flow_rr.extract(model)?,
            flow_ru: self.flow_ru.extract(model)?,
            flow_hu: self.flow_hu.extract(model)?,
            flow_ku: self.flow_ku.extract(model)?,
            production: self.production.extract(model)?,
            regional_stock: self.regional_stock.extract(model)?,
            hospital_stock: self.hospital_stock.extract(model)?,
            clinic_stock: self.clinic_stock.extract(model)?,
            regional_discard: self.regional_discard.extract(model)?,
            hospital_discard: self.hospital_discard.extract(model)?,
            clinic_discard: self.clinic_discard.extract(model)?,
            mobile_active: self.mobile_active.extract(model)?,
            local_active: self.local_active.extract(model)?,
            regional_active: self.regional_active.extract(model)?,
        })
    }
}
