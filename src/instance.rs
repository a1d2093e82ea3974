use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type MobileIndex = usize;
pub type LocalIndex = usize;
pub type RegionalIndex = usize;
pub type HospitalIndex = usize;
pub type ClinicIndex = usize;
pub type WasteIndex = usize;
pub type ProductIndex = usize;
pub type TimeIndex = usize;

/// The type used for quantities of product (units of blood)
pub type Quantity = f64;
/// The type used for distance (km)
pub type Distance = f64;
/// The type used for cost (IDR)
pub type Cost = f64;
/// The type used for emissions (kg CO2e)
pub type Emission = f64;

/// The physical network the model is built over: every facility of each
/// class, the product types, and the length of the planning horizon.
///
/// Facilities within a class are identified by their position in the
/// corresponding list (continuous, starting at 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Mobile collection units
    mobile_units: Vec<String>,
    /// Local distribution centers
    local_centers: Vec<String>,
    /// Regional blood banks. The only class with production and
    /// cross-transfer capability.
    regional_banks: Vec<String>,
    /// Hospitals (demand nodes)
    hospitals: Vec<String>,
    /// Clinics (demand nodes)
    clinics: Vec<String>,
    /// Waste centers receiving expired product
    waste_centers: Vec<String>,
    /// Product types (blood groups)
    products: Vec<String>,
    /// Number of time periods in the planning horizon
    periods: usize,
}

#[derive(Debug, Error)]
pub enum InstanceError {
    /// Every entity class must contain at least one facility
    #[error("entity class {0} is empty; at least one entity is required")]
    EmptySet(&'static str),
    /// The planning horizon must contain at least one period
    #[error("the planning horizon has no periods")]
    NoPeriods,
}

impl Instance {
    pub fn new(
        mobile_units: Vec<String>,
        local_centers: Vec<String>,
        regional_banks: Vec<String>,
        hospitals: Vec<String>,
        clinics: Vec<String>,
        waste_centers: Vec<String>,
        products: Vec<String>,
        periods: usize,
    ) -> Result<Instance, InstanceError> {
        let non_empty = [
            ("mobile units", mobile_units.len()),
            ("local centers", local_centers.len()),
            ("regional banks", regional_banks.len()),
            ("hospitals", hospitals.len()),
            ("clinics", clinics.len()),
            ("waste centers", waste_centers.len()),
            ("products", products.len()),
        ];

        for (class, len) in non_empty {
            if len == 0 {
                return Err(InstanceError::EmptySet(class));
            }
        }

        if periods == 0 {
            return Err(InstanceError::NoPeriods);
        }

        Ok(Instance {
            mobile_units,
            local_centers,
            regional_banks,
            hospitals,
            clinics,
            waste_centers,
            products,
            periods,
        })
    }

    /// The East Kalimantan case study network: 3 mobile units, 3 local
    /// centers, 2 regional banks, 4 hospitals, 2 clinics, 2 waste centers,
    /// the 4 main blood groups, over a 45-day horizon.
    pub fn east_kalimantan() -> Instance {
        let names = |prefix: &str, n: usize| {
            (1..=n)
                .map(|i| format!("{}{}", prefix, i))
                .collect::<Vec<_>>()
        };

        Instance::new(
            names("BM", 3),
            names("LBDC", 3),
            names("RBB", 2),
            names("H", 4),
            names("C", 2),
            names("W", 2),
            ["A", "B", "AB", "O"].map(String::from).to_vec(),
            45,
        )
        .expect("case study instance is well-formed")
    }

    /// Mobile collection units, ordered by index
    pub fn mobile_units(&self) -> &[String] {
        &self.mobile_units
    }

    /// Local distribution centers, ordered by index
    pub fn local_centers(&self) -> &[String] {
        &self.local_centers
    }

    /// Regional blood banks, ordered by index
    pub fn regional_banks(&self) -> &[String] {
        &self.regional_banks
    }

    /// Hospitals, ordered by index
    pub fn hospitals(&self) -> &[String] {
        &self.hospitals
    }

    /// Clinics, ordered by index
    pub fn clinics(&self) -> &[String] {
        &self.clinics
    }

    /// Waste centers, ordered by index
    pub fn waste_centers(&self) -> &[String] {
        &self.waste_centers
    }

    /// Product types, ordered by index
    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// The number of time periods in the planning horizon
    pub fn periods(&self) -> usize {
        self.periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_class_is_rejected() {
        let result = Instance::new(
            vec![],
            vec!["LBDC1".into()],
            vec!["RBB1".into()],
            vec!["H1".into()],
            vec!["C1".into()],
            vec!["W1".into()],
            vec!["O".into()],
            10,
        );
        assert!(matches!(result, Err(InstanceError::EmptySet("mobile units"))));
    }

    #[test]
    fn zero_periods_is_rejected() {
        let result = Instance::new(
            vec!["BM1".into()],
            vec!["LBDC1".into()],
            vec!["RBB1".into()],
            vec!["H1".into()],
            vec!["C1".into()],
            vec!["W1".into()],
            vec!["O".into()],
            0,
        );
        assert!(matches!(result, Err(InstanceError::NoPeriods)));
    }

    #[test]
    fn case_study_dimensions() {
        let instance = Instance::east_kalimantan();
        assert_eq!(instance.mobile_units().len(), 3);
        assert_eq!(instance.local_centers().len(), 3);
        assert_eq!(instance.regional_banks().len(), 2);
        assert_eq!(instance.hospitals().len(), 4);
        assert_eq!(instance.clinics().len(), 2);
        assert_eq!(instance.waste_centers().len(), 2);
        assert_eq!(instance.products().len(), 4);
        assert_eq!(instance.periods(), 45);
    }
}
