use grb::prelude::*;

/// Builds a dense block of decision variables, one per index tuple, shaped
/// by a tuple of set sizes. Variable names are suffixed with the full index
/// so every handle stays identifiable in solver output.
pub trait VarBlock {
    type Out;

    /// One non-negative continuous variable per index.
    fn cont(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out>;

    /// One binary variable per index.
    fn binary(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out>;
}

impl VarBlock for usize {
    type Out = Vec<Var>;

    fn cont(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..*self)
            .map(|i| add_ctsvar!(model, name: &format!("{}_{}", name, i), bounds: 0.0..))
            .collect()
    }

    fn binary(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..*self)
            .map(|i| add_binvar!(model, name: &format!("{}_{}", name, i)))
            .collect()
    }
}

impl VarBlock for (usize, usize) {
    type Out = Vec<Vec<Var>>;

    fn cont(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| self.1.cont(model, &format!("{}_{}", name, i)))
            .collect()
    }

    fn binary(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| self.1.binary(model, &format!("{}_{}", name, i)))
            .collect()
    }
}

impl VarBlock for (usize, usize, usize) {
    type Out = Vec<Vec<Vec<Var>>>;

    fn cont(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| (self.1, self.2).cont(model, &format!("{}_{}", name, i)))
            .collect()
    }

    fn binary(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| (self.1, self.2).binary(model, &format!("{}_{}", name, i)))
            .collect()
    }
}

impl VarBlock for (usize, usize, usize, usize) {
    type Out = Vec<Vec<Vec<Vec<Var>>>>;

    fn cont(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| (self.1, self.2, self.3).cont(model, &format!("{}_{}", name, i)))
            .collect()
    }

    fn binary(&self, model: &mut Model, name: &str) -> grb::Result<Self::Out> {
        (0..self.0)
            .map(|i| (self.1, self.2, self.3).binary(model, &format!("{}_{}", name, i)))
            .collect()
    }
}

/// Reads the assigned value of every variable in a (nested) block back out
/// of an optimized model.
pub trait Extract {
    type Out;

    fn extract(&self, model: &Model) -> grb::Result<Self::Out>;
}

impl Extract for Var {
    type Out = f64;

    fn extract(&self, model: &Model) -> grb::Result<f64> {
        model.get_obj_attr(attr::X, self)
    }
}

impl<T: Extract> Extract for Vec<T> {
    type Out = Vec<T::Out>;

    fn extract(&self, model: &Model) -> grb::Result<Self::Out> {
        self.iter().map(|e| e.extract(model)).collect()
    }
}
