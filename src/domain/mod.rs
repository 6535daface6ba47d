// Domain layer - Models and business rules

pub mod model;
pub mod rules;
