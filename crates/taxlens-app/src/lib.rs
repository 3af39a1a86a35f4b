// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod assessment;
pub mod classify;
pub mod estimate;
pub mod extract;
pub mod format;
pub mod mapper;
pub mod model;
pub mod seed;
pub mod validation;

pub use assessment::*;
pub use classify::classify_building_type;
pub use estimate::{EstimationTables, Estimator, Perturbation, RegionTable, TypeTable};
pub use extract::{ExtractedFields, extract_fields};
pub use mapper::*;
pub use model::*;
pub use seed::*;
pub use validation::*;
