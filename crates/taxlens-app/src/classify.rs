// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::PropertyType;

// Checked in order; the first rule with any matching fragment wins.
const RULES: [(&[&str], PropertyType); 9] = [
    (
        &["single", "detached", "sfr", "residential"],
        PropertyType::SingleFamily,
    ),
    (&["condo"], PropertyType::Condominium),
    (
        &["townhouse", "town home", "townhome"],
        PropertyType::Townhouse,
    ),
    (&["duplex"], PropertyType::Duplex),
    (&["apartment", "multi"], PropertyType::MultiFamily),
    (&["commercial", "office"], PropertyType::Commercial),
    (&["industrial"], PropertyType::Industrial),
    (&["retail"], PropertyType::Retail),
    (&["vacant", "land"], PropertyType::VacantLand),
];

/// Maps the provider's free-text building type onto a display category.
/// Unrecognized text is kept as-is; empty text means a single family home.
pub fn classify_building_type(raw: &str) -> PropertyType {
    let lowered = raw.to_lowercase();
    for (fragments, property_type) in &RULES {
        if fragments.iter().any(|fragment| lowered.contains(*fragment)) {
            return property_type.clone();
        }
    }

    if raw.is_empty() {
        PropertyType::SingleFamily
    } else {
        PropertyType::Other(raw.to_owned())
    }
}
