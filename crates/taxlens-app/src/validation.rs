// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Serialize, Serializer};

use crate::model::{ADDRESS_PLACEHOLDER, PropertyData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    MissingAddress,
    MissingAssessmentValue,
    EstimatedData,
}

impl ValidationIssue {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingAddress => "Property address is missing or invalid",
            Self::MissingAssessmentValue => "Property assessment value is missing or invalid",
            Self::EstimatedData => "Some property data may be estimated based on location averages",
        }
    }

    pub const fn is_error(self) -> bool {
        !matches!(self, Self::EstimatedData)
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationIssue {}

impl Serialize for ValidationIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn error_messages(&self) -> Vec<&'static str> {
        self.errors.iter().map(|issue| issue.message()).collect()
    }

    pub fn warning_messages(&self) -> Vec<&'static str> {
        self.warnings.iter().map(|issue| issue.message()).collect()
    }
}

/// Errors mean the record cannot be shown; warnings only flag estimates.
pub fn validate_property_data(data: &PropertyData) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let address = data.address.trim();
    if address.is_empty() || address == ADDRESS_PLACEHOLDER {
        errors.push(ValidationIssue::MissingAddress);
    }

    if data.current_value <= 0 {
        errors.push(ValidationIssue::MissingAssessmentValue);
    } else if !data.has_all_real_data() {
        warnings.push(ValidationIssue::EstimatedData);
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::{ValidationIssue, validate_property_data};
    use crate::model::{ADDRESS_PLACEHOLDER, DataQuality, PropertyData, PropertyType};

    fn record(address: &str, current_value: i64) -> PropertyData {
        PropertyData {
            address: address.to_owned(),
            property_type: PropertyType::SingleFamily,
            current_value,
            previous_value: current_value,
            current_tax: 5_000,
            previous_tax: 4_700,
            tax_increase: 6.4,
            market_value: current_value,
            square_footage: 1_800,
            year_built: 1990,
            last_sale_price: 400_000,
            last_sale_date: "2021-05-10".to_owned(),
            has_real_assessment_data: true,
            has_real_building_data: true,
            has_real_sale_data: true,
            data_quality: DataQuality::Excellent,
        }
    }

    #[test]
    fn empty_address_is_an_error() {
        let report = validate_property_data(&record("", 500_000));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![ValidationIssue::MissingAddress]);
        assert!(report.error_messages()[0].contains("address"));
    }

    #[test]
    fn placeholder_address_is_an_error() {
        let report = validate_property_data(&record(ADDRESS_PLACEHOLDER, 500_000));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![ValidationIssue::MissingAddress]);
    }

    #[test]
    fn non_positive_value_is_an_error() {
        for value in [0, -1] {
            let report = validate_property_data(&record("123 Main St", value));
            assert!(!report.is_valid);
            assert_eq!(report.errors, vec![ValidationIssue::MissingAssessmentValue]);
            assert!(report.warnings.is_empty());
        }
    }

    #[test]
    fn both_errors_are_reported_together() {
        let report = validate_property_data(&record("  ", 0));
        assert_eq!(
            report.errors,
            vec![
                ValidationIssue::MissingAddress,
                ValidationIssue::MissingAssessmentValue
            ]
        );
    }

    #[test]
    fn fully_real_record_has_no_warnings() {
        let report = validate_property_data(&record("123 Main St", 500_000));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn any_estimated_group_adds_exactly_one_warning() {
        for (assessment, building, sale) in [
            (false, true, true),
            (true, false, true),
            (true, true, false),
            (false, false, false),
        ] {
            let mut data = record("123 Main St", 500_000);
            data.has_real_assessment_data = assessment;
            data.has_real_building_data = building;
            data.has_real_sale_data = sale;
            let report = validate_property_data(&data);
            assert!(report.is_valid);
            assert_eq!(report.warnings, vec![ValidationIssue::EstimatedData]);
            assert_eq!(
                report.warning_messages(),
                vec!["Some property data may be estimated based on location averages"]
            );
        }
    }

    #[test]
    fn issues_serialize_as_messages() -> anyhow::Result<()> {
        let report = validate_property_data(&record("", 0));
        let value = serde_json::to_value(&report)?;
        assert_eq!(value["isValid"], false);
        assert_eq!(value["errors"][1], "Property assessment value is missing or invalid");
        assert!(ValidationIssue::MissingAddress.is_error());
        assert!(!ValidationIssue::EstimatedData.is_error());
        Ok(())
    }
}
