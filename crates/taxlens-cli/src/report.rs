// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use taxlens_app::format::{
    format_compact_dollars, format_dollars, format_percent_change, format_rate,
    format_square_feet,
};
use taxlens_app::{AppealResult, EstimatedFields, MappedProperty, PropertyData, ValidationReport};

const ESTIMATE_MARKER: &str = " (est.)";

pub struct Report<'a> {
    pub mapped: &'a MappedProperty,
    pub validation: &'a ValidationReport,
    pub appeal: Option<&'a AppealResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    property: &'a PropertyData,
    estimated: &'a EstimatedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    implied_tax_rate: Option<f64>,
    validation: &'a ValidationReport,
    appeal: Option<&'a AppealResult>,
}

impl Report<'_> {
    pub fn to_json(&self) -> Result<String> {
        let document = ReportDocument {
            property: &self.mapped.data,
            estimated: &self.mapped.estimated,
            implied_tax_rate: self.mapped.implied_tax_rate,
            validation: self.validation,
            appeal: self.appeal,
        };
        serde_json::to_string_pretty(&document).context("encode report as JSON")
    }

    pub fn to_text(&self) -> String {
        let data = &self.mapped.data;
        let estimated = &self.mapped.estimated;
        let mut lines = vec![
            data.address.clone(),
            format!(
                "{} | {} assessed | data quality: {}",
                data.property_type,
                format_compact_dollars(data.current_value),
                data.data_quality.as_str()
            ),
            String::new(),
            row(
                "Assessed value",
                format_dollars(data.current_value),
                estimated.current_value,
            ),
            row(
                "Previous value",
                format_dollars(data.previous_value),
                estimated.current_value,
            ),
            row(
                "Market value",
                format_dollars(data.market_value),
                estimated.market_value,
            ),
            row(
                "Property tax",
                format!(
                    "{} ({})",
                    format_dollars(data.current_tax),
                    format_percent_change(data.tax_increase)
                ),
                estimated.current_tax,
            ),
            row(
                "Previous tax",
                format_dollars(data.previous_tax),
                estimated.current_tax,
            ),
        ];
        if let Some(rate) = self.mapped.implied_tax_rate {
            lines.push(row("Effective rate", format_rate(rate), false));
        }
        lines.push(row(
            "Living area",
            format_square_feet(data.square_footage),
            estimated.square_footage,
        ));
        lines.push(row(
            "Year built",
            data.year_built.to_string(),
            estimated.year_built,
        ));
        lines.push(row(
            "Last sale price",
            format_dollars(data.last_sale_price),
            estimated.last_sale_price,
        ));
        lines.push(row(
            "Last sale date",
            data.last_sale_date.clone(),
            estimated.last_sale_date,
        ));

        if !self.validation.errors.is_empty() {
            lines.push(String::new());
            lines.push("Errors:".to_owned());
            lines.extend(
                self.validation
                    .error_messages()
                    .into_iter()
                    .map(|message| format!("  - {message}")),
            );
        }
        if !self.validation.warnings.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_owned());
            lines.extend(
                self.validation
                    .warning_messages()
                    .into_iter()
                    .map(|message| format!("  - {message}")),
            );
        }

        if let Some(appeal) = self.appeal {
            lines.push(String::new());
            lines.push(format!("Appeal potential: {}", appeal.potential.as_str()));
            lines.push(format!("  {}", appeal.potential.summary()));
            lines.push(format!(
                "  Estimated savings: {} per year ({:.0}% of current tax)",
                format_dollars(appeal.estimated_savings),
                appeal.reduction_rate * 100.0
            ));
            lines.push(format!(
                "  Answers: {} / {} / owned {} / {}",
                appeal.answers.tax_situation.label(),
                appeal.answers.property_use.label(),
                appeal.answers.ownership_length.label(),
                appeal.answers.recent_changes.label()
            ));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn row(label: &str, value: String, estimated: bool) -> String {
    let marker = if estimated { ESTIMATE_MARKER } else { "" };
    format!("{label:<18}{value}{marker}")
}
