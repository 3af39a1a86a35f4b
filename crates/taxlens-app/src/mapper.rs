// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use tracing::debug;

use crate::classify::classify_building_type;
use crate::estimate::{Estimator, round_half_up};
use crate::extract::extract_fields;
use crate::model::{DataQuality, PropertyData, RawPropertyRecord};
use crate::seed::{AddressSeed, address_seed};

/// Which figures in a mapped record came from the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedFields {
    pub current_value: bool,
    pub market_value: bool,
    pub current_tax: bool,
    pub square_footage: bool,
    pub year_built: bool,
    pub last_sale_price: bool,
    pub last_sale_date: bool,
}

impl EstimatedFields {
    pub fn any(&self) -> bool {
        self.current_value
            || self.market_value
            || self.current_tax
            || self.square_footage
            || self.year_built
            || self.last_sale_price
            || self.last_sale_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedProperty {
    pub data: PropertyData,
    pub seed: AddressSeed,
    /// `currentTax / currentValue`, only when both came from the provider.
    pub implied_tax_rate: Option<f64>,
    pub estimated: EstimatedFields,
}

/// Maps provider records with the default tables and the current year.
pub fn map_property_data(
    search: &RawPropertyRecord,
    detail: Option<&RawPropertyRecord>,
) -> PropertyData {
    Estimator::default().map(search, detail).data
}

impl Estimator {
    /// Builds a fully populated record. Missing provider fields are filled
    /// from the estimator, so this never fails; whether the result is usable
    /// is decided by validation.
    pub fn map(
        &self,
        search: &RawPropertyRecord,
        detail: Option<&RawPropertyRecord>,
    ) -> MappedProperty {
        let fields = extract_fields(search, detail);
        let address = fields.address.clone();
        let seed = address_seed(&address);
        let property_type = classify_building_type(fields.building_type.as_deref().unwrap_or(""));
        debug!(
            address = %address,
            seed = seed.get(),
            property_type = %property_type,
            from_detail = detail.is_some(),
            "mapping property record"
        );

        let mut estimated = EstimatedFields::default();

        let current_value = fields.current_value.unwrap_or_else(|| {
            estimated.current_value = true;
            self.base_value(&address, &property_type, seed)
        });

        let market_value = fields.market_value.unwrap_or_else(|| {
            estimated.market_value = true;
            self.market_value(current_value, seed)
        });

        let current_tax = fields.tax_amount.unwrap_or_else(|| {
            estimated.current_tax = true;
            round_half_up(current_value as f64 * self.tax_rate(&address, seed)) as i64
        });

        let implied_tax_rate = match (fields.tax_amount, fields.current_value) {
            (Some(tax), Some(value)) if value != 0 => Some(tax as f64 / value as f64),
            _ => None,
        };

        let increase_rate = self.value_increase_rate(&address, seed);
        let previous_value = deflate(current_value, increase_rate);
        let previous_tax = deflate(current_tax, increase_rate * self.tax_growth_share());
        let tax_increase = if previous_tax > 0 {
            let change = (current_tax - previous_tax) as f64 / previous_tax as f64;
            round_half_up(change * 100.0 * 10.0) / 10.0
        } else {
            self.tax_increase_rate(&address, seed)
        };

        let square_footage = fields.square_footage.unwrap_or_else(|| {
            estimated.square_footage = true;
            self.square_footage(&property_type, &address, seed)
        });

        let year_built = match fields.year_built {
            Some(year) => self.clamp_year(f64::from(year)),
            None => {
                estimated.year_built = true;
                self.year_built(&address, seed)
            }
        };

        let last_sale_price = fields.sale_amount.unwrap_or_else(|| {
            estimated.last_sale_price = true;
            self.sale_price(current_value, seed)
        });

        let last_sale_date = fields.sale_date.clone().unwrap_or_else(|| {
            estimated.last_sale_date = true;
            self.sale_date(seed)
        });

        let data_quality = DataQuality::from_flags(
            fields.has_real_assessment_data,
            fields.has_real_building_data,
            fields.has_real_sale_data,
        );

        let data = PropertyData {
            address,
            property_type,
            current_value,
            previous_value,
            current_tax,
            previous_tax,
            tax_increase,
            market_value,
            square_footage,
            year_built,
            last_sale_price,
            last_sale_date,
            has_real_assessment_data: fields.has_real_assessment_data,
            has_real_building_data: fields.has_real_building_data,
            has_real_sale_data: fields.has_real_sale_data,
            data_quality,
        };

        debug!(
            current_value = data.current_value,
            current_tax = data.current_tax,
            tax_increase = data.tax_increase,
            data_quality = data.data_quality.as_str(),
            estimated = estimated.any(),
            "mapped property record"
        );

        MappedProperty {
            data,
            seed,
            implied_tax_rate,
            estimated,
        }
    }
}

/// `round(amount / (1 + rate))`; rates at or below -100% leave the amount
/// unchanged.
fn deflate(amount: i64, rate: f64) -> i64 {
    let divisor = 1.0 + rate;
    if divisor <= 0.0 || !divisor.is_finite() {
        return amount;
    }
    round_half_up(amount as f64 / divisor) as i64
}
