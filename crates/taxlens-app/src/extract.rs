// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::estimate::round_half_up;
use crate::model::{ADDRESS_PLACEHOLDER, RawPropertyRecord};

type Accessor<T> = fn(&RawPropertyRecord) -> Option<T>;

const CURRENT_VALUE_CHAIN: [Accessor<f64>; 4] =
    [assessed_total, market_total, avm_value, sale_amount];
const MARKET_VALUE_CHAIN: [Accessor<f64>; 3] = [avm_value, market_total, sale_amount];
const SQUARE_FOOTAGE_CHAIN: [Accessor<f64>; 4] =
    [living_size, building_size, gross_size, gross_size_adjusted];
const YEAR_BUILT_CHAIN: [Accessor<f64>; 2] = [year_built, year_built_effective];
const SALE_DATE_CHAIN: [Accessor<String>; 2] = [transaction_date, sales_search_date];

/// Real values pulled from the provider records, before any estimation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedFields {
    pub address: String,
    pub building_type: Option<String>,
    pub current_value: Option<i64>,
    pub market_value: Option<i64>,
    pub tax_amount: Option<i64>,
    pub square_footage: Option<u32>,
    pub year_built: Option<i32>,
    pub sale_amount: Option<i64>,
    pub sale_date: Option<String>,
    pub has_real_assessment_data: bool,
    pub has_real_building_data: bool,
    pub has_real_sale_data: bool,
}

/// Reads every field from `detail` when present, otherwise from `search`.
/// Only the address falls back to `search` if the detail record lacks one.
pub fn extract_fields(
    search: &RawPropertyRecord,
    detail: Option<&RawPropertyRecord>,
) -> ExtractedFields {
    let primary = detail.unwrap_or(search);
    let address = resolve_address(primary)
        .or_else(|| detail.and_then(|_| resolve_address(search)))
        .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_owned());

    ExtractedFields {
        address,
        building_type: building_type(primary),
        current_value: current_value(primary).map(to_dollars),
        market_value: market_value(primary).map(to_dollars),
        tax_amount: tax_amount(primary).map(to_dollars),
        square_footage: square_footage(primary)
            .map(round_half_up)
            .filter(|size| *size >= 1.0)
            .map(|size| size.min(f64::from(u32::MAX)) as u32),
        year_built: year_built_value(primary).map(|year| round_half_up(year) as i32),
        sale_amount: sale_amount(primary).map(to_dollars),
        sale_date: sale_date(primary),
        has_real_assessment_data: assessed_total(primary).is_some()
            || market_total(primary).is_some()
            || tax_amount(primary).is_some(),
        has_real_building_data: year_built(primary).is_some()
            || living_size(primary).is_some()
            || building_size(primary).is_some(),
        has_real_sale_data: sale_amount(primary).is_some()
            || transaction_date(primary).is_some(),
    }
}

/// `oneLine`, else `line1 line2`, else nothing.
pub fn resolve_address(record: &RawPropertyRecord) -> Option<String> {
    let address = record.address.as_ref()?;
    if let Some(one_line) = present_text(address.one_line.as_deref()) {
        return Some(one_line);
    }

    let joined = format!(
        "{} {}",
        address.line1.as_deref().unwrap_or(""),
        address.line2.as_deref().unwrap_or("")
    );
    present_text(Some(joined.trim()))
}

pub fn current_value(record: &RawPropertyRecord) -> Option<f64> {
    first_present(record, &CURRENT_VALUE_CHAIN)
}

pub fn market_value(record: &RawPropertyRecord) -> Option<f64> {
    first_present(record, &MARKET_VALUE_CHAIN)
}

pub fn square_footage(record: &RawPropertyRecord) -> Option<f64> {
    first_present(record, &SQUARE_FOOTAGE_CHAIN)
}

pub fn year_built_value(record: &RawPropertyRecord) -> Option<f64> {
    first_present(record, &YEAR_BUILT_CHAIN)
}

pub fn sale_date(record: &RawPropertyRecord) -> Option<String> {
    first_present(record, &SALE_DATE_CHAIN)
}

pub fn tax_amount(record: &RawPropertyRecord) -> Option<f64> {
    present(record.assessment.as_ref()?.tax.as_ref()?.tax_amt)
}

pub fn building_type(record: &RawPropertyRecord) -> Option<String> {
    present_text(
        record
            .building
            .as_ref()?
            .summary
            .as_ref()?
            .bldg_type
            .as_deref(),
    )
}

fn first_present<T>(record: &RawPropertyRecord, chain: &[Accessor<T>]) -> Option<T> {
    chain.iter().find_map(|accessor| accessor(record))
}

fn assessed_total(record: &RawPropertyRecord) -> Option<f64> {
    present(record.assessment.as_ref()?.assessed.as_ref()?.assd_ttl_value)
}

fn market_total(record: &RawPropertyRecord) -> Option<f64> {
    present(record.assessment.as_ref()?.market.as_ref()?.mkt_ttl_value)
}

fn avm_value(record: &RawPropertyRecord) -> Option<f64> {
    present(record.avm.as_ref()?.amount.as_ref()?.value)
}

fn sale_amount(record: &RawPropertyRecord) -> Option<f64> {
    present(record.sale.as_ref()?.amount.as_ref()?.sale_amt)
}

fn living_size(record: &RawPropertyRecord) -> Option<f64> {
    present(record.building.as_ref()?.size.as_ref()?.living_size)
}

fn building_size(record: &RawPropertyRecord) -> Option<f64> {
    present(record.building.as_ref()?.size.as_ref()?.bldg_size)
}

fn gross_size(record: &RawPropertyRecord) -> Option<f64> {
    present(record.building.as_ref()?.size.as_ref()?.gross_size)
}

fn gross_size_adjusted(record: &RawPropertyRecord) -> Option<f64> {
    present(record.building.as_ref()?.size.as_ref()?.gross_size_adjusted)
}

fn year_built(record: &RawPropertyRecord) -> Option<f64> {
    present(record.building.as_ref()?.construction.as_ref()?.year_built)
}

fn year_built_effective(record: &RawPropertyRecord) -> Option<f64> {
    present(
        record
            .building
            .as_ref()?
            .construction
            .as_ref()?
            .year_built_effective,
    )
}

fn transaction_date(record: &RawPropertyRecord) -> Option<String> {
    present_text(record.sale.as_ref()?.trans_date.as_deref())
}

fn sales_search_date(record: &RawPropertyRecord) -> Option<String> {
    present_text(record.sale.as_ref()?.sales_search_date.as_deref())
}

// Zero is how the provider spells "unknown".
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value != 0.0)
}

fn present_text(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
}

fn to_dollars(value: f64) -> i64 {
    round_half_up(value) as i64
}

#[cfg(test)]
mod tests {
    use super::{
        current_value, extract_fields, market_value, resolve_address, sale_date, square_footage,
        year_built_value,
    };
    use crate::model::{
        ADDRESS_PLACEHOLDER, RawAddress, RawAssessedValues, RawAssessment, RawAvm, RawAvmAmount,
        RawBuilding, RawBuildingSize, RawConstruction, RawMarketValues, RawPropertyRecord,
        RawSale, RawSaleAmount, RawTax,
    };

    fn with_values(
        assessed: Option<f64>,
        market: Option<f64>,
        avm: Option<f64>,
        sale: Option<f64>,
    ) -> RawPropertyRecord {
        RawPropertyRecord {
            assessment: Some(RawAssessment {
                assessed: Some(RawAssessedValues {
                    assd_ttl_value: assessed,
                    ..RawAssessedValues::default()
                }),
                market: Some(RawMarketValues {
                    mkt_ttl_value: market,
                    ..RawMarketValues::default()
                }),
                tax: None,
            }),
            avm: Some(RawAvm {
                amount: Some(RawAvmAmount { value: avm }),
                event_date: None,
            }),
            sale: Some(RawSale {
                amount: Some(RawSaleAmount {
                    sale_amt: sale,
                    sale_amt_stnd_code: None,
                }),
                ..RawSale::default()
            }),
            ..RawPropertyRecord::default()
        }
    }

    fn with_address(one_line: Option<&str>, line1: Option<&str>, line2: Option<&str>) -> RawPropertyRecord {
        RawPropertyRecord {
            address: Some(RawAddress {
                one_line: one_line.map(str::to_owned),
                line1: line1.map(str::to_owned),
                line2: line2.map(str::to_owned),
                ..RawAddress::default()
            }),
            ..RawPropertyRecord::default()
        }
    }

    #[test]
    fn current_value_priority_order() {
        let cases = [
            ((Some(1.0), Some(2.0), Some(3.0), Some(4.0)), Some(1.0)),
            ((None, Some(2.0), Some(3.0), Some(4.0)), Some(2.0)),
            ((Some(0.0), None, Some(3.0), Some(4.0)), Some(3.0)),
            ((None, None, None, Some(4.0)), Some(4.0)),
            ((None, None, None, None), None),
        ];
        for ((assessed, market, avm, sale), expected) in cases {
            let record = with_values(assessed, market, avm, sale);
            assert_eq!(current_value(&record), expected);
        }
    }

    #[test]
    fn market_value_prefers_avm() {
        let cases = [
            ((Some(1.0), Some(2.0), Some(3.0), Some(4.0)), Some(3.0)),
            ((Some(1.0), Some(2.0), None, Some(4.0)), Some(2.0)),
            ((Some(1.0), None, None, Some(4.0)), Some(4.0)),
            ((Some(1.0), None, None, None), None),
        ];
        for ((assessed, market, avm, sale), expected) in cases {
            let record = with_values(assessed, market, avm, sale);
            assert_eq!(market_value(&record), expected);
        }
    }

    #[test]
    fn square_footage_and_year_built_chains() {
        let record = RawPropertyRecord {
            building: Some(RawBuilding {
                size: Some(RawBuildingSize {
                    bldg_size: None,
                    gross_size: Some(2400.0),
                    gross_size_adjusted: Some(2300.0),
                    living_size: Some(0.0),
                }),
                construction: Some(RawConstruction {
                    year_built: None,
                    year_built_effective: Some(1999.0),
                }),
                summary: None,
            }),
            ..RawPropertyRecord::default()
        };
        assert_eq!(square_footage(&record), Some(2400.0));
        assert_eq!(year_built_value(&record), Some(1999.0));

        let fields = extract_fields(&record, None);
        // Effective year and gross size do not count as real building data.
        assert!(!fields.has_real_building_data);
        assert_eq!(fields.square_footage, Some(2400));
        assert_eq!(fields.year_built, Some(1999));
    }

    #[test]
    fn sale_date_prefers_transaction_date() {
        let mut record = RawPropertyRecord {
            sale: Some(RawSale {
                sales_search_date: Some("2019-01-02".to_owned()),
                trans_date: Some("2019-01-05".to_owned()),
                ..RawSale::default()
            }),
            ..RawPropertyRecord::default()
        };
        assert_eq!(sale_date(&record).as_deref(), Some("2019-01-05"));

        if let Some(sale) = record.sale.as_mut() {
            sale.trans_date = Some(String::new());
        }
        assert_eq!(sale_date(&record).as_deref(), Some("2019-01-02"));
        // A search date alone is not enough to call the sale data real.
        assert!(!extract_fields(&record, None).has_real_sale_data);
    }

    #[test]
    fn resolve_address_variants() {
        assert_eq!(
            resolve_address(&with_address(Some("1 A St, B, CA"), Some("x"), None)).as_deref(),
            Some("1 A St, B, CA")
        );
        assert_eq!(
            resolve_address(&with_address(Some(""), Some("1 A St"), Some("B, CA 90001"))).as_deref(),
            Some("1 A St B, CA 90001")
        );
        assert_eq!(
            resolve_address(&with_address(None, None, Some("B, CA"))).as_deref(),
            Some("B, CA")
        );
        assert_eq!(resolve_address(&with_address(None, None, None)), None);
        assert_eq!(resolve_address(&RawPropertyRecord::default()), None);
    }

    #[test]
    fn detail_record_is_primary_but_address_falls_back_to_search() {
        let mut search = with_values(Some(100_000.0), None, None, None);
        search.address = with_address(Some("9 Search Rd, Dallas, TX"), None, None).address;
        let detail = with_values(Some(250_000.0), None, None, None);

        let fields = extract_fields(&search, Some(&detail));
        assert_eq!(fields.current_value, Some(250_000));
        assert_eq!(fields.address, "9 Search Rd, Dallas, TX");

        let empty_detail = RawPropertyRecord::default();
        let fields = extract_fields(&search, Some(&empty_detail));
        // Values never fall back to the search record.
        assert_eq!(fields.current_value, None);
        assert!(!fields.has_real_assessment_data);
    }

    #[test]
    fn missing_address_uses_placeholder() {
        let fields = extract_fields(&RawPropertyRecord::default(), None);
        assert_eq!(fields.address, ADDRESS_PLACEHOLDER);
    }

    #[test]
    fn flags_follow_real_fields() {
        let mut record = with_values(None, None, Some(500_000.0), None);
        let fields = extract_fields(&record, None);
        // AVM alone is not assessment data.
        assert!(!fields.has_real_assessment_data);
        assert_eq!(fields.current_value, Some(500_000));

        record.assessment = Some(RawAssessment {
            tax: Some(RawTax {
                tax_amt: Some(6_123.5),
                tax_year: Some(2024.0),
            }),
            ..RawAssessment::default()
        });
        let fields = extract_fields(&record, None);
        assert!(fields.has_real_assessment_data);
        assert_eq!(fields.tax_amount, Some(6_124));
    }
}
