// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use taxlens_app::{
    PropertyResponse, RawAddress, RawAssessedValues, RawAssessment, RawAvm, RawAvmAmount,
    RawBuilding, RawBuildingSize, RawBuildingSummary, RawConstruction, RawIdentifier,
    RawMarketValues, RawPropertyRecord, RawSale, RawSaleAmount, RawTax, ResponseStatus,
};

const CITIES: [(&str, &str); 16] = [
    ("Austin", "TX"),
    ("Houston", "TX"),
    ("Fresno", "CA"),
    ("San Diego", "CA"),
    ("Buffalo", "NY"),
    ("Tampa", "FL"),
    ("Duluth", "MN"),
    ("Peoria", "IL"),
    ("Spokane", "WA"),
    ("Denver", "CO"),
    ("Tucson", "AZ"),
    ("Reno", "NV"),
    ("Trenton", "NJ"),
    ("Nashua", "NH"),
    ("Boise", "ID"),
    ("Omaha", "NE"),
];
const STREET_NAMES: [&str; 18] = [
    "Cedar",
    "Maple",
    "Oak",
    "Pine",
    "Willow",
    "Elm",
    "Birch",
    "Juniper",
    "Sunset",
    "Ridge",
    "Valley",
    "Lakeview",
    "Northview",
    "Hillcrest",
    "Brookside",
    "Meadow",
    "Aspen",
    "Canyon",
];
const STREET_SUFFIXES: [&str; 6] = ["St", "Ave", "Ln", "Dr", "Ct", "Blvd"];
const BUILDING_TYPES: [&str; 12] = [
    "SINGLE FAMILY RESIDENCE",
    "SFR",
    "CONDOMINIUM",
    "TOWNHOUSE/ROWHOUSE",
    "DUPLEX",
    "APARTMENT",
    "MULTI-FAMILY DWELLING",
    "OFFICE BUILDING",
    "INDUSTRIAL",
    "RETAIL",
    "VACANT LAND",
    "MOBILE HOME",
];

/// Address-search response for one Denver property.
pub const SEARCH_RESPONSE_JSON: &str = r#"{
  "status": {
    "version": "1.0.0",
    "code": 0,
    "msg": "SuccessWithResult",
    "total": 1,
    "transactionID": "8d3c9a7e5f1b"
  },
  "property": [
    {
      "identifier": { "Id": 184713191, "fips": "08031", "apn": "0219419013000", "attomId": 184713191 },
      "address": {
        "country": "US",
        "countrySubd": "CO",
        "line1": "4529 WINONA CT",
        "line2": "DENVER, CO 80212",
        "locality": "DENVER",
        "oneLine": "4529 WINONA CT, DENVER, CO 80212",
        "postal1": "80212"
      },
      "location": { "latitude": "39.778301", "longitude": "-105.047072" }
    }
  ]
}"#;

/// Detail response for the property in [`SEARCH_RESPONSE_JSON`].
pub const DETAIL_RESPONSE_JSON: &str = r#"{
  "status": { "version": "1.0.0", "code": 0, "msg": "SuccessWithResult", "total": 1 },
  "property": [
    {
      "identifier": { "attomId": 184713191, "fips": "08031" },
      "address": { "oneLine": "4529 WINONA CT, DENVER, CO 80212", "postal1": 80212 },
      "lot": { "lotSize1": 0.1438, "lotSize2": 6264, "pooltype": "NO POOL" },
      "building": {
        "size": { "bldgSize": 2118, "grossSize": 2118, "livingSize": 1710 },
        "construction": { "yearBuilt": 1900, "yearBuiltEffective": 1994 },
        "summary": { "bldgType": "SINGLE FAMILY RESIDENCE", "levels": 2 }
      },
      "assessment": {
        "assessed": { "assdTtlValue": 452000, "assdImpValue": 318000, "assdLandValue": 134000 },
        "market": { "mktTtlValue": 565000 },
        "tax": { "taxAmt": 3194.12, "taxYear": 2024 }
      },
      "sale": {
        "amount": { "saleAmt": 735000, "saleAmtStndCode": "AM" },
        "calculation": { "pricePerSizeUnit": 347.02 },
        "salesSearchDate": "2018-08-10",
        "transDate": "2018-08-10"
      },
      "avm": { "amount": { "value": 742000 }, "eventDate": "2025-01-15" }
    }
  ]
}"#;

/// What the address endpoint sends, with HTTP 400, when nothing matched.
pub const NO_RESULT_JSON: &str = r#"{
  "status": {
    "version": "1.0.0",
    "code": 1,
    "msg": "SuccessWithoutResult",
    "total": 0
  }
}"#;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of provider records with a random mix of missing groups.
#[derive(Debug, Clone)]
pub struct PropertyFaker {
    rng: DeterministicRng,
}

impl PropertyFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn address(&mut self) -> String {
        let (city, state) = CITIES[self.rng.int_n(CITIES.len())];
        format!(
            "{} {} {}, {city}, {state} {:05}",
            self.int_range(1, 9999),
            self.pick(&STREET_NAMES),
            self.pick(&STREET_SUFFIXES),
            self.int_range(10_000, 99_999),
        )
    }

    pub fn building_type(&mut self) -> &'static str {
        BUILDING_TYPES[self.rng.int_n(BUILDING_TYPES.len())]
    }

    /// Each data group is present with probability one half.
    pub fn record(&mut self) -> RawPropertyRecord {
        let assessment = self.rng.bool();
        let building = self.rng.bool();
        let sale = self.rng.bool();
        self.record_with_groups(assessment, building, sale)
    }

    pub fn record_with_groups(
        &mut self,
        assessment: bool,
        building: bool,
        sale: bool,
    ) -> RawPropertyRecord {
        let mut builder = RecordBuilder::new(&self.address())
            .attom_id(&self.int_range(100_000_000, 299_999_999).to_string());

        if assessment {
            let assessed = self.int_range(60_000, 1_400_000);
            builder = builder
                .assessed_total(assessed as f64)
                .tax_amount(assessed as f64 * 0.012 + self.int_range(0, 99) as f64 / 100.0);
            if self.rng.bool() {
                builder = builder.market_total((assessed + self.int_range(0, 90_000)) as f64);
            }
        }

        if building {
            builder = builder
                .living_size(self.int_range(600, 5_200) as f64)
                .year_built(self.int_range(1880, 2025) as f64)
                .building_type(self.building_type());
        }

        if sale {
            builder = builder
                .sale_amount(self.int_range(50_000, 1_600_000) as f64)
                .transaction_date(&format!(
                    "{}-{:02}-{:02}",
                    self.int_range(1990, 2025),
                    self.int_range(1, 12),
                    self.int_range(1, 28)
                ));
        }

        builder.build()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Builds sparse provider records field by field.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: RawPropertyRecord,
}

impl RecordBuilder {
    pub fn new(one_line: &str) -> Self {
        Self::empty().one_line(one_line)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn one_line(mut self, one_line: &str) -> Self {
        self.address().one_line = Some(one_line.to_owned());
        self
    }

    pub fn lines(mut self, line1: &str, line2: &str) -> Self {
        let address = self.address();
        address.line1 = Some(line1.to_owned());
        address.line2 = Some(line2.to_owned());
        self
    }

    pub fn attom_id(mut self, attom_id: &str) -> Self {
        self.record
            .identifier
            .get_or_insert_with(RawIdentifier::default)
            .attom_id = Some(attom_id.to_owned());
        self
    }

    pub fn assessed_total(mut self, value: f64) -> Self {
        self.assessment()
            .assessed
            .get_or_insert_with(RawAssessedValues::default)
            .assd_ttl_value = Some(value);
        self
    }

    pub fn market_total(mut self, value: f64) -> Self {
        self.assessment()
            .market
            .get_or_insert_with(RawMarketValues::default)
            .mkt_ttl_value = Some(value);
        self
    }

    pub fn tax_amount(mut self, value: f64) -> Self {
        self.assessment()
            .tax
            .get_or_insert_with(RawTax::default)
            .tax_amt = Some(value);
        self
    }

    pub fn avm_value(mut self, value: f64) -> Self {
        self.record
            .avm
            .get_or_insert_with(RawAvm::default)
            .amount
            .get_or_insert_with(RawAvmAmount::default)
            .value = Some(value);
        self
    }

    pub fn living_size(mut self, value: f64) -> Self {
        self.size().living_size = Some(value);
        self
    }

    pub fn building_size(mut self, value: f64) -> Self {
        self.size().bldg_size = Some(value);
        self
    }

    pub fn gross_size(mut self, value: f64) -> Self {
        self.size().gross_size = Some(value);
        self
    }

    pub fn year_built(mut self, value: f64) -> Self {
        self.building()
            .construction
            .get_or_insert_with(RawConstruction::default)
            .year_built = Some(value);
        self
    }

    pub fn effective_year_built(mut self, value: f64) -> Self {
        self.building()
            .construction
            .get_or_insert_with(RawConstruction::default)
            .year_built_effective = Some(value);
        self
    }

    pub fn building_type(mut self, value: &str) -> Self {
        self.building()
            .summary
            .get_or_insert_with(RawBuildingSummary::default)
            .bldg_type = Some(value.to_owned());
        self
    }

    pub fn sale_amount(mut self, value: f64) -> Self {
        self.sale()
            .amount
            .get_or_insert_with(RawSaleAmount::default)
            .sale_amt = Some(value);
        self
    }

    pub fn transaction_date(mut self, value: &str) -> Self {
        self.sale().trans_date = Some(value.to_owned());
        self
    }

    pub fn sales_search_date(mut self, value: &str) -> Self {
        self.sale().sales_search_date = Some(value.to_owned());
        self
    }

    pub fn build(self) -> RawPropertyRecord {
        self.record
    }

    fn address(&mut self) -> &mut RawAddress {
        self.record.address.get_or_insert_with(RawAddress::default)
    }

    fn assessment(&mut self) -> &mut RawAssessment {
        self.record
            .assessment
            .get_or_insert_with(RawAssessment::default)
    }

    fn building(&mut self) -> &mut RawBuilding {
        self.record.building.get_or_insert_with(RawBuilding::default)
    }

    fn size(&mut self) -> &mut RawBuildingSize {
        self.building()
            .size
            .get_or_insert_with(RawBuildingSize::default)
    }

    fn sale(&mut self) -> &mut RawSale {
        self.record.sale.get_or_insert_with(RawSale::default)
    }
}

/// Wraps records in a success envelope, as the provider would send them.
pub fn response_json(records: &[RawPropertyRecord]) -> Result<String> {
    let response = PropertyResponse {
        status: Some(ResponseStatus {
            code: Some(0),
            msg: Some("SuccessWithResult".to_owned()),
            total: Some(records.len() as i64),
            ..ResponseStatus::default()
        }),
        property: records.to_vec(),
    };
    serde_json::to_string_pretty(&response).context("encode property response")
}

pub fn search_fixture() -> Result<PropertyResponse> {
    PropertyResponse::from_json(SEARCH_RESPONSE_JSON).context("decode search fixture")
}

pub fn detail_fixture() -> Result<PropertyResponse> {
    PropertyResponse::from_json(DETAIL_RESPONSE_JSON).context("decode detail fixture")
}

/// Writes `contents` to `name` inside a fresh temp dir; keep the dir alive
/// for as long as the file is needed.
pub fn temp_fixture_file(name: &str, contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("taxlens").join("config.toml");
    Ok((dir, path))
}
