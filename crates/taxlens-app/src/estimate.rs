// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic fallback figures for properties the provider knows little
//! about. Nothing here is a statistical model: every estimate is a regional
//! base value nudged by a bounded offset derived from the address seed, so the
//! same address always produces the same numbers.

use time::OffsetDateTime;

use crate::model::PropertyType;
use crate::seed::AddressSeed;

const CALIFORNIA: [&str; 2] = ["ca", "california"];
const NEW_YORK: [&str; 2] = ["ny", "new york"];
const TEXAS: [&str; 2] = ["tx", "texas"];
const FLORIDA: [&str; 2] = ["fl", "florida"];
const MINNESOTA: [&str; 2] = ["mn", "minnesota"];
const ILLINOIS: [&str; 2] = ["il", "illinois"];
const WASHINGTON: [&str; 2] = ["wa", "washington"];
const COLORADO: [&str; 2] = ["co", "colorado"];
const ARIZONA: [&str; 2] = ["az", "arizona"];
const NEVADA: [&str; 2] = ["nv", "nevada"];
const NEW_JERSEY: [&str; 2] = ["nj", "new jersey"];
const NEW_HAMPSHIRE: [&str; 2] = ["nh", "new hampshire"];

pub const MIN_YEAR_BUILT: i32 = 1900;

/// `(seed % modulus) / divisor - offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    pub modulus: u32,
    pub divisor: f64,
    pub offset: f64,
}

impl Perturbation {
    pub const fn new(modulus: u32, divisor: f64, offset: f64) -> Self {
        Self {
            modulus,
            divisor,
            offset,
        }
    }

    pub fn sample(&self, seed: AddressSeed) -> f64 {
        f64::from(seed.get() % self.modulus.max(1)) / self.divisor - self.offset
    }

    /// Smallest and largest values [`Perturbation::sample`] can return.
    pub fn bounds(&self) -> (f64, f64) {
        let low = -self.offset;
        let high = f64::from(self.modulus.max(1) - 1) / self.divisor - self.offset;
        (low, high)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry<T> {
    pub tokens: Vec<String>,
    pub value: T,
}

/// Region-keyed constants. An address belongs to the first region whose
/// tokens appear anywhere in the lowercased address; tokens are plain
/// substrings, not words.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable<T> {
    entries: Vec<RegionEntry<T>>,
    default: T,
}

impl<T: Copy> RegionTable<T> {
    pub fn new(default: T) -> Self {
        Self {
            entries: Vec::new(),
            default,
        }
    }

    pub fn with_region(mut self, tokens: &[&str], value: T) -> Self {
        self.entries.push(RegionEntry {
            tokens: tokens.iter().map(|token| token.to_lowercase()).collect(),
            value,
        });
        self
    }

    pub fn entries(&self) -> &[RegionEntry<T>] {
        &self.entries
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    pub fn lookup(&self, address: &str) -> T {
        let lowered = address.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.tokens.iter().any(|token| lowered.contains(token.as_str())))
            .map_or(self.default, |entry| entry.value)
    }
}

/// Property-type-keyed constants, matched against the type's display label.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTable<T> {
    entries: Vec<(PropertyType, T)>,
    default: T,
}

impl<T: Copy> TypeTable<T> {
    pub fn new(default: T) -> Self {
        Self {
            entries: Vec::new(),
            default,
        }
    }

    pub fn with_type(mut self, property_type: PropertyType, value: T) -> Self {
        self.entries.push((property_type, value));
        self
    }

    pub fn lookup(&self, property_type: &PropertyType) -> T {
        let label = property_type.label();
        self.entries
            .iter()
            .find(|(key, _)| label.contains(key.label()))
            .map_or(self.default, |(_, value)| *value)
    }
}

/// Every constant the estimators use. [`EstimationTables::default`] carries
/// the calibrated production values; tests and callers can swap any table.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationTables {
    pub base_value: RegionTable<f64>,
    pub type_multiplier: TypeTable<f64>,
    pub base_value_variation: Perturbation,
    pub square_footage: TypeTable<f64>,
    pub square_footage_region_factor: RegionTable<f64>,
    pub square_footage_variation: Perturbation,
    pub tax_rate: RegionTable<f64>,
    pub tax_rate_variation: Perturbation,
    pub value_increase_rate: RegionTable<f64>,
    pub value_increase_variation: Perturbation,
    pub tax_increase_rate: RegionTable<f64>,
    pub tax_increase_variation: Perturbation,
    /// Share of the value growth rate that reaches the tax bill.
    pub tax_growth_share: f64,
    pub year_built: RegionTable<i32>,
    pub year_built_variation: Perturbation,
    pub sale_price_ratio: Perturbation,
    pub market_value_ratio: Perturbation,
    pub sale_years: [i32; 5],
    pub sale_months: [u8; 12],
    pub sale_days: [u8; 6],
}

impl Default for EstimationTables {
    fn default() -> Self {
        Self {
            base_value: RegionTable::new(350_000.0)
                .with_region(&CALIFORNIA, 750_000.0)
                .with_region(&NEW_YORK, 550_000.0)
                .with_region(&TEXAS, 320_000.0)
                .with_region(&FLORIDA, 380_000.0)
                .with_region(&MINNESOTA, 340_000.0)
                .with_region(&ILLINOIS, 280_000.0)
                .with_region(&WASHINGTON, 580_000.0)
                .with_region(&COLORADO, 520_000.0)
                .with_region(&ARIZONA, 420_000.0)
                .with_region(&NEVADA, 450_000.0),
            type_multiplier: TypeTable::new(1.0)
                .with_type(PropertyType::Condominium, 0.85)
                .with_type(PropertyType::Townhouse, 0.95)
                .with_type(PropertyType::MultiFamily, 1.3)
                .with_type(PropertyType::Commercial, 1.5),
            base_value_variation: Perturbation::new(300, 1000.0, 0.15),
            square_footage: TypeTable::new(2000.0)
                .with_type(PropertyType::Condominium, 1400.0)
                .with_type(PropertyType::Townhouse, 1800.0)
                .with_type(PropertyType::MultiFamily, 2800.0)
                .with_type(PropertyType::Commercial, 4000.0),
            square_footage_region_factor: RegionTable::new(1.0)
                .with_region(&TEXAS, 1.1)
                .with_region(&CALIFORNIA, 0.9),
            square_footage_variation: Perturbation::new(400, 1000.0, 0.2),
            tax_rate: RegionTable::new(0.011)
                .with_region(&TEXAS, 0.017)
                .with_region(&CALIFORNIA, 0.007)
                .with_region(&NEW_YORK, 0.014)
                .with_region(&FLORIDA, 0.009)
                .with_region(&MINNESOTA, 0.010)
                .with_region(&ILLINOIS, 0.021)
                .with_region(&NEW_JERSEY, 0.023)
                .with_region(&NEW_HAMPSHIRE, 0.018),
            tax_rate_variation: Perturbation::new(100, 10_000.0, 0.005),
            value_increase_rate: RegionTable::new(0.08)
                .with_region(&FLORIDA, 0.12)
                .with_region(&TEXAS, 0.10)
                .with_region(&CALIFORNIA, 0.06)
                .with_region(&NEW_YORK, 0.07),
            value_increase_variation: Perturbation::new(60, 1000.0, 0.03),
            tax_increase_rate: RegionTable::new(0.10)
                .with_region(&CALIFORNIA, 0.06)
                .with_region(&TEXAS, 0.12)
                .with_region(&FLORIDA, 0.11),
            tax_increase_variation: Perturbation::new(40, 1000.0, 0.02),
            tax_growth_share: 0.7,
            year_built: RegionTable::new(1985)
                .with_region(&CALIFORNIA, 1975)
                .with_region(&TEXAS, 1995)
                .with_region(&FLORIDA, 1990)
                .with_region(&NEW_YORK, 1965),
            year_built_variation: Perturbation::new(300, 10.0, 15.0),
            sale_price_ratio: Perturbation::new(200, 1000.0, -0.9),
            market_value_ratio: Perturbation::new(150, 1000.0, -0.95),
            sale_years: [2020, 2021, 2022, 2023, 2024],
            sale_months: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            sale_days: [1, 5, 10, 15, 20, 25],
        }
    }
}

/// Pure estimators over a fixed set of tables and a fixed "current year".
#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    tables: EstimationTables,
    current_year: i32,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_tables(EstimationTables::default())
    }
}

impl Estimator {
    pub fn new(tables: EstimationTables, current_year: i32) -> Self {
        Self {
            tables,
            current_year: current_year.max(MIN_YEAR_BUILT),
        }
    }

    /// Uses the calendar year at construction time as the upper bound for
    /// year-built estimates.
    pub fn with_tables(tables: EstimationTables) -> Self {
        Self::new(tables, OffsetDateTime::now_utc().year())
    }

    pub fn tables(&self) -> &EstimationTables {
        &self.tables
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn base_value(&self, address: &str, property_type: &PropertyType, seed: AddressSeed) -> i64 {
        let base = self.tables.base_value.lookup(address);
        let multiplier = self.tables.type_multiplier.lookup(property_type);
        let variation = self.tables.base_value_variation.sample(seed);
        round_half_up(base * multiplier * (1.0 + variation)) as i64
    }

    pub fn square_footage(
        &self,
        property_type: &PropertyType,
        address: &str,
        seed: AddressSeed,
    ) -> u32 {
        let base = self.tables.square_footage.lookup(property_type);
        let base = round_half_up(base * self.tables.square_footage_region_factor.lookup(address));
        let variation = self.tables.square_footage_variation.sample(seed);
        let size = round_half_up(base * (1.0 + variation));
        size.clamp(1.0, f64::from(u32::MAX)) as u32
    }

    pub fn tax_rate(&self, address: &str, seed: AddressSeed) -> f64 {
        self.tables.tax_rate.lookup(address) + self.tables.tax_rate_variation.sample(seed)
    }

    pub fn value_increase_rate(&self, address: &str, seed: AddressSeed) -> f64 {
        self.tables.value_increase_rate.lookup(address)
            + self.tables.value_increase_variation.sample(seed)
    }

    /// Percentage with one decimal, e.g. `11.3`.
    pub fn tax_increase_rate(&self, address: &str, seed: AddressSeed) -> f64 {
        let rate = self.tables.tax_increase_rate.lookup(address)
            + self.tables.tax_increase_variation.sample(seed);
        round_half_up(rate * 100.0 * 10.0) / 10.0
    }

    pub fn tax_growth_share(&self) -> f64 {
        self.tables.tax_growth_share
    }

    pub fn year_built(&self, address: &str, seed: AddressSeed) -> i32 {
        let base = f64::from(self.tables.year_built.lookup(address));
        let year = round_half_up(base + self.tables.year_built_variation.sample(seed));
        self.clamp_year(year)
    }

    pub fn clamp_year(&self, year: f64) -> i32 {
        year.clamp(f64::from(MIN_YEAR_BUILT), f64::from(self.current_year)) as i32
    }

    pub fn sale_price(&self, current_value: i64, seed: AddressSeed) -> i64 {
        let ratio = self.tables.sale_price_ratio.sample(seed);
        round_half_up(current_value as f64 * ratio) as i64
    }

    /// Market value for records with no AVM, market, or sale figure at all.
    pub fn market_value(&self, current_value: i64, seed: AddressSeed) -> i64 {
        let ratio = self.tables.market_value_ratio.sample(seed);
        round_half_up(current_value as f64 * ratio) as i64
    }

    pub fn sale_date(&self, seed: AddressSeed) -> String {
        let tables = &self.tables;
        let year = tables.sale_years[seed.scaled_index(1, tables.sale_years.len())];
        let month = tables.sale_months[seed.scaled_index(2, tables.sale_months.len())];
        let day = tables.sale_days[seed.scaled_index(3, tables.sale_days.len())];
        format!("{year:04}-{month:02}-{day:02}")
    }
}

/// Rounds half-way cases toward positive infinity (`-2.5` becomes `-2`), the
/// convention every figure in this crate was calibrated with.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EstimationTables, Estimator, MIN_YEAR_BUILT, Perturbation, RegionTable, round_half_up,
    };
    use crate::model::PropertyType;
    use crate::seed::{AddressSeed, address_seed};

    fn estimator() -> Estimator {
        Estimator::new(EstimationTables::default(), 2026)
    }

    #[test]
    fn round_half_up_matches_expected_convention() {
        let cases = [
            (0.5, 1.0),
            (1.49, 1.0),
            (2.5, 3.0),
            (-2.5, -2.0),
            (-2.51, -3.0),
            (0.499_999_999_999_999_94, 0.0),
            (1_970.5, 1_971.0),
        ];
        for (input, expected) in cases {
            assert_eq!(round_half_up(input), expected, "input={input}");
        }
    }

    #[test]
    fn perturbation_samples_stay_within_bounds() {
        let perturbation = Perturbation::new(300, 1000.0, 0.15);
        let (low, high) = perturbation.bounds();
        assert!((low + 0.15).abs() < 1e-12);
        assert!((high - 0.149).abs() < 1e-12);
        for raw in [0_u32, 1, 299, 300, 12_345, u32::MAX] {
            let sample = perturbation.sample(AddressSeed::new(raw));
            assert!(sample >= low && sample <= high, "raw={raw} sample={sample}");
        }
    }

    #[test]
    fn region_lookup_is_substring_based_and_ordered() {
        let table = RegionTable::new(0)
            .with_region(&["ca", "california"], 1)
            .with_region(&["tx", "texas"], 2);
        assert_eq!(table.lookup("500 Oak Lane, Austin, TX"), 2);
        // "Cary" contains "ca", which beats the later Texas entry.
        assert_eq!(table.lookup("1 Cary Pkwy, Plano, TX"), 1);
        assert_eq!(table.lookup("7 Elm St, Boise, ID"), 0);
        assert_eq!(table.default_value(), 0);
        assert_eq!(table.entries().len(), 2);
    }

    #[test]
    fn base_value_uses_region_type_and_seed() {
        let estimator = estimator();
        let address = "500 Oak Lane, Austin, TX";
        let seed = address_seed(address);
        // seed % 300 == 4, so the variation is -0.146.
        assert_eq!(seed.get() % 300, 4);
        assert_eq!(
            estimator.base_value(address, &PropertyType::SingleFamily, seed),
            273_280
        );
        assert_eq!(
            estimator.base_value(address, &PropertyType::Condominium, seed),
            232_288
        );
    }

    #[test]
    fn base_value_spans_fifteen_percent() {
        let estimator = estimator();
        let address = "1 Nowhere Rd, Boise, ID";
        let low = estimator.base_value(address, &PropertyType::SingleFamily, AddressSeed::new(0));
        let high =
            estimator.base_value(address, &PropertyType::SingleFamily, AddressSeed::new(299));
        assert_eq!(low, 297_500);
        assert_eq!(high, 402_150);
    }

    #[test]
    fn square_footage_applies_type_region_and_variation() {
        let estimator = estimator();
        let seed = AddressSeed::new(200);
        assert_eq!(
            estimator.square_footage(&PropertyType::SingleFamily, "Boise, ID", seed),
            2000
        );
        assert_eq!(
            estimator.square_footage(&PropertyType::SingleFamily, "Austin, TX", seed),
            2200
        );
        assert_eq!(
            estimator.square_footage(&PropertyType::Condominium, "Fresno, CA", seed),
            1260
        );
        assert_eq!(
            estimator.square_footage(
                &PropertyType::Commercial,
                "Boise, ID",
                AddressSeed::new(0)
            ),
            3200
        );
    }

    #[test]
    fn rates_add_seed_offsets_to_region_bases() {
        let estimator = estimator();
        let seed = AddressSeed::new(50);
        assert!((estimator.tax_rate("Newark, NJ", seed) - 0.023).abs() < 1e-12);
        assert!((estimator.tax_rate("Boise, ID", AddressSeed::new(0)) - 0.006).abs() < 1e-12);
        assert!((estimator.value_increase_rate("Miami, FL", AddressSeed::new(30)) - 0.12).abs() < 1e-12);
        assert!((estimator.value_increase_rate("Boise, ID", AddressSeed::new(0)) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn tax_increase_rate_is_a_one_decimal_percentage() {
        let estimator = estimator();
        assert_eq!(estimator.tax_increase_rate("Austin, TX", AddressSeed::new(20)), 12.0);
        assert_eq!(estimator.tax_increase_rate("Fresno, CA", AddressSeed::new(0)), 4.0);
        assert_eq!(estimator.tax_increase_rate("Boise, ID", AddressSeed::new(39)), 11.9);
    }

    #[test]
    fn year_built_follows_region_and_seed() {
        let estimator = estimator();
        assert_eq!(estimator.year_built("Boise, ID", AddressSeed::new(150)), 1985);
        assert_eq!(estimator.year_built("Brooklyn, NY", AddressSeed::new(0)), 1950);
        assert_eq!(estimator.year_built("Austin, TX", AddressSeed::new(299)), 2010);
        // 1985 - 14.5 rounds up to 1971.
        assert_eq!(estimator.year_built("Boise, ID", AddressSeed::new(5)), 1971);
    }

    #[test]
    fn year_built_is_clamped_at_extreme_seeds() {
        let mut tables = EstimationTables::default();
        tables.year_built = RegionTable::new(1890).with_region(&["future"], 2030);
        let estimator = Estimator::new(tables, 2026);

        for raw in [0_u32, 1, 149, 299, u32::MAX] {
            let seed = AddressSeed::new(raw);
            let old = estimator.year_built("1 Old Rd", seed);
            let new = estimator.year_built("1 Future Way", seed);
            assert!((MIN_YEAR_BUILT..=2026).contains(&old), "raw={raw} old={old}");
            assert!((MIN_YEAR_BUILT..=2026).contains(&new), "raw={raw} new={new}");
        }
        assert_eq!(estimator.year_built("1 Old Rd", AddressSeed::new(0)), 1900);
        assert_eq!(estimator.year_built("1 Future Way", AddressSeed::new(299)), 2026);
    }

    #[test]
    fn sale_price_and_market_value_ratios() {
        let estimator = estimator();
        assert_eq!(estimator.sale_price(400_000, AddressSeed::new(0)), 360_000);
        assert_eq!(estimator.sale_price(400_000, AddressSeed::new(199)), 439_600);
        assert_eq!(estimator.market_value(400_000, AddressSeed::new(0)), 380_000);
        assert_eq!(estimator.market_value(400_000, AddressSeed::new(149)), 439_600);
    }

    #[test]
    fn sale_date_picks_from_fixed_lists() {
        let estimator = estimator();
        assert_eq!(estimator.sale_date(AddressSeed::new(0)), "2020-01-01");
        assert_eq!(estimator.sale_date(AddressSeed::new(7)), "2022-03-15");
        assert_eq!(estimator.sale_date(AddressSeed::new(u32::MAX)), "2020-07-15");
    }

    #[test]
    fn current_year_never_drops_below_minimum() {
        let estimator = Estimator::new(EstimationTables::default(), 1800);
        assert_eq!(estimator.current_year(), MIN_YEAR_BUILT);
    }
}
