// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ADDRESS_PLACEHOLDER: &str = "Address not available";

/// One property as returned by the ATTOM property API. Every group and every
/// leaf is optional; providers omit whatever they do not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyRecord {
    pub identifier: Option<RawIdentifier>,
    pub address: Option<RawAddress>,
    pub lot: Option<RawLot>,
    pub building: Option<RawBuilding>,
    pub assessment: Option<RawAssessment>,
    pub sale: Option<RawSale>,
    pub avm: Option<RawAvm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIdentifier {
    #[serde(default, deserialize_with = "lenient_string")]
    pub attom_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fips: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    pub one_line: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub locality: Option<String>,
    pub country_subd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postal1: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLot {
    pub lot_size1: Option<f64>,
    pub lot_size2: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuilding {
    pub size: Option<RawBuildingSize>,
    pub construction: Option<RawConstruction>,
    pub summary: Option<RawBuildingSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuildingSize {
    pub bldg_size: Option<f64>,
    pub gross_size: Option<f64>,
    pub gross_size_adjusted: Option<f64>,
    pub living_size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstruction {
    pub year_built: Option<f64>,
    pub year_built_effective: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuildingSummary {
    pub bldg_type: Option<String>,
    pub levels: Option<f64>,
    pub units_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssessment {
    pub assessed: Option<RawAssessedValues>,
    pub market: Option<RawMarketValues>,
    pub tax: Option<RawTax>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssessedValues {
    pub assd_ttl_value: Option<f64>,
    pub assd_land_value: Option<f64>,
    pub assd_imp_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarketValues {
    pub mkt_ttl_value: Option<f64>,
    pub mkt_land_value: Option<f64>,
    pub mkt_imp_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTax {
    pub tax_amt: Option<f64>,
    pub tax_year: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSale {
    pub amount: Option<RawSaleAmount>,
    pub calculation: Option<RawSaleCalculation>,
    pub sales_search_date: Option<String>,
    pub trans_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSaleAmount {
    pub sale_amt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sale_amt_stnd_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSaleCalculation {
    pub price_per_sqft: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvm {
    pub amount: Option<RawAvmAmount>,
    pub event_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvmAmount {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    pub version: Option<String>,
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub total: Option<i64>,
    pub response_date_time: Option<String>,
    #[serde(rename = "transactionID")]
    pub transaction_id: Option<String>,
}

/// Envelope shared by the search and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default)]
    pub property: Vec<RawPropertyRecord>,
}

impl PropertyResponse {
    pub fn from_json(raw: &str) -> Result<Self, RecordDecodeError> {
        Self::from_slice(raw.as_bytes())
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, RecordDecodeError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(RecordDecodeError::EmptyBody);
        }
        serde_json::from_slice(raw).map_err(RecordDecodeError::Malformed)
    }

    pub fn first_property(&self) -> Option<&RawPropertyRecord> {
        self.property.first()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref()?.msg.as_deref()
    }
}

/// Raised only when a payload cannot be read as a property envelope at all.
/// Missing fields inside a record are never an error.
#[derive(Debug)]
pub enum RecordDecodeError {
    EmptyBody,
    Malformed(serde_json::Error),
}

impl std::fmt::Display for RecordDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody => f.write_str("property payload is empty"),
            Self::Malformed(error) => write!(f, "property payload has an unexpected shape: {error}"),
        }
    }
}

impl std::error::Error for RecordDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyBody => None,
            Self::Malformed(error) => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    SingleFamily,
    Condominium,
    Townhouse,
    Duplex,
    MultiFamily,
    Commercial,
    Industrial,
    Retail,
    VacantLand,
    Other(String),
}

impl PropertyType {
    pub const KNOWN: [Self; 9] = [
        Self::SingleFamily,
        Self::Condominium,
        Self::Townhouse,
        Self::Duplex,
        Self::MultiFamily,
        Self::Commercial,
        Self::Industrial,
        Self::Retail,
        Self::VacantLand,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::SingleFamily => "Single Family Residence",
            Self::Condominium => "Condominium",
            Self::Townhouse => "Townhouse",
            Self::Duplex => "Duplex",
            Self::MultiFamily => "Multi-Family",
            Self::Commercial => "Commercial",
            Self::Industrial => "Industrial",
            Self::Retail => "Retail",
            Self::VacantLand => "Vacant Land",
            Self::Other(raw) => raw,
        }
    }

    /// Inverse of [`PropertyType::label`]; unknown labels are kept verbatim.
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.label() == label)
            .unwrap_or_else(|| Self::Other(label.to_owned()))
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PropertyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQuality {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            _ => None,
        }
    }

    pub const fn from_flags(assessment: bool, building: bool, sale: bool) -> Self {
        if assessment && building && sale {
            Self::Excellent
        } else if assessment && (building || sale) {
            Self::Good
        } else if assessment || building || sale {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Normalized, fully populated view of one property. Built once per lookup
/// and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyData {
    pub address: String,
    pub property_type: PropertyType,
    pub current_value: i64,
    pub previous_value: i64,
    pub current_tax: i64,
    pub previous_tax: i64,
    pub tax_increase: f64,
    pub market_value: i64,
    pub square_footage: u32,
    pub year_built: i32,
    pub last_sale_price: i64,
    pub last_sale_date: String,
    pub has_real_assessment_data: bool,
    pub has_real_building_data: bool,
    pub has_real_sale_data: bool,
    pub data_quality: DataQuality,
}

impl PropertyData {
    pub fn has_all_real_data(&self) -> bool {
        self.has_real_assessment_data && self.has_real_building_data && self.has_real_sale_data
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

// ATTOM sends identifiers and codes as numbers on some endpoints and as
// strings on others.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        StringOrNumber::Text(text) => text,
        StringOrNumber::Integer(number) => number.to_string(),
        StringOrNumber::Decimal(number) => number.to_string(),
    }))
}
