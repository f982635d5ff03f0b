use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{EnumCount, IntoEnumIterator};

use crate::form::{FieldId, FieldValue, NumberKind};

/// Number of columns the price model is trained on.
pub const FEATURE_COUNT: usize = FieldId::COUNT;

/// Column names in the order the model expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Characteristics_LotSizeSquareFeet",
    "ImageData_c1c6_summary_bathroom",
    "ImageData_c1c6_summary_exterior",
    "ImageData_c1c6_summary_interior",
    "ImageData_c1c6_summary_kitchen",
    "ImageData_c1c6_summary_property",
    "ImageData_q1q6_summary_bathroom",
    "ImageData_q1q6_summary_exterior",
    "ImageData_q1q6_summary_interior",
    "ImageData_q1q6_summary_kitchen",
    "ImageData_q1q6_summary_property",
    "Location_GIS_Latitude",
    "Location_GIS_Longitude",
    "Structure_BathroomsFull",
    "Structure_BathroomsHalf",
    "Structure_BedroomsTotal",
    "Structure_BelowGradeFinishedArea",
    "Structure_BelowGradeUnfinishedArea",
    "Structure_FireplacesTotal",
    "Structure_GarageSpaces",
    "Structure_LivingArea",
    "Structure_YearBuilt",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Feature record must be a JSON object")]
    NotAnObject,
    #[error("Missing feature: {0}")]
    MissingField(String),
    #[error("Unexpected feature: {0}")]
    UnexpectedField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// One row of model input. Field order matches [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    #[serde(rename = "Characteristics_LotSizeSquareFeet")]
    pub lot_size_square_feet: i64,
    #[serde(rename = "ImageData_c1c6_summary_bathroom")]
    pub bathroom_condition: f64,
    #[serde(rename = "ImageData_c1c6_summary_exterior")]
    pub exterior_condition: f64,
    #[serde(rename = "ImageData_c1c6_summary_interior")]
    pub interior_condition: f64,
    #[serde(rename = "ImageData_c1c6_summary_kitchen")]
    pub kitchen_condition: f64,
    #[serde(rename = "ImageData_c1c6_summary_property")]
    pub property_condition: f64,
    #[serde(rename = "ImageData_q1q6_summary_bathroom")]
    pub bathroom_quality: f64,
    #[serde(rename = "ImageData_q1q6_summary_exterior")]
    pub exterior_quality: f64,
    #[serde(rename = "ImageData_q1q6_summary_interior")]
    pub interior_quality: f64,
    #[serde(rename = "ImageData_q1q6_summary_kitchen")]
    pub kitchen_quality: f64,
    #[serde(rename = "ImageData_q1q6_summary_property")]
    pub property_quality: f64,
    #[serde(rename = "Location_GIS_Latitude")]
    pub latitude: f64,
    #[serde(rename = "Location_GIS_Longitude")]
    pub longitude: f64,
    #[serde(rename = "Structure_BathroomsFull")]
    pub bathrooms_full: i64,
    #[serde(rename = "Structure_BathroomsHalf")]
    pub bathrooms_half: i64,
    #[serde(rename = "Structure_BedroomsTotal")]
    pub bedrooms_total: i64,
    #[serde(rename = "Structure_BelowGradeFinishedArea")]
    pub below_grade_finished_area: i64,
    #[serde(rename = "Structure_BelowGradeUnfinishedArea")]
    pub below_grade_unfinished_area: i64,
    #[serde(rename = "Structure_FireplacesTotal")]
    pub fireplaces_total: i64,
    #[serde(rename = "Structure_GarageSpaces")]
    pub garage_spaces: i64,
    #[serde(rename = "Structure_LivingArea")]
    pub living_area: i64,
    #[serde(rename = "Structure_YearBuilt")]
    pub year_built: i64,
}

impl Default for FeatureRecord {
    fn default() -> Self {
        let defaults: Vec<FieldValue> = FieldId::iter().map(|id| id.spec().default).collect();
        Self::assemble(|id| defaults[id.index()])
    }
}

impl FeatureRecord {
    pub const FEATURE_NAMES: [&'static str; FEATURE_COUNT] = FEATURE_NAMES;

    /// Builds a record by asking `value_of` for every field.
    pub(crate) fn assemble(value_of: impl Fn(FieldId) -> FieldValue) -> Self {
        let int = |id: FieldId| value_of(id).as_i64();
        let float = |id: FieldId| value_of(id).as_f64();

        Self {
            lot_size_square_feet: int(FieldId::LotSizeSquareFeet),
            bathroom_condition: float(FieldId::BathroomCondition),
            exterior_condition: float(FieldId::ExteriorCondition),
            interior_condition: float(FieldId::InteriorCondition),
            kitchen_condition: float(FieldId::KitchenCondition),
            property_condition: float(FieldId::PropertyCondition),
            bathroom_quality: float(FieldId::BathroomQuality),
            exterior_quality: float(FieldId::ExteriorQuality),
            interior_quality: float(FieldId::InteriorQuality),
            kitchen_quality: float(FieldId::KitchenQuality),
            property_quality: float(FieldId::PropertyQuality),
            latitude: float(FieldId::Latitude),
            longitude: float(FieldId::Longitude),
            bathrooms_full: int(FieldId::BathroomsFull),
            bathrooms_half: int(FieldId::BathroomsHalf),
            bedrooms_total: int(FieldId::BedroomsTotal),
            below_grade_finished_area: int(FieldId::BelowGradeFinishedArea),
            below_grade_unfinished_area: int(FieldId::BelowGradeUnfinishedArea),
            fireplaces_total: int(FieldId::FireplacesTotal),
            garage_spaces: int(FieldId::GarageSpaces),
            living_area: int(FieldId::LivingArea),
            year_built: int(FieldId::YearBuilt),
        }
    }

    pub fn get(&self, id: FieldId) -> FieldValue {
        match id {
            FieldId::LotSizeSquareFeet => FieldValue::Int(self.lot_size_square_feet),
            FieldId::BathroomCondition => FieldValue::Float(self.bathroom_condition),
            FieldId::ExteriorCondition => FieldValue::Float(self.exterior_condition),
            FieldId::InteriorCondition => FieldValue::Float(self.interior_condition),
            FieldId::KitchenCondition => FieldValue::Float(self.kitchen_condition),
            FieldId::PropertyCondition => FieldValue::Float(self.property_condition),
            FieldId::BathroomQuality => FieldValue::Float(self.bathroom_quality),
            FieldId::ExteriorQuality => FieldValue::Float(self.exterior_quality),
            FieldId::InteriorQuality => FieldValue::Float(self.interior_quality),
            FieldId::KitchenQuality => FieldValue::Float(self.kitchen_quality),
            FieldId::PropertyQuality => FieldValue::Float(self.property_quality),
            FieldId::Latitude => FieldValue::Float(self.latitude),
            FieldId::Longitude => FieldValue::Float(self.longitude),
            FieldId::BathroomsFull => FieldValue::Int(self.bathrooms_full),
            FieldId::BathroomsHalf => FieldValue::Int(self.bathrooms_half),
            FieldId::BedroomsTotal => FieldValue::Int(self.bedrooms_total),
            FieldId::BelowGradeFinishedArea => FieldValue::Int(self.below_grade_finished_area),
            FieldId::BelowGradeUnfinishedArea => FieldValue::Int(self.below_grade_unfinished_area),
            FieldId::FireplacesTotal => FieldValue::Int(self.fireplaces_total),
            FieldId::GarageSpaces => FieldValue::Int(self.garage_spaces),
            FieldId::LivingArea => FieldValue::Int(self.living_area),
            FieldId::YearBuilt => FieldValue::Int(self.year_built),
        }
    }

    /// Values in model column order, integers widened to `f64`.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for id in FieldId::iter() {
            out[id.index()] = self.get(id).as_f64();
        }
        out
    }

    pub fn columns(&self) -> [(&'static str, f64); FEATURE_COUNT] {
        let values = self.values();
        std::array::from_fn(|i| (FEATURE_NAMES[i], values[i]))
    }

    /// Strict conversion from a wire payload. Every column must be present,
    /// nothing else may be, and integer columns must hold whole numbers.
    pub fn from_json(value: Value) -> Result<Self, RecordError> {
        let Value::Object(map) = value else {
            return Err(RecordError::NotAnObject);
        };

        if let Some(extra) = map.keys().find(|key| !FEATURE_NAMES.contains(&key.as_str())) {
            return Err(RecordError::UnexpectedField(extra.clone()));
        }

        let mut values = Vec::with_capacity(FEATURE_COUNT);
        for id in FieldId::iter() {
            let name = id.column();
            let raw = map
                .get(name)
                .ok_or_else(|| RecordError::MissingField(name.to_string()))?;
            values.push(json_value(id, raw)?);
        }

        Ok(Self::assemble(|id| values[id.index()]))
    }
}

fn json_value(id: FieldId, raw: &Value) -> Result<FieldValue, RecordError> {
    let invalid = |reason: &str| RecordError::InvalidValue {
        field: id.column().to_string(),
        reason: reason.to_string(),
    };

    let number = raw.as_f64().ok_or_else(|| invalid("expected a number"))?;
    match id.spec().kind {
        NumberKind::Integer => match raw.as_i64() {
            Some(v) => Ok(FieldValue::Int(v)),
            None if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
                Ok(FieldValue::Int(number as i64))
            }
            None => Err(invalid("expected an integer")),
        },
        NumberKind::Float => Ok(FieldValue::Float(number)),
    }
}
