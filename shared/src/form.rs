//! Input form definition and the state behind it.
//!
//! The page is built from [`SECTIONS`]; every input is identified by a
//! [`FieldId`] whose discriminant is also its column index in the model
//! input. [`FormState::collect`] turns the current inputs into a
//! [`FeatureRecord`].

use std::fmt;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::record::{FEATURE_NAMES, FeatureRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum FieldId {
    LotSizeSquareFeet,
    BathroomCondition,
    ExteriorCondition,
    InteriorCondition,
    KitchenCondition,
    PropertyCondition,
    BathroomQuality,
    ExteriorQuality,
    InteriorQuality,
    KitchenQuality,
    PropertyQuality,
    Latitude,
    Longitude,
    BathroomsFull,
    BathroomsHalf,
    BedroomsTotal,
    BelowGradeFinishedArea,
    BelowGradeUnfinishedArea,
    FireplacesTotal,
    GarageSpaces,
    LivingArea,
    YearBuilt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Int(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            FieldValue::Int(v) => v,
            FieldValue::Float(v) => v as i64,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: NumberKind,
    pub default: FieldValue,
    pub step: f64,
}

fn int_field(id: FieldId, label: &'static str, default: i64, step: f64) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind: NumberKind::Integer,
        default: FieldValue::Int(default),
        step,
    }
}

fn float_field(id: FieldId, label: &'static str, default: f64, step: f64) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind: NumberKind::Float,
        default: FieldValue::Float(default),
        step,
    }
}

impl FieldId {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Model column this input feeds.
    pub fn column(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    pub fn spec(self) -> FieldSpec {
        use FieldId::*;
        match self {
            Latitude => float_field(self, "Latitude", 41.85, 0.01),
            Longitude => float_field(self, "Longitude", -87.65, 0.01),
            LotSizeSquareFeet => int_field(self, "Lot Size (sqft)", 5000, 10.0),
            LivingArea => int_field(self, "Living Area (sqft)", 1500, 10.0),
            BedroomsTotal => int_field(self, "Total Bedrooms", 3, 1.0),
            BathroomsFull => int_field(self, "Full Bathrooms", 2, 1.0),
            YearBuilt => int_field(self, "Year Built", 1980, 1.0),
            BathroomCondition => float_field(self, "Bathroom Condition", 4.0, 1.0),
            BathroomQuality => float_field(self, "Bathroom Quality", 4.0, 1.0),
            ExteriorCondition => float_field(self, "Exterior Condition", 4.0, 1.0),
            ExteriorQuality => float_field(self, "Exterior Quality", 4.0, 1.0),
            InteriorCondition => float_field(self, "Interior Condition", 4.0, 1.0),
            InteriorQuality => float_field(self, "Interior Quality", 4.0, 1.0),
            KitchenCondition => float_field(self, "Kitchen Condition", 4.0, 1.0),
            KitchenQuality => float_field(self, "Kitchen Quality", 4.0, 1.0),
            PropertyCondition => float_field(self, "Property Condition", 4.0, 1.0),
            PropertyQuality => float_field(self, "Property Quality", 4.0, 1.0),
            BelowGradeFinishedArea => int_field(self, "Below Grade Finished Area", 0, 10.0),
            BelowGradeUnfinishedArea => int_field(self, "Below Grade Unfinished Area", 0, 10.0),
            FireplacesTotal => int_field(self, "Total Fireplaces 🔥", 0, 1.0),
            GarageSpaces => int_field(self, "Garage Spaces 🚗", 1, 1.0),
            BathroomsHalf => int_field(self, "Half Bathrooms 🚽", 3, 1.0),
        }
    }
}

/// A collapsible group of inputs.
#[derive(Debug)]
pub struct Group {
    pub title: &'static str,
    pub fields: &'static [FieldId],
}

#[derive(Debug)]
pub struct Section {
    pub title: &'static str,
    pub note: Option<&'static str>,
    pub groups: &'static [Group],
}

/// Page layout, top to bottom.
pub static SECTIONS: &[Section] = &[
    Section {
        title: "Location Information 📍",
        note: None,
        groups: &[Group {
            title: "Location and Address",
            fields: &[FieldId::Latitude, FieldId::Longitude],
        }],
    },
    Section {
        title: "Property Characteristics 🏡",
        note: None,
        groups: &[Group {
            title: "Property Details 🔎",
            fields: &[
                FieldId::LotSizeSquareFeet,
                FieldId::LivingArea,
                FieldId::BedroomsTotal,
                FieldId::BathroomsFull,
                FieldId::YearBuilt,
            ],
        }],
    },
    Section {
        title: "Quality and Condition Information ✅",
        note: Some("From 6 (worst) to 1 (best)"),
        groups: &[
            Group {
                title: "Bathroom 🛀",
                fields: &[FieldId::BathroomCondition, FieldId::BathroomQuality],
            },
            Group {
                title: "Exterior 🌼",
                fields: &[FieldId::ExteriorCondition, FieldId::ExteriorQuality],
            },
            Group {
                title: "Interior 🚪",
                fields: &[FieldId::InteriorCondition, FieldId::InteriorQuality],
            },
            Group {
                title: "Kitchen 🍎",
                fields: &[FieldId::KitchenCondition, FieldId::KitchenQuality],
            },
            Group {
                title: "Property 📪",
                fields: &[FieldId::PropertyCondition, FieldId::PropertyQuality],
            },
        ],
    },
    Section {
        title: "Structure and Other Features",
        note: None,
        groups: &[
            Group {
                title: "Below Grade Areas 🔧",
                fields: &[FieldId::BelowGradeFinishedArea, FieldId::BelowGradeUnfinishedArea],
            },
            Group {
                title: "Others",
                fields: &[
                    FieldId::FireplacesTotal,
                    FieldId::GarageSpaces,
                    FieldId::BathroomsHalf,
                ],
            },
        ],
    },
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be a whole number")]
    NotAnInteger(&'static str),
    #[error("{0} must be finite")]
    NotFinite(&'static str),
}

/// Current value of every input on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: [FieldValue; FieldId::COUNT],
}

impl Default for FormState {
    fn default() -> Self {
        let mut values = [FieldValue::Int(0); FieldId::COUNT];
        for id in FieldId::iter() {
            values[id.index()] = id.spec().default;
        }
        Self { values }
    }
}

impl FormState {
    pub fn value(&self, id: FieldId) -> FieldValue {
        self.values[id.index()]
    }

    pub fn display(&self, id: FieldId) -> String {
        self.value(id).to_string()
    }

    /// Parses operator input for `id`. On error the previous value stays.
    pub fn set(&mut self, id: FieldId, raw: &str) -> Result<(), FieldError> {
        let spec = id.spec();
        let raw = raw.trim();
        let value = match spec.kind {
            NumberKind::Integer => match raw.parse::<i64>() {
                Ok(v) => FieldValue::Int(v),
                Err(_) => {
                    let v = parse_float(spec.label, raw)?;
                    if v.fract() != 0.0 || v.abs() >= i64::MAX as f64 {
                        return Err(FieldError::NotAnInteger(spec.label));
                    }
                    FieldValue::Int(v as i64)
                }
            },
            NumberKind::Float => FieldValue::Float(parse_float(spec.label, raw)?),
        };
        self.values[id.index()] = value;
        Ok(())
    }

    pub fn step_up(&mut self, id: FieldId) {
        self.nudge(id, 1.0);
    }

    pub fn step_down(&mut self, id: FieldId) {
        self.nudge(id, -1.0);
    }

    fn nudge(&mut self, id: FieldId, direction: f64) {
        let spec = id.spec();
        let slot = &mut self.values[id.index()];
        *slot = match *slot {
            FieldValue::Int(v) => FieldValue::Int(v.saturating_add((spec.step * direction) as i64)),
            // Rounding keeps 41.85 + 0.01 from drifting to 41.86000000000001.
            FieldValue::Float(v) => FieldValue::Float(round_to(v + spec.step * direction, 10)),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Packages the current inputs as model input.
    pub fn collect(&self) -> FeatureRecord {
        FeatureRecord::assemble(|id| self.value(id))
    }
}

fn parse_float(label: &'static str, raw: &str) -> Result<f64, FieldError> {
    let v = raw
        .parse::<f64>()
        .map_err(|_| FieldError::NotANumber(label))?;
    if !v.is_finite() {
        return Err(FieldError::NotFinite(label));
    }
    Ok(v)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FEATURE_COUNT;

    #[test]
    fn sections_cover_every_field_once() {
        let mut seen: Vec<FieldId> = SECTIONS
            .iter()
            .flat_map(|s| s.groups.iter())
            .flat_map(|g| g.fields.iter().copied())
            .collect();
        assert_eq!(seen.len(), FEATURE_COUNT);
        seen.sort_by_key(|id| id.index());
        seen.dedup();
        assert_eq!(seen.len(), FEATURE_COUNT);
    }

    #[test]
    fn untouched_form_collects_defaults() {
        let record = FormState::default().collect();
        assert_eq!(record, FeatureRecord::default());

        let value = serde_json::to_value(record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = FEATURE_NAMES.to_vec();
        expected.sort();
        let mut keys_sorted = keys.clone();
        keys_sorted.sort();
        assert_eq!(keys_sorted, expected);
    }

    #[test]
    fn overrides_touch_only_their_fields() {
        let mut form = FormState::default();
        form.set(FieldId::Latitude, "34.05").unwrap();
        form.set(FieldId::Longitude, "-118.25").unwrap();
        form.set(FieldId::LivingArea, "2200").unwrap();

        let record = form.collect();
        assert_eq!(record.latitude, 34.05);
        assert_eq!(record.longitude, -118.25);
        assert_eq!(record.living_area, 2200);

        let defaults = FeatureRecord::default();
        let changed = [FieldId::Latitude, FieldId::Longitude, FieldId::LivingArea];
        for id in FieldId::iter().filter(|id| !changed.contains(id)) {
            assert_eq!(record.get(id), defaults.get(id), "{:?} changed", id);
        }
    }

    #[test]
    fn integer_fields_reject_fractions() {
        let mut form = FormState::default();
        assert_eq!(
            form.set(FieldId::BedroomsTotal, "2.5"),
            Err(FieldError::NotAnInteger("Total Bedrooms"))
        );
        assert_eq!(form.value(FieldId::BedroomsTotal), FieldValue::Int(3));

        form.set(FieldId::BedroomsTotal, "4.0").unwrap();
        assert_eq!(form.value(FieldId::BedroomsTotal), FieldValue::Int(4));
    }

    #[test]
    fn garbage_input_keeps_previous_value() {
        let mut form = FormState::default();
        assert!(form.set(FieldId::Latitude, "north").is_err());
        assert!(form.set(FieldId::Latitude, "inf").is_err());
        assert!(form.set(FieldId::Latitude, "").is_err());
        assert_eq!(form.value(FieldId::Latitude), FieldValue::Float(41.85));
    }

    #[test]
    fn negative_values_are_accepted() {
        let mut form = FormState::default();
        form.set(FieldId::BelowGradeFinishedArea, "-40").unwrap();
        assert_eq!(form.collect().below_grade_finished_area, -40);
    }

    #[test]
    fn stepping_uses_field_granularity() {
        let mut form = FormState::default();
        form.step_up(FieldId::LotSizeSquareFeet);
        assert_eq!(form.value(FieldId::LotSizeSquareFeet), FieldValue::Int(5010));

        form.step_up(FieldId::Latitude);
        assert_eq!(form.value(FieldId::Latitude), FieldValue::Float(41.86));

        form.step_down(FieldId::KitchenQuality);
        assert_eq!(form.display(FieldId::KitchenQuality), "3.0");

        form.reset();
        assert_eq!(form, FormState::default());
    }
}
