use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Errors raised at the document validation boundary
#[derive(Debug, Error)]
pub enum ParseError {
    /// The byte buffer is not a JSON run document
    #[error("Invalid run document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The capture file is too short to contain a header and trailer
    #[error("Capture file too short: {lines} lines (need at least 5)")]
    CaptureTooShort { lines: usize },

    /// A capture header or trailer line could not be read
    #[error("Capture line {line}: {message}")]
    CaptureLine { line: usize, message: String },
}

/// One raw displacement sample as stored in a run document.
///
/// Either a bare number or a record carrying the displacement and an
/// optional explicit timebase (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawReading {
    Value(f64),
    Record {
        displacement: f64,
        timebase: Option<f64>,
    },
}

impl RawReading {
    /// Raw displacement, in sensor units
    #[inline]
    pub fn displacement(&self) -> f64 {
        match *self {
            RawReading::Value(v) => v,
            RawReading::Record { displacement, .. } => displacement,
        }
    }

    /// Explicit timebase overriding `index / frequency`, if the sample has one
    #[inline]
    pub fn timebase(&self) -> Option<f64> {
        match *self {
            RawReading::Value(_) => None,
            RawReading::Record { timebase, .. } => timebase,
        }
    }

    /// Element that is neither a number nor a record
    fn ambiguous() -> Self {
        RawReading::Record {
            displacement: 0.0,
            timebase: None,
        }
    }
}

/// Coerce a loosely-typed JSON scalar to a number.
///
/// Numbers pass through, numeric strings are parsed (blank is 0), booleans
/// become 1/0 and null becomes 0. Anything else is NaN.
pub fn coerce_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        serde_json::Value::Null => 0.0,
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => f64::NAN,
    }
}

struct RawReadingVisitor;

impl<'de> Visitor<'de> for RawReadingVisitor {
    type Value = RawReading;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a displacement number or a {displacement, timebase} record")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawReading, E> {
        Ok(RawReading::Value(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawReading, E> {
        Ok(RawReading::Value(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawReading, E> {
        Ok(RawReading::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<RawReading, E> {
        Ok(RawReading::ambiguous())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<RawReading, E> {
        Ok(RawReading::ambiguous())
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawReading, E> {
        Ok(RawReading::ambiguous())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawReading, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawReading::ambiguous())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawReading, A::Error> {
        let mut displacement = 0.0;
        let mut timebase = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "displacement" => {
                    let value: serde_json::Value = map.next_value()?;
                    displacement = coerce_number(&value);
                }
                "timebase" => {
                    let value: serde_json::Value = map.next_value()?;
                    if !value.is_null() {
                        timebase = Some(coerce_number(&value));
                    }
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(RawReading::Record {
            displacement,
            timebase,
        })
    }
}

impl<'de> Deserialize<'de> for RawReading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawReadingVisitor)
    }
}

impl Serialize for RawReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            RawReading::Value(v) => serializer.serialize_f64(v),
            RawReading::Record {
                displacement,
                timebase,
            } => {
                let len = if timebase.is_some() { 2 } else { 1 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("displacement", &displacement)?;
                if let Some(t) = timebase {
                    map.serialize_entry("timebase", &t)?;
                }
                map.end()
            }
        }
    }
}

/// A channel slot in a run document.
///
/// Keeps "channel absent", "channel present but not an array" and "channel
/// present" apart so each can be reported on its own terms.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ChannelData {
    #[default]
    Absent,
    Invalid,
    Present(Vec<RawReading>),
}

impl ChannelData {
    /// Readings to feed the pipeline; absent and invalid slots read as empty
    pub fn readings(&self) -> &[RawReading] {
        match self {
            ChannelData::Present(readings) => readings,
            ChannelData::Absent | ChannelData::Invalid => &[],
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ChannelData::Absent)
    }

    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        self.readings().is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings().len()
    }

    /// Short status for logs and placeholders
    pub fn status(&self) -> &'static str {
        match self {
            ChannelData::Absent => "absent",
            ChannelData::Invalid => "invalid",
            ChannelData::Present(r) if r.is_empty() => "empty",
            ChannelData::Present(_) => "present",
        }
    }
}

impl From<Vec<RawReading>> for ChannelData {
    fn from(readings: Vec<RawReading>) -> Self {
        ChannelData::Present(readings)
    }
}

struct ChannelDataVisitor;

impl<'de> Visitor<'de> for ChannelDataVisitor {
    type Value = ChannelData;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of raw readings")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ChannelData, A::Error> {
        let mut readings = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(reading) = seq.next_element::<RawReading>()? {
            readings.push(reading);
        }
        Ok(ChannelData::Present(readings))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ChannelData, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(ChannelData::Invalid)
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }

    fn visit_unit<E: de::Error>(self) -> Result<ChannelData, E> {
        Ok(ChannelData::Invalid)
    }
}

impl<'de> Deserialize<'de> for ChannelData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChannelDataVisitor)
    }
}

impl Serialize for ChannelData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChannelData::Present(readings) => readings.serialize(serializer),
            ChannelData::Absent | ChannelData::Invalid => serializer.serialize_unit(),
        }
    }
}

/// Deserialize an optional, loosely-typed number (number or numeric string)
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| coerce_number(&v)))
}

/// The two suspension displacement channels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum SuspensionChannel {
    #[strum(serialize = "front_sus")]
    Front,
    #[strum(serialize = "rear_sus")]
    Rear,
}

impl SuspensionChannel {
    /// Human-readable label for legends
    pub fn label(&self) -> &'static str {
        match self {
            SuspensionChannel::Front => "Front",
            SuspensionChannel::Rear => "Rear",
        }
    }
}

/// `{ front_sus, rear_sus }`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuspensionData {
    #[serde(default, skip_serializing_if = "ChannelData::is_absent")]
    pub front_sus: ChannelData,
    #[serde(default, skip_serializing_if = "ChannelData::is_absent")]
    pub rear_sus: ChannelData,
}

impl SuspensionData {
    pub fn channel(&self, channel: SuspensionChannel) -> &ChannelData {
        match channel {
            SuspensionChannel::Front => &self.front_sus,
            SuspensionChannel::Rear => &self.rear_sus,
        }
    }
}

/// Three-axis inertial channels (`axis1..axis3`)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AxisData {
    #[serde(default, skip_serializing_if = "ChannelData::is_absent")]
    pub axis1: ChannelData,
    #[serde(default, skip_serializing_if = "ChannelData::is_absent")]
    pub axis2: ChannelData,
    #[serde(default, skip_serializing_if = "ChannelData::is_absent")]
    pub axis3: ChannelData,
}

/// The `data` section of a run document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SensorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gyroscope: Option<AxisData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerometer: Option<AxisData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspension: Option<SuspensionData>,
}

/// Per-channel sample frequencies recorded by the logger
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SampleFrequencies {
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub front_sus: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rear_sus: Option<f64>,
}

impl SampleFrequencies {
    pub fn get(&self, channel: SuspensionChannel) -> Option<f64> {
        match channel {
            SuspensionChannel::Front => self.front_sus,
            SuspensionChannel::Rear => self.rear_sus,
        }
    }
}

/// Run metadata; everything but the sample frequencies is passed through
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_frequency: Option<SampleFrequencies>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A complete run document as stored by the backend.
///
/// Older migrated files carry `suspension` at the top level instead of
/// under `data`; both layouts are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SensorData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspension: Option<SuspensionData>,
    #[serde(default)]
    pub metadata: RunMetadata,
}

impl RunDocument {
    /// The suspension section, wherever the layout put it
    pub fn suspension(&self) -> Option<&SuspensionData> {
        self.data
            .as_ref()
            .and_then(|d| d.suspension.as_ref())
            .or(self.suspension.as_ref())
    }
}

/// One suspension channel after validation, ready for the pipeline
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelTelemetry {
    pub data: ChannelData,
    /// Samples per second (always positive and finite)
    pub frequency: f64,
}

/// The slice of a run document the pipeline consumes
#[derive(Clone, Debug, Default)]
pub struct RunTelemetry {
    pub front: ChannelTelemetry,
    pub rear: ChannelTelemetry,
    /// Opaque metadata (comment, run time, ...)
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RunTelemetry {
    pub fn channel(&self, channel: SuspensionChannel) -> &ChannelTelemetry {
        match channel {
            SuspensionChannel::Front => &self.front,
            SuspensionChannel::Rear => &self.rear,
        }
    }

    /// True when neither suspension channel has anything to plot
    pub fn is_empty(&self) -> bool {
        self.front.data.is_empty() && self.rear.data.is_empty()
    }
}
