//! Output curve model.
//!
//! Curves are lists of `(time, value, interpolation)` keys in the order the
//! baker produced them. Consumers that only support linear segments can
//! still reproduce step behaviour: visibility keys are tagged
//! [`Interpolation::Step`], and held channels insert an extra key one frame
//! before every change (see [`HeldChannel`]).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Blend linearly towards the next key.
    #[default]
    Linear,
    /// Hold this key's value until the next key (infinite tangents).
    Step,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Seconds.
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub keys: Vec<CurveKey>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            keys: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, time: f32, value: f32, interpolation: Interpolation) {
        self.keys.push(CurveKey {
            time,
            value,
            interpolation,
        });
    }

    #[inline]
    pub fn push_linear(&mut self, time: f32, value: f32) {
        self.push(time, value, Interpolation::Linear);
    }

    #[inline]
    pub fn push_step(&mut self, time: f32, value: f32) {
        self.push(time, value, Interpolation::Step);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.keys.iter().map(|k| k.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.keys.iter().map(|k| k.value)
    }
}

/// Component a curve drives on its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveTarget {
    Transform,
    Node,
}

/// Animated scalar property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveProperty {
    #[serde(rename = "position.x")]
    PositionX,
    #[serde(rename = "position.y")]
    PositionY,
    #[serde(rename = "position.z")]
    PositionZ,
    #[serde(rename = "scale.x")]
    ScaleX,
    #[serde(rename = "scale.y")]
    ScaleY,
    #[serde(rename = "rotation.z")]
    RotationZ,
    /// Node visibility, 0.0 or 1.0.
    #[serde(rename = "active")]
    Active,
}

impl CurveProperty {
    pub fn target(self) -> CurveTarget {
        match self {
            CurveProperty::Active => CurveTarget::Node,
            _ => CurveTarget::Transform,
        }
    }
}

/// A curve bound to a property of the node at `path`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveBinding {
    pub path: String,
    pub target: CurveTarget,
    pub property: CurveProperty,
    pub curve: Curve,
}

impl CurveBinding {
    pub fn new(path: impl Into<String>, property: CurveProperty, curve: Curve) -> Self {
        Self {
            path: path.into(),
            target: property.target(),
            property,
            curve,
        }
    }
}

/// Linear curve builder for values that should hold between keyframes.
///
/// Every value after the first is preceded by a key one frame earlier that
/// repeats the previous value, so linear playback only moves during the last
/// frame before the change.
#[derive(Clone, Debug)]
pub struct HeldChannel {
    sample_rate: f32,
    curve: Curve,
    last: Option<f32>,
}

impl HeldChannel {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            curve: Curve::new(),
            last: None,
        }
    }

    /// Append `value` at `frame`. The hold key for a change at frame 0 (from
    /// an unsorted or repeated frame-0 keyframe) is clamped to time 0.
    pub fn push(&mut self, frame: u32, value: f32) {
        if let Some(previous) = self.last {
            let hold = frame.saturating_sub(1) as f32 / self.sample_rate;
            self.curve.push_linear(hold, previous);
        }
        self.curve.push_linear(frame as f32 / self.sample_rate, value);
        self.last = Some(value);
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn into_curve(self) -> Curve {
        self.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_channel_inserts_hold_before_change() {
        let mut ch = HeldChannel::new(60.0);
        ch.push(0, 0.0);
        ch.push(30, 5.0);
        let keys = &ch.curve().keys;
        assert_eq!(keys.len(), 3);
        assert_eq!((keys[0].time, keys[0].value), (0.0, 0.0));
        assert!((keys[1].time - 29.0 / 60.0).abs() < 1e-6);
        assert_eq!(keys[1].value, 0.0);
        assert_eq!((keys[2].time, keys[2].value), (0.5, 5.0));
    }

    #[test]
    fn hold_for_a_repeated_frame_zero_stays_at_time_zero() {
        let mut ch = HeldChannel::new(60.0);
        ch.push(0, 1.0);
        ch.push(0, 2.0);
        let keys: Vec<(f32, f32)> = ch.curve().keys.iter().map(|k| (k.time, k.value)).collect();
        assert_eq!(keys, [(0.0, 1.0), (0.0, 1.0), (0.0, 2.0)]);
    }

    #[test]
    fn unsorted_frames_keep_produced_order() {
        let mut ch = HeldChannel::new(60.0);
        ch.push(10, 1.0);
        ch.push(0, 2.0);
        let keys: Vec<(f32, f32)> = ch.curve().keys.iter().map(|k| (k.time, k.value)).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1], (0.0, 1.0));
        assert_eq!(keys[2], (0.0, 2.0));
    }

    #[test]
    fn first_key_gets_no_hold_even_late_in_the_clip() {
        let mut ch = HeldChannel::new(60.0);
        ch.push(12, 1.0);
        assert_eq!(ch.curve().len(), 1);
    }

    #[test]
    fn property_names_serialize_as_dotted_paths() {
        let json = serde_json::to_string(&CurveProperty::RotationZ).unwrap();
        assert_eq!(json, "\"rotation.z\"");
        assert_eq!(CurveProperty::Active.target(), CurveTarget::Node);
    }
}
