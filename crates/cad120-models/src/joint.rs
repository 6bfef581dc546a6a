//! Skeleton joint models.
//!
//! The tracker reports 15 joints in a fixed order. `Skeleton<T>` holds one
//! value per joint as named fields, so per-joint access is checked at compile
//! time rather than through string lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Number of joints in a skeleton record.
pub const TOTAL_JOINTS: usize = 15;

/// Joints that carry an orientation block in the raw skeleton files.
pub const ORIENTED_JOINTS: usize = 11;

/// One of the 15 tracked body joints, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Joint {
    Head,
    Neck,
    Torso,
    LeftShoulder,
    LeftElbow,
    RightShoulder,
    RightElbow,
    LeftHip,
    LeftKnee,
    RightHip,
    RightKnee,
    LeftHand,
    RightHand,
    LeftFoot,
    RightFoot,
}

impl Joint {
    /// All joints in file order.
    pub const ALL: [Joint; TOTAL_JOINTS] = [
        Joint::Head,
        Joint::Neck,
        Joint::Torso,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::LeftHand,
        Joint::RightHand,
        Joint::LeftFoot,
        Joint::RightFoot,
    ];

    /// Short code used as the entity name in traces.
    pub fn code(&self) -> &'static str {
        match self {
            Joint::Head => "H",
            Joint::Neck => "N",
            Joint::Torso => "T",
            Joint::LeftShoulder => "LS",
            Joint::LeftElbow => "LE",
            Joint::RightShoulder => "RS",
            Joint::RightElbow => "RE",
            Joint::LeftHip => "LHIP",
            Joint::LeftKnee => "LK",
            Joint::RightHip => "RHIP",
            Joint::RightKnee => "RK",
            Joint::LeftHand => "LH",
            Joint::RightHand => "RH",
            Joint::LeftFoot => "LF",
            Joint::RightFoot => "RF",
        }
    }

    /// Zero-based position in the file layout.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether the raw record for this joint includes orientation values.
    pub fn has_orientation(&self) -> bool {
        self.index() < ORIENTED_JOINTS
    }

    /// Look up a joint by its short code.
    pub fn from_code(code: &str) -> ModelResult<Self> {
        Joint::ALL
            .iter()
            .copied()
            .find(|j| j.code() == code)
            .ok_or_else(|| ModelError::unknown_joint(code))
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Joint {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim())
    }
}

/// 3D joint position in tracker coordinates (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Projected 2D joint position in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One value per joint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Skeleton<T> {
    pub head: T,
    pub neck: T,
    pub torso: T,
    pub left_shoulder: T,
    pub left_elbow: T,
    pub right_shoulder: T,
    pub right_elbow: T,
    pub left_hip: T,
    pub left_knee: T,
    pub right_hip: T,
    pub right_knee: T,
    pub left_hand: T,
    pub right_hand: T,
    pub left_foot: T,
    pub right_foot: T,
}

impl<T> Skeleton<T> {
    /// Build a skeleton by evaluating `f` for each joint in file order.
    pub fn try_from_fn<E>(mut f: impl FnMut(Joint) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            head: f(Joint::Head)?,
            neck: f(Joint::Neck)?,
            torso: f(Joint::Torso)?,
            left_shoulder: f(Joint::LeftShoulder)?,
            left_elbow: f(Joint::LeftElbow)?,
            right_shoulder: f(Joint::RightShoulder)?,
            right_elbow: f(Joint::RightElbow)?,
            left_hip: f(Joint::LeftHip)?,
            left_knee: f(Joint::LeftKnee)?,
            right_hip: f(Joint::RightHip)?,
            right_knee: f(Joint::RightKnee)?,
            left_hand: f(Joint::LeftHand)?,
            right_hand: f(Joint::RightHand)?,
            left_foot: f(Joint::LeftFoot)?,
            right_foot: f(Joint::RightFoot)?,
        })
    }

    pub fn get(&self, joint: Joint) -> &T {
        match joint {
            Joint::Head => &self.head,
            Joint::Neck => &self.neck,
            Joint::Torso => &self.torso,
            Joint::LeftShoulder => &self.left_shoulder,
            Joint::LeftElbow => &self.left_elbow,
            Joint::RightShoulder => &self.right_shoulder,
            Joint::RightElbow => &self.right_elbow,
            Joint::LeftHip => &self.left_hip,
            Joint::LeftKnee => &self.left_knee,
            Joint::RightHip => &self.right_hip,
            Joint::RightKnee => &self.right_knee,
            Joint::LeftHand => &self.left_hand,
            Joint::RightHand => &self.right_hand,
            Joint::LeftFoot => &self.left_foot,
            Joint::RightFoot => &self.right_foot,
        }
    }

    /// Iterate `(joint, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &T)> + '_ {
        Joint::ALL.iter().map(move |&j| (j, self.get(j)))
    }

    /// Apply `f` to every joint value.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Skeleton<U> {
        let mapped: Result<Skeleton<U>, std::convert::Infallible> =
            Skeleton::try_from_fn(|j| Ok(f(self.get(j))));
        match mapped {
            Ok(s) => s,
            Err(never) => match never {},
        }
    }
}

/// Which joints are passed through to traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointFilter {
    /// Every joint.
    All,
    /// Only the listed joints.
    Only(Vec<Joint>),
}

impl Default for JointFilter {
    /// Head and both hands.
    fn default() -> Self {
        JointFilter::Only(vec![Joint::Head, Joint::LeftHand, Joint::RightHand])
    }
}

impl JointFilter {
    /// Literal accepted in configuration for [`JointFilter::All`].
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn contains(&self, joint: Joint) -> bool {
        match self {
            JointFilter::All => true,
            JointFilter::Only(joints) => joints.contains(&joint),
        }
    }

    /// Joints passed by this filter, in filter order.
    pub fn joints(&self) -> Vec<Joint> {
        match self {
            JointFilter::All => Joint::ALL.to_vec(),
            JointFilter::Only(joints) => joints.clone(),
        }
    }
}

impl FromStr for JointFilter {
    type Err = ModelError;

    /// Parse `all` or a comma-separated list of joint codes (`H,LH,RH`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::ALL_SENTINEL) {
            return Ok(JointFilter::All);
        }
        let mut joints = Vec::new();
        for code in s.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let joint = Joint::from_code(code)?;
            if !joints.contains(&joint) {
                joints.push(joint);
            }
        }
        Ok(JointFilter::Only(joints))
    }
}
