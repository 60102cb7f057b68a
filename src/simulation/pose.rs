//! Pose detection
//!
//! A pose is an aggregate configuration of joint angles and actuator
//! offsets. The detector compares each tracked channel against its target
//! with one tolerance, treating angle channels and position channels
//! uniformly. A channel the readout cannot supply counts as a mismatch,
//! never a panic.

/// Identifies one tracked scalar of the robot rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointChannel {
    HeadPitch,
    WaistPitch,
    LeftFootPitch,
    RightFootPitch,
    ArmSlideX,
    ArmSlideZ,
}

/// A named target configuration with a comparison tolerance.
#[derive(Debug, Clone)]
pub struct PoseSpec {
    targets: Vec<(JointChannel, f32)>,
    epsilon: f32,
}

impl PoseSpec {
    pub fn new(targets: Vec<(JointChannel, f32)>, epsilon: f32) -> Self {
        Self { targets, epsilon }
    }

    /// Pure check: true iff every listed channel reads within `epsilon` of
    /// its target. `read` returning `None` for any channel yields false.
    pub fn matches<F>(&self, read: F) -> bool
    where
        F: Fn(JointChannel) -> Option<f32>,
    {
        self.targets.iter().all(|&(channel, target)| {
            read(channel).is_some_and(|current| (current - target).abs() < self.epsilon)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PoseSpec {
        PoseSpec::new(
            vec![(JointChannel::HeadPitch, -1.0), (JointChannel::ArmSlideX, 0.5)],
            0.01,
        )
    }

    #[test]
    fn test_matches_within_epsilon() {
        let matched = spec().matches(|channel| match channel {
            JointChannel::HeadPitch => Some(-0.995),
            JointChannel::ArmSlideX => Some(0.505),
            _ => None,
        });
        assert!(matched);
    }

    #[test]
    fn test_one_channel_off_fails() {
        let matched = spec().matches(|channel| match channel {
            JointChannel::HeadPitch => Some(-1.0),
            JointChannel::ArmSlideX => Some(0.55),
            _ => None,
        });
        assert!(!matched);
    }

    #[test]
    fn test_missing_channel_is_no_match() {
        let matched = spec().matches(|channel| match channel {
            JointChannel::HeadPitch => Some(-1.0),
            _ => None,
        });
        assert!(!matched);
    }

    #[test]
    fn test_exact_epsilon_is_exclusive() {
        let spec = PoseSpec::new(vec![(JointChannel::WaistPitch, 1.0)], 0.01);
        assert!(!spec.matches(|_| Some(1.01)));
        assert!(spec.matches(|_| Some(1.009)));
    }
}
