//! Actuated assets.
use crate::error::BorderError;
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Name pattern selecting every joint of an articulation.
const ALL_JOINTS: &str = ".*";

/// An actuated asset of the scene, e.g., a legged robot, batched over environments.
pub trait Articulation {
    /// Names of the joints, in the order used by joint indices.
    fn joint_names(&self) -> &[String];

    /// Default joint positions, `N × num_joints`.
    fn default_joint_pos(&self) -> ArrayView2<'_, f32>;

    /// Sets position targets of the joints `joint_ids`.
    ///
    /// `target` is `N × joint_ids.len()`; column `j` is the target of joint `joint_ids[j]`.
    fn set_joint_position_target(&mut self, target: ArrayView2<'_, f32>, joint_ids: &[usize]);

    /// The number of joints.
    fn num_joints(&self) -> usize {
        self.joint_names().len()
    }

    /// Resolves joint names to indices.
    ///
    /// `".*"` selects every joint, any other entry must be an exact joint name.
    /// Joints are returned in the order of the articulation, each at most once.
    fn find_joints(&self, names: &[String]) -> Result<(Vec<usize>, Vec<String>), BorderError> {
        let joint_names = self.joint_names();
        let mut selected = vec![false; joint_names.len()];

        for name in names.iter() {
            if name == ALL_JOINTS {
                selected.iter_mut().for_each(|s| *s = true);
            } else {
                let ix = joint_names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| BorderError::JointNotFound(name.clone()))?;
                selected[ix] = true;
            }
        }

        Ok(selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(ix, _)| (ix, joint_names[ix].clone()))
            .unzip())
    }
}

/// A collection of named articulations.
pub trait Scene {
    /// Type of articulations in the scene.
    type Articulation: Articulation;

    /// Returns the articulation with the given name.
    fn articulation(&self, name: &str) -> Option<&Self::Articulation>;

    /// Returns the articulation with the given name.
    fn articulation_mut(&mut self, name: &str) -> Option<&mut Self::Articulation>;
}

impl<A: Articulation> Scene for HashMap<String, A> {
    type Articulation = A;

    fn articulation(&self, name: &str) -> Option<&A> {
        self.get(name)
    }

    fn articulation_mut(&mut self, name: &str) -> Option<&mut A> {
        self.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    struct Biped {
        names: Vec<String>,
        default_pos: Array2<f32>,
    }

    impl Articulation for Biped {
        fn joint_names(&self) -> &[String] {
            &self.names
        }

        fn default_joint_pos(&self) -> ArrayView2<'_, f32> {
            self.default_pos.view()
        }

        fn set_joint_position_target(&mut self, _: ArrayView2<'_, f32>, _: &[usize]) {}
    }

    fn biped() -> Biped {
        let names = ["hip", "knee", "ankle"].iter().map(|s| s.to_string()).collect();
        Biped {
            names,
            default_pos: Array2::zeros((2, 3)),
        }
    }

    #[test]
    fn test_find_joints() {
        let biped = biped();

        let (ids, names) = biped.find_joints(&[".*".to_string()]).unwrap();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(names, vec!["hip", "knee", "ankle"]);

        // Articulation order, no duplicates
        let query = ["ankle", "hip", "ankle"].iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let (ids, _) = biped.find_joints(&query).unwrap();
        assert_eq!(ids, vec![0, 2]);

        let err = biped.find_joints(&["elbow".to_string()]).unwrap_err();
        assert_eq!(err, BorderError::JointNotFound("elbow".to_string()));
    }
}
