use deformer::{
    asset::{
        document::SceneDocument,
        pose::{PoseAsset, PoseEntry, PoseKind},
        skin::{LinkMode, SkinningType},
    },
    mesh::deform_document,
    rig::{two_joint_rig, LIMB_NODE, LIMB_OFFSET as PIVOT},
    BlendFallback, EvaluationParams,
};
use glam::{DMat4, DVec3};

fn deform(document: &SceneDocument) -> Vec<DVec3> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut meshes = deform_document(document, &EvaluationParams::default(), None, 0.0).unwrap();
    meshes.remove(0)
}

fn angle_about_pivot(point: DVec3) -> f64 {
    let relative = point - PIVOT;
    (-relative.z).atan2(relative.x).to_degrees()
}

#[test]
fn test_rest_pose_is_identity() {
    for skinning_type in [
        SkinningType::Linear,
        SkinningType::DualQuaternion,
        SkinningType::Blend,
    ] {
        let document = two_joint_rig(0.0, skinning_type);
        let deformed = deform(&document);
        for (deformed, bind) in deformed.iter().zip(&document.meshes[0].control_points) {
            assert!(deformed.abs_diff_eq(*bind, 1e-12));
        }
    }
}

#[test]
fn test_partial_weights_stay_at_rest() {
    for link_mode in [LinkMode::Normalize, LinkMode::TotalOne] {
        for skinning_type in [
            SkinningType::Linear,
            SkinningType::DualQuaternion,
            SkinningType::Blend,
        ] {
            let mut document = two_joint_rig(0.0, skinning_type);
            for cluster in &mut document.meshes[0].skins[0].clusters {
                cluster.link_mode = link_mode;
                for weight in &mut cluster.weights {
                    *weight *= 0.5;
                }
            }
            let deformed = deform(&document);
            for (deformed, bind) in deformed.iter().zip(&document.meshes[0].control_points) {
                assert!(deformed.abs_diff_eq(*bind, 1e-12));
            }
        }
    }
}

#[test]
fn test_small_angle() {
    let linear = deform(&two_joint_rig(30.0, SkinningType::Linear));
    let dual_quaternion = deform(&two_joint_rig(30.0, SkinningType::DualQuaternion));

    // Fully bound to the root.
    assert!(linear[0].abs_diff_eq(DVec3::X, 1e-12));
    assert!(dual_quaternion[0].abs_diff_eq(DVec3::X, 1e-12));

    // Half way: both point at half the angle, only linear shrinks.
    assert!((angle_about_pivot(linear[2]) - 15.0).abs() < 1e-9);
    assert!((angle_about_pivot(dual_quaternion[2]) - 15.0).abs() < 1e-9);
    assert!(((linear[2] - PIVOT).length() - 15f64.to_radians().cos()).abs() < 1e-9);
    assert!(((dual_quaternion[2] - PIVOT).length() - 1.0).abs() < 1e-9);
}

#[test]
fn test_half_turn_collapses_linear_only() {
    let linear = deform(&two_joint_rig(180.0, SkinningType::Linear));
    let dual_quaternion = deform(&two_joint_rig(180.0, SkinningType::DualQuaternion));

    assert!(linear[2].abs_diff_eq(PIVOT, 1e-9));

    let relative = dual_quaternion[2] - PIVOT;
    assert!((relative.length() - 1.0).abs() < 1e-9);
    assert!(relative.x.abs() < 1e-9);
    assert!(relative.y.abs() < 1e-9);

    assert!(linear[2].distance(dual_quaternion[2]) > 0.5);
}

#[test]
fn test_blend_between_results() {
    let linear = deform(&two_joint_rig(90.0, SkinningType::Linear));
    let dual_quaternion = deform(&two_joint_rig(90.0, SkinningType::DualQuaternion));
    let blend = deform(&two_joint_rig(90.0, SkinningType::Blend));

    for index in 0..4 {
        let expected = (linear[index] + dual_quaternion[index]) * 0.5;
        assert!(blend[index].abs_diff_eq(expected, 1e-12));
    }

    // Without blend weights the fallback decides.
    let mut document = two_joint_rig(90.0, SkinningType::Blend);
    document.meshes[0].skins[0].blend_weights.clear();
    let params = EvaluationParams {
        blend_fallback: BlendFallback::DualQuaternion,
        ..Default::default()
    };
    let fallback = deform_document(&document, &params, None, 0.0).unwrap();
    for index in 0..4 {
        assert!(fallback[0][index].abs_diff_eq(dual_quaternion[index], 1e-12));
    }
}

#[test]
fn test_bind_pose_overrides_animation() {
    let document = two_joint_rig(60.0, SkinningType::Linear);
    let pose = PoseAsset {
        name: Some(String::from("bind")),
        kind: PoseKind::Bind,
        entries: vec![PoseEntry {
            node: LIMB_NODE,
            matrix: DMat4::from_translation(PIVOT),
            local: false,
        }],
    };
    let deformed = deform_document(&document, &EvaluationParams::default(), Some(&pose), 0.0)
        .unwrap()
        .remove(0);
    for (deformed, bind) in deformed.iter().zip(&document.meshes[0].control_points) {
        assert!(deformed.abs_diff_eq(*bind, 1e-12));
    }
}
