//! Property tests for remote pipeline composition.

use proptest::prelude::*;

use rollout::domain::entities::StepKind;
use rollout::domain::services::{compose, service_action, ServiceAction};
use rollout::{DeploymentDescriptor, ServerTarget};

fn descriptor() -> impl Strategy<Value = DeploymentDescriptor> {
    (
        "[a-z][a-z0-9-]{0,15}",
        "/[a-z/]{1,24}",
        proptest::collection::vec("[ -~]{1,24}", 0..4),
        proptest::collection::btree_map("[A-Z][A-Z_]{0,8}", "[ -~]{0,16}", 0..4),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(app, path, pre, env, supervisor, optimize)| {
            let mut d = DeploymentDescriptor::new(ServerTarget::new("h", "u"), path, app)
                .with_pre_commands(pre)
                .with_supervisor(supervisor)
                .with_optimize_install(optimize);
            for (k, v) in env {
                d = d.with_env(k, v);
            }
            d
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: composing twice yields the identical command sequence.
    #[test]
    fn property_composition_idempotent(d in descriptor(), install in any::<bool>()) {
        let first = compose(&d, install);
        let second = compose(&d, install);
        prop_assert_eq!(first.render(), second.render());
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: install and rebuild appear together or not at all.
    #[test]
    fn property_install_implies_rebuild(d in descriptor(), install in any::<bool>()) {
        let pipeline = compose(&d, install);
        prop_assert_eq!(pipeline.contains(StepKind::Install), install);
        prop_assert_eq!(pipeline.contains(StepKind::Rebuild), install);
    }

    /// PROPERTY: the service action always comes last.
    #[test]
    fn property_service_action_last(d in descriptor(), install in any::<bool>()) {
        let pipeline = compose(&d, install);
        let last = pipeline.steps().last().map(|s| s.kind);
        prop_assert_eq!(last, Some(StepKind::ServiceAction));
    }

    /// PROPERTY: every user pre-command runs inside its own brace group.
    #[test]
    fn property_pre_commands_are_grouped(d in descriptor(), install in any::<bool>()) {
        let pipeline = compose(&d, install);
        for step in pipeline.steps().iter().filter(|s| s.kind == StepKind::PreCommand) {
            prop_assert!(step.command.starts_with("{ "), "command does not start with group open");
            prop_assert!(step.command.ends_with("\n}"), "command does not end with group close");
        }
    }

    /// PROPERTY: exactly one of reload or start is chosen.
    #[test]
    fn property_one_service_action(registered in any::<bool>()) {
        let action = service_action(registered);
        prop_assert_eq!(action == ServiceAction::Reload, registered);
        prop_assert_eq!(action == ServiceAction::Start, !registered);
    }
}
