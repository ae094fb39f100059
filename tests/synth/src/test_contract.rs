//! Cross-stack contract tests: ordering, exports, imports.

#[cfg(test)]
mod tests {
    use edustack_core::EnvRegistry;
    use edustack_stacks::{
        App, DeliveryStack, DeliveryStackProps, MediaStack, MediaStackProps, NetworkStack,
        SynthError,
    };

    use crate::{config_for, synth_platform};

    #[test]
    fn test_should_synthesize_stacks_in_declared_order() {
        let artifacts = synth_platform("dev").unwrap();
        let ids: Vec<&str> = artifacts.iter().map(|a| a.stack_id.as_str()).collect();
        assert_eq!(ids, vec!["edu-network", "edu-delivery", "edu-media"]);
    }

    #[test]
    fn test_should_publish_the_full_export_contract() {
        let artifacts = synth_platform("dev").unwrap();
        let mut exports: Vec<String> = artifacts
            .iter()
            .flat_map(|a| a.exports.iter().cloned())
            .collect();
        exports.sort();
        assert_eq!(
            exports,
            vec![
                "Ec2InstanceId",
                "Ec2PublicIp",
                "Ec2RoleName",
                "FrontendBucketDomain",
                "GitActionRoleName",
            ]
        );
    }

    #[test]
    fn test_should_resolve_every_media_import_from_network_exports() {
        let artifacts = synth_platform("dev").unwrap();
        let network = &artifacts[0];
        let media = &artifacts[2];

        assert_eq!(media.imports, vec!["Ec2PublicIp", "Ec2RoleName"]);
        for import in &media.imports {
            assert!(
                network.exports.contains(import),
                "{import} must come from the network stack"
            );
        }
    }

    #[test]
    fn test_should_fail_when_media_ordering_is_not_declared() {
        // Same stacks, but without the media → network constraint: the
        // media stack's imports have no declared producer.
        let mut app = App::new();
        app.add_stack(NetworkStack).unwrap();
        app.add_stack(DeliveryStack::new(
            DeliveryStackProps::builder()
                .service_repo("edukit/platform")
                .deploy_repo("edukit/platform-deploy")
                .build(),
        ))
        .unwrap();
        app.add_stack(MediaStack::new(MediaStackProps::builder().build()))
            .unwrap();
        app.depends_on(DeliveryStack::ID, NetworkStack::ID).unwrap();

        let err = app.synth_all(&config_for("dev")).unwrap_err();
        match err {
            SynthError::UnresolvedImport { stack, import } => {
                assert_eq!(stack, "edu-media");
                assert!(import == "Ec2PublicIp" || import == "Ec2RoleName", "{import}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_fail_for_unknown_environment_before_synthesis() {
        let registry = EnvRegistry::builtin();
        let err = registry.resolve("integration").unwrap_err();
        assert!(err.to_string().contains("unknown environment"), "{err}");
    }

    #[test]
    fn test_should_synthesize_prod_without_allow_list_rules() {
        let artifacts = synth_platform("prod").unwrap();
        let json = crate::template_json(&artifacts, "edu-network");
        let ingress = json["Resources"]["RdsSecurityGroup"]["Properties"]
            ["SecurityGroupIngress"]
            .as_array()
            .unwrap();
        // Only the host security-group rule; prod has no allow-listed ranges.
        assert_eq!(ingress.len(), 1);
        assert!(ingress[0].get("SourceSecurityGroupId").is_some());
    }
}
