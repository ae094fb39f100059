//! Template shape tests against the synthesized JSON.

#[cfg(test)]
mod tests {
    use crate::{synth_platform, template_json};

    #[test]
    fn test_should_emit_engine_ready_network_template() {
        let artifacts = synth_platform("dev").unwrap();
        let json = template_json(&artifacts, "edu-network");

        assert_eq!(json["AWSTemplateFormatVersion"], "2010-09-09");
        let resources = json["Resources"].as_object().unwrap();
        for expected in [
            "Vpc",
            "InternetGateway",
            "GatewayAttachment",
            "PublicSubnet1",
            "PublicSubnet2",
            "IsolatedSubnet1",
            "IsolatedSubnet2",
            "Ec2SecurityGroup",
            "RdsSecurityGroup",
            "Ec2Role",
            "Ec2InstanceProfile",
            "Ec2Instance",
            "DbSubnetGroup",
            "Database",
        ] {
            assert!(resources.contains_key(expected), "missing {expected}");
        }

        assert_eq!(
            json["Parameters"]["AmiId"]["Type"],
            "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>"
        );
        assert_eq!(
            json["Outputs"]["Ec2PublicIp"]["Export"]["Name"],
            "Ec2PublicIp"
        );
        assert_eq!(
            json["Outputs"]["Ec2PublicIp"]["Value"],
            serde_json::json!({"Fn::GetAtt": ["Ec2Instance", "PublicIp"]})
        );
    }

    #[test]
    fn test_should_scope_delivery_trust_to_repository_branches() {
        let artifacts = synth_platform("dev").unwrap();
        let json = template_json(&artifacts, "edu-delivery");

        let provider = &json["Resources"]["GitHubOidcProvider"]["Properties"];
        assert_eq!(provider["Url"], "https://token.actions.githubusercontent.com");
        assert_eq!(provider["ClientIdList"][0], "sts.amazonaws.com");

        let conditions = &json["Resources"]["ServiceDeployRole"]["Properties"]
            ["AssumeRolePolicyDocument"]["Statement"][0]["Condition"]["StringEquals"];
        assert_eq!(
            conditions["token.actions.githubusercontent.com:sub"],
            "repo:edukit/platform:ref:refs/heads/master"
        );

        let pipeline_conditions = &json["Resources"]["PipelineDeployRole"]["Properties"]
            ["AssumeRolePolicyDocument"]["Statement"][0]["Condition"]["StringEquals"];
        assert_eq!(
            pipeline_conditions["token.actions.githubusercontent.com:sub"],
            "repo:edukit/platform-deploy:ref:refs/heads/master"
        );
    }

    #[test]
    fn test_should_wire_media_pipeline_end_to_end() {
        let artifacts = synth_platform("dev").unwrap();
        let json = template_json(&artifacts, "edu-media");
        let resources = &json["Resources"];

        // Upload-side: .mp4 on the unprocessed bucket invokes the submit
        // function.
        let submit_filter = &resources["UnprocessedBucket"]["Properties"]
            ["NotificationConfiguration"]["LambdaConfigurations"][0]["Filter"]["S3Key"]
            ["Rules"][0];
        assert_eq!(submit_filter["Name"], "suffix");
        assert_eq!(submit_filter["Value"], ".mp4");

        // Output-side: .m3u8 on the processed bucket invokes the status
        // function.
        let status_filter = &resources["ProcessedBucket"]["Properties"]
            ["NotificationConfiguration"]["LambdaConfigurations"][0]["Filter"]["S3Key"]
            ["Rules"][0];
        assert_eq!(status_filter["Value"], ".m3u8");

        // The callback host flows in from the network stack's export.
        assert_eq!(
            resources["StatusFn"]["Properties"]["Environment"]["Variables"]
                ["PLATFORM_BASE_URL"],
            serde_json::json!({"Fn::ImportValue": "Ec2PublicIp"})
        );

        // The platform host role is extended, not redefined.
        assert_eq!(
            resources["HostMediaReadPolicy"]["Properties"]["Roles"][0],
            serde_json::json!({"Fn::ImportValue": "Ec2RoleName"})
        );
    }

    #[test]
    fn test_should_keep_media_buckets_encrypted_and_public() {
        let artifacts = synth_platform("dev").unwrap();
        let json = template_json(&artifacts, "edu-media");

        for bucket in ["UnprocessedBucket", "ProcessedBucket"] {
            let properties = &json["Resources"][bucket]["Properties"];
            assert_eq!(
                properties["BucketEncryption"]["ServerSideEncryptionConfiguration"][0]
                    ["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
                "AES256"
            );
        }
        for policy in ["UnprocessedBucketPolicy", "ProcessedBucketPolicy"] {
            let statement =
                &json["Resources"][policy]["Properties"]["PolicyDocument"]["Statement"][0];
            assert_eq!(statement["Principal"], "*");
            assert_eq!(statement["Action"], serde_json::json!(["s3:GetObject"]));
        }
    }

    #[test]
    fn test_should_derive_unique_physical_names_per_environment() {
        let dev = synth_platform("dev").unwrap();
        let prod = synth_platform("prod").unwrap();

        let dev_bucket = template_json(&dev, "edu-media")["Resources"]["UnprocessedBucket"]
            ["Properties"]["BucketName"]
            .as_str()
            .unwrap()
            .to_owned();
        let prod_bucket = template_json(&prod, "edu-media")["Resources"]["UnprocessedBucket"]
            ["Properties"]["BucketName"]
            .as_str()
            .unwrap()
            .to_owned();

        assert_eq!(dev_bucket, "edu-media-unprocessed-dev-805358685077");
        assert_ne!(dev_bucket, prod_bucket);
    }
}
