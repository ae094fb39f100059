//! The network/compute stack: VPC, platform host, and database.
//!
//! Port layout mirrors the platform's runtime shape: the host serves SSH
//! and HTTP(S) to the world, the database accepts connections only from the
//! host's security group and the environment's allow-listed ranges.

use edustack_core::{EnvConfig, ExportKey, resource_name};
use edustack_template::{
    DeletionPolicy, Parameter, ResourceProperties, Tag, Template, Value, ec2, iam, rds,
};

use crate::actions;
use crate::constants::{EC2_SERVICE, SSM_MANAGED_INSTANCE_CORE_ARN};
use crate::error::SynthError;
use crate::stack::{StackDefinition, export_output};

/// IPv4 range of the platform network.
const VPC_CIDR: &str = "10.0.0.0/16";

/// Public subnet ranges, one per availability zone.
const PUBLIC_SUBNET_CIDRS: [&str; 2] = ["10.0.0.0/24", "10.0.1.0/24"];

/// Isolated subnet ranges, one per availability zone.
const ISOLATED_SUBNET_CIDRS: [&str; 2] = ["10.0.2.0/24", "10.0.3.0/24"];

/// Parameter-store path resolving the host machine image.
const AMI_PARAMETER_PATH: &str =
    "/aws/service/ami-amazon-linux-latest/al2023-ami-kernel-default-x86_64";

/// Boot script for the platform host.
const USER_DATA: &str = "\
#!/bin/bash
set -euo pipefail
dnf install -y docker postgresql17
systemctl enable --now docker
usermod -aG docker ec2-user
";

/// The network/compute stack definition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkStack;

impl NetworkStack {
    /// The stack's identifier.
    pub const ID: &'static str = "edu-network";
}

impl StackDefinition for NetworkStack {
    fn id(&self) -> &str {
        Self::ID
    }

    fn synth(&self, config: &EnvConfig) -> Result<Template, SynthError> {
        let env = &config.environment;
        let account = &config.account_id;
        let mut template = Template::new(format!(
            "Network, platform host, and database for the {env} environment"
        ));

        template.add_parameter(
            "AmiId",
            Parameter::ssm_ami(AMI_PARAMETER_PATH, "Machine image for the platform host"),
        )?;

        // ---- network ----
        let vpc_name = resource_name(Self::ID, "vpc", env, account)?;
        template.add_resource(
            "Vpc",
            ec2::Vpc {
                cidr_block: VPC_CIDR.to_owned(),
                enable_dns_support: true,
                enable_dns_hostnames: true,
                tags: vec![Tag::name(vpc_name.as_str())],
            }
            .into_resource()?,
        )?;

        template.add_resource(
            "InternetGateway",
            ec2::InternetGateway {
                tags: vec![Tag::name(resource_name(Self::ID, "igw", env, account)?.as_str())],
            }
            .into_resource()?,
        )?;
        template.add_resource(
            "GatewayAttachment",
            ec2::VpcGatewayAttachment {
                vpc_id: Value::reference("Vpc"),
                internet_gateway_id: Value::reference("InternetGateway"),
            }
            .into_resource()?,
        )?;

        for (zone, cidr) in (0u32..).zip(PUBLIC_SUBNET_CIDRS) {
            template.add_resource(
                format!("PublicSubnet{}", zone + 1),
                ec2::Subnet {
                    vpc_id: Value::reference("Vpc"),
                    cidr_block: cidr.to_owned(),
                    availability_zone: Value::availability_zone(zone),
                    map_public_ip_on_launch: true,
                    tags: vec![Tag::name(format!("{vpc_name}-public-{}", zone + 1))],
                }
                .into_resource()?,
            )?;
        }
        for (zone, cidr) in (0u32..).zip(ISOLATED_SUBNET_CIDRS) {
            template.add_resource(
                format!("IsolatedSubnet{}", zone + 1),
                ec2::Subnet {
                    vpc_id: Value::reference("Vpc"),
                    cidr_block: cidr.to_owned(),
                    availability_zone: Value::availability_zone(zone),
                    map_public_ip_on_launch: false,
                    tags: vec![Tag::name(format!("{vpc_name}-isolated-{}", zone + 1))],
                }
                .into_resource()?,
            )?;
        }

        template.add_resource(
            "PublicRouteTable",
            ec2::RouteTable {
                vpc_id: Value::reference("Vpc"),
                tags: vec![Tag::name(format!("{vpc_name}-public"))],
            }
            .into_resource()?,
        )?;
        template.add_resource(
            "PublicDefaultRoute",
            ec2::Route {
                route_table_id: Value::reference("PublicRouteTable"),
                destination_cidr_block: "0.0.0.0/0".to_owned(),
                gateway_id: Value::reference("InternetGateway"),
            }
            .into_resource()?
            .depends_on("GatewayAttachment"),
        )?;
        for n in 1..=PUBLIC_SUBNET_CIDRS.len() {
            template.add_resource(
                format!("PublicSubnet{n}RouteAssociation"),
                ec2::SubnetRouteTableAssociation {
                    subnet_id: Value::reference(format!("PublicSubnet{n}")),
                    route_table_id: Value::reference("PublicRouteTable"),
                }
                .into_resource()?,
            )?;
        }

        // ---- security groups ----
        template.add_resource(
            "Ec2SecurityGroup",
            ec2::SecurityGroup {
                group_description:
                    "Platform host: SSH and HTTP(S) from anywhere, database egress".to_owned(),
                vpc_id: Value::reference("Vpc"),
                security_group_ingress: vec![
                    ec2::IngressRule::tcp_from_cidr(22, "0.0.0.0/0", "SSH access"),
                    ec2::IngressRule::tcp_from_cidr(80, "0.0.0.0/0", "HTTP access"),
                    ec2::IngressRule::tcp_from_cidr(443, "0.0.0.0/0", "HTTPS access"),
                ],
                tags: vec![Tag::name(resource_name(Self::ID, "sg-ec2", env, account)?.as_str())],
            }
            .into_resource()?,
        )?;

        let mut db_ingress = vec![ec2::IngressRule::tcp_from_group(
            5432,
            Value::get_att("Ec2SecurityGroup", "GroupId"),
            "Platform host to database",
        )];
        for cidr in &config.whitelisted_cidrs {
            db_ingress.push(ec2::IngressRule::tcp_from_cidr(
                5432,
                cidr.as_str(),
                format!("Allow-listed range {cidr}"),
            ));
        }
        template.add_resource(
            "RdsSecurityGroup",
            ec2::SecurityGroup {
                group_description: "Database: platform host and allow-listed ranges only"
                    .to_owned(),
                vpc_id: Value::reference("Vpc"),
                security_group_ingress: db_ingress,
                tags: vec![Tag::name(resource_name(Self::ID, "sg-rds", env, account)?.as_str())],
            }
            .into_resource()?,
        )?;

        // ---- host identity and instance ----
        let role_name = resource_name(Self::ID, "role-ec2", env, account)?;
        template.add_resource(
            "Ec2Role",
            iam::Role {
                role_name: Some(role_name.as_str().to_owned()),
                assume_role_policy_document: iam::PolicyDocument::service_assume_role(EC2_SERVICE),
                managed_policy_arns: vec![SSM_MANAGED_INSTANCE_CORE_ARN.to_owned()],
                policies: vec![iam::InlinePolicy {
                    policy_name: "parameter-store-read".to_owned(),
                    policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                        actions::PARAMETER_READ,
                        vec![Value::literal(config.parameter_store_arn().as_str())],
                    )]),
                }],
            }
            .into_resource()?,
        )?;
        template.add_resource(
            "Ec2InstanceProfile",
            iam::InstanceProfile {
                roles: vec![Value::reference("Ec2Role")],
            }
            .into_resource()?,
        )?;

        template.add_resource(
            "Ec2Instance",
            ec2::Instance {
                instance_type: "t3.micro".to_owned(),
                image_id: Value::reference("AmiId"),
                key_name: config.key_pair_name.clone(),
                iam_instance_profile: Value::reference("Ec2InstanceProfile"),
                network_interfaces: vec![ec2::NetworkInterface {
                    associate_public_ip_address: true,
                    device_index: "0".to_owned(),
                    subnet_id: Value::reference("PublicSubnet1"),
                    group_set: vec![Value::reference("Ec2SecurityGroup")],
                }],
                user_data: Value::Base64(Box::new(Value::literal(USER_DATA))),
                tags: vec![Tag::name(resource_name(Self::ID, "ec2", env, account)?.as_str())],
            }
            .into_resource()?,
        )?;

        // ---- database ----
        template.add_resource(
            "DbSubnetGroup",
            rds::DbSubnetGroup {
                description: "Isolated subnets for the platform database".to_owned(),
                subnet_ids: (1..=ISOLATED_SUBNET_CIDRS.len())
                    .map(|n| Value::reference(format!("IsolatedSubnet{n}")))
                    .collect(),
            }
            .into_resource()?,
        )?;
        template.add_resource(
            "Database",
            rds::DbInstance {
                engine: "postgres".to_owned(),
                engine_version: "17.2".to_owned(),
                instance_class: "db.t4g.micro".to_owned(),
                allocated_storage: "20".to_owned(),
                storage_type: "gp2".to_owned(),
                db_name: format!("eduPlatformDb{env}"),
                master_username: "postgres".to_owned(),
                manage_master_user_password: true,
                subnet_group: Value::reference("DbSubnetGroup"),
                vpc_security_groups: vec![Value::get_att("RdsSecurityGroup", "GroupId")],
                enable_cloudwatch_logs_exports: vec!["postgresql".to_owned()],
                publicly_accessible: false,
            }
            .into_resource()?
            .with_deletion_policy(DeletionPolicy::Delete),
        )?;

        // ---- exports ----
        template.add_output(
            ExportKey::Ec2PublicIp.wire_name(),
            export_output(
                Value::get_att("Ec2Instance", "PublicIp"),
                ExportKey::Ec2PublicIp,
            )
            .with_description("Public address of the platform host"),
        )?;
        template.add_output(
            ExportKey::Ec2RoleName.wire_name(),
            export_output(Value::literal(role_name.as_str()), ExportKey::Ec2RoleName)
                .with_description("Instance role of the platform host"),
        )?;
        template.add_output(
            ExportKey::Ec2InstanceId.wire_name(),
            export_output(Value::reference("Ec2Instance"), ExportKey::Ec2InstanceId)
                .with_description("Instance id of the platform host"),
        )?;

        Ok(template)
    }
}
