//! RDS resource properties.

use serde::Serialize;

use crate::template::ResourceProperties;
use crate::value::Value;

/// `AWS::RDS::DBSubnetGroup` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbSubnetGroup {
    /// Group description (required by the engine).
    #[serde(rename = "DBSubnetGroupDescription")]
    pub description: String,
    /// Subnets the database may be placed in.
    pub subnet_ids: Vec<Value>,
}

impl ResourceProperties for DbSubnetGroup {
    const TYPE: &'static str = "AWS::RDS::DBSubnetGroup";
}

/// `AWS::RDS::DBInstance` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbInstance {
    /// Database engine (`postgres`).
    pub engine: String,
    /// Engine version.
    pub engine_version: String,
    /// Instance size.
    #[serde(rename = "DBInstanceClass")]
    pub instance_class: String,
    /// Allocated storage in GiB (the engine expects a string).
    pub allocated_storage: String,
    /// Storage type (`gp2`).
    pub storage_type: String,
    /// Initial database name.
    #[serde(rename = "DBName")]
    pub db_name: String,
    /// Master user name; the password is generated and held by the engine.
    pub master_username: String,
    /// Let the engine manage the master password.
    pub manage_master_user_password: bool,
    /// Subnet group placement.
    #[serde(rename = "DBSubnetGroupName")]
    pub subnet_group: Value,
    /// Attached security groups.
    #[serde(rename = "VPCSecurityGroups")]
    pub vpc_security_groups: Vec<Value>,
    /// Log kinds shipped to CloudWatch.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enable_cloudwatch_logs_exports: Vec<String>,
    /// Whether the database is reachable from the public internet.
    pub publicly_accessible: bool,
}

impl ResourceProperties for DbInstance {
    const TYPE: &'static str = "AWS::RDS::DBInstance";
}
