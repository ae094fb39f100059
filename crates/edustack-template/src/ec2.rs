//! EC2 and VPC resource properties.

use serde::Serialize;

use crate::template::{ResourceProperties, Tag};
use crate::value::Value;

/// `AWS::EC2::VPC` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vpc {
    /// Primary IPv4 range of the network.
    pub cidr_block: String,
    /// Whether DNS resolution is enabled.
    pub enable_dns_support: bool,
    /// Whether instances receive DNS hostnames.
    pub enable_dns_hostnames: bool,
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for Vpc {
    const TYPE: &'static str = "AWS::EC2::VPC";
}

/// `AWS::EC2::Subnet` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    /// Owning network.
    pub vpc_id: Value,
    /// IPv4 range of the subnet.
    pub cidr_block: String,
    /// Availability zone placement.
    pub availability_zone: Value,
    /// Whether launched instances get a public address by default.
    pub map_public_ip_on_launch: bool,
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for Subnet {
    const TYPE: &'static str = "AWS::EC2::Subnet";
}

/// `AWS::EC2::InternetGateway` properties.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InternetGateway {
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for InternetGateway {
    const TYPE: &'static str = "AWS::EC2::InternetGateway";
}

/// `AWS::EC2::VPCGatewayAttachment` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcGatewayAttachment {
    /// The network the gateway attaches to.
    pub vpc_id: Value,
    /// The gateway being attached.
    pub internet_gateway_id: Value,
}

impl ResourceProperties for VpcGatewayAttachment {
    const TYPE: &'static str = "AWS::EC2::VPCGatewayAttachment";
}

/// `AWS::EC2::RouteTable` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTable {
    /// Owning network.
    pub vpc_id: Value,
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for RouteTable {
    const TYPE: &'static str = "AWS::EC2::RouteTable";
}

/// `AWS::EC2::Route` properties (internet default route).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    /// Route table receiving the route.
    pub route_table_id: Value,
    /// Destination range.
    pub destination_cidr_block: String,
    /// Target gateway.
    pub gateway_id: Value,
}

impl ResourceProperties for Route {
    const TYPE: &'static str = "AWS::EC2::Route";
}

/// `AWS::EC2::SubnetRouteTableAssociation` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetRouteTableAssociation {
    /// Subnet being associated.
    pub subnet_id: Value,
    /// Route table applied to the subnet.
    pub route_table_id: Value,
}

impl ResourceProperties for SubnetRouteTableAssociation {
    const TYPE: &'static str = "AWS::EC2::SubnetRouteTableAssociation";
}

/// One inbound rule of a security group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IngressRule {
    /// Protocol name (`tcp`).
    pub ip_protocol: String,
    /// First port in the allowed range.
    pub from_port: u16,
    /// Last port in the allowed range.
    pub to_port: u16,
    /// Allowed IPv4 source range, for address-based rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_ip: Option<String>,
    /// Allowed source security group, for group-based rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_security_group_id: Option<Value>,
    /// Rule description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IngressRule {
    /// A TCP rule admitting a port from an IPv4 range.
    #[must_use]
    pub fn tcp_from_cidr(port: u16, cidr: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ip_protocol: "tcp".to_owned(),
            from_port: port,
            to_port: port,
            cidr_ip: Some(cidr.into()),
            source_security_group_id: None,
            description: Some(description.into()),
        }
    }

    /// A TCP rule admitting a port from another security group.
    #[must_use]
    pub fn tcp_from_group(port: u16, group: Value, description: impl Into<String>) -> Self {
        Self {
            ip_protocol: "tcp".to_owned(),
            from_port: port,
            to_port: port,
            cidr_ip: None,
            source_security_group_id: Some(group),
            description: Some(description.into()),
        }
    }
}

/// `AWS::EC2::SecurityGroup` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    /// Group description (required by the engine).
    pub group_description: String,
    /// Owning network.
    pub vpc_id: Value,
    /// Inbound rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ingress: Vec<IngressRule>,
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for SecurityGroup {
    const TYPE: &'static str = "AWS::EC2::SecurityGroup";
}

/// Primary network interface of an instance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterface {
    /// Whether the interface receives a public address.
    pub associate_public_ip_address: bool,
    /// Interface index (the engine expects a string).
    pub device_index: String,
    /// Subnet placement.
    pub subnet_id: Value,
    /// Attached security groups.
    pub group_set: Vec<Value>,
}

/// `AWS::EC2::Instance` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    /// Instance size.
    pub instance_type: String,
    /// Machine image, typically resolved through an SSM parameter.
    pub image_id: Value,
    /// SSH key pair name.
    pub key_name: String,
    /// Attached instance profile.
    pub iam_instance_profile: Value,
    /// Network placement; used instead of top-level subnet/group fields so a
    /// public address can be requested explicitly.
    pub network_interfaces: Vec<NetworkInterface>,
    /// Base64-encoded boot script.
    pub user_data: Value,
    /// Resource tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl ResourceProperties for Instance {
    const TYPE: &'static str = "AWS::EC2::Instance";
}
