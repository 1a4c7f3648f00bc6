//! Azure resource mappings.
//!
//! Each resource is a plain struct filled from IaC attributes plus optional
//! usage fields, implementing [`CoreResource`](crate::schema::CoreResource).

pub mod api_management;
pub mod app_configuration;
pub mod app_service_plan;
pub mod application_gateway;
pub mod backup_protected_vm;
pub mod bastion_host;
pub mod cognitive;
pub mod cognitive_account_language;
pub mod cognitive_account_luis;
pub mod cognitive_account_speech;
pub mod cognitive_deployment;
pub mod container_registry;
pub mod data_factory;
pub mod data_factory_integration_runtime_azure;
pub mod eventgrid_topic;
pub mod federated_identity_credential;
pub mod flexible_server;
pub mod frontdoor;
pub mod frontdoor_firewall_policy;
pub mod function_app;
pub mod kubernetes_cluster;
pub mod linux_virtual_machine;
pub mod log_analytics_workspace;
pub mod logic_app_standard;
pub mod managed_disk;
pub mod monitor_action_group;
pub mod monitor_metric_alert;
pub mod monitor_scheduled_query_rules_alert;
pub mod mssql_elasticpool;
pub mod mssql_managed_instance;
pub mod mysql_flexible_server;
pub mod network_connection_monitor;
pub mod network_ddos_protection_plan;
pub mod network_watcher_flow_log;
pub mod postgresql_flexible_server;
pub mod recovery_services_vault;
pub mod security_center_subscription_pricing;
pub mod servicebus_namespace;
pub mod signalr_service;
pub mod sql_database;
pub mod sql_managed_instance;
pub mod storage_account;
pub mod storage_queue;
pub mod storage_share;
pub mod storage_table;
pub mod traffic_manager_endpoint;
pub mod traffic_manager_profile;
pub mod util;
pub mod virtual_hub;
pub mod virtual_machine;
pub mod virtual_machine_scale_set;
pub mod virtual_network_peering;
pub mod vpn_gateway;
pub mod windows_virtual_machine;

pub use api_management::ApiManagement;
pub use app_configuration::AppConfiguration;
pub use app_service_plan::AppServicePlan;
pub use application_gateway::ApplicationGateway;
pub use backup_protected_vm::BackupProtectedVm;
pub use bastion_host::BastionHost;
pub use cognitive::{AccountSku, CommitmentSku, CommitmentTier, CommitmentUsage};
pub use cognitive_account_language::CognitiveAccountLanguage;
pub use cognitive_account_luis::CognitiveAccountLuis;
pub use cognitive_account_speech::{CognitiveAccountSpeech, SpeechCommitmentUsage};
pub use cognitive_deployment::CognitiveDeployment;
pub use container_registry::ContainerRegistry;
pub use data_factory::DataFactory;
pub use data_factory_integration_runtime_azure::DataFactoryIntegrationRuntimeAzure;
pub use eventgrid_topic::EventGridTopic;
pub use federated_identity_credential::FederatedIdentityCredential;
pub use frontdoor::Frontdoor;
pub use frontdoor_firewall_policy::FrontdoorFirewallPolicy;
pub use function_app::FunctionApp;
pub use kubernetes_cluster::{KubernetesCluster, NodePoolConfig};
pub use linux_virtual_machine::LinuxVirtualMachine;
pub use log_analytics_workspace::LogAnalyticsWorkspace;
pub use logic_app_standard::LogicAppStandard;
pub use managed_disk::{ManagedDisk, ManagedDiskData};
pub use monitor_action_group::MonitorActionGroup;
pub use monitor_metric_alert::MonitorMetricAlert;
pub use monitor_scheduled_query_rules_alert::MonitorScheduledQueryRulesAlert;
pub use mssql_elasticpool::MssqlElasticPool;
pub use mssql_managed_instance::MssqlManagedInstance;
pub use mysql_flexible_server::MySqlFlexibleServer;
pub use network_connection_monitor::NetworkConnectionMonitor;
pub use network_ddos_protection_plan::NetworkDdosProtectionPlan;
pub use network_watcher_flow_log::NetworkWatcherFlowLog;
pub use postgresql_flexible_server::PostgreSqlFlexibleServer;
pub use recovery_services_vault::RecoveryServicesVault;
pub use security_center_subscription_pricing::SecurityCenterSubscriptionPricing;
pub use servicebus_namespace::ServiceBusNamespace;
pub use signalr_service::SignalRService;
pub use sql_database::SqlDatabase;
pub use sql_managed_instance::SqlManagedInstance;
pub use storage_account::StorageAccount;
pub use storage_queue::StorageQueue;
pub use storage_share::StorageShare;
pub use storage_table::StorageTable;
pub use traffic_manager_endpoint::TrafficManagerEndpoint;
pub use traffic_manager_profile::TrafficManagerProfile;
pub use virtual_hub::VirtualHub;
pub use virtual_machine::VirtualMachine;
pub use virtual_machine_scale_set::VirtualMachineScaleSet;
pub use virtual_network_peering::VirtualNetworkPeering;
pub use vpn_gateway::{VpnGateway, VpnGatewayType};
pub use windows_virtual_machine::WindowsVirtualMachine;
