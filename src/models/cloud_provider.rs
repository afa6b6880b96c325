use super::types::Provider;
use super::workload::{InstanceSize, StorageType};

/// Static per-provider configuration: default region, SKU identifiers used in
/// the price data, and the provider's branded commitment programs.
#[derive(Debug)]
pub struct ProviderProfile {
    pub default_region: &'static str,
    pub instances: InstanceTable,
    pub object_storage: &'static str,
    pub block_storage: &'static str,
    pub relational_db: &'static str,
    pub document_db: &'static str,
    /// Monthly compute spend above which compute commitment plans apply.
    pub compute_commitment_threshold: f64,
    pub commitments: &'static [CommitmentPlan],
}

#[derive(Debug)]
pub struct InstanceTable {
    pub small: &'static str,
    pub medium: &'static str,
    pub large: &'static str,
}

/// What has to be true of the workload (or its priced totals) for a
/// commitment plan to be suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentTrigger {
    ComputeSpend,
    StorageSpend,
    DatabaseSpend,
    AnyDatabase,
    CdnNetworking,
    BigQuery,
}

impl CommitmentTrigger {
    /// What part of the account the plan covers.
    pub fn subject(self) -> &'static str {
        match self {
            Self::ComputeSpend => "compute",
            Self::StorageSpend => "storage",
            Self::DatabaseSpend | Self::AnyDatabase => "database",
            Self::CdnNetworking => "CDN traffic",
            Self::BigQuery => "BigQuery analytics",
        }
    }
}

#[derive(Debug)]
pub struct CommitmentPlan {
    pub trigger: CommitmentTrigger,
    pub program: &'static str,
    pub low: u32,
    pub high: u32,
    pub recommendation: &'static str,
    pub action: &'static str,
}

pub const STORAGE_COMMITMENT_THRESHOLD: f64 = 100.0;
pub const DATABASE_COMMITMENT_THRESHOLD: f64 = 150.0;

impl ProviderProfile {
    pub fn instance_for(&self, size: InstanceSize) -> &'static str {
        match size {
            InstanceSize::Small => self.instances.small,
            InstanceSize::Medium => self.instances.medium,
            InstanceSize::Large => self.instances.large,
        }
    }

    pub fn storage_sku(&self, kind: StorageType) -> &'static str {
        match kind {
            StorageType::Object => self.object_storage,
            _ => self.block_storage,
        }
    }

    pub fn database_sku(&self, relational: bool) -> &'static str {
        if relational {
            self.relational_db
        } else {
            self.document_db
        }
    }
}

impl Provider {
    pub fn profile(self) -> &'static ProviderProfile {
        match self {
            Self::Aws => &PROFILES[0],
            Self::Azure => &PROFILES[1],
            Self::Gcp => &PROFILES[2],
            Self::Ibm => &PROFILES[3],
            Self::Oracle => &PROFILES[4],
            Self::Alibaba => &PROFILES[5],
            Self::Digitalocean => &PROFILES[6],
        }
    }

    pub fn default_region(self) -> &'static str {
        self.profile().default_region
    }
}

static PROFILES: [ProviderProfile; 7] = [
    ProviderProfile {
        default_region: "us-east-1",
        instances: InstanceTable { small: "t2.small", medium: "t2.medium", large: "m5.large" },
        object_storage: "s3-standard",
        block_storage: "ebs-gp3",
        relational_db: "rds-mysql",
        document_db: "dynamodb",
        compute_commitment_threshold: 200.0,
        commitments: &[
            CommitmentPlan {
                trigger: CommitmentTrigger::ComputeSpend,
                program: "AWS Compute Savings Plans",
                low: 20,
                high: 40,
                recommendation: "Commit to a consistent hourly spend with a Compute Savings Plan",
                action: "Purchase a 1-year Compute Savings Plan covering baseline compute usage",
            },
            CommitmentPlan {
                trigger: CommitmentTrigger::DatabaseSpend,
                program: "Amazon RDS Reserved Instances",
                low: 30,
                high: 60,
                recommendation: "Reserve capacity for always-on RDS databases",
                action: "Buy RDS reservations for steady database workloads",
            },
        ],
    },
    ProviderProfile {
        default_region: "eastus",
        instances: InstanceTable { small: "Standard_B1ms", medium: "Standard_B2s", large: "Standard_D2s_v3" },
        object_storage: "blob-hot",
        block_storage: "managed-disk",
        relational_db: "mysql-flexible",
        document_db: "cosmos-db",
        compute_commitment_threshold: 200.0,
        commitments: &[
            CommitmentPlan {
                trigger: CommitmentTrigger::ComputeSpend,
                program: "Azure Reserved VM Instances",
                low: 20,
                high: 40,
                recommendation: "Reserve virtual machines that run continuously",
                action: "Purchase Azure Reserved VM Instances for always-on compute",
            },
            CommitmentPlan {
                trigger: CommitmentTrigger::StorageSpend,
                program: "Azure Storage Reserved Capacity",
                low: 15,
                high: 35,
                recommendation: "Reserve blob storage capacity in 100 TiB or 1 PiB blocks",
                action: "Buy Azure Blob Storage capacity reservations for 1 or 3 years",
            },
        ],
    },
    ProviderProfile {
        default_region: "us-central1",
        instances: InstanceTable { small: "e2-small", medium: "e2-medium", large: "n2-standard-2" },
        object_storage: "cloud-storage-standard",
        block_storage: "persistent-disk",
        relational_db: "cloud-sql-mysql",
        document_db: "firestore",
        compute_commitment_threshold: 200.0,
        commitments: &[
            CommitmentPlan {
                trigger: CommitmentTrigger::ComputeSpend,
                program: "GCP Committed Use Discounts",
                low: 25,
                high: 55,
                recommendation: "Commit to vCPU and memory usage for 1 or 3 years",
                action: "Purchase Compute Engine committed use discounts",
            },
            CommitmentPlan {
                trigger: CommitmentTrigger::BigQuery,
                program: "BigQuery Slot Commitments",
                low: 20,
                high: 40,
                recommendation: "Move predictable analytics to capacity-based pricing",
                action: "Purchase BigQuery slot commitments for recurring queries",
            },
        ],
    },
    ProviderProfile {
        default_region: "us-south",
        instances: InstanceTable { small: "cx2-2x4", medium: "bx2-2x8", large: "bx2-4x16" },
        object_storage: "cos-standard",
        block_storage: "block-storage",
        relational_db: "databases-for-mysql",
        document_db: "cloudant",
        compute_commitment_threshold: 200.0,
        commitments: &[CommitmentPlan {
            trigger: CommitmentTrigger::ComputeSpend,
            program: "IBM Cloud Reserved Capacity",
            low: 20,
            high: 40,
            recommendation: "Reserve virtual server capacity for steady workloads",
            action: "Purchase IBM Cloud reserved virtual server capacity",
        }],
    },
    ProviderProfile {
        default_region: "us-ashburn-1",
        instances: InstanceTable { small: "VM.Standard.E2.1", medium: "VM.Standard.E2.2", large: "VM.Standard.E2.4" },
        object_storage: "object-storage",
        block_storage: "block-volume",
        relational_db: "mysql-heatwave",
        document_db: "nosql-database",
        compute_commitment_threshold: 150.0,
        commitments: &[
            CommitmentPlan {
                trigger: CommitmentTrigger::ComputeSpend,
                program: "Oracle Universal Credits",
                low: 25,
                high: 50,
                recommendation: "Prepay annual consumption with Universal Credits",
                action: "Buy Oracle Universal Credits for annual compute consumption",
            },
            CommitmentPlan {
                trigger: CommitmentTrigger::AnyDatabase,
                program: "Oracle Bring Your Own License",
                low: 40,
                high: 60,
                recommendation: "Reuse existing licenses on OCI managed services",
                action: "Apply BYOL pricing to Oracle database services",
            },
        ],
    },
    ProviderProfile {
        default_region: "us-west-1",
        instances: InstanceTable { small: "ecs.t5-lc1m2.small", medium: "ecs.t5-lc1m2.large", large: "ecs.g6.large" },
        object_storage: "oss-standard",
        block_storage: "cloud-disk",
        relational_db: "apsaradb-mysql",
        document_db: "tablestore",
        compute_commitment_threshold: 150.0,
        commitments: &[
            CommitmentPlan {
                trigger: CommitmentTrigger::ComputeSpend,
                program: "Alibaba Cloud Reserved Instances",
                low: 20,
                high: 45,
                recommendation: "Reserve ECS capacity for long-running instances",
                action: "Purchase Alibaba Cloud reserved instances for ECS",
            },
            CommitmentPlan {
                trigger: CommitmentTrigger::CdnNetworking,
                program: "Alibaba Cloud CDN Resource Package",
                low: 15,
                high: 30,
                recommendation: "Prepay CDN traffic with a resource package",
                action: "Purchase an Alibaba Cloud CDN resource package",
            },
        ],
    },
    ProviderProfile {
        default_region: "nyc1",
        instances: InstanceTable { small: "s-1vcpu-2gb", medium: "s-2vcpu-4gb", large: "s-4vcpu-8gb" },
        object_storage: "spaces",
        block_storage: "volumes",
        relational_db: "managed-mysql",
        document_db: "managed-mongodb",
        compute_commitment_threshold: 200.0,
        commitments: &[],
    },
];
