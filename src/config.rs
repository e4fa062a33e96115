//! Application configuration.
//!
//! Serde-deserializable config structs with defaults matching the published
//! LevelUp program rules, loadable from YAML files or environment variables.

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "LEVELUP_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "LEVELUP";

/// Point accrual rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccrualRules {
    /// Currency units spent per point earned on purchases.
    pub spend_per_point: i64,
    /// Flat points per distinct product reviewed.
    pub review_points: i64,
    /// Flat points to the referrer per registered referred user.
    pub referral_points: i64,
    /// Points per loyalty level.
    pub level_band: i64,
}

impl Default for AccrualRules {
    fn default() -> Self {
        Self {
            spend_per_point: 1000,
            review_points: 100,
            referral_points: 500,
            level_band: 1000,
        }
    }
}

impl AccrualRules {
    /// Check that every rule value is positive.
    ///
    /// `spend_per_point` and `level_band` are divisors in the engine, so a
    /// zero or negative value from a config file must be rejected at load
    /// time rather than surfacing as a divide-by-zero later.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let fields = [
            ("spend_per_point", self.spend_per_point),
            ("review_points", self.review_points),
            ("referral_points", self.referral_points),
            ("level_band", self.level_band),
        ];
        for (name, value) in fields {
            if value <= 0 {
                return Err(format!("rules.{name} must be positive, got {value}"));
            }
        }
        Ok(())
    }
}

/// Discount policy derived from level and student status.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscountPolicy {
    /// Level at which the level discount stops growing.
    pub max_discount_level: i64,
    /// Flat discount for students from a recognized domain.
    ///
    /// The level discount and the student discount do not stack; callers
    /// get the larger of the two (see `LoyaltyEngine::effective_discount`).
    pub student_discount_percent: i64,
    /// Email suffixes that mark a user as student-discount eligible.
    pub student_domains: Vec<String>,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self {
            max_discount_level: 5,
            student_discount_percent: 20,
            student_domains: vec!["@duocuc.cl".to_string(), "@duoc.cl".to_string()],
        }
    }
}

impl DiscountPolicy {
    /// Whether an email address belongs to a student-discount domain.
    pub fn is_student_email(&self, email: &str) -> bool {
        self.student_domains
            .iter()
            .any(|domain| email.ends_with(domain.as_str()))
    }
}

/// Storage type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Sqlite,
    Postgres,
    Memory,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StorageType::Sqlite => "sqlite",
            StorageType::Postgres => "postgres",
            StorageType::Memory => "memory",
        };
        f.write_str(s)
    }
}

/// SQLite-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "data/loyalty.db".to_string(),
        }
    }
}

/// PostgreSQL-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URI.
    pub uri: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://localhost:5432/loyalty".to_string(),
        }
    }
}

/// Storage configuration (discriminated union).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// SQLite-specific configuration.
    pub sqlite: SqliteConfig,
    /// PostgreSQL-specific configuration.
    pub postgres: PostgresConfig,
}

/// Top-level library configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Point accrual rules.
    pub rules: AccrualRules,
    /// Discount policy.
    pub discount: DiscountPolicy,
    /// Storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `LEVELUP_CONFIG` environment variable (if set)
    /// 4. Environment variables with `LEVELUP` prefix
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.rules.validate()?;
        Ok(config)
    }
}
