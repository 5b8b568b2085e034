//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hattori.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Hattori configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} and list the tables to scrub", self.output);
                println!("  2. Set HATTORI_DATABASE_URL (or put it in a .env file)");
                println!("  3. Check the configuration: hattori validate-config");
                println!("  4. Try it without writing: hattori run --dry-run");
                println!("  5. Run it: hattori run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Hattori Configuration File

[application]
log_level = "info"
dry_run = false

[database]
connection_string = "${HATTORI_DATABASE_URL}"

[anonymization]
locale = "en"
batch_size = 1000

[[targets]]
model = "auth_user"
attributes = [
  { field = "first_name", faker = "first_name" },
  { field = "last_name", faker = "last_name" },
  { field = "email", faker = "safe_email" },
]

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Hattori Configuration File
#
# Every [[targets]] entry names a table and the columns to overwrite.
# Overwrites are direct and cannot be undone: run against a copy of
# production, never production itself.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (substitute values but never write them back)
dry_run = false

# ============================================================================
# Database
# ============================================================================
[database]
# PostgreSQL connection string. ${VAR} placeholders are read from the
# environment (and from a .env file next to the binary).
connection_string = "${HATTORI_DATABASE_URL}"

# Pool size and timeouts
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 300

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Data locale for generated values: en, fr_fr, pt_br, zh_cn, zh_tw
locale = "en"

# Records per page and per bulk update
batch_size = 1000

# Fixed seed for reproducible values (omit for random values)
# seed = 42

# Show a progress bar per target
progress = true

# ============================================================================
# Targets
# ============================================================================
# Each attribute sets exactly one of:
#   faker = "<kind>"   generated per record, cut to the column's max length
#   value = "<text>"   written as-is to every record
# Run `hattori list-fakers` for the supported kinds.

[[targets]]
name = "users"
model = "auth_user"
primary_key = "id"
attributes = [
  { field = "first_name", faker = "first_name" },
  { field = "last_name", faker = "last_name" },
  { field = "email", faker = "safe_email" },
  { field = "password", value = "!" },
]

[[targets]]
name = "customer_contacts"
model = "crm.contacts"
# Filters narrow the records (ops: eq, ne, is_null, is_not_null)
filters = [
  { field = "country", op = "ne", value = "internal" },
  { field = "phone", op = "is_not_null" },
]
attributes = [
  { field = "name", faker = "name" },
  { field = "phone", faker = "phone_number" },
  { field = "street", faker = "street_name" },
  { field = "city", faker = "city" },
  { field = "zip", faker = "zip_code" },
  { field = "notes", value = "" },
]

# ============================================================================
# Logging
# ============================================================================
[logging]
# Also write JSON logs to a rotating file
local_enabled = false
local_path = "./logs"
# Rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
