//! Run coordinator - runs every configured target in order
//!
//! The coordinator turns `[[targets]]` entries into target definitions up
//! front, so a configuration problem in the last target stops the run before
//! the first one touches the store. Targets then run sequentially against a
//! shared [`RecordStore`]; the first failure aborts the remaining targets.

use super::faker::{Locale, ValueFactory};
use super::report::RunReport;
use super::runner::{anonymizer_for, RunOptions};
use super::target::TargetDefinition;
use crate::adapters::database::RecordStore;
use crate::config::HattoriConfig;
use crate::domain::{FieldFilter, HattoriError, Result};
use crate::progress::progress_for;
use std::sync::Arc;

/// A target ready to run
#[derive(Debug, Clone)]
pub struct PlannedTarget {
    /// Model and replacers
    pub definition: TargetDefinition,

    /// Filters narrowing the records, empty for the whole model
    pub filters: Vec<FieldFilter>,
}

/// Sequential runner for a list of targets
#[derive(Debug)]
pub struct RunCoordinator {
    targets: Vec<PlannedTarget>,
}

impl RunCoordinator {
    /// Creates a coordinator from already-built targets
    pub fn new(targets: Vec<PlannedTarget>) -> Self {
        Self { targets }
    }

    /// Builds every target of `config`
    ///
    /// When `only` is non-empty, just the targets with those names are kept,
    /// in configuration order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a target is incomplete, names an
    /// unknown faker or has a malformed filter, or if `only` names a target
    /// that does not exist.
    pub fn from_config(config: &HattoriConfig, only: &[String]) -> Result<Self> {
        for name in only {
            if !config.targets.iter().any(|t| t.display_name() == name) {
                return Err(HattoriError::Configuration(format!(
                    "no target named '{}' in the configuration",
                    name
                )));
            }
        }

        let locale = Locale::resolve(config.anonymization.locale.as_deref());
        let factory = ValueFactory::new(locale, config.anonymization.seed);

        let mut targets = Vec::new();
        for target in &config.targets {
            if !only.is_empty() && !only.iter().any(|n| n == target.display_name()) {
                continue;
            }
            for filter in &target.filters {
                filter.validate()?;
            }
            targets.push(PlannedTarget {
                definition: TargetDefinition::from_config(target, &factory)?,
                filters: target.filters.clone(),
            });
        }

        tracing::debug!(
            targets = targets.len(),
            locale = %locale,
            seeded = config.anonymization.seed.is_some(),
            "Planned anonymization"
        );
        Ok(Self { targets })
    }

    /// Planned targets, in run order
    pub fn targets(&self) -> &[PlannedTarget] {
        &self.targets
    }

    /// Runs every target against `store`
    ///
    /// # Errors
    ///
    /// Returns the first target's error. Targets that finished before it
    /// stay persisted.
    pub async fn execute(
        &self,
        store: Arc<dyn RecordStore>,
        options: RunOptions,
        show_progress: bool,
    ) -> Result<RunReport> {
        let mut report = RunReport::new(options.dry_run);

        for planned in &self.targets {
            let name = planned.definition.name().to_string();
            let anonymizer = anonymizer_for(
                planned.definition.clone(),
                store.clone(),
                planned.filters.clone(),
            )?;
            let mut progress = progress_for(&name, show_progress);

            match anonymizer.run_with(options, progress.as_mut()).await {
                Ok(target_report) => report.add_target(target_report),
                Err(e) => {
                    crate::log_error_with_context!(&e, name.as_str());
                    return Err(e);
                }
            }
        }

        report.finish();
        report.log_summary();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::config::loader::ENV_LOCK;
    use crate::config::load_config_str;
    use crate::domain::FieldMeta;

    const CONFIG: &str = r#"
[anonymization]
seed = 1

[[targets]]
name = "users"
model = "auth_user"
attributes = [
  { field = "first_name", faker = "first_name" },
  { field = "email", value = "scrubbed@example.com" },
]

[[targets]]
name = "staff"
model = "auth_user"
filters = [{ field = "is_staff", op = "eq", value = "true" }]
attributes = [{ field = "email", value = "staff@example.com" }]
"#;

    fn store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.create_table(
            "auth_user",
            [
                FieldMeta::unbounded("id"),
                FieldMeta::bounded("first_name", 30),
                FieldMeta::bounded("email", 254),
                FieldMeta::unbounded("is_staff"),
            ],
        );
        store
            .insert(
                "auth_user",
                "1",
                [
                    ("first_name", Some("Ada")),
                    ("email", Some("ada@corp.example")),
                    ("is_staff", Some("true")),
                ],
            )
            .unwrap();
        store
            .insert(
                "auth_user",
                "2",
                [
                    ("first_name", Some("Bob")),
                    ("email", Some("bob@corp.example")),
                    ("is_staff", Some("false")),
                ],
            )
            .unwrap();
        Arc::new(store)
    }

    fn config() -> HattoriConfig {
        toml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_from_config_builds_all_targets() {
        let coordinator = RunCoordinator::from_config(&config(), &[]).unwrap();
        assert_eq!(coordinator.targets().len(), 2);
        assert!(coordinator.targets()[0].filters.is_empty());
        assert_eq!(coordinator.targets()[1].filters.len(), 1);
    }

    #[test]
    fn test_only_selects_named_targets() {
        let coordinator = RunCoordinator::from_config(&config(), &["staff".to_string()]).unwrap();
        assert_eq!(coordinator.targets().len(), 1);
        assert_eq!(coordinator.targets()[0].definition.name(), "staff");
    }

    #[test]
    fn test_unknown_target_name() {
        let err = RunCoordinator::from_config(&config(), &["nobody".to_string()]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_incomplete_target_is_configuration_error() {
        let mut config = config();
        config.targets[1].attributes.clear();
        let err = RunCoordinator::from_config(&config, &[]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_execute_runs_targets_in_order() {
        let store = store();
        let coordinator = RunCoordinator::from_config(&config(), &[]).unwrap();

        let report = coordinator
            .execute(store.clone(), RunOptions::new(10), false)
            .await
            .unwrap();

        assert_eq!(report.targets.len(), 2);
        assert_eq!(report.targets[0].result.as_tuple(), (2, 2, 4));
        assert_eq!(report.targets[1].result.as_tuple(), (1, 1, 1));
        assert_eq!(report.total_records(), 3);
        assert!(report.finished_at.is_some());

        assert_eq!(
            store.value("auth_user", "1", "email").as_deref(),
            Some("staff@example.com")
        );
        assert_eq!(
            store.value("auth_user", "2", "email").as_deref(),
            Some("scrubbed@example.com")
        );
    }

    #[tokio::test]
    async fn test_first_failure_stops_remaining_targets() {
        let store = store();
        store.fail_bulk_update_at(1);
        let coordinator = RunCoordinator::from_config(&config(), &[]).unwrap();

        let result = coordinator
            .execute(store.clone(), RunOptions::new(10), false)
            .await;

        assert!(result.is_err());
        assert_eq!(store.bulk_update_calls().len(), 1);
        assert_eq!(
            store.value("auth_user", "1", "email").as_deref(),
            Some("ada@corp.example")
        );
    }

    #[test]
    fn test_loaded_config_plans() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = load_config_str(CONFIG).unwrap();
        assert!(RunCoordinator::from_config(&config, &[]).is_ok());
    }
}
