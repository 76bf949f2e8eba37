// src/infrastructure/di/service_container.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::Organizer;
use crate::config::Settings;
use crate::infrastructure::stores::JsonFileStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Production service container, single source of truth for service creation
#[derive(Debug)]
pub struct ServiceContainer {
    pub store: Arc<JsonFileStore>,
    pub organizer: Arc<Organizer>,
}

impl ServiceContainer {
    /// Create all services with explicit dependency injection
    #[instrument(skip(config), level = "debug")]
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        let store = Self::create_store(&config.resolved_store_path())?;
        let collator = config.collation.collator();
        let organizer = Arc::new(Organizer::new(store.clone(), collator));
        debug!("Services created with {:?} collation", config.collation);

        Ok(Self { store, organizer })
    }

    fn create_store(path: &Path) -> ApplicationResult<Arc<JsonFileStore>> {
        if !path.exists() {
            return Err(ApplicationError::Validation(format!(
                "Bookmark file not found: {}. Set BKORG_STORE_PATH, pass --store or add store_path to the config file.",
                path.display()
            )));
        }
        let store = JsonFileStore::open(path)
            .map_err(|e| ApplicationError::from(e).context("opening bookmark file"))?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reconciliation::OrganizeOptions;

    #[test]
    fn given_missing_store_file_when_creating_container_then_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            store_path: dir.path().join("missing.json").to_string_lossy().into_owned(),
            ..Settings::default()
        };

        let result = ServiceContainer::new(&settings);

        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[tokio::test]
    async fn given_existing_store_file_when_creating_container_then_organizer_runs() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(
            &path,
            r#"[{"id": "0", "title": "", "children": [
                {"id": "1", "title": "Bookmarks Bar", "children": []}
            ]}]"#,
        )
        .unwrap();
        let settings = Settings {
            store_path: path.to_string_lossy().into_owned(),
            ..Settings::default()
        };

        // Act
        let services = ServiceContainer::new(&settings).unwrap();
        let result = services
            .organizer
            .run_organization(&OrganizeOptions::default())
            .await;

        // Assert
        assert!(result.success);
        assert_eq!(result.before, 0);
        assert_eq!(services.store.path(), path.as_path());
    }
}
