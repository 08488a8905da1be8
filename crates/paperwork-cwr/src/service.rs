//! The boundary between the export pipeline and the catalog store.

use chrono::{DateTime, Utc};
use paperwork_core::completeness;
use paperwork_core::model::CompositionId;
use paperwork_core::schema::{Database, ExportSource};

use crate::config::SenderIdentity;
use crate::document::{assemble_export, Export};
use crate::error::{ExportError, ExportResult};

/// Something that can load a composition and its resolved writers.
pub trait CatalogSource {
    /// Load a composition and its writers, in credit order.
    ///
    /// Returns `Ok(None)` when no such composition exists.
    fn load(&self, id: &CompositionId) -> paperwork_core::Result<Option<ExportSource>>;
}

impl CatalogSource for Database {
    fn load(&self, id: &CompositionId) -> paperwork_core::Result<Option<ExportSource>> {
        self.load_export_source(id)
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn load(&self, id: &CompositionId) -> paperwork_core::Result<Option<ExportSource>> {
        (**self).load(id)
    }
}

/// Produces registration files for compositions held in a catalog store.
///
/// Holds no state between calls; store failures are returned as-is with no
/// retry.
#[derive(Debug)]
pub struct ExportService<S> {
    store: S,
    sender: SenderIdentity,
}

impl<S: CatalogSource> ExportService<S> {
    pub fn new(store: S, sender: SenderIdentity) -> Self {
        Self { store, sender }
    }

    /// Export a composition, dated now.
    pub fn export(&self, id: &CompositionId) -> ExportResult<Export> {
        self.export_at(id, Utc::now())
    }

    /// Export a composition with an explicit generation time.
    pub fn export_at(
        &self,
        id: &CompositionId,
        generated_at: DateTime<Utc>,
    ) -> ExportResult<Export> {
        let source = self
            .store
            .load(id)?
            .ok_or_else(|| ExportError::NotFound { id: id.to_string() })?;

        for missing in completeness::check(&source.composition, &source.writers) {
            log::warn!(
                "Exporting {} with incomplete data: {}",
                source.composition.title,
                missing
            );
        }

        let export = assemble_export(
            &self.sender,
            &source.composition,
            &source.writers,
            generated_at,
        )?;

        log::info!(
            "Exported {} ({} writer(s)) as {}",
            source.composition.id,
            source.writers.len(),
            export.filename
        );

        Ok(export)
    }
}
