use std::sync::Arc;

use lexis_core::Config;
use lexis_ingest::{DocumentStore, FileTextExtractor, MemoryDocumentStore, TextExtractor};
use lexis_rag::AnalysisService;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub service: AnalysisService,
}

impl AppState {
    /// Default wiring: in-memory store, file extractor, AI from config.
    pub fn new(config: Config) -> Self {
        let service = AnalysisService::from_config(&config);
        Self::with_parts(
            config,
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(FileTextExtractor),
            service,
        )
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn TextExtractor>,
        service: AnalysisService,
    ) -> Self {
        Self {
            config,
            store,
            extractor,
            service,
        }
    }
}
