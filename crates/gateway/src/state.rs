use std::sync::Arc;

use parking_lot::Mutex;
use sa_catalog::PredicateCatalog;
use sa_dag::{DagExecutor, ToolRegistry};
use sa_domain::config::Config;
use sa_episodes::EpisodeStore;
use sa_extractor::LlmTripleExtractor;
use sa_graph::GraphStore;
use sa_key_pool::KeyPool;
use sa_lifecycle::LifecycleEngine;
use sa_memory_gate::MemoryWriteGate;
use sa_providers::router::LlmRouter;
use sa_scheduler::SchedulerCoordinator;
use sa_synth::StyleCatalog;
use sa_vector::VectorStore;

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, LLM router, key pool
/// - **Memory** — knowledge graph, episodic vector store, episode queue
/// - **Pipeline** — DAG executor, style catalog for synthesis
/// - **Coordination** — leader election
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub llm: Arc<LlmRouter>,
    pub key_pool: Arc<KeyPool>,

    // ── Memory ────────────────────────────────────────────────────────
    pub graph: Arc<GraphStore>,
    pub vector: Arc<VectorStore>,
    pub episodes: Arc<EpisodeStore>,
    pub catalog: Arc<PredicateCatalog>,
    pub extractor: Arc<LlmTripleExtractor>,
    pub memory_gate: Arc<MemoryWriteGate>,
    pub lifecycle: Arc<LifecycleEngine>,

    // ── Pipeline ──────────────────────────────────────────────────────
    pub dag: Arc<DagExecutor>,
    pub style_catalog: Arc<StyleCatalog>,

    // ── Coordination ──────────────────────────────────────────────────
    pub scheduler: Arc<Mutex<SchedulerCoordinator>>,
}

impl AppState {
    pub fn new(config: Arc<Config>, llm: Arc<LlmRouter>, state_root: &std::path::Path) -> anyhow::Result<Self> {
        let graph = Arc::new(GraphStore::new(state_root)?);
        let vector = Arc::new(VectorStore::new(state_root, config.vector_store.clone())?);
        let episodes = Arc::new(EpisodeStore::new(state_root)?);
        let key_pool = Arc::new(KeyPool::new(config.key_pool.clone()));
        let dag = Arc::new(DagExecutor::new(llm.clone(), key_pool.clone(), ToolRegistry::new(), graph.clone()));
        let scheduler = Arc::new(Mutex::new(SchedulerCoordinator::new(state_root, &config.scheduler)?));

        let catalog_cfg = &config.predicate_catalog;
        let catalog = if catalog_cfg.path.exists() {
            Arc::new(PredicateCatalog::load(&catalog_cfg.path, catalog_cfg.strict)?)
        } else {
            Arc::new(PredicateCatalog::default_catalog(catalog_cfg.strict))
        };
        let extractor = Arc::new(LlmTripleExtractor::new(llm.clone(), catalog.clone()));
        let memory_gate = Arc::new(MemoryWriteGate::new(config.memory_write_gate.clone()));
        let lifecycle = Arc::new(LifecycleEngine::new(&config.lifecycle_engine));

        Ok(Self {
            config,
            llm,
            key_pool,
            graph,
            vector,
            episodes,
            catalog,
            extractor,
            memory_gate,
            lifecycle,
            dag,
            style_catalog: Arc::new(StyleCatalog::default_catalog()),
            scheduler,
        })
    }
}
