use crate::catalog::CourseCatalog;
use crate::config::Config;
use crate::matching::skills::SkillRegistry;

/// Read-only process state shared by both pipelines: configuration, the
/// compiled skill registry, and the loaded course catalog.
///
/// The mutable user/history store is deliberately not in here — it is
/// passed separately so that mutation stays explicit at call sites.
pub struct AppState {
    pub config: Config,
    pub registry: SkillRegistry,
    pub catalog: CourseCatalog,
}
