pub mod movies;
pub mod rooms;

use marquee_db::Pool;
use marquee_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
///
/// Every module shares `pool`; rooms resolve movies through the movies
/// module's controller.
pub fn register_all(registry: &mut ModuleRegistry, pool: &Pool) {
    let movies = movies::create_module(pool.clone());
    let rooms = rooms::create_module(pool.clone(), movies.controller());

    registry.register(movies);
    registry.register(rooms);
}
