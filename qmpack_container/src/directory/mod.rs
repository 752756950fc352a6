//! Terrain tiles stored as files in a `<z>/<x>/<y>.terrain` directory tree.

mod walker;

pub use walker::DirectoryTileWalker;
