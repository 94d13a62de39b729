//! Conflict marker detection and resolution.
//!
//! After a three-way patch application, files may contain Git's canonical
//! `<<<<<<<` / `=======` / `>>>>>>>` marker triplets. This subsystem finds
//! those regions and rewrites each file to keep only the incoming side.

pub mod resolver;

pub use resolver::ConflictResolver;
