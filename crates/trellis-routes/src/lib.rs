//! # Trellis Routes
//!
//! The flat route manifest produced by the build step, and the builder
//! that folds it into a navigable tree.
//!
//! The manifest is a build-time artifact: an ordered mapping of route id
//! to route record, emitted once and never mutated at runtime. Every
//! consumer of the manifest (the build-time tooling, the run-time data
//! engine) derives its tree through the same [`build_route_tree`]
//! function, parameterized by a node constructor, so sibling
//! disambiguation behaves identically everywhere.
//!
//! ## Sibling disambiguation
//!
//! Two sibling routes may legitimately occupy the same path segment: a
//! pathless layout's children and an index route, for example. The
//! builder resolves the collision by inserting a synthetic folder node
//! that owns the shared segment; the colliding siblings become its
//! children with their own paths cleared. Folder ids are a pure function
//! of the path, so rebuilding from the same manifest is reproducible.
//!
//! ## Example
//!
//! ```
//! use trellis_routes::{build_route_tree, RouteBranch, RouteManifest, RouteRecord};
//!
//! let manifest = RouteManifest::from_records(vec![
//!     RouteRecord::new("routes/index", "routes/index.js").with_index(),
//!     RouteRecord::new("routes/posts", "routes/posts.js").with_path("posts"),
//!     RouteRecord::new("routes/posts.layout", "routes/posts.layout.js").with_path("posts"),
//! ]).unwrap();
//!
//! let tree = build_route_tree(&manifest, RouteBranch::from_record);
//!
//! // The two "posts" siblings collapse under one synthetic folder.
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree[1].id, "folder:routes/posts");
//! assert_eq!(tree[1].children.len(), 2);
//! assert!(tree[1].children.iter().all(|child| child.path.is_none()));
//! ```

mod manifest;
mod tree;

pub use manifest::{ManifestError, RouteManifest, RouteRecord};
pub use tree::{build_route_tree, RouteBranch, RouteTreeNode, FOLDER_ID_PREFIX};
