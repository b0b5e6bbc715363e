//! Infinite-zoom camera and navigation engine for a canvas drawing tool.
//!
//! The crate owns everything between raw navigation requests and the paint
//! list the renderer consumes: an arbitrary-precision camera, world/screen
//! transforms, zoom-driven visibility culling, z-order management, eased
//! camera animation, and bookmark tours. Concrete shapes stay with the host
//! and are reached only through the [`shape::Shape`] trait.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`], the application state and frame driver |
//! | [`precision`] | Arbitrary-precision [`precision::Scalar`] and [`precision::Vector2`] |
//! | [`camera`] | Camera state and the world/screen [`camera::Viewport`] |
//! | [`shape`] | Shape capability trait and world rectangles |
//! | [`world`] | Slot arena, z-order, hit-testing, visibility pass |
//! | [`visibility`] | Hysteresis trigger for visibility passes |
//! | [`easing`] | Easing catalog |
//! | [`animation`] | Camera animation engine and duration heuristics |
//! | [`bookmark`] | Bookmark store and search |
//! | [`tour`] | Timed autoplay over bookmarks |
//! | [`persistence`] | Async blob store adapter and snapshot codec |
//! | [`config`] | Named configuration with environment overrides |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric defaults |

pub mod animation;
pub mod bookmark;
pub mod camera;
pub mod config;
pub mod consts;
pub mod easing;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod precision;
pub mod shape;
pub mod tour;
pub mod visibility;
pub mod world;
