//! Roomview Core - room and furniture rendering pipeline
//!
//! Stateless building blocks for drawing a furnished room through an orbit
//! camera: projection, room and furniture geometry, depth sorting, culling,
//! shading and picking. Output is a list of draw commands that front ends
//! replay onto their own surfaces.

pub mod camera;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod model;
pub mod obj;
pub mod picking;
pub mod projection;
pub mod render;
pub mod room;
pub mod scene;
pub mod settings;
pub mod shading;
pub mod shape;
pub mod transform;

// Re-export commonly used types
pub use camera::{OrbitCamera, ViewPreset};
pub use error::{Error, Result};
pub use geometry::{vec3, Aabb, Dimension, Facet, Vec3};
pub use mesh::{Face, Material, Mesh};
pub use model::{FurnitureModel, MeshLoader, ModelCache};
pub use picking::pick;
pub use projection::{project, ScreenPoint, Viewport};
pub use render::{DrawCommand, Frame, LineStyle, RenderStats, SceneRenderer, Surface};
pub use room::{Furniture, FurnitureId, FurnitureType, Room, SceneSnapshot};
pub use settings::RenderSettings;
pub use shading::Color;
pub use transform::MeshFit;
