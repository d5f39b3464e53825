//! Renderable objects and the assets that produce them
//!
//! Assets are instantiated into [`SceneObject`]s, small transform hierarchies
//! whose nodes may carry a mesh. The bounds of an instance drive how the camera
//! frames it.

pub mod asset;
pub mod bounds;
pub mod object;

pub use asset::{AssetSource, IconAsset, ObjFileSource};
pub use bounds::{BoundingVolume, BoundsCalculator};
pub use object::{MeshRenderer, NodeId, SceneError, SceneNode, SceneObject, WorldPart};
