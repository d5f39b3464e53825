//! Session-scoped render context
//!
//! One [`RenderContext`] lives for a whole rendering session. It owns the
//! camera, the fixed lighting rig, the pool of temporary render targets and the
//! registry of ephemeral instances being rendered. Render calls borrow it
//! mutably, so only one render can use it at a time.

use std::ops::{Deref, DerefMut};

use crate::foundation::collections::{InstanceKey, InstanceMap};
use crate::render::camera::Camera;
use crate::render::lighting::LightingEnvironment;
use crate::render::target::{RenderTargetPool, TargetPoolStats};
use crate::scene::object::SceneObject;

/// Resource counters of a render context
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContextStats {
    /// Ephemeral instances currently registered
    pub live_instances: usize,
    /// Instances registered over the session
    pub total_instances_created: u64,
    /// Instances destroyed over the session
    pub total_instances_destroyed: u64,
    /// Render target pool counters
    pub targets: TargetPoolStats,
}

/// Camera, lighting and resources shared by every render of a session
#[derive(Debug)]
pub struct RenderContext {
    pub(crate) camera: Camera,
    pub(crate) lighting: LightingEnvironment,
    pub(crate) targets: RenderTargetPool,
    pub(crate) instances: InstanceMap<SceneObject>,
    created: u64,
    destroyed: u64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    /// Create a context with the icon lighting rig
    pub fn new() -> Self {
        Self::with_lighting(LightingEnvironment::icon_key_light())
    }

    /// Create a context with a custom lighting rig
    pub fn with_lighting(lighting: LightingEnvironment) -> Self {
        log::debug!("Creating render context");
        Self {
            camera: Camera::default(),
            lighting,
            targets: RenderTargetPool::default(),
            instances: InstanceMap::with_key(),
            created: 0,
            destroyed: 0,
        }
    }

    /// Camera state left by the last render
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Lighting rig
    pub fn lighting(&self) -> &LightingEnvironment {
        &self.lighting
    }

    /// Registered instance, if it is still alive
    pub fn instance(&self, key: InstanceKey) -> Option<&SceneObject> {
        self.instances.get(key)
    }

    /// Current resource counters
    pub fn stats(&self) -> ContextStats {
        ContextStats {
            live_instances: self.instances.len(),
            total_instances_created: self.created,
            total_instances_destroyed: self.destroyed,
            targets: self.targets.stats(),
        }
    }

    /// Register an ephemeral instance for the lifetime of the returned scope
    pub fn spawn(&mut self, object: SceneObject) -> InstanceScope<'_> {
        log::trace!("Spawning ephemeral instance '{}'", object.name());
        let key = self.instances.insert(object);
        self.created += 1;
        InstanceScope { context: self, key }
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if !self.instances.is_empty() {
            log::warn!(
                "Render context dropped with {} live instance(s)",
                self.instances.len()
            );
        }
        log::debug!("Render context torn down: {:?}", self.stats());
    }
}

/// Owner of one ephemeral instance
///
/// Dereferences to the render context so the instance can be rendered while
/// the scope is held. Dropping the scope destroys the instance.
#[derive(Debug)]
pub struct InstanceScope<'a> {
    context: &'a mut RenderContext,
    key: InstanceKey,
}

impl InstanceScope<'_> {
    /// Registry key of the instance
    pub fn key(&self) -> InstanceKey {
        self.key
    }

    /// The instance
    pub fn object(&self) -> &SceneObject {
        // The key stays registered until this scope drops
        &self.context.instances[self.key]
    }

    /// The instance, mutably
    pub fn object_mut(&mut self) -> &mut SceneObject {
        &mut self.context.instances[self.key]
    }
}

impl Deref for InstanceScope<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        self.context
    }
}

impl DerefMut for InstanceScope<'_> {
    fn deref_mut(&mut self) -> &mut RenderContext {
        self.context
    }
}

impl Drop for InstanceScope<'_> {
    fn drop(&mut self) {
        if let Some(object) = self.context.instances.remove(self.key) {
            self.context.destroyed += 1;
            log::trace!("Destroyed ephemeral instance '{}'", object.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_destroys_instance() {
        let mut ctx = RenderContext::new();
        let key = {
            let scope = ctx.spawn(SceneObject::new("Temp"));
            assert_eq!(scope.stats().live_instances, 1);
            assert_eq!(scope.object().name(), "Temp");
            scope.key()
        };
        assert!(ctx.instance(key).is_none());

        let stats = ctx.stats();
        assert_eq!(stats.live_instances, 0);
        assert_eq!(stats.total_instances_created, 1);
        assert_eq!(stats.total_instances_destroyed, 1);
    }

    #[test]
    fn test_scope_destroys_instance_on_unwind() {
        let mut ctx = RenderContext::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = ctx.spawn(SceneObject::new("Doomed"));
            panic!("pose failed");
        }));
        assert!(result.is_err());
        assert_eq!(ctx.stats().live_instances, 0);
    }

    #[test]
    fn test_object_mut_edits_registered_instance() {
        let mut ctx = RenderContext::new();
        let mut scope = ctx.spawn(SceneObject::new("Movable"));
        scope.object_mut().root_mut().local.position.y = 3.0;
        let key = scope.key();
        assert_eq!(scope.instance(key).map(|o| o.origin().y), Some(3.0));
    }
}
