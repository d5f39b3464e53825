//! Temporary render targets
//!
//! Targets are square RGBA8 colour buffers with an f32 depth buffer. They are
//! leased from a [`RenderTargetPool`] for a single render call through a
//! [`TargetLease`], which hands the target back when it goes out of scope.

use std::ops::{Deref, DerefMut};

/// Colour every target is cleared to: fully transparent black
pub const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 0];

/// Depth every target is cleared to (the far plane)
pub const CLEAR_DEPTH: f32 = 1.0;

/// Colour and depth buffers for one offscreen render
#[derive(Debug, Clone)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl RenderTarget {
    /// Allocate a cleared target
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![CLEAR_COLOR; len],
            depth: vec![CLEAR_DEPTH; len],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset colour and depth
    pub fn clear(&mut self) {
        self.color.fill(CLEAR_COLOR);
        self.depth.fill(CLEAR_DEPTH);
    }

    /// Row-major colour buffer, top row first
    pub fn color(&self) -> &[[u8; 4]] {
        &self.color
    }

    /// Row-major depth buffer, top row first
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Write a fragment if it is nearer than what the target holds
    ///
    /// Returns whether the fragment passed the depth test.
    pub fn write_fragment(&mut self, x: u32, y: u32, depth: f32, color: [u8; 4]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.width as usize + x as usize;
        if depth >= self.depth[idx] {
            return false;
        }
        self.depth[idx] = depth;
        self.color[idx] = color;
        true
    }
}

/// Usage counters of a target pool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetPoolStats {
    /// Targets currently leased out
    pub live_targets: usize,
    /// Idle targets kept for reuse
    pub retained_targets: usize,
    /// Targets allocated because no idle one matched
    pub total_allocations: u64,
    /// Leases handed out
    pub total_leases: u64,
    /// Leases returned
    pub total_releases: u64,
    /// Maximum number of targets leased at the same time
    pub peak_live_targets: usize,
}

/// Pool of reusable render targets keyed by size
#[derive(Debug)]
pub struct RenderTargetPool {
    idle: Vec<RenderTarget>,
    max_retained: usize,
    stats: TargetPoolStats,
}

impl Default for RenderTargetPool {
    fn default() -> Self {
        Self::new(4)
    }
}

impl RenderTargetPool {
    /// Create a pool that keeps at most `max_retained` idle targets
    pub fn new(max_retained: usize) -> Self {
        Self {
            idle: Vec::new(),
            max_retained,
            stats: TargetPoolStats::default(),
        }
    }

    /// Current counters
    pub fn stats(&self) -> TargetPoolStats {
        self.stats
    }

    /// Lease a cleared `size × size` target until the lease is dropped
    pub fn lease(&mut self, size: u32) -> TargetLease<'_> {
        let target = self.acquire(size);
        TargetLease {
            pool: self,
            target: Some(target),
        }
    }

    fn acquire(&mut self, size: u32) -> RenderTarget {
        self.stats.total_leases += 1;
        self.stats.live_targets += 1;
        self.stats.peak_live_targets = self.stats.peak_live_targets.max(self.stats.live_targets);

        if let Some(pos) = self.idle.iter().position(|t| t.width == size && t.height == size) {
            let mut target = self.idle.swap_remove(pos);
            self.stats.retained_targets = self.idle.len();
            target.clear();
            log::trace!("Reusing {size}x{size} render target");
            return target;
        }

        self.stats.total_allocations += 1;
        log::trace!("Allocating {size}x{size} render target");
        RenderTarget::new(size, size)
    }

    fn release(&mut self, target: RenderTarget) {
        self.stats.total_releases += 1;
        self.stats.live_targets = self.stats.live_targets.saturating_sub(1);

        if self.idle.len() >= self.max_retained {
            // Evict the oldest idle target to make room
            if self.max_retained == 0 {
                return;
            }
            self.idle.remove(0);
        }
        self.idle.push(target);
        self.stats.retained_targets = self.idle.len();
    }
}

/// A render target on loan from a pool
///
/// Dereferences to the target. Dropping the lease returns the target to the
/// pool, whether the render succeeded, failed or unwound.
#[derive(Debug)]
pub struct TargetLease<'a> {
    pool: &'a mut RenderTargetPool,
    target: Option<RenderTarget>,
}

impl Deref for TargetLease<'_> {
    type Target = RenderTarget;

    fn deref(&self) -> &RenderTarget {
        // Only `drop` takes the target out
        self.target.as_ref().unwrap_or_else(|| unreachable!("lease used after release"))
    }
}

impl DerefMut for TargetLease<'_> {
    fn deref_mut(&mut self) -> &mut RenderTarget {
        self.target.as_mut().unwrap_or_else(|| unreachable!("lease used after release"))
    }
}

impl Drop for TargetLease<'_> {
    fn drop(&mut self) {
        if let Some(target) = self.target.take() {
            self.pool.release(target);
        }
    }
}
