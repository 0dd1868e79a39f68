use crate::manager::{KindConfig, KindId, StreamHost};
use crate::pool::{Handle, Pool};
use crate::viewport::ViewWindow;

/// Counters for one recycle sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Entities deactivated and returned to the pool.
    pub recycled: usize,
    /// Entities found destroyed out-of-band and reclaimed without a
    /// deactivation callback.
    pub reclaimed: usize,
}

/// Sweep the active set and return to the pool everything now fully behind
/// the viewport's trailing edge.
///
/// The trailing edge is `position_x + half_width`, compared strictly against
/// `window.left - behind_margin`: an entity sitting exactly on the cutoff is
/// kept. Entities reported dead by the host are dropped from the active set
/// without a second deactivation, which keeps the sweep idempotent when the
/// world despawns things out-of-band.
pub fn sweep<H: StreamHost>(
    kind: KindId,
    config: &KindConfig,
    window: ViewWindow,
    pool: &mut Pool<H::Entity>,
    active: &mut Vec<Handle>,
    host: &mut H,
) -> SweepStats {
    let mut stats = SweepStats::default();
    let cutoff = window.left - config.behind_margin;
    let mut index = 0;
    while index < active.len() {
        let handle = active[index];

        if !host.is_alive(kind, pool.entity(handle)) {
            active.swap_remove(index);
            if let Err(err) = pool.release(handle) {
                // One bad entity must not halt streaming for the rest.
                log::warn!("reclaim of dead {kind:?} slot {} failed: {err}", handle.slot());
            } else {
                stats.reclaimed += 1;
            }
            continue;
        }

        let entity = pool.entity(handle);
        let trailing = host.position_x(kind, entity) + host.half_width(kind, entity);
        if trailing < cutoff {
            active.swap_remove(index);
            host.deactivate(kind, pool.entity_mut(handle));
            if let Err(err) = pool.release(handle) {
                log::warn!("release of {kind:?} slot {} failed: {err}", handle.slot());
            } else {
                stats.recycled += 1;
            }
            continue;
        }

        index += 1;
    }
    stats
}
