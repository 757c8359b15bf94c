//! Connected component analysis
//!
//! Partitions the member pixels of a work rectangle into 4-connected
//! components. Traversal is iterative: the component's own index list
//! doubles as the BFS queue, so stack depth stays constant no matter how
//! large the selection is.

use regionfx_core::{Bounds, NEIGHBORS_4, Rect, VisitedSet};

/// Grow one 4-connected component from `seed`
///
/// Pixels already in `visited` are skipped. `component` is cleared and
/// filled with the flat indices of the component in discovery order.
/// Neighbors outside `rect` are never members.
pub fn flood_component(
    bounds: Bounds,
    rect: Rect,
    seed: usize,
    visited: &mut VisitedSet,
    is_member: &impl Fn(usize) -> bool,
    component: &mut Vec<u32>,
) {
    component.clear();
    if !is_member(seed) || !visited.insert(seed) {
        return;
    }
    component.push(seed as u32);

    let mut head = 0;
    while head < component.len() {
        let i = component[head] as usize;
        head += 1;
        let (x, y) = bounds.coords(i);

        for (dx, dy) in NEIGHBORS_4 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || !rect.contains(nx as u32, ny as u32) {
                continue;
            }
            let n = bounds.index(nx as u32, ny as u32);
            if is_member(n) && visited.insert(n) {
                component.push(n as u32);
            }
        }
    }
}

/// Visit every 4-connected component of the member pixels inside `rect`
///
/// Components are reported in raster order of their first pixel. Returns
/// the number of components found.
pub fn for_each_component(
    bounds: Bounds,
    rect: Rect,
    is_member: impl Fn(usize) -> bool,
    mut visit: impl FnMut(&[u32]),
) -> usize {
    let rect = rect.intersect(&bounds.full_rect());
    let mut visited = VisitedSet::new(bounds.area());
    let mut component = Vec::new();
    let mut count = 0;

    for i in rect.indices(bounds) {
        if visited.contains(i) || !is_member(i) {
            continue;
        }
        flood_component(bounds, rect, i, &mut visited, &is_member, &mut component);
        count += 1;
        visit(&component);
    }

    count
}
