use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Shape;

/// Insertion-ordered shape collection shared between API callers and the
/// render loop.
///
/// Every operation takes the same lock, so an `add` never interleaves with
/// a `clear` or a render pass. Mutations raise a dirty flag the render loop
/// consumes with [`take_dirty`](Self::take_dirty).
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: Mutex<Vec<Shape>>,
    dirty: AtomicBool,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `shape`. The registry owns it from here on.
    pub fn add(&self, shape: Shape) {
        self.lock().push(shape);
        self.dirty.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.lock().clear();
        self.dirty.store(true, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Visits every shape in insertion order while holding the lock.
    ///
    /// Shapes are handed out mutably so text shapes can refresh their cached
    /// geometry.
    pub fn for_each_for_render(&self, mut f: impl FnMut(&mut Shape)) {
        for shape in self.lock().iter_mut() {
            f(shape);
        }
    }

    #[inline]
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Shape>> {
        self.shapes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use std::sync::Arc;

    fn triangle() -> Shape {
        Shape::polygon(
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            Color::RED,
        )
    }

    #[test]
    fn add_and_clear_mark_dirty() {
        let reg = ShapeRegistry::new();
        assert!(!reg.take_dirty());
        reg.add(triangle());
        assert!(reg.take_dirty());
        assert!(!reg.take_dirty());
        reg.clear();
        assert!(reg.take_dirty());
        assert!(reg.is_empty());
    }

    #[test]
    fn stored_copy_is_independent_of_caller() {
        let reg = ShapeRegistry::new();
        let mut mine = triangle();
        reg.add(mine.clone());
        if let Shape::Polygon(p) = &mut mine {
            p.vertices.clear();
        }
        let mut seen = Vec::new();
        reg.for_each_for_render(|s| seen.push(s.clone()));
        assert_eq!(seen, vec![triangle()]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let reg = ShapeRegistry::new();
        for i in 0..5 {
            reg.add(Shape::line(Vec2::zero(), Vec2::new(i as f32 + 1.0, 0.0), 1.0, Color::BLUE));
        }
        let mut lengths = Vec::new();
        reg.for_each_for_render(|s| {
            if let Shape::Line(l) = s {
                lengths.push(l.segment.length());
            }
        });
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        let reg = Arc::new(ShapeRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        reg.add(triangle());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 400);
    }
}
