use alloc::vec::Vec;

use crate::error::StateError;
use crate::vector::Vector2D;

/// Flat, index-aligned agent arrays.
///
/// The engine mutates these in place and never resizes them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
    pub heading_x: Vec<f64>,
    pub heading_y: Vec<f64>,
}

impl Population {
    pub fn new(
        pos_x: Vec<f64>,
        pos_y: Vec<f64>,
        heading_x: Vec<f64>,
        heading_y: Vec<f64>,
    ) -> Result<Self, StateError> {
        let population = Self {
            pos_x,
            pos_y,
            heading_x,
            heading_y,
        };
        population.check_len(population.pos_x.len())?;
        Ok(population)
    }

    /// Builds a population from position/heading pairs.
    pub fn from_agents<I>(agents: I) -> Self
    where
        I: IntoIterator<Item = (Vector2D, Vector2D)>,
    {
        let mut population = Self::default();
        for (position, heading) in agents {
            population.pos_x.push(position.x);
            population.pos_y.push(position.y);
            population.heading_x.push(heading.x);
            population.heading_y.push(heading.y);
        }
        population
    }

    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    pub fn position(&self, i: usize) -> Vector2D {
        Vector2D::new(self.pos_x[i], self.pos_y[i])
    }

    pub fn heading(&self, i: usize) -> Vector2D {
        Vector2D::new(self.heading_x[i], self.heading_y[i])
    }

    pub fn set_position(&mut self, i: usize, p: Vector2D) {
        self.pos_x[i] = p.x;
        self.pos_y[i] = p.y;
    }

    pub fn set_heading(&mut self, i: usize, h: Vector2D) {
        self.heading_x[i] = h.x;
        self.heading_y[i] = h.y;
    }

    /// Every array must hold exactly `expected` agents.
    pub fn check_len(&self, expected: usize) -> Result<(), StateError> {
        let fields = [
            ("pos_x", self.pos_x.len()),
            ("pos_y", self.pos_y.len()),
            ("heading_x", self.heading_x.len()),
            ("heading_y", self.heading_y.len()),
        ];
        for (field, actual) in fields {
            if actual != expected {
                return Err(StateError::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_new_rejects_ragged_arrays() {
        let err = Population::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 2], vec![0.0; 3])
            .unwrap_err();
        assert_eq!(
            err,
            StateError::LengthMismatch {
                field: "heading_x",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_from_agents() {
        let population = Population::from_agents([
            (Vector2D::new(1.0, 2.0), Vector2D::new(0.0, 1.0)),
            (Vector2D::new(3.0, 4.0), Vector2D::new(1.0, 0.0)),
        ]);
        assert_eq!(population.len(), 2);
        assert_eq!(population.position(1), Vector2D::new(3.0, 4.0));
        assert_eq!(population.heading(0), Vector2D::new(0.0, 1.0));
    }
}
