//! # Curve Generation
//!
//! Produces the "speed vs coverage" and "speed vs cost" series that the chart
//! renderers draw. Sampling reuses [`SpeedGrid`], the exact grid the optimal
//! speed search walks.
//!
//! [`CurveGenerator::points`] is lazy: nothing is evaluated until the iterator
//! is advanced. Each call starts a fresh pass, and the iterator itself is
//! `Clone`, so a consumer can replay the sweep at any point.

use crate::error::ModelError;
use crate::evaluate::evaluate;
use crate::optimizer::SpeedGrid;
use crate::params::UnitParameters;
use crate::{CurvePoint, CurveSample};

/// Sweeps a parameter set over its speed grid.
#[derive(Clone, Copy, Debug)]
pub struct CurveGenerator<'a> {
    params: &'a UnitParameters,
    grid: SpeedGrid,
}

impl<'a> CurveGenerator<'a> {
    pub fn new(params: &'a UnitParameters, sample_count: usize) -> Result<Self, ModelError> {
        Ok(CurveGenerator {
            params,
            grid: SpeedGrid::for_params(params, sample_count)?,
        })
    }

    pub fn grid(&self) -> SpeedGrid {
        self.grid
    }

    /// Lazy pass over the grid.
    pub fn points(&self) -> CurvePoints<'a> {
        CurvePoints {
            params: self.params,
            grid: self.grid,
            next: 0,
        }
    }

    /// Evaluate the whole grid into paired coverage and cost series.
    pub fn sample(&self) -> Result<CurveSample, ModelError> {
        let mut coverage = Vec::with_capacity(self.grid.len());
        let mut cost = Vec::with_capacity(self.grid.len());
        for point in self.points() {
            let point = point?;
            coverage.push((point.speed, point.coverage_rate_ha_per_h));
            cost.push((point.speed, point.total_cost));
        }
        Ok(CurveSample { coverage, cost })
    }
}

/// Iterator over evaluated grid points.
#[derive(Clone, Debug)]
pub struct CurvePoints<'a> {
    params: &'a UnitParameters,
    grid: SpeedGrid,
    next: usize,
}

impl Iterator for CurvePoints<'_> {
    type Item = Result<CurvePoint, ModelError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.grid.len() {
            return None;
        }
        let speed = self.grid.speed_at(self.next);
        self.next += 1;

        Some(evaluate(self.params, speed).map(|r| CurvePoint {
            speed,
            coverage_rate_ha_per_h: r.coverage_rate_ha_per_h,
            total_cost: r.total_cost,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurvePoints<'_> {}
