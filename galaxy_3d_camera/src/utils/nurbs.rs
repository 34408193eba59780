//! Rational B-spline (NURBS) curves
//!
//! Control points are `Vec4` with the weight in `w`. Knots live in `[0, 1]`.
//! Basis functions use the inverted-triangle scheme: only the `degree + 1`
//! non-zero functions of the knot span are computed.

use glam::{Vec3, Vec4, Vec4Swizzles};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct NurbsCurve {
    degree: usize,
    control_points: Vec<Vec4>,
    knots: Vec<f32>,
}

impl Default for NurbsCurve {
    /// Cubic S-curve through the unit square, clamped at both ends
    fn default() -> Self {
        Self {
            degree: 3,
            control_points: vec![
                Vec4::new(-4.0, -4.0, 0.0, 1.0),
                Vec4::new(-2.0, 4.0, 0.0, 1.0),
                Vec4::new(2.0, -4.0, 0.0, 1.0),
                Vec4::new(4.0, 4.0, 0.0, 1.0),
            ],
            knots: vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl NurbsCurve {
    /// Build and validate a curve
    pub fn new(degree: usize, control_points: Vec<Vec4>, knots: Vec<f32>) -> Result<Self> {
        let curve = Self { degree, control_points, knots };
        curve.validate()?;
        Ok(curve)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn control_points(&self) -> &[Vec4] {
        &self.control_points
    }

    pub fn knots(&self) -> &[f32] {
        &self.knots
    }

    /// Check degree, knot count, knot ordering and interior multiplicity
    pub fn validate(&self) -> Result<()> {
        let p = self.degree;
        let n = self.control_points.len();

        if p == 0 {
            return Err(Error::InvalidCurve("degree must be at least 1".to_string()));
        }
        if n <= p {
            return Err(Error::InvalidCurve(format!(
                "{} control points cannot define a degree {} curve",
                n, p
            )));
        }
        if self.knots.len() != n + p + 1 {
            return Err(Error::InvalidCurve(format!(
                "expected {} knots, got {}",
                n + p + 1,
                self.knots.len()
            )));
        }
        if self.knots.iter().any(|k| !(0.0..=1.0).contains(k)) {
            return Err(Error::InvalidCurve("knots must lie in [0, 1]".to_string()));
        }
        if self.knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidCurve("knot vector is not non-decreasing".to_string()));
        }
        if self.control_points.iter().any(|cp| cp.w <= 0.0) {
            return Err(Error::InvalidCurve("control point weights must be positive".to_string()));
        }

        let first = self.knots[0];
        let last = self.knots[self.knots.len() - 1];
        let mut run = 0;
        for (i, k) in self.knots.iter().enumerate() {
            run = if i > 0 && *k == self.knots[i - 1] { run + 1 } else { 1 };
            if *k != first && *k != last && run > p {
                return Err(Error::InvalidCurve(format!(
                    "interior knot {} repeated more than {} times",
                    k, p
                )));
            }
        }

        Ok(())
    }

    /// Start of the parameter domain
    pub fn min_u(&self) -> f32 {
        self.knots[self.degree]
    }

    /// End of the parameter domain
    pub fn max_u(&self) -> f32 {
        self.knots[self.knots.len() - self.degree - 1]
    }

    /// Point at fraction `t ∈ [0, 1]` of the parameter domain
    pub fn point_at_fraction(&self, t: f32) -> Result<Vec3> {
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidCurve(format!("parameter {} outside [0, 1]", t)));
        }
        self.validate()?;

        let u = self.min_u() + t * (self.max_u() - self.min_u());
        Ok(self.evaluate(u))
    }

    /// Point at parameter `u`, clamped into the domain. The curve must be valid.
    pub fn evaluate(&self, u: f32) -> Vec3 {
        let u = u.clamp(self.min_u(), self.max_u());
        let span = self.find_span(u);
        let basis = self.basis(span, u);

        let mut sum = Vec3::ZERO;
        let mut weight = 0.0;
        for (j, n) in basis.iter().enumerate() {
            let cp = self.control_points[span - self.degree + j];
            sum += cp.xyz() * (n * cp.w);
            weight += n * cp.w;
        }

        if weight == 0.0 {
            return Vec3::ZERO;
        }
        sum / weight
    }

    /// Sample `count` evenly spaced points over the domain
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        if count < 2 {
            return vec![self.evaluate(self.min_u())];
        }
        (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                self.evaluate(self.min_u() + t * (self.max_u() - self.min_u()))
            })
            .collect()
    }

    fn find_span(&self, u: f32) -> usize {
        let last = self.control_points.len() - 1;
        for i in self.degree..=last {
            if self.knots[i + 1] > u {
                return i;
            }
        }
        last
    }

    fn basis(&self, span: usize, u: f32) -> Vec<f32> {
        let p = self.degree;
        let mut n = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        n[0] = 1.0;

        for d in 1..=p {
            left[d] = u - self.knots[span + 1 - d];
            right[d] = self.knots[span + d] - u;

            let mut saved = 0.0;
            for r in 0..d {
                let denom = right[r + 1] + left[d - r];
                let temp = if denom != 0.0 { n[r] / denom } else { 0.0 };
                n[r] = saved + right[r + 1] * temp;
                saved = left[d - r] * temp;
            }
            n[d] = saved;
        }

        n
    }
}

#[cfg(test)]
#[path = "nurbs_tests.rs"]
mod tests;
