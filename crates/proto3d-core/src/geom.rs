use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BBox3 {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include_point(p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        (self.max - self.min).map(|v| v.max(0.0))
    }

    /// Half of the largest side; the radius of the cube that frames the box
    /// with equal aspect on every axis.
    pub fn half_max_extent(&self) -> f64 {
        self.extents().max() * 0.5
    }

    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.y >= self.min.y - tolerance
            && point.z >= self.min.z - tolerance
            && point.x <= self.max.x + tolerance
            && point.y <= self.max.y + tolerance
            && point.z <= self.max.z + tolerance
    }
}
