//! Geometry primitives for ray queries

pub mod aabb;
pub mod ray;

pub use aabb::Aabb;
pub use ray::Ray;
