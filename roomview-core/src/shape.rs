//! Box decompositions of each furniture type.
//!
//! Every type maps to a fixed list of boxes, centered on the furniture's
//! bounding-box center. [`ShapeLibrary`] turns those boxes into local-space
//! facets once per type and size.

use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::{vec3, Aabb, Dimension, Facet, Vec3};
use crate::room::FurnitureType;
use crate::shading::Color;

const WOOD_DARK: Color = Color::rgb(120, 60, 15);
const WOOD: Color = Color::rgb(139, 69, 19);
const WOOD_LIGHT: Color = Color::rgb(160, 82, 45);
const WOOD_SHELF: Color = Color::rgb(140, 70, 35);
const SOFA_BASE: Color = Color::rgb(70, 130, 180);
const SOFA_BACK: Color = Color::rgb(60, 110, 160);
const SOFA_ARM: Color = Color::rgb(50, 100, 150);
const MATTRESS: Color = Color::rgb(220, 220, 220);
const HANDLE: Color = Color::rgb(200, 200, 200);
const GLASS: Color = Color::rgba(173, 216, 230, 150);

const TABLE_TOP: f64 = 4.0;
const TABLE_LEG: f64 = 5.0;
const CHAIR_LEG: f64 = 3.0;
const BOARD: f64 = 2.0;

/// One axis-aligned box of a furniture shape, relative to the furniture
/// position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPrimitive {
    pub center: Vec3,
    pub size: Vec3,
    pub color: Color,
}

/// Color treatment per face, in [`Aabb::face_quads`] order.
const FACE_BIAS: [bool; 6] = [true, false, true, false, true, false];

impl BoxPrimitive {
    /// Negative sizes collapse to zero.
    pub fn new(center: Vec3, size: Vec3, color: Color) -> Self {
        Self {
            center,
            size: size.map(|v| v.max(0.0)),
            color,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    /// The 6 outward-facing quads: bottom, top, left, front, right, back.
    /// Bottom and the x-facing sides are darkened.
    pub fn facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.bounds()
            .face_quads()
            .into_iter()
            .zip(FACE_BIAS)
            .map(|(quad, darken)| {
                let color = if darken { self.color.darker() } else { self.color };
                Facet::new(quad.to_vec(), color)
            })
    }
}

fn cuboid(center: (f64, f64, f64), size: (f64, f64, f64), color: Color) -> BoxPrimitive {
    BoxPrimitive::new(
        vec3(center.0, center.1, center.2),
        vec3(size.0, size.1, size.2),
        color,
    )
}

/// Four legs of the given section, inset from the footprint corners.
fn legs(w: f64, l: f64, section: f64, inset: f64, y: f64, height: f64, color: Color) -> [BoxPrimitive; 4] {
    let x = w / 2.0 - inset;
    let z = l / 2.0 - inset;
    [(-x, -z), (x, -z), (x, z), (-x, z)]
        .map(|(lx, lz)| cuboid((lx, y, lz), (section, height, section), color))
}

/// Boxes making up a piece of the given type and size.
pub fn shape_for(kind: FurnitureType, dimension: Dimension) -> Vec<BoxPrimitive> {
    let Dimension {
        width: w,
        height: h,
        length: l,
    } = dimension;

    match kind {
        FurnitureType::Table => {
            let mut boxes = vec![cuboid((0.0, h / 2.0 - TABLE_TOP / 2.0, 0.0), (w, TABLE_TOP, l), WOOD)];
            let leg_height = h - TABLE_TOP;
            boxes.extend(legs(w, l, TABLE_LEG, TABLE_LEG, -TABLE_TOP / 2.0, leg_height, WOOD_DARK));
            boxes
        }
        FurnitureType::Chair => {
            let seat = h / 9.0;
            let back_height = h / 2.0 + h / 18.0;
            let mut boxes = vec![
                cuboid((0.0, -h / 9.0, 0.0), (w, seat, l), WOOD_LIGHT),
                cuboid((0.0, 2.0 * h / 9.0, -l / 2.0 + 2.5), (w, back_height, 5.0), WOOD_SHELF),
            ];
            boxes.extend(legs(w, l, CHAIR_LEG, CHAIR_LEG, -h / 3.0, h / 3.0, WOOD_DARK));
            boxes
        }
        FurnitureType::Sofa => {
            let arm_x = w / 2.0 - 10.0;
            vec![
                cuboid((0.0, -h / 4.0, 0.0), (w, h / 2.0, l), SOFA_BASE),
                cuboid((0.0, h / 4.0, -l / 2.0 + 10.0), (w, h / 2.0, 20.0), SOFA_BACK),
                cuboid((-arm_x, h / 8.0, 0.0), (20.0, h / 4.0, l), SOFA_ARM),
                cuboid((arm_x, h / 8.0, 0.0), (20.0, h / 4.0, l), SOFA_ARM),
            ]
        }
        FurnitureType::Bed => vec![
            cuboid((0.0, -h / 4.0, 0.0), (w, h / 2.0, l), WOOD),
            cuboid((0.0, 0.0, 0.0), (w - 10.0, 10.0, l - 10.0), MATTRESS),
            cuboid((0.0, h / 4.0, -l / 2.0 + 5.0), (w, h / 2.0, 10.0), WOOD_DARK),
        ],
        FurnitureType::Window => vec![
            cuboid((0.0, 0.0, 0.0), (w, h, l), WOOD_LIGHT),
            cuboid((0.0, 0.0, 1.0), (w - 10.0, h - 10.0, l - 2.0), GLASS),
        ],
        FurnitureType::Door => vec![
            cuboid((0.0, 0.0, 0.0), (w, h, l), WOOD_LIGHT),
            cuboid((w / 3.0, 0.0, l / 2.0 + 2.0), (4.0, 4.0, 4.0), HANDLE),
        ],
        FurnitureType::Bookshelf => {
            // Open-fronted carcass so the shelves stay visible.
            let side_x = w / 2.0 - BOARD / 2.0;
            let cap_y = h / 2.0 - BOARD / 2.0;
            let mut boxes = vec![
                cuboid((0.0, 0.0, -l / 2.0 + BOARD / 2.0), (w, h, BOARD), WOOD_LIGHT),
                cuboid((-side_x, 0.0, 0.0), (BOARD, h, l), WOOD_LIGHT),
                cuboid((side_x, 0.0, 0.0), (BOARD, h, l), WOOD_LIGHT),
                cuboid((0.0, -cap_y, 0.0), (w, BOARD, l), WOOD_LIGHT),
                cuboid((0.0, cap_y, 0.0), (w, BOARD, l), WOOD_LIGHT),
            ];
            boxes.extend((1..=3).map(|i| {
                let y = -h / 2.0 + f64::from(i) * h / 4.0;
                cuboid((0.0, y, BOARD / 2.0), (w - 2.0 * BOARD, BOARD, l - BOARD), WOOD_SHELF)
            }));
            boxes
        }
        FurnitureType::Cabinet => {
            let door_z = l / 2.0 + 1.0;
            let handle_z = l / 2.0 + 3.0;
            vec![
                cuboid((0.0, 0.0, 0.0), (w, h, l), WOOD_LIGHT),
                cuboid((-w / 4.0, 0.0, door_z), (w / 2.0, h - 4.0, 2.0), WOOD),
                cuboid((w / 4.0, 0.0, door_z), (w / 2.0, h - 4.0, 2.0), WOOD),
                cuboid((-5.0, 0.0, handle_z), (2.0, 8.0, 2.0), HANDLE),
                cuboid((5.0, 0.0, handle_z), (2.0, 8.0, 2.0), HANDLE),
            ]
        }
        FurnitureType::Generic => vec![cuboid((0.0, 0.0, 0.0), (w, h, l), Color::GRAY)],
    }
}

type ShapeKey = (FurnitureType, [u64; 3]);

/// Cache of local-space furniture facets keyed by type and size.
#[derive(Debug, Default)]
pub struct ShapeLibrary {
    shapes: HashMap<ShapeKey, Arc<[Facet]>>,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local-space facets for a piece, built on first use.
    pub fn facets(&mut self, kind: FurnitureType, dimension: Dimension) -> Arc<[Facet]> {
        let key = (
            kind,
            [
                dimension.width.to_bits(),
                dimension.height.to_bits(),
                dimension.length.to_bits(),
            ],
        );
        self.shapes
            .entry(key)
            .or_insert_with(|| {
                shape_for(kind, dimension)
                    .iter()
                    .flat_map(|b| b.facets().collect::<Vec<_>>())
                    .collect()
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::centroid;

    fn box_count(kind: FurnitureType) -> usize {
        shape_for(kind, kind.default_dimension()).len()
    }

    #[test]
    fn test_box_counts() {
        assert_eq!(box_count(FurnitureType::Table), 5);
        assert_eq!(box_count(FurnitureType::Chair), 6);
        assert_eq!(box_count(FurnitureType::Sofa), 4);
        assert_eq!(box_count(FurnitureType::Bed), 3);
        assert_eq!(box_count(FurnitureType::Window), 2);
        assert_eq!(box_count(FurnitureType::Door), 2);
        assert_eq!(box_count(FurnitureType::Bookshelf), 8);
        assert_eq!(box_count(FurnitureType::Cabinet), 5);
        assert_eq!(box_count(FurnitureType::Generic), 1);
    }

    #[test]
    fn test_table_fits_its_bounds() {
        let d = FurnitureType::Table.default_dimension();
        let bounds = Aabb::from_center_size(Vec3::zeros(), d.as_size());
        for b in shape_for(FurnitureType::Table, d) {
            let inner = b.bounds();
            assert!(bounds.contains(&inner.min) && bounds.contains(&inner.max), "{b:?}");
        }
    }

    #[test]
    fn test_face_bias() {
        let b = cuboid((0.0, 0.0, 0.0), (2.0, 2.0, 2.0), Color::rgb(100, 100, 100));
        let colors: Vec<Color> = b.facets().map(|f| f.color).collect();
        let dark = Color::rgb(70, 70, 70);
        let base = Color::rgb(100, 100, 100);
        assert_eq!(colors, vec![dark, base, dark, base, dark, base]);
    }

    #[test]
    fn test_facet_normals_point_outward() {
        let b = cuboid((5.0, 1.0, -2.0), (3.0, 4.0, 5.0), Color::GRAY);
        for facet in b.facets() {
            assert!(facet.normal.dot(&(centroid(&facet.vertices) - b.center)) > 0.0);
        }
    }

    #[test]
    fn test_negative_size_collapses() {
        let tiny = Dimension::new(4.0, 4.0, 4.0);
        for b in shape_for(FurnitureType::Bed, tiny) {
            assert!(b.size.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_library_caches_by_size() {
        let mut library = ShapeLibrary::new();
        let d = FurnitureType::Chair.default_dimension();
        let first = library.facets(FurnitureType::Chair, d);
        let second = library.facets(FurnitureType::Chair, d);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 36);
        library.facets(FurnitureType::Chair, Dimension::new(50.0, 90.0, 45.0));
        assert_eq!(library.len(), 2);
    }
}
