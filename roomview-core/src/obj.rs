/// Wavefront OBJ and MTL parsing
use std::collections::HashMap;

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as signed_index, space0, space1},
    combinator::{map, opt},
    multi::many1,
    number::complete::{double, float},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::{vec3, Vec3};
use crate::mesh::{Face, Material, Mesh, DEFAULT_MATERIAL};

/// Result of parsing an OBJ file: the mesh plus the material libraries it
/// asks for, which the caller resolves.
#[derive(Debug, Clone, Default)]
pub struct ObjDocument {
    pub mesh: Mesh,
    pub material_libraries: Vec<String>,
}

fn keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

fn vector3(input: &str) -> IResult<&str, Vec3> {
    map(
        tuple((
            preceded(space1, double),
            preceded(space1, double),
            preceded(space1, double),
        )),
        |(x, y, z)| vec3(x, y, z),
    )(input)
}

fn color3(input: &str) -> IResult<&str, [f32; 3]> {
    map(
        tuple((
            preceded(space1, float),
            preceded(space1, float),
            preceded(space1, float),
        )),
        |(r, g, b)| [r, g, b],
    )(input)
}

/// One face corner: `v`, `v/vt`, `v//vn` or `v/vt/vn`. Only `v` is kept.
fn face_vertex(input: &str) -> IResult<&str, i64> {
    terminated(
        signed_index,
        opt(preceded(
            char('/'),
            pair(opt(signed_index), opt(preceded(char('/'), opt(signed_index)))),
        )),
    )(input)
}

fn face_vertices(input: &str) -> IResult<&str, Vec<i64>> {
    many1(preceded(space1, face_vertex))(input)
}

/// Converts a 1-based (or negative, relative) OBJ index to a 0-based one.
fn resolve_index(index: i64, vertex_count: usize) -> Option<usize> {
    match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => {
            let back = usize::try_from(i.unsigned_abs()).ok()?;
            vertex_count.checked_sub(back)
        }
    }
}

/// Parses OBJ source into a mesh.
///
/// Faces with fewer than 3 corners or unresolvable indices are dropped.
/// Unknown statements are ignored.
pub fn parse_obj(input: &str) -> Result<ObjDocument> {
    let mut doc = ObjDocument::default();
    let mut current_material = DEFAULT_MATERIAL.to_string();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (rest, kw) = keyword(line).map_err(|_| Error::parse(line_no, "missing keyword"))?;

        match kw {
            "v" => {
                let (_, v) = vector3(rest)
                    .map_err(|_| Error::parse(line_no, format!("invalid vertex `{line}`")))?;
                doc.mesh.vertices.push(v);
            }
            "f" => {
                let (tail, corners) = face_vertices(rest)
                    .map_err(|_| Error::parse(line_no, format!("invalid face `{line}`")))?;
                if !tail.trim().is_empty() {
                    return Err(Error::parse(line_no, format!("invalid face `{line}`")));
                }
                if corners.len() < 3 {
                    warn!(line = line_no, "dropping face with {} corners", corners.len());
                    continue;
                }
                let count = doc.mesh.vertices.len();
                let indices: Option<Vec<usize>> =
                    corners.iter().map(|&i| resolve_index(i, count)).collect();
                match indices {
                    Some(vertex_indices) => doc
                        .mesh
                        .faces
                        .push(Face::new(vertex_indices, current_material.clone())),
                    None => warn!(line = line_no, "dropping face with unresolvable index"),
                }
            }
            "usemtl" => {
                let name = rest.trim();
                if !name.is_empty() {
                    current_material = name.to_string();
                    doc.mesh
                        .materials
                        .entry(current_material.clone())
                        .or_default();
                }
            }
            "mtllib" => {
                doc.material_libraries
                    .extend(rest.split_whitespace().map(str::to_string));
            }
            _ => {}
        }
    }

    debug!(
        vertices = doc.mesh.vertices.len(),
        faces = doc.mesh.faces.len(),
        "parsed OBJ"
    );
    Ok(doc)
}

/// Parses an MTL material library.
pub fn parse_mtl(input: &str) -> Result<HashMap<String, Material>> {
    let mut materials = HashMap::new();
    let mut current: Option<String> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (rest, kw) = keyword(line).map_err(|_| Error::parse(line_no, "missing keyword"))?;

        if kw == "newmtl" {
            let name = rest.trim().to_string();
            materials.insert(name.clone(), Material::default());
            current = Some(name);
            continue;
        }

        let Some(material) = current.as_ref().and_then(|name| materials.get_mut(name)) else {
            continue;
        };
        let bad_value = || Error::parse(line_no, format!("invalid value `{line}`"));

        match kw {
            "Ka" => material.ambient = color3(rest).map_err(|_| bad_value())?.1,
            "Kd" => material.diffuse = color3(rest).map_err(|_| bad_value())?.1,
            "Ks" => material.specular = color3(rest).map_err(|_| bad_value())?.1,
            "Ns" => {
                material.shininess = preceded(space1, float)(rest)
                    .map(|(_, v): (&str, f32)| v)
                    .map_err(|_: nom::Err<nom::error::Error<&str>>| bad_value())?;
            }
            "map_Kd" => {
                let path = rest.trim();
                if !path.is_empty() {
                    material.texture_path = Some(path.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(materials)
}

/// Parses OBJ source and merges in its material libraries.
///
/// `resolve` maps a library name to its text; libraries it cannot find are
/// skipped.
pub fn load_obj_with<F>(input: &str, mut resolve: F) -> Result<Mesh>
where
    F: FnMut(&str) -> Option<String>,
{
    let ObjDocument {
        mut mesh,
        material_libraries,
    } = parse_obj(input)?;

    for library in &material_libraries {
        match resolve(library) {
            Some(source) => {
                for (name, material) in parse_mtl(&source)? {
                    mesh.materials.insert(name, material);
                }
            }
            None => warn!(library = %library, "material library not found"),
        }
    }

    Ok(mesh)
}
