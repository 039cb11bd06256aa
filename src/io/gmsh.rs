//! Gmsh `.msh` reader and writer.
//!
//! # Supported format
//! - ASCII `.msh` version **2.2**.
//! - Every element code of [`ElementType`], linear and high order. Node
//!   order in the file is the gmsh order, which is also the order elements
//!   keep in memory.
//! - Point elements (code 15) are skipped.
//!
//! # Limitations
//! - Binary files are not supported.
//! - `.msh` v4.x (block-based) is not supported.
//! - Element tags are read past and dropped; the writer emits two zero tags.

use std::io::{Read, Write};

use crate::io::{MeshReader, MeshWriter};
use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use crate::topology::mesh::Mesh;
use crate::topology::vertex::Vertex;

const POINT_CODE: i32 = 15;

/// Reader options.
#[derive(Debug, Default, Clone, Copy)]
pub struct GmshReadOptions {
    /// Skip elements with unknown type codes (with a warning) instead of
    /// failing.
    pub skip_unsupported: bool,
}

/// Gmsh `.msh` reader for ASCII v2.2 meshes.
#[derive(Debug, Default, Clone)]
pub struct GmshReader {
    pub options: GmshReadOptions,
}

fn parse_err(msg: impl Into<String>) -> MeshError {
    MeshError::MeshIoParse(msg.into())
}

impl GmshReader {
    pub fn with_options(options: GmshReadOptions) -> Self {
        Self { options }
    }

    fn parse_version(line: &str) -> Result<&str, MeshError> {
        let mut parts = line.split_whitespace();
        let version = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format version"))?;
        let file_type = parts
            .next()
            .ok_or_else(|| parse_err("missing mesh format type"))?;
        if file_type != "0" {
            return Err(parse_err("binary .msh files are not supported"));
        }
        Ok(version)
    }

    fn parse_field<T: std::str::FromStr>(raw: Option<&str>, what: &str) -> Result<T, MeshError> {
        let raw = raw.ok_or_else(|| parse_err(format!("missing {what}")))?;
        raw.parse::<T>()
            .map_err(|_| parse_err(format!("invalid {what}: {raw}")))
    }

    fn expect_end<'a>(
        lines: &mut impl Iterator<Item = &'a str>,
        tag: &str,
    ) -> Result<(), MeshError> {
        match lines.next() {
            Some(l) if l.trim() == tag => Ok(()),
            _ => Err(parse_err(format!("missing {tag}"))),
        }
    }

    fn read_element(&self, line: &str, mesh: &mut Mesh) -> Result<(), MeshError> {
        let mut parts = line.split_whitespace();
        let key: u32 = Self::parse_field(parts.next(), "element id")?;
        let code: i32 = Self::parse_field(parts.next(), "element type")?;
        if code == POINT_CODE {
            return Ok(());
        }
        let element_type = match ElementType::from_code(code) {
            Ok(t) => t,
            Err(e) if self.options.skip_unsupported => {
                log::warn!("gmsh: skipping element {key}: {e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let num_tags: usize = Self::parse_field(parts.next(), "element tag count")?;
        for _ in 0..num_tags {
            parts
                .next()
                .ok_or_else(|| parse_err(format!("missing tag of element {key}")))?;
        }
        let nodes = (0..element_type.vertex_count())
            .map(|_| Self::parse_field::<u64>(parts.next(), "element node id"))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.next().is_some() {
            return Err(parse_err(format!(
                "element {key}: too many nodes for type {code}"
            )));
        }
        mesh.add_element_code(key, code, &nodes)
    }
}

impl MeshReader for GmshReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<Mesh, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines();

        let mut version: Option<String> = None;
        let mut mesh = Mesh::new();
        let mut element_lines: Vec<&str> = Vec::new();

        while let Some(line) = lines.next() {
            match line.trim() {
                "$MeshFormat" => {
                    let format_line = lines.next().ok_or_else(|| parse_err("missing MeshFormat"))?;
                    version = Some(Self::parse_version(format_line)?.to_string());
                    Self::expect_end(&mut lines, "$EndMeshFormat")?;
                }
                "$Nodes" => {
                    let count: usize =
                        Self::parse_field(lines.next().map(str::trim), "node count")?;
                    for _ in 0..count {
                        let node_line = lines
                            .next()
                            .ok_or_else(|| parse_err("unexpected end of node list"))?;
                        let mut parts = node_line.split_whitespace();
                        let id: u64 = Self::parse_field(parts.next(), "node id")?;
                        let x = Self::parse_field(parts.next(), "x coordinate")?;
                        let y = Self::parse_field(parts.next(), "y coordinate")?;
                        let z = Self::parse_field(parts.next(), "z coordinate")?;
                        mesh.add_vertex(Vertex::from_raw(id, [x, y, z])?)?;
                    }
                    Self::expect_end(&mut lines, "$EndNodes")?;
                }
                "$Elements" => {
                    let count: usize =
                        Self::parse_field(lines.next().map(str::trim), "element count")?;
                    for _ in 0..count {
                        element_lines.push(
                            lines
                                .next()
                                .ok_or_else(|| parse_err("unexpected end of element list"))?,
                        );
                    }
                    Self::expect_end(&mut lines, "$EndElements")?;
                }
                _ => {
                    // ignore other sections
                }
            }
        }

        let version = version.unwrap_or_else(|| "2.2".to_string());
        if version != "2.2" {
            return Err(parse_err(format!("unsupported gmsh version: {version}")));
        }

        // $Elements may precede $Nodes in hand-written files.
        for line in element_lines {
            self.read_element(line, &mut mesh)?;
        }
        log::debug!(
            "gmsh: read {} vertices, {} elements",
            mesh.vertex_count(),
            mesh.element_count()
        );
        Ok(mesh)
    }
}

/// Gmsh `.msh` writer for ASCII v2.2 meshes.
#[derive(Debug, Default, Clone)]
pub struct GmshWriter;

impl MeshWriter for GmshWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshError> {
        writeln!(writer, "$MeshFormat\n2.2 0 8\n$EndMeshFormat")?;
        writeln!(writer, "$Nodes\n{}", mesh.vertex_count())?;
        for v in mesh.vertices().iter() {
            let [x, y, z] = v.position;
            writeln!(writer, "{} {x} {y} {z}", v.key())?;
        }
        writeln!(writer, "$EndNodes")?;
        writeln!(writer, "$Elements\n{}", mesh.element_count())?;
        for e in mesh.elements() {
            write!(writer, "{} {} 2 0 0", e.key(), e.element_type().code())?;
            for v in e.vertices() {
                write!(writer, " {v}")?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, "$EndElements")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRIANGLES: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
$EndNodes
$Elements
3
1 15 2 0 1 1
2 2 2 0 1 1 2 3
3 2 2 0 1 1 3 4
$EndElements
";

    #[test]
    fn reads_triangles_and_skips_points() {
        let mesh = GmshReader::default().read(TWO_TRIANGLES.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.element_count(), 2);
        assert!(!mesh.is_built());
    }

    #[test]
    fn unknown_code_fails_unless_skipped() {
        let src = TWO_TRIANGLES.replace("3 2 2 0 1 1 3 4", "3 93 2 0 1 1 3 4");
        assert_eq!(
            GmshReader::default().read(src.as_bytes()).map(|m| m.element_count()),
            Err(MeshError::UnsupportedElementType(93))
        );
        let reader = GmshReader::with_options(GmshReadOptions {
            skip_unsupported: true,
        });
        assert_eq!(reader.read(src.as_bytes()).unwrap().element_count(), 1);
    }

    #[test]
    fn binary_and_v4_are_rejected() {
        let bin = TWO_TRIANGLES.replace("2.2 0 8", "2.2 1 8");
        assert!(matches!(
            GmshReader::default().read(bin.as_bytes()),
            Err(MeshError::MeshIoParse(_))
        ));
        let v4 = TWO_TRIANGLES.replace("2.2 0 8", "4.1 0 8");
        assert!(matches!(
            GmshReader::default().read(v4.as_bytes()),
            Err(MeshError::MeshIoParse(_))
        ));
    }

    #[test]
    fn short_element_line_is_a_parse_error() {
        let src = TWO_TRIANGLES.replace("3 2 2 0 1 1 3 4", "3 2 2 0 1 1 3");
        assert!(matches!(
            GmshReader::default().read(src.as_bytes()),
            Err(MeshError::MeshIoParse(_))
        ));
    }

    #[test]
    fn written_mesh_reads_back() {
        let mesh = GmshReader::default().read(TWO_TRIANGLES.as_bytes()).unwrap();
        let mut buf = Vec::new();
        GmshWriter.write(&mut buf, &mesh).unwrap();
        let again = GmshReader::default().read(buf.as_slice()).unwrap();
        assert_eq!(again.vertex_count(), 4);
        let a: Vec<_> = mesh.elements().map(|e| e.vertices().to_vec()).collect();
        let b: Vec<_> = again.elements().map(|e| e.vertices().to_vec()).collect();
        assert_eq!(a, b);
    }
}
