// ---------------------------------------------------------------------------
// MeshDumpError: typed failures for reading mesh dumps
// ---------------------------------------------------------------------------

use std::fmt;

/// One of the five count fields in a dump header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Vertices,
    Triangles,
    Uvs,
    Normals,
    Colors,
}

impl CountField {
    /// All fields in header order.
    pub const ALL: [CountField; 5] = [
        CountField::Vertices,
        CountField::Triangles,
        CountField::Uvs,
        CountField::Normals,
        CountField::Colors,
    ];

    /// Number of scalars making up one element of this field.
    pub fn stride(self) -> usize {
        match self {
            CountField::Vertices | CountField::Triangles | CountField::Normals => 3,
            CountField::Uvs => 2,
            CountField::Colors => 4,
        }
    }
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CountField::Vertices => "vertex",
            CountField::Triangles => "triangle index",
            CountField::Uvs => "uv",
            CountField::Normals => "normal",
            CountField::Colors => "color",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while reading or writing a mesh dump.
#[derive(Debug)]
pub enum MeshDumpError {
    /// I/O error while reading or writing the dump file.
    Io(std::io::Error),
    /// Fewer bytes than the header or the declared payload requires.
    Truncated { expected: usize, found: usize },
    /// More bytes than the declared payload.
    TrailingBytes { extra: usize },
    /// A header count was negative.
    NegativeCount { field: CountField, value: i32 },
    /// A header count is not a multiple of the field's stride.
    Misaligned { field: CountField, count: usize },
    /// A triangle index does not reference an existing vertex.
    IndexOutOfRange { index: i32, vertex_count: usize },
}

impl fmt::Display for MeshDumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshDumpError::Io(e) => write!(f, "I/O error: {e}"),
            MeshDumpError::Truncated { expected, found } => {
                write!(f, "Truncated mesh dump: expected {expected} bytes, found {found}")
            }
            MeshDumpError::TrailingBytes { extra } => {
                write!(f, "Mesh dump has {extra} unexpected trailing bytes")
            }
            MeshDumpError::NegativeCount { field, value } => {
                write!(f, "Negative {field} count: {value}")
            }
            MeshDumpError::Misaligned { field, count } => write!(
                f,
                "{field} count {count} is not a multiple of {}",
                field.stride()
            ),
            MeshDumpError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "Triangle index {index} out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for MeshDumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshDumpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MeshDumpError {
    fn from(e: std::io::Error) -> Self {
        MeshDumpError::Io(e)
    }
}
